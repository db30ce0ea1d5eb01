use std::net::IpAddr;

use crate::admission::DomainFilter;
use crate::app::{AppContext, Result};
use crate::output::OutputFormat;
use crate::pipeline::ProxyQuery;
use crate::web;

pub async fn serve(ctx: &AppContext, host: Option<IpAddr>, port: Option<u16>) -> Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    web::serve(server.addr(), ctx.proxy.clone()).await?;
    Ok(())
}

pub struct FetchArgs {
    pub url: String,
    pub fulltext: bool,
    pub ttl: Option<u64>,
    pub limit: Option<usize>,
    pub filter: Option<String>,
    pub format: String,
}

impl FetchArgs {
    fn to_query(&self) -> ProxyQuery {
        ProxyQuery {
            url: Some(self.url.clone()),
            fulltext: self.fulltext.then(|| "true".to_string()),
            ttl: self.ttl.map(|t| t.to_string()),
            limit: self.limit.map(|l| l.to_string()),
            filter: self.filter.clone(),
            format: Some(self.format.clone()),
        }
    }
}

pub async fn fetch(ctx: &AppContext, args: &FetchArgs) -> Result<()> {
    let query = args.to_query();
    let format = OutputFormat::from_param(query.format.as_deref());

    let feed = ctx.proxy.handle(&query).await?;
    println!("{}", format.render(&feed)?);
    Ok(())
}

pub fn check(filter: &DomainFilter, host: &str) -> String {
    match filter.check(host) {
        Some(reason) => format!("{}: blocked ({})", host, reason),
        None => format!("{}: allowed", host),
    }
}

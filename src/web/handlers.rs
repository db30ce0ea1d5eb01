use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::output::OutputFormat;
use crate::pipeline::{FeedProxy, ProxyQuery};
use crate::web::error::ApiError;

pub type AppState = Arc<FeedProxy>;

/// `GET /rssproxy?url=...&fulltext=...&ttl=...&limit=...&format=...`
pub async fn proxy_feed(
    State(proxy): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let format = OutputFormat::from_param(query.format.as_deref());
    let feed = proxy.handle(&query).await?;
    let body = format.render(&feed)?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

pub async fn health_check() -> &'static str {
    "OK"
}

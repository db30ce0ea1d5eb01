use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rssproxy::app::AppContext;
use rssproxy::cli::{commands, Cli, Commands};
use rssproxy::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve(&ctx, host, port).await?;
        }
        Commands::Fetch {
            url,
            fulltext,
            ttl,
            limit,
            filter,
            format,
        } => {
            let args = commands::FetchArgs {
                url,
                fulltext,
                ttl,
                limit,
                filter,
                format,
            };
            commands::fetch(&ctx, &args).await?;
        }
        Commands::Check { host } => {
            println!("{}", commands::check(ctx.proxy.filter(), &host));
        }
    }

    Ok(())
}

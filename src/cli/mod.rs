pub mod commands;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rssproxy")]
#[command(about = "An RSS proxy that normalizes feeds and fills in full article text", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/rssproxy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP proxy
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one feed through the pipeline and print the result
    Fetch {
        /// URL of the feed
        url: String,

        /// Replace item descriptions with full article text
        #[arg(long)]
        fulltext: bool,

        /// Cache lifetime in seconds
        #[arg(long)]
        ttl: Option<u64>,

        /// Keep at most this many items
        #[arg(short, long)]
        limit: Option<usize>,

        /// Keep only items whose title or description matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Output format: rss or json
        #[arg(short, long, default_value = "rss")]
        format: String,
    },
    /// Show whether a hostname would be admitted
    Check {
        /// Hostname to test
        host: String,
    },
}

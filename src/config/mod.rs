//! Configuration management for rssproxy.
//!
//! Configuration is read from `~/.config/rssproxy/config.toml` (or the path
//! given with `--config`) at startup. If the default file doesn't exist, one
//! with commented defaults is created. Environment variables are applied on
//! top of the file.

use crate::cache::CacheConfig;
use crate::fetcher::FetcherConfig;
use crate::fulltext::ExtractorConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Comma-separated hostnames/patterns; replaces `proxy.blocked_domains`.
pub const ENV_BLOCKED_DOMAINS: &str = "RSSPROXY_BLOCKED_DOMAINS";
/// Seconds; replaces `proxy.default_ttl`.
pub const ENV_DEFAULT_TTL: &str = "RSSPROXY_DEFAULT_TTL";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub proxy: ProxyConfig,
    pub fetcher: FetcherConfig,
    pub fulltext: ExtractorConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 1200,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Replaces the built-in exact block list when set. Private IPv4 ranges
    /// are blocked regardless.
    pub blocked_domains: Option<Vec<String>>,

    /// Feed cache TTL in seconds when a request gives none.
    pub default_ttl: Option<u64>,
}

impl Config {
    /// Load configuration from `path`, or from the default path if `None`.
    ///
    /// Only the default file is created when missing; an explicit path must
    /// exist. Missing fields in the file use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let config_path = Self::default_config_path()?;
                if config_path.exists() {
                    Self::load_from(&config_path)?
                } else {
                    Self::create_default_config(&config_path)?;
                    Self::default()
                }
            }
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/rssproxy/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rssproxy").join("config.toml"))
    }

    /// Apply environment overrides, looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_BLOCKED_DOMAINS) {
            self.proxy.blocked_domains = Some(
                raw.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }

        if let Some(raw) = lookup(ENV_DEFAULT_TTL) {
            let ttl = raw.trim().parse::<u64>().map_err(|_| ConfigError::Env {
                name: ENV_DEFAULT_TTL,
                value: raw.clone(),
            })?;
            self.proxy.default_ttl = Some(ttl);
        }

        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# rssproxy configuration
#
# Environment overrides (applied after this file):
#   RSSPROXY_BLOCKED_DOMAINS  comma separated, replaces proxy.blocked_domains
#   RSSPROXY_DEFAULT_TTL      seconds, replaces proxy.default_ttl

[server]
host = "127.0.0.1"
port = 1200

[proxy]
# Hostnames and wildcard patterns that may not be proxied. Setting this
# replaces the built-in list (localhost, 127.0.0.1, 0.0.0.0). Private IPv4
# ranges (10/8, 127/8, 172.16/12, 192.168/16) are always refused.
# blocked_domains = ["localhost", "127.0.0.1", "0.0.0.0", "*.internal"]

# Feed cache lifetime in seconds when the request has no ttl (default: 300)
# default_ttl = 300

[fetcher]
# Total request timeout in seconds
timeout_secs = 20

# Connect timeout in seconds
connect_timeout_secs = 10

# Largest accepted response body in bytes
max_body_bytes = 10485760

# Maximum number of redirects to follow
max_redirects = 5

# user_agent = "rssproxy"

[fulltext]
# Extracted text must be longer than this to replace an item's description
min_content_length = 40

# A content selector only wins if its text is longer than this
min_selector_text = 100

# Extracted article cache lifetime in seconds
cache_ttl_secs = 3600

# Limit simultaneous article fetches per request (default: no limit)
# max_concurrency = 8

# CSS selectors to try for article content extraction (in priority order)
content_selectors = [
    "article",
    "[role=\"main\"]",
    "main",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content",
    "#content",
    ".post",
    ".article",
    ".blog-post",
]

# Elements to remove before extraction (ads, navigation, etc.)
remove_selectors = [
    "nav",
    "header",
    "footer",
    "aside",
    ".sidebar",
    ".advertisement",
    ".ad",
    ".ads",
    ".social-share",
    ".comments",
    ".related-posts",
    "script",
    "style",
    "noscript",
    "iframe",
    "form",
]

[cache]
# Maximum number of cached entries
max_entries = 1024
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value {value:?} for {name}")]
    Env { name: &'static str, value: String },
}

//! # rssproxy
//!
//! An RSS proxy: fetches a third-party feed, normalizes it to one shape,
//! optionally replaces each item's description with the full article text,
//! and caches the result.
//!
//! ## Architecture
//!
//! ```text
//! Admission → Cache ─miss→ Fetcher → Normalizer → (Enricher) → Output
//! ```
//!
//! - [`admission`]: Refuses internal hostnames before anything is fetched
//! - [`normalizer`]: Converts RSS/Atom feeds to unified domain models
//! - [`fulltext`]: Per-item article extraction, isolated per item
//! - [`pipeline`]: Request validation and orchestration
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the proxy on 127.0.0.1:1200
//! rssproxy serve
//!
//! # GET /rssproxy?url=https://blog.rust-lang.org/feed.xml&fulltext=true
//!
//! # One-off fetch to stdout
//! rssproxy fetch https://blog.rust-lang.org/feed.xml --format json
//!
//! # Would this host be proxied?
//! rssproxy check 192.168.1.1
//! ```

/// Hostname admission filter.
///
/// - [`DomainFilter`](admission::DomainFilter): exact, wildcard and private-range rules
pub mod admission;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// fetcher, cache, extractor, filter, proxy.
pub mod app;

/// TTL cache with single-flight computation.
pub mod cache;

/// Command-line interface using clap.
///
/// - `serve` - Run the HTTP proxy
/// - `fetch <url>` - Run one feed through the pipeline
/// - `check <host>` - Show the admission decision for a host
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/rssproxy/config.toml`, then applies
/// `RSSPROXY_*` environment overrides.
pub mod config;

/// Lenient publication date parsing.
pub mod datetime;

/// Core domain models.
///
/// - [`NormalizedFeed`](domain::NormalizedFeed): channel metadata plus items
/// - [`NormalizedItem`](domain::NormalizedItem): one entry in the uniform shape
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching raw bytes
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Full-text enrichment.
///
/// - [`Enricher`](fulltext::Enricher): fan-out over items, failures absorbed
/// - [`ReadableExtractor`](fulltext::ReadableExtractor): selector-based extraction
pub mod fulltext;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into a [`NormalizedFeed`](domain::NormalizedFeed).
pub mod normalizer;

/// RSS 2.0 and JSON rendering.
pub mod output;

/// Request pipeline.
pub mod pipeline;

/// axum router and error responses.
pub mod web;

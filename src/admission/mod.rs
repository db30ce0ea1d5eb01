//! Hostname admission control for outbound feed fetches.
//!
//! A host is rejected when it matches an exact rule, a wildcard rule
//! (`192.168.*`), or is a dotted-quad literal inside one of the private
//! IPv4 ranges. The range check applies no matter which rules are
//! configured. Hostnames that are neither literals nor matched by a rule
//! are admitted. Known gaps, all fail-open:
//!
//! - names resolving to private addresses (DNS rebinding) are not detected;
//! - IPv6 literals such as `[::1]` get no range check;
//! - a trailing-dot host (`localhost.`) does not equal its exact rule;
//! - redirect targets and article links are not checked at all.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

/// Exact rules used when no block list is configured.
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

/// Why a hostname was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// Hostname equals a configured rule.
    Exact,
    /// Dotted-quad literal inside 10/8, 172.16/12, 192.168/16 or 127/8.
    PrivateRange,
    /// Hostname matches the contained wildcard rule.
    Wildcard(String),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact match"),
            Self::PrivateRange => write!(f, "private IPv4 range"),
            Self::Wildcard(pattern) => write!(f, "wildcard {}", pattern),
        }
    }
}

/// Rule containing `*`, compiled to an anchored regex. `*` matches any
/// sequence; everything else, `.` included, is literal.
#[derive(Debug, Clone)]
struct WildcardPattern {
    raw: String,
    regex: Regex,
}

impl WildcardPattern {
    fn compile(raw: &str) -> Option<Self> {
        let escaped: Vec<String> = raw.split('*').map(regex::escape).collect();
        match Regex::new(&format!("^{}$", escaped.join(".*"))) {
            Ok(regex) => Some(Self {
                raw: raw.to_string(),
                regex,
            }),
            Err(e) => {
                tracing::warn!("Skipping wildcard rule {}: {}", raw, e);
                None
            }
        }
    }

    fn matches(&self, host: &str) -> bool {
        self.regex.is_match(host)
    }
}

/// Block-list filter built once from configuration.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    exact: HashSet<String>,
    wildcards: Vec<WildcardPattern>,
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DomainFilter {
    /// Build a filter from `rules`, or from [`DEFAULT_BLOCKED_DOMAINS`] when
    /// `None`. A configured list replaces the defaults entirely.
    pub fn new(rules: Option<&[String]>) -> Self {
        let rules: Vec<String> = match rules {
            Some(rules) => rules.to_vec(),
            None => DEFAULT_BLOCKED_DOMAINS.iter().map(|r| r.to_string()).collect(),
        };

        let mut exact = HashSet::new();
        let mut wildcards = Vec::new();

        for rule in rules {
            let rule = rule.trim().to_ascii_lowercase();
            if rule.is_empty() {
                continue;
            }
            if rule.contains('*') {
                wildcards.extend(WildcardPattern::compile(&rule));
            }
            exact.insert(rule);
        }

        Self { exact, wildcards }
    }

    pub fn is_blocked(&self, hostname: &str) -> bool {
        self.check(hostname).is_some()
    }

    /// Return the first rule that rejects `hostname`, if any.
    pub fn check(&self, hostname: &str) -> Option<BlockReason> {
        let hostname = hostname.to_ascii_lowercase();

        if self.exact.contains(&hostname) {
            return Some(BlockReason::Exact);
        }

        if let Some([a, b, _, _]) = parse_dotted_quad(&hostname) {
            if is_private_range(a, b) {
                return Some(BlockReason::PrivateRange);
            }
        }

        self.wildcards
            .iter()
            .find(|pattern| pattern.matches(&hostname))
            .map(|pattern| BlockReason::Wildcard(pattern.raw.clone()))
    }
}

/// Four runs of decimal digits separated by dots. Octets are not
/// range-checked, so `999.1.1.1` still parses.
fn parse_dotted_quad(host: &str) -> Option<[u64; 4]> {
    let mut octets = [0u64; 4];
    let mut parts = host.split('.');

    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().unwrap_or(u64::MAX);
    }

    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

fn is_private_range(a: u64, b: u64) -> bool {
    a == 10 || a == 127 || (a == 172 && (16..=31).contains(&b)) || (a == 192 && b == 168)
}

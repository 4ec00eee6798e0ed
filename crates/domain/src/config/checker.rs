use serde::{Deserialize, Serialize};

use crate::zones::default_zones;

/// Retry policy for transient query failures
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Extra attempts after the first one (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff before the first retry in milliseconds (default: 50)
    /// Doubles on every further retry
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for a single backoff in milliseconds (default: 1000)
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// DNSBL checker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// Recursive resolver used for every query (host:port, default "8.8.8.8:53")
    #[serde(default = "default_resolver")]
    pub resolver: String,

    /// DNSBL zones to query, in seeding order
    #[serde(default = "default_zones")]
    pub zones: Vec<String>,

    /// Per-zone trace logging
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Maximum number of DNS exchanges running at the same time
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Treat SERVFAIL as a transient failure instead of "no opinion"
    #[serde(default = "default_true")]
    pub retry_server_failure: bool,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            zones: default_zones(),
            verbose: false,
            query_timeout_ms: default_query_timeout_ms(),
            max_in_flight: default_max_in_flight(),
            retry_server_failure: true,
            retry: RetryConfig::default(),
        }
    }
}

fn default_resolver() -> String {
    "8.8.8.8:53".to_string()
}

fn default_query_timeout_ms() -> u64 {
    400
}

fn default_max_in_flight() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    50
}

fn default_max_backoff_ms() -> u64 {
    1000
}

//! Configuration module for the DNSBL checker
//!
//! - `root`: Main configuration and CLI overrides
//! - `checker`: Resolver, zone list and dispatch settings
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod checker;
pub mod errors;
pub mod logging;
pub mod root;

pub use checker::{CheckerConfig, RetryConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};

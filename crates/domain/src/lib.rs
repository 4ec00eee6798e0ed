//! DNSBL Checker Domain Layer
pub mod check;
pub mod config;
pub mod errors;
pub mod reverse_address;
pub mod zones;

pub use check::{CheckReport, Listing, QueryResult, ResponseStatus, WorkItem, ZoneAnswer};
pub use config::{CheckerConfig, CliOverrides, Config, ConfigError, RetryConfig};
pub use errors::DomainError;
pub use reverse_address::{parse_target, query_name, reverse_label};
pub use zones::DEFAULT_ZONES;

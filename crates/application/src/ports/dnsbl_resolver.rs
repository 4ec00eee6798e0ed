use async_trait::async_trait;
use dnsbl_domain::{DomainError, ZoneAnswer};

/// One DNS exchange against the configured recursive resolver.
///
/// `query_name` is fully qualified (`4.3.2.1.zen.spamhaus.org.`). Any
/// response that was received and decoded is an `Ok`, whatever its response
/// code; timeouts and socket failures come back as transient errors (see
/// [`DomainError::is_transient`]).
#[async_trait]
pub trait DnsblResolver: Send + Sync {
    async fn exchange(&self, query_name: &str) -> Result<ZoneAnswer, DomainError>;
}

use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::UdpTransport;
use async_trait::async_trait;
use dnsbl_application::ports::DnsblResolver;
use dnsbl_domain::{CheckerConfig, DomainError, ZoneAnswer};
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const DEFAULT_DNS_PORT: u16 = 53;

/// Sends DNSBL queries to one recursive resolver over UDP.
pub struct UdpDnsblResolver {
    transport: UdpTransport,
    timeout: Duration,
}

impl UdpDnsblResolver {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            transport: UdpTransport::new(server_addr),
            timeout,
        }
    }

    /// Accepts `ip:port`, a bare IP (port 53) or `host[:port]`, which is
    /// resolved once through the system resolver.
    pub async fn from_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, DomainError> {
        let server_addr = resolve_endpoint(endpoint).await?;
        info!(
            resolver = %server_addr,
            timeout_ms = timeout.as_millis() as u64,
            "DNSBL resolver client created"
        );
        Ok(Self::new(server_addr, timeout))
    }

    pub async fn from_config(config: &CheckerConfig) -> Result<Self, DomainError> {
        Self::from_endpoint(
            &config.resolver,
            Duration::from_millis(config.query_timeout_ms),
        )
        .await
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.transport.server_addr()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl DnsblResolver for UdpDnsblResolver {
    async fn exchange(&self, query_name: &str) -> Result<ZoneAnswer, DomainError> {
        let start = Instant::now();
        let (id, query_bytes) = MessageBuilder::build_query_with_id(query_name)?;

        let transport_response = self.transport.send(&query_bytes, self.timeout).await?;
        let response = ResponseParser::parse(&transport_response.bytes)?;

        if response.id != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response id {} does not match query id {} for {}",
                response.id, id, query_name
            )));
        }

        if response.truncated {
            // A records for DNSBL entries always fit; keep what arrived.
            debug!(query = %query_name, "Response truncated (TC bit)");
        }

        debug!(
            query = %query_name,
            rcode = %response.status,
            addresses = response.addresses.len(),
            protocol = transport_response.protocol_used,
            latency_ms = start.elapsed().as_millis() as u64,
            "DNSBL exchange finished"
        );

        Ok(response.into_answer())
    }
}

async fn resolve_endpoint(endpoint: &str) -> Result<SocketAddr, DomainError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(DomainError::InvalidResolver("empty endpoint".to_string()));
    }

    if let Ok(addr) = endpoint.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = endpoint
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
    {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }

    let lookup: std::io::Result<Vec<SocketAddr>> = if endpoint.contains(':') {
        tokio::net::lookup_host(endpoint)
            .await
            .map(|addrs| addrs.collect())
    } else {
        tokio::net::lookup_host((endpoint, DEFAULT_DNS_PORT))
            .await
            .map(|addrs| addrs.collect())
    };

    lookup
        .map_err(|e| DomainError::InvalidResolver(format!("{}: {}", endpoint, e)))?
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::InvalidResolver(format!("{}: no addresses", endpoint)))
}

use dnsbl_application::ports::DnsblResolver;
use dnsbl_application::use_cases::BlacklistChecker;
use dnsbl_domain::CheckerConfig;
use dnsbl_infrastructure::dns::UdpDnsblResolver;
use std::sync::Arc;

pub async fn build_checker(config: &CheckerConfig) -> anyhow::Result<BlacklistChecker> {
    let resolver: Arc<dyn DnsblResolver> = Arc::new(UdpDnsblResolver::from_config(config).await?);
    Ok(BlacklistChecker::new(resolver, config))
}

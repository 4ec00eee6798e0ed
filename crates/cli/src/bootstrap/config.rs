use dnsbl_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        resolver = %config.checker.resolver,
        zones = config.checker.zones.len(),
        timeout_ms = config.checker.query_timeout_ms,
        max_in_flight = config.checker.max_in_flight,
        max_retries = config.checker.retry.max_retries,
        "Configuration loaded"
    );
}

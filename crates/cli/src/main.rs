//! # DNSBL Check
//!
//! Checks IP addresses against DNS-based blacklists.

mod bootstrap;
mod di;

use clap::Parser;
use dnsbl_application::use_cases::BlacklistChecker;
use dnsbl_domain::CliOverrides;
use std::io::Write;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "dnsbl-check")]
#[command(version)]
#[command(about = "Fast DNS blacklist checker")]
struct Cli {
    /// Addresses to check
    #[arg(required = true, value_name = "IP")]
    ips: Vec<String>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Recursive resolver (host:port)
    #[arg(short = 'r', long)]
    resolver: Option<String>,

    /// DNSBL zone to query; repeat to build the list (replaces the configured zones)
    #[arg(short = 'z', long = "zone", value_name = "ZONE")]
    zones: Vec<String>,

    /// Per-query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Maximum concurrent DNS queries
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Retries after a timed out query
    #[arg(long)]
    max_retries: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Trace every zone query
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            resolver: self.resolver.clone(),
            zones: (!self.zones.is_empty()).then(|| self.zones.clone()),
            query_timeout_ms: self.timeout_ms,
            max_in_flight: self.max_in_flight,
            max_retries: self.max_retries,
            verbose: self.verbose,
            log_level: self.log_level.clone(),
        }
    }
}

const EXIT_LISTED: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Aggregate result of checking every address given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    Listed,
    Invalid,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Listed => ExitCode::from(EXIT_LISTED),
            Outcome::Invalid => ExitCode::from(EXIT_USAGE),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("dnsbl-check: {:#}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);
    bootstrap::config::log_config(cli.config.as_deref(), &config);

    let checker = di::build_checker(&config.checker).await?;

    let stdout = std::io::stdout();
    report(&checker, &cli.ips, &mut stdout.lock()).await
}

/// Checks each address in turn and writes its report lines to `out`.
///
/// Invalid input takes precedence over listings when picking the outcome.
async fn report(
    checker: &BlacklistChecker,
    ips: &[String],
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let mut listed = false;
    let mut invalid = false;

    for ip in ips {
        match checker.check_report(ip).await {
            Ok(report) if report.is_listed() => {
                listed = true;
                for line in report.lines() {
                    writeln!(out, "{}", line)?;
                }
            }
            Ok(report) => writeln!(out, "{} not blacklisted", report.ip)?,
            Err(e) => {
                invalid = true;
                error!(input = %ip, error = %e, "Skipping address");
                eprintln!("dnsbl-check: {}", e);
            }
        }
    }
    out.flush()?;

    Ok(if invalid {
        Outcome::Invalid
    } else if listed {
        Outcome::Listed
    } else {
        Outcome::Clean
    })
}

use super::retry::RetryPolicy;
use super::session;
use super::tracker::CompletionTracker;
use super::worker::{Pending, WorkerContext};
use crate::ports::DnsblResolver;
use dnsbl_domain::{parse_target, CheckReport, CheckerConfig, DomainError, WorkItem};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Checks addresses against every configured DNSBL zone.
///
/// Each call to [`check`](Self::check) runs its own session: one work item
/// per zone, a dispatcher task that owns the report, and a worker task per
/// item. The number of DNS exchanges running at once is capped across all
/// sessions of the same checker.
pub struct BlacklistChecker {
    resolver: Arc<dyn DnsblResolver>,
    zones: Arc<[Arc<str>]>,
    permits: Arc<Semaphore>,
    retry: RetryPolicy,
    retry_server_failure: bool,
    verbose: bool,
}

impl BlacklistChecker {
    pub fn new(resolver: Arc<dyn DnsblResolver>, config: &CheckerConfig) -> Self {
        let mut zones: Vec<Arc<str>> = Vec::with_capacity(config.zones.len());
        for zone in &config.zones {
            let zone = zone.trim().trim_end_matches('.');
            // DNS names compare case-insensitively; first spelling wins
            if !zones.iter().any(|z| z.eq_ignore_ascii_case(zone)) {
                zones.push(Arc::from(zone));
            }
        }

        Self {
            resolver,
            zones: zones.into(),
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            retry: RetryPolicy::from(&config.retry),
            retry_server_failure: config.retry_server_failure,
            verbose: config.verbose,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn zones(&self) -> &[Arc<str>] {
        &self.zones
    }

    /// Returns one `"<ip> blacklisted on <zone> with <addrs>"` line per
    /// listing zone, in the order the answers arrived.
    pub async fn check(&self, ip: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.check_report(ip).await?.lines())
    }

    #[instrument(skip(self), fields(zones = self.zones.len()))]
    pub async fn check_report(&self, ip: &str) -> Result<CheckReport, DomainError> {
        let target = parse_target(ip)?;

        if self.zones.is_empty() {
            return Ok(CheckReport::new(target));
        }

        let start = Instant::now();
        let tracker = CompletionTracker::new();

        // Never more items in flight than zones, so the queue can't fill up.
        let (queue_tx, queue_rx) = mpsc::channel(self.zones.len());
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let seed: Vec<Pending> = self
            .zones
            .iter()
            .map(|zone| Pending {
                item: WorkItem::new(target, Arc::clone(zone)),
                credit: tracker.credit(),
            })
            .collect();

        let ctx = Arc::new(WorkerContext {
            resolver: Arc::clone(&self.resolver),
            permits: Arc::clone(&self.permits),
            retry: self.retry,
            retry_server_failure: self.retry_server_failure,
            verbose: self.verbose,
            tracker: tracker.clone(),
            queue: queue_tx.clone(),
            results: results_tx,
        });

        let shutdown = CancellationToken::new();
        // stops the dispatcher even if this future is dropped mid-session
        let _guard = shutdown.clone().drop_guard();
        let dispatcher = tokio::spawn(session::dispatch(
            target,
            ctx,
            queue_rx,
            results_rx,
            shutdown.clone(),
        ));

        for pending in seed {
            if queue_tx.send(pending).await.is_err() {
                break;
            }
        }
        drop(queue_tx);

        tracker.wait_idle().await;
        shutdown.cancel();

        let report = dispatcher
            .await
            .map_err(|e| DomainError::IoError(format!("dispatcher task failed: {}", e)))?;

        info!(
            ip = %target,
            listed = report.listings.len(),
            exhausted = report.exhausted.len(),
            malformed = report.malformed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "DNSBL check completed"
        );

        Ok(report)
    }
}

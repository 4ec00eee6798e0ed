use super::retry::RetryPolicy;
use super::tracker::{CompletionTracker, Credit};
use crate::ports::DnsblResolver;
use dnsbl_domain::{DomainError, QueryResult, ResponseStatus, WorkItem, ZoneAnswer};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

/// A queued work item together with the credit that keeps its session alive.
pub(super) struct Pending {
    pub item: WorkItem,
    pub credit: Credit,
}

/// Everything a worker needs, shared read-only across one session.
pub(super) struct WorkerContext {
    pub resolver: Arc<dyn DnsblResolver>,
    pub permits: Arc<Semaphore>,
    pub retry: RetryPolicy,
    pub retry_server_failure: bool,
    pub verbose: bool,
    pub tracker: CompletionTracker,
    pub queue: mpsc::Sender<Pending>,
    pub results: mpsc::UnboundedSender<WorkerReport>,
}

/// What a worker hands to the aggregator.
#[derive(Debug)]
pub(super) enum WorkerReport {
    Hit(QueryResult),
    Exhausted(QueryResult),
    Malformed(QueryResult),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Verdict {
    Listed(Vec<Ipv4Addr>),
    NotListed,
    NoOpinion(ResponseStatus),
    Transient(DomainError),
    Malformed(DomainError),
}

pub(super) fn classify(
    outcome: Result<ZoneAnswer, DomainError>,
    retry_server_failure: bool,
) -> Verdict {
    match outcome {
        Err(e) if e.is_transient() => Verdict::Transient(e),
        Err(e) => Verdict::Malformed(e),
        Ok(answer) if answer.status.is_server_failure() && retry_server_failure => {
            Verdict::Transient(DomainError::InvalidDnsResponse(format!(
                "resolver answered {}",
                answer.status
            )))
        }
        Ok(answer) if !answer.status.is_success() => Verdict::NoOpinion(answer.status),
        Ok(answer) if answer.addresses.is_empty() => Verdict::NotListed,
        Ok(answer) => Verdict::Listed(answer.addresses),
    }
}

/// Runs one work item to a terminal outcome or hands it back as a retry.
///
/// Only hits and diagnostics reach the results channel. The credit is
/// released last, after anything the aggregator must see has been sent.
pub(super) async fn run(ctx: Arc<WorkerContext>, pending: Pending) {
    let Pending { item, credit } = pending;
    let fqdn = item.query_name();

    if ctx.verbose {
        info!(ip = %item.ip, zone = %item.zone, attempt = item.attempt, fqdn = %fqdn, "Checking");
    } else {
        debug!(ip = %item.ip, zone = %item.zone, attempt = item.attempt, fqdn = %fqdn, "Checking");
    }

    let outcome = match ctx.permits.acquire().await {
        Ok(_permit) => ctx.resolver.exchange(&fqdn).await,
        // the checker never closes its semaphore
        Err(_) => return,
    };

    match classify(outcome, ctx.retry_server_failure) {
        Verdict::Listed(addresses) => {
            debug!(fqdn = %fqdn, addresses = addresses.len(), "Zone lists address");
            let result = QueryResult::for_item(&item).with_addresses(addresses);
            let _ = ctx.results.send(WorkerReport::Hit(result));
        }
        Verdict::NotListed => {
            debug!(fqdn = %fqdn, "Zone answered without records");
        }
        Verdict::NoOpinion(status) => {
            debug!(fqdn = %fqdn, rcode = %status, "Zone has no opinion");
        }
        Verdict::Transient(error) => {
            if ctx.retry.should_retry(item.attempt) {
                let delay = ctx.retry.backoff(item.attempt);
                debug!(
                    fqdn = %fqdn,
                    attempt = item.attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;

                let retry = Pending {
                    item: item.next_attempt(),
                    credit: ctx.tracker.credit(),
                };
                if ctx.queue.send(retry).await.is_err() {
                    warn!(fqdn = %fqdn, "Dispatch queue closed, dropping retry");
                }
            } else {
                warn!(
                    ip = %item.ip,
                    zone = %item.zone,
                    attempts = item.attempt + 1,
                    error = %error,
                    "Retries exhausted, treating zone as not listed"
                );
                let result = QueryResult::for_item(&item).with_error(error);
                let _ = ctx.results.send(WorkerReport::Exhausted(result));
            }
        }
        Verdict::Malformed(error) => {
            warn!(
                ip = %item.ip,
                zone = %item.zone,
                error = %error,
                "Unusable response, treating zone as not listed"
            );
            let result = QueryResult::for_item(&item).with_error(error);
            let _ = ctx.results.send(WorkerReport::Malformed(result));
        }
    }

    drop(credit);
}

use super::worker::{self, Pending, WorkerContext, WorkerReport};
use dnsbl_domain::{CheckReport, Listing};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Drains the dispatch queue and aggregates worker reports for one session.
///
/// This task is the only writer of the report. It runs until `shutdown` is
/// cancelled, then collects whatever results are still buffered and stops
/// every worker it started before returning.
pub(super) async fn dispatch(
    ip: IpAddr,
    ctx: Arc<WorkerContext>,
    mut queue: mpsc::Receiver<Pending>,
    mut results: mpsc::UnboundedReceiver<WorkerReport>,
    shutdown: CancellationToken,
) -> CheckReport {
    let mut report = CheckReport::new(ip);
    let mut workers = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            Some(worker_report) = results.recv() => aggregate(&mut report, worker_report),

            Some(pending) = queue.recv() => {
                debug!(zone = %pending.item.zone, attempt = pending.item.attempt, "Dispatching");
                workers.spawn(worker::run(Arc::clone(&ctx), pending));
            }

            Some(joined) = workers.join_next(), if !workers.is_empty() => {
                if let Err(e) = joined {
                    error!(error = %e, "Check worker failed");
                }
            }
        }
    }

    // Workers send before releasing their credit, so once the session is idle
    // every report is already buffered. Anything still running here is past
    // its last send, or the caller went away.
    workers.shutdown().await;
    while let Ok(worker_report) = results.try_recv() {
        aggregate(&mut report, worker_report);
    }

    debug!(ip = %ip, listings = report.listings.len(), "Dispatcher finished");
    report
}

fn aggregate(report: &mut CheckReport, worker_report: WorkerReport) {
    match worker_report {
        WorkerReport::Hit(result) if result.is_hit() => report.listings.push(Listing::from(result)),
        WorkerReport::Hit(_) => {}
        WorkerReport::Exhausted(result) => report.exhausted.push(result),
        WorkerReport::Malformed(result) => report.malformed.push(result),
    }
}

//! Periodic reconciliation of denormalized totals

use ledger_application::DynLedgerService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sweep every item's total each `every` until `shutdown` is cancelled.
///
/// The first sweep runs one full interval after start.
pub fn spawn_reconciler(
    service: Arc<DynLedgerService>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        info!(interval_secs = every.as_secs_f64(), "Reconciler started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Reconciler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match service.reconcile().await {
                        Ok(report) if report.is_clean() => debug!(items = report.items_checked, "Totals consistent"),
                        Ok(_) => {}
                        Err(e) => warn!("Reconciliation sweep failed: {}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_application::{ContentStore, LedgerParams, LedgerService, VoteLedger};
    use ledger_domain::{Answer, ItemRef, VoteProjection};
    use ledger_infrastructure::{DocumentStore, SeedData};

    #[tokio::test]
    async fn test_reconciler_repairs_and_stops() {
        let store = Arc::new(DocumentStore::in_memory());
        let mut drifted = Answer::new("a1", "q1", "bob");
        drifted.projection = VoteProjection { votes: 7, watermark: 0 };
        store
            .import(SeedData {
                answers: vec![drifted],
                ..Default::default()
            })
            .await
            .unwrap();

        let ledger: Arc<dyn VoteLedger> = store.clone();
        let content: Arc<dyn ContentStore> = store.clone();
        let service = Arc::new(LedgerService::new(ledger, content, LedgerParams::default()));

        let shutdown = CancellationToken::new();
        let handle = spawn_reconciler(service, Duration::from_millis(10), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.projected_total(&ItemRef::answer("a1")).await.unwrap(), Some(0));

        shutdown.cancel();
        handle.await.unwrap();
    }
}

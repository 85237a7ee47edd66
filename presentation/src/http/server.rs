//! Server setup and lifecycle management

use super::reconciler::spawn_reconciler;
use super::router::create_router;
use super::state::AppState;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Serve the API on `listener` until `shutdown` is cancelled.
///
/// When `reconcile_every` is set, a background reconciler runs alongside
/// and is stopped before this returns.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    reconcile_every: Option<Duration>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let reconciler = reconcile_every
        .map(|every| spawn_reconciler(state.service.clone(), every, shutdown.child_token()));

    let app = create_router(state);
    if let Ok(addr) = listener.local_addr() {
        info!("vote-ledger listening on {}", addr);
    }

    let stop = shutdown.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move { stop.cancelled().await })
        .await;

    // Stop background work whether the server exited cleanly or not.
    shutdown.cancel();
    if let Some(handle) = reconciler
        && let Err(e) = handle.await
    {
        error!("Reconciler task failed: {}", e);
    }

    info!("vote-ledger shutting down");
    result
}

/// Cancel `token` on Ctrl+C or SIGTERM.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received terminate signal, initiating graceful shutdown"),
        _ = token.cancelled() => {}
    }
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_application::{ContentStore, LedgerParams, LedgerService, VoteLedger};
    use ledger_infrastructure::DocumentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_serve_returns_after_cancel() {
        let store = Arc::new(DocumentStore::in_memory());
        let ledger: Arc<dyn VoteLedger> = store.clone();
        let content: Arc<dyn ContentStore> = store;
        let state = AppState::new(Arc::new(LedgerService::new(
            ledger,
            content,
            LedgerParams::default(),
        )));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(
            listener,
            state,
            Some(Duration::from_secs(3600)),
            shutdown.clone(),
        ));

        shutdown.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}

//! HTTP API: axum router, handlers and server lifecycle.

mod error;
mod handlers;
mod reconciler;
mod router;
mod server;
mod state;

pub use error::{ApiError, ApiResult, status_for};
pub use reconciler::spawn_reconciler;
pub use router::create_router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;

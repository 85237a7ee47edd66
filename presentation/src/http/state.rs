//! Shared handler state

use ledger_application::DynLedgerService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DynLedgerService>,
    pub version: String,
}

impl AppState {
    pub fn new(service: Arc<DynLedgerService>) -> Self {
        Self {
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

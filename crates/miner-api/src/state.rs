//! App state shared across handlers.

use std::sync::Arc;

use miner_ledger::Ledger;

/// Shared handler state. Cheap to clone; the ledger is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }
}

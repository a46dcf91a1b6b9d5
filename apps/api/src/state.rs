use std::sync::Arc;

use crate::jobs::dispatcher::JobDispatcher;
use crate::jobs::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Accepts submissions and spawns their execution units.
    pub dispatcher: JobDispatcher,
    /// Read side for the Status API; the dispatcher holds its own handle.
    pub store: Arc<dyn JobStore>,
}

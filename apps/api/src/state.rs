use std::sync::Arc;

use crate::matching::generator::MatchGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the stores, the scorer and the per-user generation locks.
    pub generator: Arc<MatchGenerator>,
}

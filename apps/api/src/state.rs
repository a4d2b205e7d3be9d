use std::sync::Arc;

use crate::config::Config;
use crate::ranking::scorer::Scorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer capability. Default: PythonScorer built from config.
    pub scorer: Arc<dyn Scorer>,
}

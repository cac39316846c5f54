use std::sync::Arc;

use crate::services::RecommendationEngine;

/// Shared application state
///
/// The engine is immutable once built, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

impl From<Arc<RecommendationEngine>> for AppState {
    fn from(engine: Arc<RecommendationEngine>) -> Self {
        Self { engine }
    }
}

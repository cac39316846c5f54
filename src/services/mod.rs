pub mod candidates;
pub mod engine;
pub mod report;
pub mod reranker;
pub mod signals;

pub use engine::RecommendationEngine;
pub use report::render_report;
pub use reranker::{ReRanker, RerankError};

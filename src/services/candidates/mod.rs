//! Baseline candidate sources
//!
//! The baseline recommender runs outside this service. Its output reaches us
//! either as a precomputed file or through an HTTP endpoint; both implement
//! [`CandidateSource`].

use std::collections::HashSet;

use crate::models::{Candidate, UserId};

pub mod precomputed;
pub mod upstream;

pub use precomputed::PrecomputedCandidates;
pub use upstream::UpstreamCandidates;

/// Failures reported by a candidate source
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("user {0} is unknown to the candidate source")]
    NotFound(UserId),

    #[error("candidate source unavailable: {0}")]
    UpstreamUnavailable(String),
}

/// Trait for baseline candidate providers
///
/// Implementations return up to `count` distinct items the user has not rated,
/// best first. Fewer items are fine when the baseline has nothing more.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn recommend(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<Candidate>, CandidateError>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Orders by descending score, drops repeated items and truncates.
///
/// The sort is stable, so the first occurrence of an item wins among equal
/// scores and the highest-scored occurrence wins otherwise.
pub(crate) fn normalize(mut candidates: Vec<Candidate>, count: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.base_score.total_cmp(&a.base_score));

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.item_id));
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_dedups_and_truncates() {
        let input = vec![
            Candidate::new(1, 0.2),
            Candidate::new(2, 0.9),
            Candidate::new(1, 0.7),
            Candidate::new(3, 0.5),
        ];

        assert_eq!(
            normalize(input.clone(), 10),
            vec![
                Candidate::new(2, 0.9),
                Candidate::new(1, 0.7),
                Candidate::new(3, 0.5),
            ]
        );
        assert_eq!(normalize(input, 1), vec![Candidate::new(2, 0.9)]);
    }

    #[test]
    fn test_normalize_keeps_tie_order() {
        let input = vec![Candidate::new(5, 0.5), Candidate::new(4, 0.5)];
        assert_eq!(normalize(input.clone(), 2), input);
    }
}

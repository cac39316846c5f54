use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod preference;
pub mod user;

pub use preference::Preference;
pub use user::{Demographics, Sex};

/// Identifier of a user in the rating data
pub type UserId = u64;

/// Identifier of an item (movie) in the rating data
pub type ItemId = u64;

/// An item proposed by the baseline recommender, before re-ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub item_id: ItemId,
    /// Affinity score assigned by the baseline recommender
    #[serde(rename = "score")]
    pub base_score: f64,
}

impl Candidate {
    pub fn new(item_id: ItemId, base_score: f64) -> Self {
        Self {
            item_id,
            base_score,
        }
    }
}

/// A re-ranked item returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    /// Base score plus every enabled adjustment
    pub score: f64,
}

/// Final recommendations for one user, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendations {
    pub user_id: UserId,
    pub items: Vec<Recommendation>,
}

impl UserRecommendations {
    /// Item ids in ranked order
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|r| r.item_id).collect()
    }
}

/// Output of a batch run over every known user
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    /// Ordered by user id
    pub users: Vec<UserRecommendations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_serde_uses_score_field() {
        let candidate = Candidate::new(101, 0.9);
        let json = serde_json::to_string(&candidate).unwrap();
        assert_eq!(json, r#"{"item_id":101,"score":0.9}"#);

        let parsed: Candidate = serde_json::from_str(r#"{"item_id":7,"score":1.5}"#).unwrap();
        assert_eq!(parsed, Candidate::new(7, 1.5));
    }

    #[test]
    fn test_user_recommendations_item_ids_keep_rank_order() {
        let recs = UserRecommendations {
            user_id: 1,
            items: vec![
                Recommendation {
                    item_id: 303,
                    score: 1.2,
                },
                Recommendation {
                    item_id: 101,
                    score: 0.9,
                },
            ],
        };
        assert_eq!(recs.item_ids(), vec![303, 101]);
    }
}

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use super::{normalize, CandidateError, CandidateSource};
use crate::{
    data::{parse_id, read_records, LoadError, RatingStore},
    models::{Candidate, UserId},
};

/// Baseline output computed offline, loaded from `user,item,score` rows
#[derive(Debug, Clone, Default)]
pub struct PrecomputedCandidates {
    by_user: HashMap<UserId, Vec<Candidate>>,
    known_users: HashSet<UserId>,
}

impl PrecomputedCandidates {
    /// Builds the per-user lists, dropping items the user already rated
    pub fn new(
        rows: impl IntoIterator<Item = (UserId, Candidate)>,
        ratings: &RatingStore,
    ) -> Self {
        let mut by_user: HashMap<UserId, Vec<Candidate>> = HashMap::new();
        for (user_id, candidate) in rows {
            if !ratings.has_rated(user_id, candidate.item_id) {
                by_user.entry(user_id).or_default().push(candidate);
            }
        }

        let by_user = by_user
            .into_iter()
            .map(|(user_id, list)| {
                let len = list.len();
                (user_id, normalize(list, len))
            })
            .collect();

        Self {
            by_user,
            known_users: ratings.user_ids().iter().copied().collect(),
        }
    }

    pub fn load(path: &Path, ratings: &RatingStore) -> Result<Self, LoadError> {
        let mut rows = Vec::new();

        for (line, record) in read_records(path)? {
            let fields: Vec<&str> = record.split([',', '\t']).map(str::trim).collect();
            let [user, item, score, ..] = fields.as_slice() else {
                return Err(LoadError::malformed(path, line, "expected user,item,score"));
            };

            let user_id = parse_id(path, line, "user id", user)?;
            let item_id = parse_id(path, line, "item id", item)?;
            let score: f64 = score.parse().map_err(|_| {
                LoadError::malformed(path, line, format!("invalid score '{score}'"))
            })?;

            rows.push((user_id, Candidate::new(item_id, score)));
        }

        let source = Self::new(rows, ratings);

        tracing::info!(
            path = %path.display(),
            users = source.by_user.len(),
            "Loaded precomputed candidates"
        );

        Ok(source)
    }
}

#[async_trait::async_trait]
impl CandidateSource for PrecomputedCandidates {
    async fn recommend(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<Candidate>, CandidateError> {
        match self.by_user.get(&user_id) {
            Some(list) => Ok(list.iter().take(count).copied().collect()),
            None if self.known_users.contains(&user_id) => Ok(Vec::new()),
            None => Err(CandidateError::NotFound(user_id)),
        }
    }

    fn name(&self) -> &'static str {
        "precomputed"
    }
}

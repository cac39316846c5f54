//! Baseline recommender reached over HTTP
//!
//! API Flow:
//! `GET {base}/users/{user_id}/candidates?count={n}` → `[{"item_id": .., "score": ..}]`
//!
//! A 404 means the baseline does not know the user; any other non-success
//! status means the baseline could not produce candidates.

use reqwest::{Client as HttpClient, StatusCode};

use super::{normalize, CandidateError, CandidateSource};
use crate::models::{Candidate, UserId};

#[derive(Clone)]
pub struct UpstreamCandidates {
    http_client: HttpClient,
    base_url: String,
}

impl UpstreamCandidates {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn candidates_url(&self, user_id: UserId) -> String {
        format!("{}/users/{}/candidates", self.base_url, user_id)
    }
}

#[async_trait::async_trait]
impl CandidateSource for UpstreamCandidates {
    async fn recommend(
        &self,
        user_id: UserId,
        count: usize,
    ) -> Result<Vec<Candidate>, CandidateError> {
        let url = self.candidates_url(user_id);

        tracing::debug!(user_id, count, url = %url, "Requesting baseline candidates");

        let response = self
            .http_client
            .get(&url)
            .query(&[("count", count)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(user_id, error = %e, "Baseline request failed");
                CandidateError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CandidateError::NotFound(user_id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                user_id,
                status = %status,
                body = %body,
                "Baseline returned an error"
            );
            return Err(CandidateError::UpstreamUnavailable(format!(
                "baseline returned status {}: {}",
                status, body
            )));
        }

        let candidates: Vec<Candidate> = response.json().await.map_err(|e| {
            CandidateError::UpstreamUnavailable(format!("invalid baseline response: {}", e))
        })?;

        let candidates = normalize(candidates, count);

        tracing::debug!(
            user_id,
            returned = candidates.len(),
            "Baseline candidates received"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}

use std::{path::Path, sync::Arc, time::Instant};

use chrono::Utc;
use tokio::sync::Semaphore;

use crate::{
    config::{Config, RerankConfig},
    data::{DemographicTable, GenreTable, LoadError, RatingStore, SynopsisTable},
    error::{AppError, AppResult},
    models::{BatchReport, UserId, UserRecommendations},
    services::{
        candidates::{CandidateSource, PrecomputedCandidates, UpstreamCandidates},
        reranker::ReRanker,
        signals::{Capabilities, Signals},
    },
};

/// Ties the rating data, the optional signals and the baseline source
/// together and re-ranks recommendations per user.
pub struct RecommendationEngine {
    ratings: Arc<RatingStore>,
    reranker: ReRanker,
    candidates: Arc<dyn CandidateSource>,
    config: RerankConfig,
    batch_concurrency: usize,
}

impl RecommendationEngine {
    pub fn new(
        ratings: Arc<RatingStore>,
        signals: Signals,
        candidates: Arc<dyn CandidateSource>,
        config: RerankConfig,
    ) -> Self {
        Self {
            reranker: ReRanker::new(ratings.clone(), signals),
            ratings,
            candidates,
            config,
            batch_concurrency: 1,
        }
    }

    /// Number of users re-ranked at once during a batch run
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    /// Loads every data source named by the configuration.
    ///
    /// The rating data is mandatory: a missing, unreadable or empty file fails
    /// initialization. Each optional signal that cannot be loaded is skipped
    /// with a warning and its adjustment stays disabled.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let start = Instant::now();

        let ratings = RatingStore::load(&config.ratings_path).map_err(|e| {
            tracing::error!(error = %e, "Rating data is not available");
            e
        })?;
        if ratings.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no ratings in {}",
                config.ratings_path.display()
            )));
        }
        let ratings = Arc::new(ratings);

        let mut signals = Signals::none();
        if let Some(table) = load_signal(
            "demographics",
            config.demographics_enabled,
            &config.demographics_path,
            DemographicTable::load,
            DemographicTable::is_empty,
        ) {
            signals = signals.with_demographics(Arc::new(table));
        }
        if let Some(table) = load_signal(
            "genre",
            config.genre_enabled,
            &config.genres_path,
            GenreTable::load,
            GenreTable::is_empty,
        ) {
            signals = signals.with_genres(Arc::new(table));
        }
        if let Some(table) = load_signal(
            "synopsis",
            config.content_enabled,
            &config.synopsis_path,
            SynopsisTable::load,
            SynopsisTable::is_empty,
        ) {
            signals = signals.with_content(Arc::new(table));
        }

        let candidates: Arc<dyn CandidateSource> = match &config.upstream_url {
            Some(url) => Arc::new(UpstreamCandidates::new(url.as_str())),
            None => Arc::new(PrecomputedCandidates::load(
                &config.candidates_path,
                &ratings,
            )?),
        };

        let capabilities = signals.capabilities();
        tracing::info!(
            users = ratings.user_count(),
            candidate_source = candidates.name(),
            demographics = capabilities.demographics,
            genres = capabilities.genres,
            content = capabilities.content,
            elapsed_ms = start.elapsed().as_millis(),
            "Recommendation engine initialized"
        );

        Ok(Self::new(ratings, signals, candidates, config.rerank_config())
            .with_batch_concurrency(config.batch_concurrency))
    }

    pub fn capabilities(&self) -> Capabilities {
        self.reranker.capabilities()
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Users known from the rating data, ascending
    pub fn user_ids(&self) -> &[UserId] {
        self.ratings.user_ids()
    }

    /// Fetches baseline candidates for the user and re-ranks them
    pub async fn recommend_for_user(&self, user_id: UserId) -> AppResult<UserRecommendations> {
        let candidates = self
            .candidates
            .recommend(user_id, self.config.candidate_count)
            .await?;

        let items = self.reranker.rerank(user_id, &candidates, &self.config)?;

        tracing::debug!(
            user_id,
            candidates = candidates.len(),
            recommended = items.len(),
            "Re-ranked recommendations"
        );

        Ok(UserRecommendations { user_id, items })
    }

    /// Re-ranks recommendations for every known user.
    ///
    /// Users run concurrently up to the configured limit. The first failure
    /// fails the whole batch.
    pub async fn recommend_for_all_users(self: Arc<Self>) -> AppResult<BatchReport> {
        let start = Instant::now();
        let permits = Arc::new(Semaphore::new(self.batch_concurrency));
        let mut tasks = Vec::with_capacity(self.user_ids().len());

        for &user_id in self.user_ids() {
            let engine = Arc::clone(&self);
            let permits = Arc::clone(&permits);
            let task = tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                engine.recommend_for_user(user_id).await
            });
            tasks.push((user_id, task));
        }

        let mut users = Vec::with_capacity(tasks.len());
        for (user_id, task) in tasks {
            match task.await {
                Ok(Ok(recommendations)) => users.push(recommendations),
                Ok(Err(e)) => {
                    tracing::error!(user_id, error = %e, "Batch recommendation failed");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Task join error");
                    return Err(AppError::Internal(e.to_string()));
                }
            }
        }

        tracing::info!(
            users = users.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Batch recommendation completed"
        );

        Ok(BatchReport {
            generated_at: Utc::now(),
            users,
        })
    }
}

/// Loads one optional signal table; `None` leaves the signal disabled.
/// A table without records is treated like a missing one.
fn load_signal<T>(
    name: &str,
    enabled: bool,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T, LoadError>,
    is_empty: impl FnOnce(&T) -> bool,
) -> Option<T> {
    if !enabled {
        tracing::info!(signal = name, "Signal disabled by configuration");
        return None;
    }

    match load(path) {
        Ok(table) if is_empty(&table) => {
            tracing::warn!(signal = name, path = %path.display(), "Signal data is empty, skipping");
            None
        }
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!(
                signal = name,
                error = %e,
                "Signal data not available, skipping"
            );
            None
        }
    }
}

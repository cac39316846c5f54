use std::{collections::HashSet, sync::Arc};

use thiserror::Error;

use crate::{
    config::RerankConfig,
    models::{Candidate, Demographics, ItemId, Recommendation, Sex, UserId},
    services::signals::{Capabilities, DemographicSignal, PreferenceStore, Signals},
};

/// Bonus when the item's raters lean toward the user's own sex
const GENDER_BONUS: f64 = 0.2;
/// Width in years of one birth-year step
const BIRTH_YEAR_STEP: i64 = 5;
/// Steps past this value zero the birth-year term entirely
const BIRTH_YEAR_CLIFF: i64 = 5;
const BIRTH_YEAR_WEIGHT: f64 = 0.1;

const GENRE_POLICY: OverlapPolicy = OverlapPolicy {
    cap: 4,
    weight: 0.2,
};
const CONTENT_POLICY: OverlapPolicy = OverlapPolicy {
    cap: 10,
    weight: 0.05,
};

/// Error types for re-ranking
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RerankError {
    #[error("user {0} is not recognized")]
    UserNotFound(UserId),
}

/// Aggregation policy for a tag-overlap signal
#[derive(Debug, Clone, Copy)]
struct OverlapPolicy {
    /// Average overlap is clamped to this many shared tags
    cap: usize,
    weight: f64,
}

/// Adjustments accumulated for one candidate while blending
#[derive(Debug, Clone, Copy)]
struct ScoredCandidate {
    item_id: ItemId,
    base_score: f64,
    demographic: f64,
    genre: f64,
    content: f64,
}

impl ScoredCandidate {
    fn new(candidate: &Candidate) -> Self {
        Self {
            item_id: candidate.item_id,
            base_score: candidate.base_score,
            demographic: 0.0,
            genre: 0.0,
            content: 0.0,
        }
    }

    fn final_score(&self) -> f64 {
        self.base_score + self.demographic + self.genre + self.content
    }
}

/// Blends baseline candidate scores with the demographic, genre and
/// content signals and returns the top of the re-ordered list.
///
/// The re-ranker only reads from its providers, so one instance can serve
/// any number of concurrent calls.
#[derive(Clone)]
pub struct ReRanker {
    preferences: Arc<dyn PreferenceStore>,
    signals: Signals,
}

impl ReRanker {
    pub fn new(preferences: Arc<dyn PreferenceStore>, signals: Signals) -> Self {
        Self {
            preferences,
            signals,
        }
    }

    /// Signals that loaded at initialization
    pub fn capabilities(&self) -> Capabilities {
        self.signals.capabilities()
    }

    /// Re-ranks `candidates` for `user_id`.
    ///
    /// Returns at most `config.final_count` recommendations ordered by
    /// descending final score; equal scores keep the candidate order.
    /// Fails only when the demographic signal is active and does not
    /// know the user.
    pub fn rerank(
        &self,
        user_id: UserId,
        candidates: &[Candidate],
        config: &RerankConfig,
    ) -> Result<Vec<Recommendation>, RerankError> {
        let capabilities = self.capabilities();

        let demographics = self
            .signals
            .demographics()
            .filter(|_| capabilities.demographics && config.demographics_enabled)
            .map(|signal| {
                signal
                    .profile(user_id)
                    .map(|target| (signal, target))
                    .ok_or(RerankError::UserNotFound(user_id))
            })
            .transpose()?;
        let genres = self
            .signals
            .genres()
            .filter(|_| capabilities.genres && config.genre_enabled);
        let content = self
            .signals
            .content()
            .filter(|_| capabilities.content && config.content_enabled);

        let liked_items: Vec<ItemId> = if genres.is_some() || content.is_some() {
            self.preferences
                .by_user(user_id)
                .iter()
                .filter(|p| p.is_positive())
                .map(|p| p.item_id)
                .collect()
        } else {
            Vec::new()
        };

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| {
                let mut entry = ScoredCandidate::new(candidate);

                if let Some((signal, target)) = demographics {
                    entry.demographic =
                        self.demographic_adjustment(signal, &target, entry.item_id);
                }
                if let Some(signal) = genres {
                    if let Some(tags) = signal.genres(entry.item_id) {
                        entry.genre = overlap_adjustment(
                            tags,
                            &liked_items,
                            move |item| signal.genres(item),
                            GENRE_POLICY,
                        );
                    }
                }
                if let Some(signal) = content {
                    if let Some(terms) = signal.terms(entry.item_id) {
                        entry.content = overlap_adjustment(
                            terms,
                            &liked_items,
                            move |item| signal.terms(item),
                            CONTENT_POLICY,
                        );
                    }
                }

                tracing::trace!(
                    user_id,
                    item_id = entry.item_id,
                    base = entry.base_score,
                    demographic = entry.demographic,
                    genre = entry.genre,
                    content = entry.content,
                    "Scored candidate"
                );

                entry
            })
            .collect();

        // Stable sort: ties keep the baseline order
        scored.sort_by(|a, b| b.final_score().total_cmp(&a.final_score()));
        scored.truncate(config.final_count);

        Ok(scored
            .iter()
            .map(|entry| Recommendation {
                item_id: entry.item_id,
                score: entry.final_score(),
            })
            .collect())
    }

    /// Gender bonus plus birth-year term for one candidate item
    fn demographic_adjustment(
        &self,
        signal: &dyn DemographicSignal,
        target: &Demographics,
        item_id: ItemId,
    ) -> f64 {
        let raters = self.preferences.by_item(item_id);
        let mut tally: i64 = 0;
        let mut year_diff: i64 = 0;

        for preference in raters.iter().filter(|p| p.is_positive()) {
            match signal.sex(preference.user_id) {
                Sex::Male => tally += 1,
                Sex::Female => tally -= 1,
                Sex::Unknown => {}
            }
            let rater_year = signal.birth_year(preference.user_id);
            if let (Some(rater), Some(user)) = (rater_year, target.birth_year) {
                year_diff += (i64::from(rater) - i64::from(user)).abs();
            }
        }

        // every rating of the item divides the year sum, liked or not
        let count = raters.len() as i64;

        gender_bonus(tally, target.sex) + birth_year_term(year_diff, count)
    }
}

impl std::fmt::Debug for ReRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReRanker")
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

fn gender_bonus(tally: i64, sex: Sex) -> f64 {
    match (tally.signum(), sex) {
        (-1, Sex::Female) | (1, Sex::Male) => GENDER_BONUS,
        _ => 0.0,
    }
}

/// `x * 0.1` for `x = floor(total / (count * 5))`, but zero once `x` passes
/// the cliff. Not clamped.
fn birth_year_term(total_year_diff: i64, preference_count: i64) -> f64 {
    if preference_count == 0 {
        return 0.0;
    }
    let x = total_year_diff / (preference_count * BIRTH_YEAR_STEP);
    if BIRTH_YEAR_CLIFF - x >= 0 {
        x as f64 * BIRTH_YEAR_WEIGHT
    } else {
        0.0
    }
}

/// Average overlap between the candidate's tags and each liked item's tags.
///
/// Liked items without tags are skipped rather than counted.
fn overlap_adjustment<'a>(
    candidate_tags: &HashSet<String>,
    liked_items: &[ItemId],
    lookup: impl Fn(ItemId) -> Option<&'a HashSet<String>>,
    policy: OverlapPolicy,
) -> f64 {
    let (shared, compared) = liked_items
        .iter()
        .filter_map(|&item| lookup(item))
        .fold((0usize, 0usize), |(shared, compared), tags| {
            (shared + candidate_tags.intersection(tags).count(), compared + 1)
        });

    if compared == 0 {
        return 0.0;
    }
    let average = (shared / compared).min(policy.cap);
    average as f64 * policy.weight
}

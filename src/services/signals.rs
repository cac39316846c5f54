//! Read-only providers consulted while re-ranking.
//!
//! Each provider is populated once at startup and never mutated, so every
//! trait here requires `Send + Sync` and implementations are shared via `Arc`.

use std::{collections::HashSet, sync::Arc};

use serde::Serialize;

use crate::models::{Demographics, ItemId, Preference, Sex, UserId};

/// Historical ratings, queryable by user or by item
pub trait PreferenceStore: Send + Sync {
    /// Ratings given by the user; empty when the user has none
    fn by_user(&self, user_id: UserId) -> &[Preference];

    /// Ratings received by the item; empty when the item has none
    fn by_item(&self, item_id: ItemId) -> &[Preference];
}

/// Per-user demographic attributes
pub trait DemographicSignal: Send + Sync {
    /// `None` when the user is not recognized by the demographic data
    fn profile(&self, user_id: UserId) -> Option<Demographics>;

    fn sex(&self, user_id: UserId) -> Sex {
        self.profile(user_id).map_or(Sex::Unknown, |p| p.sex)
    }

    fn birth_year(&self, user_id: UserId) -> Option<i32> {
        self.profile(user_id).and_then(|p| p.birth_year)
    }
}

/// Genre tags per item
pub trait GenreSignal: Send + Sync {
    fn genres(&self, item_id: ItemId) -> Option<&HashSet<String>>;
}

/// Synopsis terms per item
pub trait ContentSignal: Send + Sync {
    fn terms(&self, item_id: ItemId) -> Option<&HashSet<String>>;
}

/// Which optional signals were available at initialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub demographics: bool,
    pub genres: bool,
    pub content: bool,
}

/// The optional signal providers, each present only if its data loaded
#[derive(Clone, Default)]
pub struct Signals {
    demographics: Option<Arc<dyn DemographicSignal>>,
    genres: Option<Arc<dyn GenreSignal>>,
    content: Option<Arc<dyn ContentSignal>>,
    capabilities: Capabilities,
}

impl Signals {
    /// No auxiliary signal; re-ranking keeps the base scores
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_demographics(mut self, signal: Arc<dyn DemographicSignal>) -> Self {
        self.demographics = Some(signal);
        self.capabilities.demographics = true;
        self
    }

    pub fn with_genres(mut self, signal: Arc<dyn GenreSignal>) -> Self {
        self.genres = Some(signal);
        self.capabilities.genres = true;
        self
    }

    pub fn with_content(mut self, signal: Arc<dyn ContentSignal>) -> Self {
        self.content = Some(signal);
        self.capabilities.content = true;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn demographics(&self) -> Option<&dyn DemographicSignal> {
        self.demographics.as_deref()
    }

    pub fn genres(&self) -> Option<&dyn GenreSignal> {
        self.genres.as_deref()
    }

    pub fn content(&self) -> Option<&dyn ContentSignal> {
        self.content.as_deref()
    }
}

impl std::fmt::Debug for Signals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signals")
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use super::{parse_id, read_records, LoadError};
use crate::{
    models::ItemId,
    services::signals::{ContentSignal, GenreSignal},
};

/// A set of string tags per item
#[derive(Debug, Clone, Default)]
pub struct ItemTags {
    tags: HashMap<ItemId, HashSet<String>>,
}

impl ItemTags {
    pub fn get(&self, item_id: ItemId) -> Option<&HashSet<String>> {
        self.tags.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Reads `item|payload` rows, turning each payload into a tag set
    fn load_with<F>(path: &Path, to_tags: F) -> Result<Self, LoadError>
    where
        F: Fn(&str) -> HashSet<String>,
    {
        let mut tags = HashMap::new();

        for (line, record) in read_records(path)? {
            let (item, payload) = record.split_once('|').ok_or_else(|| {
                LoadError::malformed(path, line, "expected item id followed by '|'")
            })?;
            let item_id = parse_id(path, line, "item id", item)?;
            tags.insert(item_id, to_tags(payload));
        }

        Ok(Self { tags })
    }
}

impl<S: Into<String>, T: IntoIterator<Item = S>> FromIterator<(ItemId, T)> for ItemTags {
    fn from_iter<I: IntoIterator<Item = (ItemId, T)>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|(item, tags)| (item, tags.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Genres per item, from `item|genre|genre...` rows
#[derive(Debug, Clone, Default)]
pub struct GenreTable(ItemTags);

impl GenreTable {
    pub fn new(tags: ItemTags) -> Self {
        Self(tags)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let tags = ItemTags::load_with(path, |payload| {
            payload
                .split('|')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect()
        })?;

        tracing::info!(path = %path.display(), items = tags.len(), "Loaded genre data");

        Ok(Self(tags))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl GenreSignal for GenreTable {
    fn genres(&self, item_id: ItemId) -> Option<&HashSet<String>> {
        self.0.get(item_id)
    }
}

/// Synopsis terms per item, from `item|free text` rows
#[derive(Debug, Clone, Default)]
pub struct SynopsisTable(ItemTags);

impl SynopsisTable {
    pub fn new(tags: ItemTags) -> Self {
        Self(tags)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let tags = ItemTags::load_with(path, tokenize)?;

        tracing::info!(path = %path.display(), items = tags.len(), "Loaded synopsis data");

        Ok(Self(tags))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ContentSignal for SynopsisTable {
    fn terms(&self, item_id: ItemId) -> Option<&HashSet<String>> {
        self.0.get(item_id)
    }
}

/// Lowercase alphanumeric terms of a synopsis
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

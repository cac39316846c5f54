use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use super::{parse_id, read_records, LoadError};
use crate::{
    models::{ItemId, Preference, UserId},
    services::signals::PreferenceStore,
};

/// Value given to a rating row that carries no explicit value
const BOOLEAN_PREFERENCE: f64 = 1.0;

/// In-memory index of every rating, by user and by item
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    by_user: HashMap<UserId, Vec<Preference>>,
    by_item: HashMap<ItemId, Vec<Preference>>,
    user_ids: Vec<UserId>,
}

impl RatingStore {
    /// Builds the index; a repeated (user, item) pair keeps its last value
    pub fn from_preferences(preferences: impl IntoIterator<Item = Preference>) -> Self {
        let latest: BTreeMap<(UserId, ItemId), f64> = preferences
            .into_iter()
            .map(|p| ((p.user_id, p.item_id), p.value))
            .collect();

        let mut by_user: HashMap<UserId, Vec<Preference>> = HashMap::new();
        let mut by_item: HashMap<ItemId, Vec<Preference>> = HashMap::new();

        for ((user_id, item_id), value) in latest {
            let preference = Preference::new(user_id, item_id, value);
            by_user.entry(user_id).or_default().push(preference);
            by_item.entry(item_id).or_default().push(preference);
        }

        let mut user_ids: Vec<UserId> = by_user.keys().copied().collect();
        user_ids.sort_unstable();

        Self {
            by_user,
            by_item,
            user_ids,
        }
    }

    /// Loads `user,item[,rating[,timestamp]]` rows, comma or tab separated
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut preferences = Vec::new();

        for (line, record) in read_records(path)? {
            let fields: Vec<&str> = record.split([',', '\t']).map(str::trim).collect();
            if fields.len() < 2 {
                return Err(LoadError::malformed(
                    path,
                    line,
                    "expected at least user and item fields",
                ));
            }

            let user_id = parse_id(path, line, "user id", fields[0])?;
            let item_id = parse_id(path, line, "item id", fields[1])?;
            let value = match fields.get(2) {
                Some(raw) if !raw.is_empty() => raw.parse::<f64>().map_err(|_| {
                    LoadError::malformed(path, line, format!("invalid rating '{raw}'"))
                })?,
                _ => BOOLEAN_PREFERENCE,
            };

            preferences.push(Preference::new(user_id, item_id, value));
        }

        let store = Self::from_preferences(preferences);

        tracing::info!(
            path = %path.display(),
            users = store.user_count(),
            items = store.by_item.len(),
            "Loaded rating data"
        );

        Ok(store)
    }

    /// Every user with at least one rating, ascending
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    /// Whether the user has rated the item, with any value
    pub fn has_rated(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.by_user(user_id).iter().any(|p| p.item_id == item_id)
    }
}

impl PreferenceStore for RatingStore {
    fn by_user(&self, user_id: UserId) -> &[Preference] {
        self.by_user.get(&user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn by_item(&self, item_id: ItemId) -> &[Preference] {
        self.by_item.get(&item_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

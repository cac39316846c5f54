use serde::{Deserialize, Serialize};

use super::{ItemId, UserId};

/// A historical rating of an item by a user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f64,
}

impl Preference {
    pub fn new(user_id: UserId, item_id: ItemId, value: f64) -> Self {
        Self {
            user_id,
            item_id,
            value,
        }
    }

    /// A preference counts as favorable only when its value is strictly positive
    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_positive() {
        assert!(Preference::new(1, 10, 4.0).is_positive());
        assert!(Preference::new(1, 10, 0.5).is_positive());
        assert!(!Preference::new(1, 10, 0.0).is_positive());
        assert!(!Preference::new(1, 10, -1.0).is_positive());
    }
}

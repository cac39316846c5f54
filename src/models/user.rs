use serde::{Deserialize, Serialize};

/// Sex recorded for a user in the demographic data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Parses a demographic sex code, case-insensitively.
    ///
    /// `m`/`male` and `f`/`female` are recognized; any other code is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Sex::Male,
            "f" | "female" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// Demographic attributes of a single user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Demographics {
    pub sex: Sex,
    pub birth_year: Option<i32>,
}

impl Demographics {
    pub fn new(sex: Sex, birth_year: Option<i32>) -> Self {
        Self { sex, birth_year }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_from_code() {
        assert_eq!(Sex::from_code("M"), Sex::Male);
        assert_eq!(Sex::from_code("male"), Sex::Male);
        assert_eq!(Sex::from_code(" f "), Sex::Female);
        assert_eq!(Sex::from_code("Female"), Sex::Female);
        assert_eq!(Sex::from_code(""), Sex::Unknown);
        assert_eq!(Sex::from_code("x"), Sex::Unknown);
    }

    #[test]
    fn test_sex_serialization() {
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"female\"");
        assert_eq!(serde_json::to_string(&Sex::Unknown).unwrap(), "\"unknown\"");
    }
}

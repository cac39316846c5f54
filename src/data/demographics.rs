use std::{collections::HashMap, path::Path};

use super::{parse_id, read_records, LoadError};
use crate::{
    models::{Demographics, Sex, UserId},
    services::signals::DemographicSignal,
};

/// Demographic attributes keyed by user, from `user|sex|birth_year` rows
#[derive(Debug, Clone, Default)]
pub struct DemographicTable {
    profiles: HashMap<UserId, Demographics>,
}

impl DemographicTable {
    pub fn from_profiles(profiles: impl IntoIterator<Item = (UserId, Demographics)>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut profiles = HashMap::new();

        for (line, record) in read_records(path)? {
            let fields: Vec<&str> = record.split('|').map(str::trim).collect();
            let (user, sex, birth_year) = match fields.as_slice() {
                [user, sex] => (*user, *sex, ""),
                [user, sex, birth_year, ..] => (*user, *sex, *birth_year),
                _ => {
                    return Err(LoadError::malformed(
                        path,
                        line,
                        "expected user|sex|birth_year",
                    ))
                }
            };

            let user_id = parse_id(path, line, "user id", user)?;
            let birth_year = parse_birth_year(birth_year).map_err(|_| {
                LoadError::malformed(path, line, format!("invalid birth year '{birth_year}'"))
            })?;

            profiles.insert(user_id, Demographics::new(Sex::from_code(sex), birth_year));
        }

        tracing::info!(
            path = %path.display(),
            users = profiles.len(),
            "Loaded demographics data"
        );

        Ok(Self { profiles })
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Empty values and non-positive sentinels such as `-1` mean unknown
fn parse_birth_year(raw: &str) -> Result<Option<i32>, std::num::ParseIntError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let year: i32 = raw.parse()?;
    Ok((year > 0).then_some(year))
}

impl DemographicSignal for DemographicTable {
    fn profile(&self, user_id: UserId) -> Option<Demographics> {
        self.profiles.get(&user_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_profiles() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1|M|1970").unwrap();
        writeln!(file, "2|f|-1").unwrap();
        writeln!(file, "3||").unwrap();
        writeln!(file, "4|F").unwrap();

        let table = DemographicTable::load(file.path()).unwrap();
        assert!(!table.is_empty());
        assert_eq!(
            table.profile(1),
            Some(Demographics::new(Sex::Male, Some(1970)))
        );
        assert_eq!(table.profile(2), Some(Demographics::new(Sex::Female, None)));
        assert_eq!(table.profile(3), Some(Demographics::new(Sex::Unknown, None)));
        assert_eq!(table.birth_year(4), None);
        assert_eq!(table.sex(4), Sex::Female);
    }

    #[test]
    fn test_unknown_user_has_no_profile() {
        let table =
            DemographicTable::from_profiles([(1, Demographics::new(Sex::Male, None))]);
        assert_eq!(table.profile(2), None);
        assert_eq!(table.sex(2), Sex::Unknown);
        assert_eq!(table.birth_year(2), None);
    }

    #[test]
    fn test_bad_birth_year_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1|M|nineteen").unwrap();
        let err = DemographicTable::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid birth year"));
    }

    #[test]
    fn test_single_field_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1").unwrap();
        assert!(matches!(
            DemographicTable::load(file.path()),
            Err(LoadError::Malformed { line: 1, .. })
        ));
    }
}

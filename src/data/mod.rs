//! Flat-file loaders for the rating data and the optional signal tables.
//!
//! Every file is line oriented: blank lines and `#` comments are skipped and
//! each remaining line is one delimited record. Loading happens once at
//! startup; the resulting tables are immutable afterwards.

use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod demographics;
pub mod item_tags;
pub mod ratings;

pub use demographics::DemographicTable;
pub use item_tags::{GenreTable, ItemTags, SynopsisTable};
pub use ratings::RatingStore;

/// Errors raised while reading a data file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl LoadError {
    pub(crate) fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

/// Reads a file and yields its meaningful lines with 1-based line numbers
pub(crate) fn read_records(path: &Path) -> Result<Vec<(usize, String)>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| (number, line.to_string()))
        .collect())
}

/// Parses a numeric id field, naming the field in the error
pub(crate) fn parse_id(
    path: &Path,
    line: usize,
    field: &str,
    value: &str,
) -> Result<u64, LoadError> {
    value
        .trim()
        .parse()
        .map_err(|_| LoadError::malformed(path, line, format!("invalid {field} '{value}'")))
}

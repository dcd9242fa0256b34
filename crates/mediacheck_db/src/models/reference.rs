//! Stored file references.
//!
//! A scanned row carries its primary key and one value per configured
//! file-reference column. Values are classified at decode time so the audit
//! never has to look at raw SQLite types.

use serde::Serialize;

/// Primary key of a scanned record.
///
/// SQLite keys are usually integers, but text keys (UUIDs, slugs) are common
/// enough that both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    /// INTEGER key
    Int(i64),
    /// TEXT key
    Text(String),
    /// NULL, REAL or BLOB key
    Unknown,
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Text(id) => write!(f, "{}", id),
            Self::Unknown => write!(f, "?"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// Value of one file-reference column on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    /// Non-empty stored relative path
    Path(String),
    /// NULL or empty string
    Empty,
    /// Column value could not be decoded as text
    Unreadable(String),
}

impl StoredValue {
    /// Classify a decoded text column.
    pub fn from_text(value: Option<String>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::Path(path),
            _ => Self::Empty,
        }
    }
}

/// A record as seen by the reference scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    /// Primary key
    pub id: RecordId,

    /// One value per requested field, in request order
    pub values: Vec<StoredValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        assert_eq!(StoredValue::from_text(None), StoredValue::Empty);
        assert_eq!(StoredValue::from_text(Some(String::new())), StoredValue::Empty);
        assert_eq!(
            StoredValue::from_text(Some("avatars/a.png".into())),
            StoredValue::Path("avatars/a.png".into())
        );
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::from(7).to_string(), "7");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
        assert_eq!(RecordId::Unknown.to_string(), "?");
    }
}

//! Core identifier types for skills-ml
//!
//! Job postings are identified by a [`PostingId`] and bucketed into date
//! partitions by a [`DateKey`]. Both are thin string wrappers so they can be
//! used directly as JSON object keys in persisted caches.

use crate::error::{Result, SkillsMlError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a job posting
///
/// Raw ids may be strings or numbers in the source payload. Both are stored
/// as their textual form so `5` and `"5"` address the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(pub String);

impl PostingId {
    /// Build an id from a raw JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self(s.clone())),
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::Null => Err(SkillsMlError::missing_field("id")),
            other => Err(SkillsMlError::invalid_field(
                "id",
                format!("expected string or number, got {}", other),
            )),
        }
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for PostingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date partition key (`YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Parse a partition key from a `datePosted` value
    ///
    /// Only the leading calendar date is significant, so full timestamps
    /// such as `2016-01-01T09:30:00Z` land in the `2016-01-01` partition.
    pub fn parse(date_posted: &str) -> Result<Self> {
        let head = date_posted.get(..10).unwrap_or(date_posted);
        let date = NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|e| {
            SkillsMlError::invalid_field("datePosted", format!("{}: {}", date_posted, e))
        })?;
        Ok(Self::from(date))
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

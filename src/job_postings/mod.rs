//! Job posting record
//!
//! A [`JobPosting`] wraps one raw UTF-8 JSON payload (schema.org `JobPosting`
//! style) and exposes typed access to the few fields the rest of the crate
//! relies on, plus generic access to everything else.
//!
//! Derived fields (`id`, `text`) are computed on first access and cached for
//! the lifetime of the record. Records are never mutated after construction.

pub mod corpora;

pub use corpora::{CleanedCorpusCreator, SimpleCorpusCreator, TextJoiner};

use crate::error::{Result, SkillsMlError};
use crate::types::{DateKey, PostingId};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A single raw job posting
pub struct JobPosting {
    properties: Map<String, Value>,
    joiner: Arc<dyn TextJoiner>,
    id: OnceCell<PostingId>,
    text: OnceCell<String>,
}

impl JobPosting {
    /// Parse a posting from a serialized UTF-8 JSON payload
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed payload
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(properties) => Ok(Self {
                properties,
                joiner: Arc::new(SimpleCorpusCreator),
                id: OnceCell::new(),
                text: OnceCell::new(),
            }),
            other => Err(SkillsMlError::invalid_field(
                "<root>",
                format!("expected a JSON object, got {}", other),
            )),
        }
    }

    /// Replace the text join strategy
    pub fn with_joiner(mut self, joiner: Arc<dyn TextJoiner>) -> Self {
        self.joiner = joiner;
        self.text = OnceCell::new();
        self
    }

    /// Posting id, read from the `id` property
    pub fn id(&self) -> Result<&PostingId> {
        self.id.get_or_try_init(|| {
            let raw = self
                .properties
                .get("id")
                .ok_or_else(|| SkillsMlError::missing_field("id"))?;
            PostingId::from_value(raw)
        })
    }

    /// Date partition this posting belongs to, from `datePosted`
    pub fn date_key(&self) -> Result<DateKey> {
        let date_posted = self
            .get_str("datePosted")
            .ok_or_else(|| SkillsMlError::missing_field("datePosted"))?;
        DateKey::parse(date_posted)
    }

    /// Document text built by the configured join strategy
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| self.joiner.join(&self.properties))
    }

    /// Raw value of any property, `None` when absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    /// String value of a property, `None` when absent or not a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Job title
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Full parsed property mapping
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

impl std::fmt::Debug for JobPosting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPosting")
            .field("id", &self.properties.get("id"))
            .field("fields", &self.properties.len())
            .finish()
    }
}

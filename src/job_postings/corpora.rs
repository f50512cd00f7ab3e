//! Text join strategies for job postings
//!
//! A [`TextJoiner`] turns the parsed property mapping of a posting into a
//! single document string.

use crate::utils::string::{collapse_whitespace, strip_html};
use serde_json::{Map, Value};

/// Fields concatenated into a posting's document text, in order
pub const DOCUMENT_FIELDS: &[&str] = &[
    "title",
    "description",
    "experienceRequirements",
    "qualifications",
    "skills",
];

/// Strategy for building a document from posting properties
pub trait TextJoiner: Send + Sync {
    /// Join the relevant properties into one string
    fn join(&self, properties: &Map<String, Value>) -> String;
}

fn document_parts<'a>(properties: &'a Map<String, Value>) -> impl Iterator<Item = &'a str> {
    DOCUMENT_FIELDS
        .iter()
        .filter_map(move |field| properties.get(*field).and_then(Value::as_str))
}

/// Joins [`DOCUMENT_FIELDS`] with single spaces, leaving text untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCorpusCreator;

impl TextJoiner for SimpleCorpusCreator {
    fn join(&self, properties: &Map<String, Value>) -> String {
        document_parts(properties).collect::<Vec<_>>().join(" ")
    }
}

/// Joins [`DOCUMENT_FIELDS`] after stripping HTML, lowercasing and collapsing whitespace
///
/// This is the document form handed to occupation classifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanedCorpusCreator;

impl TextJoiner for CleanedCorpusCreator {
    fn join(&self, properties: &Map<String, Value>) -> String {
        let joined = document_parts(properties)
            .map(|part| strip_html(part).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_whitespace(&joined)
    }
}

//! Job title normalization
//!
//! Phase one is purely lexical. Phase two builds on it and strips place and
//! state names using a dictionary, keeping words that belong to an occupation
//! title found in the same job title (so "Boston Terrier Groomer" keeps its
//! breed when that is a known occupation).

use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::{Result, SkillsMlError};
use crate::job_postings::JobPosting;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
        "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
        "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
        "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
        "i", "if", "in", "into", "is", "its", "just", "me", "more", "most", "my", "no", "nor",
        "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out",
        "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
        "their", "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
        "while", "who", "whom", "why", "will", "with", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Lexical cleaning of a raw title into tokens
fn phase_one_tokens(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced
        .split_whitespace()
        .filter(|token| !token.chars().any(|c| c.is_ascii_digit()))
        .filter(|token| !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Lowercase, strip punctuation, digit tokens and stopwords
pub fn clean_title_phase_one(title: &str) -> String {
    phase_one_tokens(title).join(" ")
}

/// Start offsets of every occurrence of `phrase` in `tokens`
fn occurrences(tokens: &[String], phrase: &[String]) -> Vec<usize> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return Vec::new();
    }
    tokens
        .windows(phrase.len())
        .enumerate()
        .filter(|(_, window)| *window == phrase)
        .map(|(start, _)| start)
        .collect()
}

/// Place, state and occupation vocabularies used by phase two
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleDictionary {
    #[serde(default)]
    pub places: Vec<String>,

    #[serde(default)]
    pub states: Vec<String>,

    /// Known occupation titles
    #[serde(default, alias = "onetjobs")]
    pub occupations: Vec<String>,
}

impl TitleDictionary {
    /// Load a dictionary from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            SkillsMlError::Configuration(format!(
                "Cannot read title dictionary {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Title after lexical cleaning
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleCleanPhaseOne;

impl PropertyComputer for TitleCleanPhaseOne {
    fn property_name(&self) -> String {
        "title_clean_phase_one".to_string()
    }

    fn property_description(&self) -> String {
        "Job title, cleaned of stopwords".to_string()
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::MostCommon],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        Ok(Value::from(clean_title_phase_one(
            posting.title().unwrap_or_default(),
        )))
    }
}

/// Title after lexical cleaning and removal of place names
#[derive(Debug, Clone)]
pub struct TitleCleanPhaseTwo {
    /// Place and state phrases, longest first
    locations: Vec<Vec<String>>,
    occupations: Vec<Vec<String>>,
}

impl TitleCleanPhaseTwo {
    pub fn new(dictionary: TitleDictionary) -> Self {
        let tokenize = |entries: Vec<String>| -> Vec<Vec<String>> {
            entries
                .iter()
                .map(|entry| phase_one_tokens(entry))
                .filter(|tokens| !tokens.is_empty())
                .collect()
        };

        let mut locations = tokenize(dictionary.places);
        locations.extend(tokenize(dictionary.states));
        locations.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        locations.dedup();

        Self {
            locations,
            occupations: tokenize(dictionary.occupations),
        }
    }

    /// Clean a raw title
    pub fn clean(&self, title: &str) -> String {
        let mut tokens = phase_one_tokens(title);

        let protected: HashSet<String> = self
            .occupations
            .iter()
            .filter(|occupation| !occurrences(&tokens, occupation).is_empty())
            .flatten()
            .cloned()
            .collect();

        for location in &self.locations {
            if location.iter().all(|token| protected.contains(token)) {
                continue;
            }
            while let Some(&start) = occurrences(&tokens, location).first() {
                tokens.drain(start..start + location.len());
            }
        }

        tokens.join(" ")
    }
}

impl PropertyComputer for TitleCleanPhaseTwo {
    fn property_name(&self) -> String {
        "title_clean_phase_two".to_string()
    }

    fn property_description(&self) -> String {
        "Job title, cleaned of stopwords and place names".to_string()
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::MostCommon],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        Ok(Value::from(self.clean(posting.title().unwrap_or_default())))
    }
}

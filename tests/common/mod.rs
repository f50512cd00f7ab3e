//! Common test utilities and helpers

#![allow(dead_code)]

use serde_json::{json, Value};
use skills_ml::computed_properties::computers::{GeoQuerier, SkillExtractor};
use skills_ml::storage::{InMemoryStore, ObjectStore};
use skills_ml::{JobPosting, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Build a job posting from sensible defaults, with `overrides` applied on top
///
/// Defaults include a fresh random `id`, so each call yields a distinct posting
/// unless an id is given.
pub fn job_posting_factory(overrides: Value) -> JobPosting {
    let mut posting = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "@type": "JobPosting",
        "title": "Software Engineer",
        "description": "We are looking for a software engineer",
        "experienceRequirements": "2 years",
        "qualifications": "Bachelor's degree",
        "skills": "Rust, SQL",
        "datePosted": "2016-01-01",
        "jobLocation": {
            "@type": "Place",
            "address": {"addressLocality": "Tulsa", "addressRegion": "OK"}
        },
        "baseSalary": {"salaryFrequency": "yearly", "minValue": 50000, "maxValue": 70000},
    });

    if let (Some(base), Value::Object(extra)) = (posting.as_object_mut(), overrides) {
        for (key, value) in extra {
            base.insert(key, value);
        }
    }

    JobPosting::from_value(posting).expect("factory postings are JSON objects")
}

/// Fresh in-memory store behind the trait object the drivers take
pub fn memory_store() -> Arc<dyn ObjectStore> {
    Arc::new(InMemoryStore::new())
}

/// Geography querier that places every posting in Fargo
pub struct SampleGeoQuerier;

impl GeoQuerier for SampleGeoQuerier {
    fn name(&self) -> String {
        "blah".to_string()
    }

    fn output_columns(&self) -> Vec<(String, String)> {
        vec![("city".to_string(), "the city".to_string())]
    }

    fn query(&self, _posting: &JobPosting) -> Result<Vec<Value>> {
        Ok(vec![json!("Fargo")])
    }
}

/// Exact phrase matching against a small fixed skill framework
pub struct SampleFrameworkExtractor {
    skills: Vec<&'static str>,
}

impl Default for SampleFrameworkExtractor {
    fn default() -> Self {
        Self {
            skills: vec!["reading comprehension", "active listening", "writing"],
        }
    }
}

impl SkillExtractor for SampleFrameworkExtractor {
    fn name(&self) -> String {
        "sample_framework_exact_match".to_string()
    }

    fn description(&self) -> String {
        "exact matching against a sample framework".to_string()
    }

    fn document_skill_counts(&self, posting: &JobPosting) -> Result<BTreeMap<String, usize>> {
        let text = posting.text().to_lowercase();
        Ok(self
            .skills
            .iter()
            .map(|skill| (skill.to_string(), text.matches(skill).count()))
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::Result;
use crate::job_postings::JobPosting;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Finds skills mentioned in a posting
pub trait SkillExtractor: Send + Sync {
    /// Extractor name, e.g. `"onet_ksat_exact_match"`
    fn name(&self) -> String;

    fn description(&self) -> String;

    /// Occurrence count per skill found in the posting
    fn document_skill_counts(&self, posting: &JobPosting) -> Result<BTreeMap<String, usize>>;
}

/// Skills found in a posting by a [`SkillExtractor`]
///
/// The value is an object with a single key (the property name) holding
/// every skill repeated once per occurrence, so list-aware aggregations
/// count occurrences rather than postings.
#[derive(Clone)]
pub struct SkillCounts {
    extractor: Arc<dyn SkillExtractor>,
}

impl SkillCounts {
    pub fn new(extractor: Arc<dyn SkillExtractor>) -> Self {
        Self { extractor }
    }
}

impl PropertyComputer for SkillCounts {
    fn property_name(&self) -> String {
        format!("skill_counts_{}", self.extractor.name())
    }

    fn property_description(&self) -> String {
        format!("Skill counts using {}", self.extractor.description())
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::ListyMostCommon],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        let counts = self.extractor.document_skill_counts(posting)?;
        let skills: Vec<Value> = counts
            .into_iter()
            .flat_map(|(skill, count)| std::iter::repeat(Value::from(skill)).take(count))
            .collect();

        let mut value = Map::new();
        value.insert(self.property_name(), Value::Array(skills));
        Ok(Value::Object(value))
    }
}

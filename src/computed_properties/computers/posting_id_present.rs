use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::Result;
use crate::job_postings::JobPosting;
use serde_json::Value;

/// Flags postings that carry an id, summed to count postings per group
#[derive(Debug, Clone, Copy, Default)]
pub struct PostingIdPresent;

impl PropertyComputer for PostingIdPresent {
    fn property_name(&self) -> String {
        "posting_id_present".to_string()
    }

    fn property_description(&self) -> String {
        "Job postings".to_string()
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::Sum],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        Ok(Value::from(u8::from(posting.id().is_ok())))
    }
}

use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::Result;
use crate::job_postings::{CleanedCorpusCreator, JobPosting, TextJoiner};
use crate::utils::string::to_snake_case;
use serde_json::Value;
use std::sync::Arc;

/// Maps a posting document to an occupation (SOC) code
pub trait SocClassifier: Send + Sync {
    /// Algorithm name, e.g. `"KNNDoc2VecClassifier"`
    fn name(&self) -> String;

    /// Short human description of the algorithm
    fn description(&self) -> String;

    /// Predict a code such as `"11-1234.00"` for a cleaned document
    fn predict_soc(&self, document: &str) -> Result<String>;
}

/// Occupation code assigned to a posting by a [`SocClassifier`]
#[derive(Clone)]
pub struct SocClassifyProperty {
    classifier: Arc<dyn SocClassifier>,
}

impl SocClassifyProperty {
    pub fn new(classifier: Arc<dyn SocClassifier>) -> Self {
        Self { classifier }
    }
}

impl PropertyComputer for SocClassifyProperty {
    fn property_name(&self) -> String {
        format!("soc_{}", to_snake_case(&self.classifier.name()))
    }

    fn property_description(&self) -> String {
        format!("SOC code classifier using {}", self.classifier.description())
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::MostCommon],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        let document = CleanedCorpusCreator.join(posting.properties());
        let soc_code = self.classifier.predict_soc(&document)?;
        Ok(Value::from(soc_code))
    }
}

use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::Result;
use crate::job_postings::JobPosting;
use serde_json::Value;
use std::sync::Arc;

/// Looks up geographic fields for a posting
pub trait GeoQuerier: Send + Sync {
    /// Name of the querier, used as the property name
    fn name(&self) -> String;

    /// Output columns as (name, description) pairs, in output order
    fn output_columns(&self) -> Vec<(String, String)>;

    /// One value per output column
    fn query(&self, posting: &JobPosting) -> Result<Vec<Value>>;
}

/// Geographic fields of a posting as resolved by a [`GeoQuerier`]
#[derive(Clone)]
pub struct Geography {
    querier: Arc<dyn GeoQuerier>,
}

impl Geography {
    pub fn new(querier: Arc<dyn GeoQuerier>) -> Self {
        Self { querier }
    }
}

impl PropertyComputer for Geography {
    fn property_name(&self) -> String {
        self.querier.name()
    }

    fn property_description(&self) -> String {
        format!("Job location according to {}", self.querier.name())
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        self.querier
            .output_columns()
            .into_iter()
            .map(|(name, description)| {
                PropertyColumn::new(name, description, vec![AggregateFunction::MostCommon])
            })
            .collect()
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        Ok(Value::Array(self.querier.query(posting)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkillsMlError;
    use serde_json::json;

    struct CityQuerier;

    impl GeoQuerier for CityQuerier {
        fn name(&self) -> String {
            "blah".to_string()
        }

        fn output_columns(&self) -> Vec<(String, String)> {
            vec![("city".to_string(), "the city".to_string())]
        }

        fn query(&self, posting: &JobPosting) -> Result<Vec<Value>> {
            match posting.get_str("jobLocation") {
                Some("unknown") => Err(SkillsMlError::compute("?", "no match")),
                _ => Ok(vec![json!("Fargo")]),
            }
        }
    }

    #[test]
    fn test_descriptors_follow_querier() {
        let geography = Geography::new(Arc::new(CityQuerier));
        assert_eq!(geography.property_name(), "blah");
        let columns = geography.property_columns();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "city");
        assert_eq!(columns[0].description, "the city");
    }

    #[test]
    fn test_compute() {
        let geography = Geography::new(Arc::new(CityQuerier));
        let posting = JobPosting::from_value(json!({"id": 1})).unwrap();
        assert_eq!(geography.compute(&posting).unwrap(), json!(["Fargo"]));

        let unknown = JobPosting::from_value(json!({"id": 2, "jobLocation": "unknown"})).unwrap();
        assert!(geography.compute(&unknown).is_err());
    }
}

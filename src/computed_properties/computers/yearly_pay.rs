use crate::computed_properties::{AggregateFunction, PropertyColumn, PropertyComputer};
use crate::error::Result;
use crate::job_postings::JobPosting;
use serde_json::Value;

/// Annual pay from `baseSalary`, `null` unless the salary is quoted yearly
///
/// The value is the mean of whichever of `minValue` and `maxValue` parse as
/// numbers. Blank strings and anything non-numeric count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearlyPay;

fn salary_amount(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

impl PropertyComputer for YearlyPay {
    fn property_name(&self) -> String {
        "yearly_pay".to_string()
    }

    fn property_description(&self) -> String {
        "Annual pay".to_string()
    }

    fn property_columns(&self) -> Vec<PropertyColumn> {
        vec![PropertyColumn::new(
            self.property_name(),
            self.property_description(),
            vec![AggregateFunction::Mean, AggregateFunction::Median],
        )]
    }

    fn compute(&self, posting: &JobPosting) -> Result<Value> {
        let Some(salary) = posting.get("baseSalary").and_then(Value::as_object) else {
            return Ok(Value::Null);
        };
        if salary.get("salaryFrequency").and_then(Value::as_str) != Some("yearly") {
            return Ok(Value::Null);
        }

        let amounts: Vec<f64> = [salary.get("minValue"), salary.get("maxValue")]
            .into_iter()
            .filter_map(salary_amount)
            .collect();
        if amounts.is_empty() {
            return Ok(Value::Null);
        }
        Ok(Value::from(amounts.iter().sum::<f64>() / amounts.len() as f64))
    }
}

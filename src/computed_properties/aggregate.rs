//! Column aggregations compatible with computed property frames

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Aggregation that can be applied row-wise over a property column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    /// Sum of numeric cells
    Sum,
    /// Arithmetic mean of numeric cells
    Mean,
    /// Median of numeric cells
    Median,
    /// Top-n most frequent cell values
    #[serde(rename = "n_most_common")]
    MostCommon,
    /// Top-n most frequent items across list-valued cells
    #[serde(rename = "listy_n_most_common")]
    ListyMostCommon,
}

impl AggregateFunction {
    /// Stable reference name
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Mean => "mean",
            AggregateFunction::Median => "median",
            AggregateFunction::MostCommon => "n_most_common",
            AggregateFunction::ListyMostCommon => "listy_n_most_common",
        }
    }

    /// Human prefix for report column headers
    pub fn label(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "Count of",
            AggregateFunction::Mean => "Average",
            AggregateFunction::Median => "Median",
            AggregateFunction::MostCommon | AggregateFunction::ListyMostCommon => "Most common",
        }
    }

    /// Whether the function takes a top-n argument
    pub fn takes_top_n(&self) -> bool {
        matches!(
            self,
            AggregateFunction::MostCommon | AggregateFunction::ListyMostCommon
        )
    }

    /// Apply the aggregation to a column
    ///
    /// Numeric aggregations skip non-numeric cells and yield `null` when no
    /// numeric cell remains. `top_n` is ignored by numeric aggregations.
    pub fn apply<'a, I>(&self, cells: I, top_n: usize) -> Value
    where
        I: IntoIterator<Item = &'a Value>,
    {
        match self {
            AggregateFunction::Sum => {
                let numbers = numeric(cells);
                Value::from(numbers.iter().sum::<f64>())
            }
            AggregateFunction::Mean => {
                let numbers = numeric(cells);
                if numbers.is_empty() {
                    return Value::Null;
                }
                Value::from(numbers.iter().sum::<f64>() / numbers.len() as f64)
            }
            AggregateFunction::Median => {
                let mut numbers = numeric(cells);
                if numbers.is_empty() {
                    return Value::Null;
                }
                numbers.sort_by(|a, b| a.total_cmp(b));
                let mid = numbers.len() / 2;
                let median = if numbers.len() % 2 == 0 {
                    (numbers[mid - 1] + numbers[mid]) / 2.0
                } else {
                    numbers[mid]
                };
                Value::from(median)
            }
            AggregateFunction::MostCommon => most_common(cells, top_n),
            AggregateFunction::ListyMostCommon => {
                let flattened: Vec<&Value> = cells
                    .into_iter()
                    .flat_map(|cell| match cell {
                        Value::Array(items) => items.iter().collect::<Vec<_>>(),
                        other => vec![other],
                    })
                    .collect();
                most_common(flattened, top_n)
            }
        }
    }
}

impl std::fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn numeric<'a, I>(cells: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Value>,
{
    cells.into_iter().filter_map(Value::as_f64).collect()
}

/// Most frequent non-null values, ties broken by their JSON text
fn most_common<'a, I>(cells: I, top_n: usize) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: HashMap<String, (usize, &Value)> = HashMap::new();
    for cell in cells.into_iter().filter(|c| !c.is_null()) {
        counts
            .entry(cell.to_string())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, cell));
    }

    let mut ranked: Vec<(String, (usize, &Value))> = counts.into_iter().collect();
    ranked.sort_by(|(ka, (ca, _)), (kb, (cb, _))| cb.cmp(ca).then_with(|| ka.cmp(kb)));

    Value::Array(
        ranked
            .into_iter()
            .take(top_n)
            .map(|(_, (_, value))| value.clone())
            .collect(),
    )
}

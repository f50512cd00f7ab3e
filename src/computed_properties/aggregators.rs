//! Aggregation of computed properties across partitions
//!
//! Groups postings by the value of one property (for example their
//! classified occupation code) and summarizes other properties within each
//! group using the aggregate functions their columns declare compatible.

use crate::computed_properties::{AggregateFunction, ComputedProperty};
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Aggregated values for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    /// Value of the grouping property shared by the group
    pub group: Value,

    /// Number of postings in the group
    pub postings: usize,

    /// Output column header to aggregated value
    pub values: BTreeMap<String, Value>,
}

/// Group postings by `grouping` and aggregate `aggregates` within each group
///
/// Rows are matched by (date key, posting id). Postings without a grouping
/// value are left out. Groups are returned ordered by their JSON text.
pub async fn aggregate_properties(
    date_keys: &[&str],
    grouping: &ComputedProperty,
    aggregates: &[&ComputedProperty],
    top_n: usize,
) -> Result<Vec<AggregateRow>> {
    let group_name = grouping.property_name();
    let group_column = match grouping.property_columns().into_iter().next() {
        Some(column) => column.name,
        None => {
            warn!("Grouping property {} declares no columns", group_name);
            return Ok(Vec::new());
        }
    };

    // (date, id) -> group label
    let mut membership: HashMap<(String, String), String> = HashMap::new();
    let mut groups: BTreeMap<String, (Value, usize)> = BTreeMap::new();

    for date_key in date_keys {
        let frame = grouping.df_for_key(date_key).await?;
        let Some(cells) = frame.column(&group_column) else {
            continue;
        };
        for (id, cell) in frame.index().iter().zip(cells) {
            if cell.is_null() {
                continue;
            }
            let label = cell.to_string();
            groups
                .entry(label.clone())
                .and_modify(|(_, count)| *count += 1)
                .or_insert((cell.clone(), 1));
            membership.insert((date_key.to_string(), id.clone()), label);
        }
    }
    debug!("{} groups from {}", groups.len(), group_name);

    // header -> (function, group label -> cells)
    let mut collected: BTreeMap<String, (AggregateFunction, HashMap<String, Vec<Value>>)> =
        BTreeMap::new();

    for property in aggregates {
        let columns = property.property_columns();
        for date_key in date_keys {
            let frame = property.df_for_key(date_key).await?;
            for column in &columns {
                let Some(cells) = frame.column(&column.name) else {
                    continue;
                };
                for function in &column.compatible_aggregate_functions {
                    let header = format!("{} {}", function.label(), column.description);
                    let (_, by_group) = collected
                        .entry(header)
                        .or_insert_with(|| (*function, HashMap::new()));
                    for (id, cell) in frame.index().iter().zip(cells.iter()) {
                        if let Some(label) = membership.get(&(date_key.to_string(), id.clone())) {
                            by_group.entry(label.clone()).or_default().push((*cell).clone());
                        }
                    }
                }
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(label, (group, postings))| {
            let values = collected
                .iter()
                .map(|(header, (function, by_group))| {
                    let cells = by_group.get(&label).map(Vec::as_slice).unwrap_or(&[]);
                    (header.clone(), function.apply(cells, top_n))
                })
                .collect();
            AggregateRow {
                group,
                postings,
                values,
            }
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computed_properties::computers::{PostingIdPresent, YearlyPay};
    use crate::computed_properties::{PropertyColumn, PropertyComputer};
    use crate::job_postings::JobPosting;
    use crate::storage::{InMemoryStore, ObjectStore};
    use serde_json::json;
    use std::sync::Arc;

    /// Groups by the raw `occupation` field
    struct Occupation;

    impl PropertyComputer for Occupation {
        fn property_name(&self) -> String {
            "occupation".to_string()
        }

        fn property_description(&self) -> String {
            "Occupation".to_string()
        }

        fn property_columns(&self) -> Vec<PropertyColumn> {
            vec![PropertyColumn::new(
                "occupation",
                "Occupation",
                vec![AggregateFunction::MostCommon],
            )]
        }

        fn compute(&self, posting: &JobPosting) -> Result<Value> {
            Ok(posting.get("occupation").cloned().unwrap_or(Value::Null))
        }
    }

    fn pay(id: u32, date: &str, occupation: &str, min: f64) -> JobPosting {
        JobPosting::from_value(json!({
            "id": id,
            "datePosted": date,
            "occupation": occupation,
            "baseSalary": {"salaryFrequency": "yearly", "minValue": min, "maxValue": ""},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_aggregate_across_dates() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryStore::new());
        let grouping = ComputedProperty::new(Occupation, store.clone());
        let present = ComputedProperty::new(PostingIdPresent, store.clone());
        let yearly = ComputedProperty::new(YearlyPay, store.clone());

        let postings = vec![
            pay(1, "2016-01-01", "nurse", 100.0),
            pay(2, "2016-01-01", "cook", 50.0),
            pay(3, "2016-01-02", "nurse", 200.0),
            // same id on another day is a different posting
            pay(1, "2016-01-02", "cook", 70.0),
        ];
        for property in [&grouping, &present, &yearly] {
            property.compute_on_collection(&postings).await.unwrap();
        }

        let rows = aggregate_properties(
            &["2016-01-01", "2016-01-02"],
            &grouping,
            &[&present, &yearly],
            3,
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        let cook = &rows[0];
        assert_eq!(cook.group, json!("cook"));
        assert_eq!(cook.postings, 2);
        assert_eq!(cook.values["Count of Job postings"], json!(2.0));
        assert_eq!(cook.values["Average Annual pay"], json!(60.0));

        let nurse = &rows[1];
        assert_eq!(nurse.group, json!("nurse"));
        assert_eq!(nurse.values["Median Annual pay"], json!(150.0));
    }

    #[tokio::test]
    async fn test_empty_partitions() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryStore::new());
        let grouping = ComputedProperty::new(Occupation, store.clone());
        let present = ComputedProperty::new(PostingIdPresent, store);

        let rows = aggregate_properties(&["2020-01-01"], &grouping, &[&present], 1)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}

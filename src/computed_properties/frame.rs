//! Tabular view of a computed property partition

use crate::computed_properties::{AggregateFunction, PropertyCache, PropertyColumn};
use serde::Serialize;
use serde_json::Value;

/// One partition laid out as rows (posting ids) by columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFrame {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl PropertyFrame {
    /// Expand cached values into cells
    ///
    /// Object values are split by column name and array values by position.
    /// Any other value fills the first column. A property with a single
    /// column keeps whole values whose shape does not match.
    pub fn from_cache(cache: &PropertyCache, columns: &[PropertyColumn]) -> Self {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let single = names.len() == 1;

        let mut index = Vec::with_capacity(cache.len());
        let mut rows = Vec::with_capacity(cache.len());

        for (id, value) in cache {
            let row = names
                .iter()
                .enumerate()
                .map(|(position, name)| match value {
                    Value::Object(fields) => match fields.get(name) {
                        Some(cell) => cell.clone(),
                        None if single => value.clone(),
                        None => Value::Null,
                    },
                    Value::Array(items) => items.get(position).cloned().unwrap_or(Value::Null),
                    scalar if position == 0 => scalar.clone(),
                    _ => Value::Null,
                })
                .collect();
            index.push(id.clone());
            rows.push(row);
        }

        Self {
            columns: names,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Posting ids, one per row
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of a row by posting id
    pub fn row(&self, posting_id: &str) -> Option<&[Value]> {
        self.index
            .iter()
            .position(|id| id == posting_id)
            .map(|i| self.rows[i].as_slice())
    }

    /// Cells of a column by name
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }

    /// Rows as (posting id, cells) pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.index
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Aggregate one column, `None` if the column does not exist
    pub fn aggregate(&self, column: &str, function: AggregateFunction, top_n: usize) -> Option<Value> {
        let cells = self.column(column)?;
        Some(function.apply(cells, top_n))
    }
}

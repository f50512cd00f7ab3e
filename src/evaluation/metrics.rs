//! Classification metrics over decoded string labels
//!
//! Semantics follow the usual multi-class conventions: per-label scores use
//! an explicit label order, a zero denominator scores 0.0, and macro/micro
//! averages run over the sorted union of labels seen in either sequence.
//! Both sequences are expected to have the same length; extra trailing
//! entries of the longer one are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Per-label scores in a fixed label order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScores {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LabelScores {
    /// Score of one label, `None` if the label is not scored
    pub fn get(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.values.get(i).copied())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// (label, score) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Unweighted mean of the scores, 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// True positive, predicted and actual counts for one label
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    true_positives: usize,
    predicted: usize,
    actual: usize,
}

impl Counts {
    fn of(y_true: &[String], y_pred: &[String], label: &str) -> Self {
        y_true
            .iter()
            .zip(y_pred)
            .fold(Counts::default(), |mut counts, (t, p)| {
                let is_true = t == label;
                let is_pred = p == label;
                if is_true && is_pred {
                    counts.true_positives += 1;
                }
                counts.predicted += usize::from(is_pred);
                counts.actual += usize::from(is_true);
                counts
            })
    }

    fn add(self, other: Counts) -> Counts {
        Counts {
            true_positives: self.true_positives + other.true_positives,
            predicted: self.predicted + other.predicted,
            actual: self.actual + other.actual,
        }
    }

    fn precision(&self) -> Option<f64> {
        ratio(self.true_positives, self.predicted)
    }

    fn recall(&self) -> Option<f64> {
        ratio(self.true_positives, self.actual)
    }

    fn f1(&self) -> Option<f64> {
        ratio(2 * self.true_positives, self.predicted + self.actual)
    }
}

/// A metric over [`Counts`], `None` when its denominator is zero
#[derive(Clone, Copy)]
struct Metric {
    name: &'static str,
    score: fn(&Counts) -> Option<f64>,
}

const PRECISION: Metric = Metric {
    name: "precision",
    score: Counts::precision,
};

const RECALL: Metric = Metric {
    name: "recall",
    score: Counts::recall,
};

const F1: Metric = Metric {
    name: "f1",
    score: Counts::f1,
};

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

fn per_label(y_true: &[String], y_pred: &[String], labels: &[String], metric: Metric) -> LabelScores {
    LabelScores {
        labels: labels.to_vec(),
        values: labels
            .iter()
            .map(|label| {
                (metric.score)(&Counts::of(y_true, y_pred, label)).unwrap_or_else(|| {
                    warn!(
                        "{} is ill-defined for label {} (zero denominator), scoring 0.0",
                        metric.name, label
                    );
                    0.0
                })
            })
            .collect(),
    }
}

fn micro(y_true: &[String], y_pred: &[String], metric: Metric) -> f64 {
    let total = unique_labels(y_true, y_pred)
        .iter()
        .map(|label| Counts::of(y_true, y_pred, label))
        .fold(Counts::default(), Counts::add);
    (metric.score)(&total).unwrap_or_else(|| {
        warn!("micro {} is ill-defined (zero denominator), scoring 0.0", metric.name);
        0.0
    })
}

/// Sorted union of the labels appearing in either sequence
pub fn unique_labels(y_true: &[String], y_pred: &[String]) -> Vec<String> {
    y_true
        .iter()
        .chain(y_pred)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fraction of positions where prediction equals truth, 0.0 when empty
pub fn accuracy(y_true: &[String], y_pred: &[String]) -> f64 {
    let total = y_true.len().min(y_pred.len());
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    ratio(correct, total).unwrap_or(0.0)
}

pub fn precision_per_label(y_true: &[String], y_pred: &[String], labels: &[String]) -> LabelScores {
    per_label(y_true, y_pred, labels, PRECISION)
}

pub fn recall_per_label(y_true: &[String], y_pred: &[String], labels: &[String]) -> LabelScores {
    per_label(y_true, y_pred, labels, RECALL)
}

pub fn f1_per_label(y_true: &[String], y_pred: &[String], labels: &[String]) -> LabelScores {
    per_label(y_true, y_pred, labels, F1)
}

pub fn macro_precision(y_true: &[String], y_pred: &[String]) -> f64 {
    precision_per_label(y_true, y_pred, &unique_labels(y_true, y_pred)).mean()
}

pub fn macro_recall(y_true: &[String], y_pred: &[String]) -> f64 {
    recall_per_label(y_true, y_pred, &unique_labels(y_true, y_pred)).mean()
}

pub fn macro_f1(y_true: &[String], y_pred: &[String]) -> f64 {
    f1_per_label(y_true, y_pred, &unique_labels(y_true, y_pred)).mean()
}

pub fn micro_precision(y_true: &[String], y_pred: &[String]) -> f64 {
    micro(y_true, y_pred, PRECISION)
}

pub fn micro_recall(y_true: &[String], y_pred: &[String]) -> f64 {
    micro(y_true, y_pred, RECALL)
}

pub fn micro_f1(y_true: &[String], y_pred: &[String]) -> f64 {
    micro(y_true, y_pred, F1)
}

/// Square count matrix, rows are truths and columns predictions
///
/// Pairs involving a label outside `labels` are not counted.
pub fn confusion_matrix(y_true: &[String], y_pred: &[String], labels: &[String]) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0usize; labels.len()]; labels.len()];
    let position = |label: &String| labels.iter().position(|l| l == label);
    for (t, p) in y_true.iter().zip(y_pred) {
        if let (Some(row), Some(col)) = (position(t), position(p)) {
            matrix[row][col] += 1;
        }
    }
    matrix
}

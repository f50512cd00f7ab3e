//! Evaluation of hierarchical occupation (SOC) code classifiers
//!
//! A full code such as `15-1132.00` rolls up to its two-character major group
//! (`15`). When the target is full codes, major group metrics are computed
//! on truncated labels. When the target is already major groups they are the
//! base metrics unchanged.

use crate::error::Result;
use crate::evaluation::classification::ClassificationEvaluator;
use crate::evaluation::metrics::{self, LabelScores};
use crate::evaluation::target::ResultGenerator;
use once_cell::sync::OnceCell;
use serde::Serialize;

/// Code level a target variable classifies at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Granularity {
    MajorGroup,
    FullSoc,
    Other(String),
}

impl Granularity {
    /// Granularity named by a target variable
    pub fn from_target_name(name: &str) -> Self {
        match name {
            "major_group" => Granularity::MajorGroup,
            "full_soc" => Granularity::FullSoc,
            other => Granularity::Other(other.to_string()),
        }
    }
}

/// Major group of an occupation code
pub fn major_group(code: &str) -> String {
    code.chars().take(2).collect()
}

/// Major group level metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorGroupReport {
    pub accuracy: f64,
    pub precision: LabelScores,
    pub recall: LabelScores,
    pub f1: LabelScores,
}

/// [`ClassificationEvaluator`] with major group roll-ups
#[derive(Debug)]
pub struct OccupationClassificationEvaluator {
    base: ClassificationEvaluator,
    granularity: Granularity,

    /// Truncated (truths, predictions)
    major_group_results: OnceCell<(Vec<String>, Vec<String>)>,
    accuracy_major_group: OnceCell<f64>,
    precision_per_major_group: OnceCell<LabelScores>,
    recall_per_major_group: OnceCell<LabelScores>,
    f1_per_major_group: OnceCell<LabelScores>,
}

impl OccupationClassificationEvaluator {
    /// Build on the same construction rules as [`ClassificationEvaluator::new`]
    pub fn new(generator: &dyn ResultGenerator) -> Result<Self> {
        let base = ClassificationEvaluator::new(generator)?;
        let granularity = Granularity::from_target_name(base.target_variable().name());
        Ok(Self {
            base,
            granularity,
            major_group_results: OnceCell::new(),
            accuracy_major_group: OnceCell::new(),
            precision_per_major_group: OnceCell::new(),
            recall_per_major_group: OnceCell::new(),
            f1_per_major_group: OnceCell::new(),
        })
    }

    /// Evaluator over the labels as given
    pub fn base(&self) -> &ClassificationEvaluator {
        &self.base
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    fn major_group_results(&self) -> &(Vec<String>, Vec<String>) {
        self.major_group_results.get_or_init(|| {
            let truncate = |labels: &[String]| -> Vec<String> {
                labels.iter().map(|l| major_group(l)).collect()
            };
            (truncate(self.base.y_true()), truncate(self.base.y_pred()))
        })
    }

    /// Per-label scores over the sorted major groups seen in the results
    fn truncated_scores(
        &self,
        cell: &OnceCell<LabelScores>,
        score: fn(&[String], &[String], &[String]) -> LabelScores,
    ) -> LabelScores {
        cell.get_or_init(|| {
            let (y_true, y_pred) = self.major_group_results();
            score(y_true, y_pred, &metrics::unique_labels(y_true, y_pred))
        })
        .clone()
    }

    /// `None` unless the target is full codes or major groups
    pub fn accuracy_major_group(&self) -> Option<f64> {
        match self.granularity {
            Granularity::MajorGroup => Some(self.base.accuracy()),
            Granularity::FullSoc => Some(*self.accuracy_major_group.get_or_init(|| {
                let (y_true, y_pred) = self.major_group_results();
                metrics::accuracy(y_true, y_pred)
            })),
            Granularity::Other(_) => None,
        }
    }

    pub fn precision_per_major_group(&self) -> Option<LabelScores> {
        match self.granularity {
            Granularity::MajorGroup => Some(self.base.precision().clone()),
            Granularity::FullSoc => Some(self.truncated_scores(
                &self.precision_per_major_group,
                metrics::precision_per_label,
            )),
            Granularity::Other(_) => None,
        }
    }

    pub fn recall_per_major_group(&self) -> Option<LabelScores> {
        match self.granularity {
            Granularity::MajorGroup => Some(self.base.recall().clone()),
            Granularity::FullSoc => Some(
                self.truncated_scores(&self.recall_per_major_group, metrics::recall_per_label),
            ),
            Granularity::Other(_) => None,
        }
    }

    pub fn f1_per_major_group(&self) -> Option<LabelScores> {
        match self.granularity {
            Granularity::MajorGroup => Some(self.base.f1().clone()),
            Granularity::FullSoc => {
                Some(self.truncated_scores(&self.f1_per_major_group, metrics::f1_per_label))
            }
            Granularity::Other(_) => None,
        }
    }

    /// All major group metrics, `None` for targets other than SOC levels
    pub fn major_group_report(&self) -> Option<MajorGroupReport> {
        Some(MajorGroupReport {
            accuracy: self.accuracy_major_group()?,
            precision: self.precision_per_major_group()?,
            recall: self.recall_per_major_group()?,
            f1: self.f1_per_major_group()?,
        })
    }
}

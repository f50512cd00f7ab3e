//! Label universes and the result generators that report against them

use crate::error::{Result, SkillsMlError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A classification target: its name, label universe and decoder
pub trait TargetVariable: Send + Sync {
    /// Target name, e.g. `"full_soc"` or `"major_group"`
    fn name(&self) -> &str;

    /// Ordered label universe
    fn choices(&self) -> &[String];

    /// Decode encoded labels back to their string form
    fn inverse_transform(&self, encoded: &[usize]) -> Result<Vec<String>>;
}

/// Maps labels to dense indices over their sorted unique classes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the classes present in `labels`
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode labels, failing on any class not seen by [`LabelEncoder::fit`]
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.classes
                    .binary_search_by(|class| class.as_str().cmp(label))
                    .map_err(|_| SkillsMlError::Decode(format!("unseen label {:?}", label)))
            })
            .collect()
    }

    pub fn inverse_transform(&self, encoded: &[usize]) -> Result<Vec<String>> {
        encoded
            .iter()
            .map(|&index| {
                self.classes.get(index).cloned().ok_or_else(|| {
                    SkillsMlError::Decode(format!(
                        "label index {} out of range for {} classes",
                        index,
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }
}

/// Occupation code target at a given granularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocTarget {
    name: String,
    choices: Vec<String>,
    encoder: LabelEncoder,
}

impl SocTarget {
    /// Target over `choices`, encoded by their sorted order
    pub fn new<S: Into<String>>(name: impl Into<String>, choices: impl IntoIterator<Item = S>) -> Self {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let encoder = LabelEncoder::fit(choices.iter().cloned());
        Self {
            name: name.into(),
            choices,
            encoder,
        }
    }

    /// Full occupation code target
    pub fn full_soc<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        Self::new("full_soc", choices)
    }

    /// Two-digit major group target
    pub fn major_group<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        Self::new("major_group", choices)
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }
}

impl TargetVariable for SocTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn choices(&self) -> &[String] {
        &self.choices
    }

    fn inverse_transform(&self, encoded: &[usize]) -> Result<Vec<String>> {
        self.encoder.inverse_transform(encoded)
    }
}

/// Source of encoded (prediction, truth) pairs for evaluation
pub trait ResultGenerator {
    /// Target the results are encoded against, if declared
    fn target_variable(&self) -> Option<Arc<dyn TargetVariable>>;

    /// Every evaluated example as (encoded prediction, encoded truth)
    fn results(&self) -> Vec<(usize, usize)>;
}

/// In-memory [`ResultGenerator`]
#[derive(Clone, Default)]
pub struct VecResultGenerator {
    target: Option<Arc<dyn TargetVariable>>,
    results: Vec<(usize, usize)>,
}

impl VecResultGenerator {
    pub fn new(target: Arc<dyn TargetVariable>, results: Vec<(usize, usize)>) -> Self {
        Self {
            target: Some(target),
            results,
        }
    }

    /// Generator that declares no target
    pub fn without_target(results: Vec<(usize, usize)>) -> Self {
        Self {
            target: None,
            results,
        }
    }

    /// Encode string (prediction, truth) pairs against a [`SocTarget`]
    pub fn from_labels<S: AsRef<str>>(target: SocTarget, pairs: &[(S, S)]) -> Result<Self> {
        let predicted: Vec<&str> = pairs.iter().map(|(p, _)| p.as_ref()).collect();
        let truth: Vec<&str> = pairs.iter().map(|(_, t)| t.as_ref()).collect();
        let predicted = target.encoder().transform(&predicted)?;
        let truth = target.encoder().transform(&truth)?;
        Ok(Self::new(
            Arc::new(target),
            predicted.into_iter().zip(truth).collect(),
        ))
    }
}

impl ResultGenerator for VecResultGenerator {
    fn target_variable(&self) -> Option<Arc<dyn TargetVariable>> {
        self.target.clone()
    }

    fn results(&self) -> Vec<(usize, usize)> {
        self.results.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_round_trip() {
        let encoder = LabelEncoder::fit(["15-1132", "11-1011", "15-1132"]);
        assert_eq!(encoder.classes(), ["11-1011".to_string(), "15-1132".to_string()]);
        assert_eq!(encoder.transform(&["15-1132", "11-1011"]).unwrap(), vec![1, 0]);
        assert_eq!(
            encoder.inverse_transform(&[0, 1]).unwrap(),
            vec!["11-1011".to_string(), "15-1132".to_string()]
        );
    }

    #[test]
    fn test_label_encoder_errors() {
        let encoder = LabelEncoder::fit(["a"]);
        assert!(matches!(encoder.transform(&["b"]), Err(SkillsMlError::Decode(_))));
        assert!(matches!(
            encoder.inverse_transform(&[3]),
            Err(SkillsMlError::Decode(_))
        ));
    }

    #[test]
    fn test_soc_target_keeps_choice_order() {
        let target = SocTarget::major_group(["15", "11"]);
        assert_eq!(target.name(), "major_group");
        assert_eq!(target.choices(), ["15".to_string(), "11".to_string()]);
        assert_eq!(target.inverse_transform(&[0]).unwrap(), vec!["11".to_string()]);
    }

    #[test]
    fn test_from_labels() {
        let generator = VecResultGenerator::from_labels(
            SocTarget::full_soc(["11-1011", "15-1132"]),
            &[("11-1011", "15-1132"), ("15-1132", "15-1132")],
        )
        .unwrap();
        assert_eq!(generator.results(), vec![(0, 1), (1, 1)]);
        assert_eq!(generator.target_variable().unwrap().name(), "full_soc");

        assert!(VecResultGenerator::without_target(vec![(0, 0)])
            .target_variable()
            .is_none());
    }
}

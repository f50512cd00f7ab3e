//! Classification evaluator over a [`ResultGenerator`]

use crate::error::{Result, SkillsMlError};
use crate::evaluation::metrics::{self, LabelScores};
use crate::evaluation::target::{ResultGenerator, TargetVariable};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Every metric of a [`ClassificationEvaluator`] in one serializable record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub target: String,
    pub examples: usize,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub micro_precision: f64,
    pub macro_recall: f64,
    pub micro_recall: f64,
    pub macro_f1: f64,
    pub micro_f1: f64,
    pub precision: LabelScores,
    pub recall: LabelScores,
    pub f1: LabelScores,
    pub confusion_matrix: Vec<Vec<usize>>,
}

/// Metrics over decoded predictions and truths
///
/// Both sequences are decoded once when the evaluator is built. Each metric
/// is computed on first access and then kept.
pub struct ClassificationEvaluator {
    target: Arc<dyn TargetVariable>,
    labels: Vec<String>,
    y_pred: Vec<String>,
    y_true: Vec<String>,

    accuracy: OnceCell<f64>,
    precision: OnceCell<LabelScores>,
    recall: OnceCell<LabelScores>,
    f1: OnceCell<LabelScores>,
    confusion_matrix: OnceCell<Vec<Vec<usize>>>,
    macro_precision: OnceCell<f64>,
    micro_precision: OnceCell<f64>,
    macro_recall: OnceCell<f64>,
    micro_recall: OnceCell<f64>,
    macro_f1: OnceCell<f64>,
    micro_f1: OnceCell<f64>,
}

impl ClassificationEvaluator {
    /// Decode the generator's results
    ///
    /// Fails with [`SkillsMlError::Configuration`] when the generator does not
    /// declare a target variable, and with [`SkillsMlError::Decode`] when an
    /// encoded label is outside the target's classes.
    pub fn new(generator: &dyn ResultGenerator) -> Result<Self> {
        let target = generator.target_variable().ok_or_else(|| {
            SkillsMlError::Configuration(
                "result generator does not declare a target variable".to_string(),
            )
        })?;

        let (predicted, truth): (Vec<usize>, Vec<usize>) = generator.results().into_iter().unzip();
        let y_pred = target.inverse_transform(&predicted)?;
        let y_true = target.inverse_transform(&truth)?;
        debug!(
            "Decoded {} results against target {}",
            y_true.len(),
            target.name()
        );

        for label in target.choices() {
            if !y_true.contains(label) && !y_pred.contains(label) {
                warn!(
                    "Label {} of target {} never occurs in the results",
                    label,
                    target.name()
                );
            }
        }

        Ok(Self {
            labels: target.choices().to_vec(),
            target,
            y_pred,
            y_true,
            accuracy: OnceCell::new(),
            precision: OnceCell::new(),
            recall: OnceCell::new(),
            f1: OnceCell::new(),
            confusion_matrix: OnceCell::new(),
            macro_precision: OnceCell::new(),
            micro_precision: OnceCell::new(),
            macro_recall: OnceCell::new(),
            micro_recall: OnceCell::new(),
            macro_f1: OnceCell::new(),
            micro_f1: OnceCell::new(),
        })
    }

    pub fn target_variable(&self) -> &dyn TargetVariable {
        self.target.as_ref()
    }

    /// Label universe the per-label metrics are ordered by
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Decoded predictions
    pub fn y_pred(&self) -> &[String] {
        &self.y_pred
    }

    /// Decoded truths
    pub fn y_true(&self) -> &[String] {
        &self.y_true
    }

    pub fn accuracy(&self) -> f64 {
        *self
            .accuracy
            .get_or_init(|| metrics::accuracy(&self.y_true, &self.y_pred))
    }

    /// Precision per label, in label universe order
    pub fn precision(&self) -> &LabelScores {
        self.precision
            .get_or_init(|| metrics::precision_per_label(&self.y_true, &self.y_pred, &self.labels))
    }

    pub fn recall(&self) -> &LabelScores {
        self.recall
            .get_or_init(|| metrics::recall_per_label(&self.y_true, &self.y_pred, &self.labels))
    }

    pub fn f1(&self) -> &LabelScores {
        self.f1
            .get_or_init(|| metrics::f1_per_label(&self.y_true, &self.y_pred, &self.labels))
    }

    /// Rows are truths, columns predictions, both in label universe order
    pub fn confusion_matrix(&self) -> &[Vec<usize>] {
        self.confusion_matrix
            .get_or_init(|| metrics::confusion_matrix(&self.y_true, &self.y_pred, &self.labels))
    }

    pub fn macro_precision(&self) -> f64 {
        *self
            .macro_precision
            .get_or_init(|| metrics::macro_precision(&self.y_true, &self.y_pred))
    }

    pub fn micro_precision(&self) -> f64 {
        *self
            .micro_precision
            .get_or_init(|| metrics::micro_precision(&self.y_true, &self.y_pred))
    }

    pub fn macro_recall(&self) -> f64 {
        *self
            .macro_recall
            .get_or_init(|| metrics::macro_recall(&self.y_true, &self.y_pred))
    }

    pub fn micro_recall(&self) -> f64 {
        *self
            .micro_recall
            .get_or_init(|| metrics::micro_recall(&self.y_true, &self.y_pred))
    }

    pub fn macro_f1(&self) -> f64 {
        *self
            .macro_f1
            .get_or_init(|| metrics::macro_f1(&self.y_true, &self.y_pred))
    }

    pub fn micro_f1(&self) -> f64 {
        *self
            .micro_f1
            .get_or_init(|| metrics::micro_f1(&self.y_true, &self.y_pred))
    }

    /// Snapshot of every metric
    pub fn report(&self) -> ClassificationReport {
        ClassificationReport {
            target: self.target.name().to_string(),
            examples: self.y_true.len(),
            accuracy: self.accuracy(),
            macro_precision: self.macro_precision(),
            micro_precision: self.micro_precision(),
            macro_recall: self.macro_recall(),
            micro_recall: self.micro_recall(),
            macro_f1: self.macro_f1(),
            micro_f1: self.micro_f1(),
            precision: self.precision().clone(),
            recall: self.recall().clone(),
            f1: self.f1().clone(),
            confusion_matrix: self.confusion_matrix().to_vec(),
        }
    }
}

impl std::fmt::Debug for ClassificationEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationEvaluator")
            .field("target", &self.target.name())
            .field("labels", &self.labels.len())
            .field("examples", &self.y_true.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::target::{SocTarget, VecResultGenerator};
    use std::io::Write;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn generator() -> VecResultGenerator {
        // classes sorted: 11-1011 (0), 13-2011 (1), 15-1132 (2)
        let target = SocTarget::full_soc(["15-1132", "11-1011", "13-2011"]);
        VecResultGenerator::new(
            Arc::new(target),
            vec![(0, 0), (2, 2), (2, 1), (1, 1), (0, 2)],
        )
    }

    #[test]
    fn test_requires_target_variable() {
        let err = ClassificationEvaluator::new(&VecResultGenerator::without_target(vec![(0, 0)]))
            .unwrap_err();
        assert!(matches!(err, SkillsMlError::Configuration(_)));
    }

    #[test]
    fn test_decode_failure() {
        let target = SocTarget::full_soc(["11-1011"]);
        let generator = VecResultGenerator::new(Arc::new(target), vec![(0, 4)]);
        assert!(matches!(
            ClassificationEvaluator::new(&generator),
            Err(SkillsMlError::Decode(_))
        ));
    }

    #[test]
    fn test_decoded_sequences() {
        let evaluator = ClassificationEvaluator::new(&generator()).unwrap();
        assert_eq!(
            evaluator.y_pred(),
            ["11-1011", "15-1132", "15-1132", "13-2011", "11-1011"]
        );
        assert_eq!(
            evaluator.y_true(),
            ["11-1011", "15-1132", "13-2011", "13-2011", "15-1132"]
        );
    }

    #[test]
    fn test_metrics_follow_choice_order() {
        let evaluator = ClassificationEvaluator::new(&generator()).unwrap();

        assert!((evaluator.accuracy() - 0.6).abs() < 1e-9);
        assert_eq!(evaluator.precision().labels, evaluator.labels());
        assert_eq!(evaluator.precision().values, vec![0.5, 0.5, 1.0]);
        assert_eq!(evaluator.recall().values, vec![0.5, 1.0, 0.5]);

        // rows/cols: 15-1132, 11-1011, 13-2011
        assert_eq!(
            evaluator.confusion_matrix(),
            [vec![1, 1, 0], vec![0, 1, 0], vec![1, 0, 1]]
        );
    }

    #[test]
    fn test_memoized() {
        let evaluator = ClassificationEvaluator::new(&generator()).unwrap();
        let first = evaluator.f1() as *const LabelScores;
        assert_eq!(evaluator.f1() as *const LabelScores, first);
        assert!((evaluator.micro_f1() - evaluator.accuracy()).abs() < 1e-9);
    }

    #[test]
    fn test_report() {
        let report = ClassificationEvaluator::new(&generator()).unwrap().report();
        assert_eq!(report.target, "full_soc");
        assert_eq!(report.examples, 5);
        assert_eq!(report.confusion_matrix.len(), 3);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["precision"]["labels"].is_array());
    }

    #[test]
    fn test_unused_labels_and_zero_division_are_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let generator = VecResultGenerator::from_labels(
                SocTarget::full_soc(["11-1011", "15-1132", "29-1141"]),
                &[("11-1011", "11-1011")],
            )
            .unwrap();
            let evaluator = ClassificationEvaluator::new(&generator).unwrap();
            assert_eq!(evaluator.precision().values, vec![1.0, 0.0, 0.0]);
            assert_eq!(evaluator.macro_precision(), 1.0);
        });

        let output = logs.contents();
        let warnings: Vec<&str> = output.lines().filter(|l| l.contains("WARN")).collect();
        for label in ["15-1132", "29-1141"] {
            assert!(
                warnings
                    .iter()
                    .any(|l| l.contains(label) && l.contains("never occurs")),
                "no unused label warning for {}: {}",
                label,
                output
            );
            assert!(
                warnings
                    .iter()
                    .any(|l| l.contains(label) && l.contains("zero denominator")),
                "no zero division warning for {}: {}",
                label,
                output
            );
        }
        assert!(!warnings.iter().any(|l| l.contains("11-1011")));
    }
}

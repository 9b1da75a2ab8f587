//! Classification metrics for held-out evaluation.

use serde::{Deserialize, Serialize};

use crate::ml::types::{Label, NUM_CLASSES};

/// 2x2 confusion matrix. Rows are actual labels, columns predicted labels,
/// both in [`Label::index`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; NUM_CLASSES]; NUM_CLASSES],
}

impl ConfusionMatrix {
    /// Create an all-zero matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one prediction.
    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    /// Number of examples of class `actual` predicted as `predicted`.
    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    /// Raw counts, `counts[actual][predicted]`.
    pub fn counts(&self) -> &[[usize; NUM_CLASSES]; NUM_CLASSES] {
        &self.counts
    }

    /// Number of recorded predictions.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Number of correct predictions.
    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&label| self.get(label, label)).sum()
    }

    /// Number of examples whose actual class is `label`.
    pub fn actual(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Number of examples predicted as `label`.
    pub fn predicted(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }

    /// Fraction of correct predictions, 0 when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }
}

impl FromIterator<(Label, Label)> for ConfusionMatrix {
    fn from_iter<I: IntoIterator<Item = (Label, Label)>>(iter: I) -> Self {
        let mut matrix = ConfusionMatrix::new();
        for (actual, predicted) in iter {
            matrix.record(actual, predicted);
        }
        matrix
    }
}

/// Precision, recall and F1 of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// The class these metrics describe.
    pub label: Label,
    /// Correct predictions of the class over all predictions of the class.
    pub precision: f64,
    /// Correct predictions of the class over all actual members.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of actual members.
    pub support: usize,
}

impl ClassMetrics {
    fn from_matrix(matrix: &ConfusionMatrix, label: Label) -> Self {
        let true_positive = matrix.get(label, label);
        let precision = ratio(true_positive, matrix.predicted(label));
        let recall = ratio(true_positive, matrix.actual(label));
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            label,
            precision,
            recall,
            f1,
            support: matrix.actual(label),
        }
    }
}

/// Result of evaluating a trained pipeline on labeled data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of correct predictions.
    pub accuracy: f64,
    /// Actual vs. predicted counts.
    pub confusion_matrix: ConfusionMatrix,
    /// Metrics per class in [`Label::index`] order.
    pub per_class: Vec<ClassMetrics>,
}

impl Evaluation {
    /// Derive all metrics from a confusion matrix.
    pub fn from_confusion_matrix(confusion_matrix: ConfusionMatrix) -> Self {
        Evaluation {
            accuracy: confusion_matrix.accuracy(),
            per_class: Label::ALL
                .iter()
                .map(|&label| ClassMetrics::from_matrix(&confusion_matrix, label))
                .collect(),
            confusion_matrix,
        }
    }

    /// Number of evaluated examples.
    pub fn total(&self) -> usize {
        self.confusion_matrix.total()
    }

    /// Metrics of one class.
    pub fn class_metrics(&self, label: Label) -> &ClassMetrics {
        &self.per_class[label.index()]
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

//! Confusion matrix and per-label classification metrics.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::MetricsError;

/// A confusion matrix over an explicit label order.
///
/// Entry `as_rows()[t][p]` counts samples whose true label is `labels()[t]`
/// and whose predicted label is `labels()[p]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix<L> {
    labels: Vec<L>,
    matrix: Vec<Vec<usize>>,
}

/// Precision, recall, and F1 for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics<L> {
    /// The label these metrics describe.
    pub label: L,
    /// TP / (TP + FP). 0.0 if the label was never predicted.
    pub precision: f64,
    /// TP / (TP + FN). 0.0 if the label never occurs.
    pub recall: f64,
    /// Harmonic mean of precision and recall. 0.0 if both are zero.
    pub f1: f64,
    /// True samples carrying this label.
    pub support: usize,
}

/// Headline metrics with one label treated as positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinaryMetrics {
    /// Fraction of correct predictions over all labels.
    pub accuracy: f64,
    /// Precision for the positive label.
    pub precision: f64,
    /// Recall (sensitivity) for the positive label.
    pub recall: f64,
    /// F1 for the positive label.
    pub f1: f64,
}

impl<L: Copy + PartialEq> ConfusionMatrix<L> {
    /// Count `(true, predicted)` pairs into a matrix whose rows and columns
    /// follow `order`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricsError::EmptyInput`] | No samples, or an empty `order` |
    /// | [`MetricsError::LengthMismatch`] | `true_labels.len() != predicted.len()` |
    /// | [`MetricsError::UnknownLabel`] | A label is not in `order` |
    pub fn from_labels(true_labels: &[L], predicted: &[L], order: &[L]) -> Result<Self, MetricsError> {
        if true_labels.is_empty() || order.is_empty() {
            return Err(MetricsError::EmptyInput);
        }
        if true_labels.len() != predicted.len() {
            return Err(MetricsError::LengthMismatch {
                left: true_labels.len(),
                right: predicted.len(),
            });
        }

        let position = |label: L| order.iter().position(|&l| l == label);
        let n = order.len();
        let mut matrix = vec![vec![0usize; n]; n];
        for (index, (&t, &p)) in true_labels.iter().zip(predicted).enumerate() {
            let (Some(row), Some(col)) = (position(t), position(p)) else {
                return Err(MetricsError::UnknownLabel { index });
            };
            matrix[row][col] += 1;
        }
        debug!(n_samples = true_labels.len(), n_labels = n, "confusion matrix built");
        Ok(Self {
            labels: order.to_vec(),
            matrix,
        })
    }

    /// Row/column labels.
    #[must_use]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Matrix rows, true label by predicted label.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Samples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Proportion of samples on the diagonal.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.labels.len()).map(|i| self.matrix[i][i]).sum();
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Precision, recall, F1, and support for each label in order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics<L>> {
        let n = self.labels.len();
        self.labels
            .iter()
            .enumerate()
            .map(|(c, &label)| {
                let tp = self.matrix[c][c];
                let predicted: usize = (0..n).map(|i| self.matrix[i][c]).sum();
                let support: usize = self.matrix[c].iter().sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Accuracy plus precision, recall and F1 with `positive` as the positive label.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::MissingLabel`] if `positive` is not a matrix label.
    pub fn metrics_for(&self, positive: L) -> Result<BinaryMetrics, MetricsError> {
        let metrics = self
            .class_metrics()
            .into_iter()
            .find(|m| m.label == positive)
            .ok_or(MetricsError::MissingLabel)?;
        Ok(BinaryMetrics {
            accuracy: self.accuracy(),
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
        })
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl<L: fmt::Display> fmt::Display for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.labels.iter().map(ToString::to_string).collect();
        let width = names.iter().map(String::len).max().unwrap_or(0).max(6);

        write!(f, "{:>width$}", "true \\ pred", width = width + 6)?;
        for name in &names {
            write!(f, " {name:>width$}")?;
        }
        writeln!(f)?;

        for (name, row) in names.iter().zip(&self.matrix) {
            write!(f, "{name:>width$}", width = width + 6)?;
            for val in row {
                write!(f, " {val:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//! Validated, column-major view of a labeled training set.

use crate::error::RfError;

/// Feature columns and labels after validation.
///
/// `columns[feature][sample]`. Trees address samples by index into this
/// set, so a bootstrap draw is just a `Vec<usize>` with repeats.
#[derive(Debug, Clone)]
pub(crate) struct TrainingSet {
    columns: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl TrainingSet {
    /// Validate row-major `features` against `labels` and transpose them.
    ///
    /// The class count is `max(label) + 1`.
    pub(crate) fn from_rows(features: &[Vec<f64>], labels: &[usize]) -> Result<Self, RfError> {
        let first = features.first().ok_or(RfError::EmptyDataset)?;
        let n_features = first.len();
        if n_features == 0 {
            return Err(RfError::ZeroFeatures);
        }
        if labels.len() != features.len() {
            return Err(RfError::LabelCountMismatch {
                n_samples: features.len(),
                n_labels: labels.len(),
            });
        }

        let mut columns = vec![Vec::with_capacity(features.len()); n_features];
        for (sample_index, row) in features.iter().enumerate() {
            if row.len() != n_features {
                return Err(RfError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            for (feature_index, (&value, column)) in row.iter().zip(&mut columns).enumerate() {
                if !value.is_finite() {
                    return Err(RfError::NonFiniteValue {
                        sample_index,
                        feature_index,
                    });
                }
                column.push(value);
            }
        }

        let n_classes = labels.iter().max().map_or(1, |&m| m + 1);
        Ok(Self {
            columns,
            labels: labels.to_vec(),
            n_classes,
        })
    }

    pub(crate) fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub(crate) fn value(&self, feature: usize, sample: usize) -> f64 {
        self.columns[feature][sample]
    }

    pub(crate) fn label(&self, sample: usize) -> usize {
        self.labels[sample]
    }

    /// Per-class counts over `samples` (repeats count once per occurrence).
    pub(crate) fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        counts
    }
}

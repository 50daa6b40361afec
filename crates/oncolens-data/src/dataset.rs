//! The Wisconsin diagnostic breast cancer table.

use tracing::{debug, instrument};

use crate::diagnosis::Diagnosis;
use crate::error::DataError;

/// Feature table with one diagnosis per row.
///
/// Rows are samples, columns are the numeric measurements named by
/// [`Dataset::feature_names`].
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    diagnoses: Vec<Diagnosis>,
}

impl Dataset {
    /// Load the embedded 569-row, 30-column breast cancer table.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---------|------|
    /// | [`DataError::ShapeMismatch`] | The embedded buffer does not match its declared shape |
    /// | [`DataError::UnknownTarget`] | A target is neither 0 nor 1 |
    /// | [`DataError::NonFiniteValue`] | A measurement is NaN or infinite |
    #[instrument]
    pub fn breast_cancer() -> Result<Self, DataError> {
        let raw = smartcore::dataset::breast_cancer::load_dataset();
        // Stored as f32; widening is exact but keeps single-precision digits.
        let values: Vec<f64> = raw.data.iter().map(|&v| f64::from(v)).collect();
        // Targets ship as small non-negative integers.
        let targets: Vec<u32> = raw.target.iter().map(|&t| t as u32).collect();
        let dataset = Self::from_flat(
            raw.num_samples,
            raw.num_features,
            &values,
            &targets,
            raw.feature_names,
        )?;
        debug!(
            n_samples = dataset.n_samples(),
            n_features = dataset.n_features(),
            malignant = dataset.count(Diagnosis::Malignant),
            benign = dataset.count(Diagnosis::Benign),
            "loaded breast cancer table"
        );
        Ok(dataset)
    }

    /// Build a table from a row-major value buffer and raw 0/1 targets.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---------|------|
    /// | [`DataError::EmptyDataset`] | `n_samples` is 0 |
    /// | [`DataError::ShapeMismatch`] | `values.len() != n_samples * n_features` |
    /// | [`DataError::TargetCountMismatch`] | `targets.len() != n_samples` |
    /// | [`DataError::FeatureNameMismatch`] | `feature_names.len() != n_features` |
    /// | [`DataError::NonFiniteValue`] | A value is NaN or infinite |
    /// | [`DataError::UnknownTarget`] | A target is neither 0 nor 1 |
    pub fn from_flat(
        n_samples: usize,
        n_features: usize,
        values: &[f64],
        targets: &[u32],
        feature_names: Vec<String>,
    ) -> Result<Self, DataError> {
        if n_samples == 0 {
            return Err(DataError::EmptyDataset);
        }
        let expected = n_samples * n_features;
        if values.len() != expected {
            return Err(DataError::ShapeMismatch {
                n_samples,
                n_features,
                expected,
                got: values.len(),
            });
        }
        if n_features == 0 {
            return Err(DataError::ShapeMismatch {
                n_samples,
                n_features,
                expected: n_samples,
                got: 0,
            });
        }
        let features: Vec<Vec<f64>> = values.chunks(n_features).map(<[f64]>::to_vec).collect();
        let diagnoses = targets
            .iter()
            .enumerate()
            .map(|(row, &raw)| Diagnosis::from_raw_target(raw, row))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(feature_names, features, diagnoses)
    }

    /// Build a table from rows that are already split out.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---------|------|
    /// | [`DataError::EmptyDataset`] | No rows |
    /// | [`DataError::ShapeMismatch`] | A row's width differs from the name count |
    /// | [`DataError::TargetCountMismatch`] | `diagnoses.len() != features.len()` |
    /// | [`DataError::FeatureNameMismatch`] | No feature names |
    /// | [`DataError::NonFiniteValue`] | A value is NaN or infinite |
    pub fn from_parts(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        diagnoses: Vec<Diagnosis>,
    ) -> Result<Self, DataError> {
        let n_samples = features.len();
        if n_samples == 0 {
            return Err(DataError::EmptyDataset);
        }
        if diagnoses.len() != n_samples {
            return Err(DataError::TargetCountMismatch {
                n_samples,
                n_targets: diagnoses.len(),
            });
        }
        let n_features = feature_names.len();
        if n_features == 0 {
            return Err(DataError::FeatureNameMismatch {
                n_features: features[0].len(),
                n_names: 0,
            });
        }
        for (row, values) in features.iter().enumerate() {
            if values.len() != n_features {
                return Err(DataError::FeatureNameMismatch {
                    n_features: values.len(),
                    n_names: n_features,
                });
            }
            if let Some(column) = values.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFiniteValue { row, column });
            }
        }
        Ok(Self {
            feature_names,
            features,
            diagnoses,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of measurement columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Column names in order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Rows of measurements.
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Diagnosis per row.
    #[must_use]
    pub fn diagnoses(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    /// Rows carrying `diagnosis`.
    #[must_use]
    pub fn count(&self, diagnosis: Diagnosis) -> usize {
        self.diagnoses.iter().filter(|&&d| d == diagnosis).count()
    }
}

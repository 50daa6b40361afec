//! Prediction methods for the random forest ensemble.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::node::argmax;

/// Class probability distribution from a prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDistribution {
    probs: Vec<f64>,
}

impl ClassDistribution {
    pub(crate) fn new(probs: Vec<f64>) -> Self {
        Self { probs }
    }

    /// Predicted class: argmax of the probabilities, lower index on ties.
    #[must_use]
    pub fn predicted_class(&self) -> usize {
        argmax(&self.probs)
    }

    /// Probability of one class.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::ClassOutOfRange`] for an index past the last class.
    pub fn probability(&self, class: usize) -> Result<f64, RfError> {
        self.probs
            .get(class)
            .copied()
            .ok_or(RfError::ClassOutOfRange {
                class,
                n_classes: self.probs.len(),
            })
    }

    /// Probabilities indexed by class.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }
}

impl RandomForest {
    /// Predict the class of a single sample (argmax of the averaged distribution).
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        Ok(self.predict_proba(sample)?.predicted_class())
    }

    /// Average the leaf distributions of every tree for one sample.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }

        let mut avg = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in avg.iter_mut().zip(tree.leaf_distribution(sample)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        avg.iter_mut().for_each(|v| *v /= n);

        Ok(ClassDistribution::new(avg))
    }

    /// Predict classes for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] if any sample has the wrong width.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Probability distributions for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] if any sample has the wrong width.
    pub fn predict_proba_batch(
        &self,
        features: &[Vec<f64>],
    ) -> Result<Vec<ClassDistribution>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict_proba(sample))
            .collect()
    }

    /// Number of features the forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature names in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RandomForestConfig;

    fn fitted() -> RandomForest {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let names = vec!["x".to_string(), "y".to_string()];
        RandomForestConfig::new(10)
            .unwrap()
            .fit(&features, &[0, 0, 0, 1, 1, 1], &names)
            .unwrap()
            .into_forest()
    }

    #[test]
    fn batch_matches_single() {
        let forest = fitted();
        let rows = vec![vec![0.0, 0.0], vec![6.0, 0.0], vec![20.0, 0.0]];
        let batch = forest.predict_proba_batch(&rows).unwrap();
        for (row, dist) in rows.iter().zip(&batch) {
            assert_eq!(&forest.predict_proba(row).unwrap(), dist);
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let forest = fitted();
        let dist = forest.predict_proba(&[5.0, 0.0]).unwrap();
        let sum: f64 = dist.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn probability_out_of_range() {
        let dist = ClassDistribution::new(vec![0.25, 0.75]);
        assert!((dist.probability(1).unwrap() - 0.75).abs() < f64::EPSILON);
        assert_eq!(dist.predicted_class(), 1);
        assert!(matches!(
            dist.probability(2),
            Err(RfError::ClassOutOfRange {
                class: 2,
                n_classes: 2
            })
        ));
    }

    #[test]
    fn wrong_width_is_rejected() {
        let forest = fitted();
        assert!(forest.predict_batch(&[vec![1.0]]).is_err());
        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.n_classes(), 2);
        assert_eq!(forest.feature_names(), ["x", "y"]);
    }
}

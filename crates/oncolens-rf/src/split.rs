use rand::Rng;

use crate::node::{FeatureIndex, Impurity};
use crate::training::TrainingSet;

/// Criterion for measuring the quality of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Gini impurity: 1 - Σ(p_i²)
    #[default]
    Gini,
    /// Information entropy: -Σ(p_i · ln(p_i))
    Entropy,
}

impl SplitCriterion {
    /// Compute the impurity of a node from its class counts.
    ///
    /// An empty node is pure.
    #[must_use]
    pub fn impurity(&self, class_counts: &[usize], n_samples: usize) -> Impurity {
        if n_samples == 0 {
            return Impurity::new(0.0);
        }
        let n = n_samples as f64;
        let proportions = class_counts.iter().filter(|&&c| c > 0).map(|&c| c as f64 / n);
        let value = match self {
            SplitCriterion::Gini => 1.0 - proportions.map(|p| p * p).sum::<f64>(),
            SplitCriterion::Entropy => -proportions.map(|p| p * p.ln()).sum::<f64>(),
        };
        Impurity::new(value)
    }
}

/// Best split found for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    pub(crate) feature: FeatureIndex,
    pub(crate) threshold: f64,
    /// `n·I(parent) − n_l·I(left) − n_r·I(right)`.
    pub(crate) impurity_decrease: f64,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}

/// Parameters shared by every split search in one tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitSearch {
    pub(crate) criterion: SplitCriterion,
    pub(crate) max_features: usize,
    pub(crate) min_samples_leaf: usize,
}

impl SplitSearch {
    /// Find the best threshold split of `samples`.
    ///
    /// Features are visited in a random order. Features that are constant
    /// within the node are skipped without counting toward `max_features`;
    /// the search stops once `max_features` non-constant features have been
    /// scanned or every feature has been visited.
    ///
    /// Returns `None` when no boundary satisfies `min_samples_leaf`.
    pub(crate) fn find_best(
        &self,
        set: &TrainingSet,
        samples: &[usize],
        parent_counts: &[usize],
        rng: &mut impl Rng,
    ) -> Option<SplitResult> {
        let n_samples = samples.len();
        let n_features = set.n_features();
        if n_samples < 2 || n_features == 0 {
            return None;
        }
        let parent_impurity = self.criterion.impurity(parent_counts, n_samples);

        let mut order: Vec<usize> = (0..n_features).collect();
        let mut scanned = 0usize;
        let mut best: Option<(FeatureIndex, f64, f64)> = None;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(n_samples);

        for i in 0..n_features {
            if scanned == self.max_features {
                break;
            }
            // Lazy Fisher-Yates: draw the next feature only when needed.
            let j = rng.gen_range(i..n_features);
            order.swap(i, j);
            let feature = order[i];

            sorted.clear();
            sorted.extend(samples.iter().map(|&s| (set.value(feature, s), s)));
            sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
            if sorted[0].0 == sorted[n_samples - 1].0 {
                continue;
            }
            scanned += 1;

            let mut left_counts = vec![0usize; parent_counts.len()];
            let mut right_counts = parent_counts.to_vec();
            for k in 0..n_samples - 1 {
                let (value, sample) = sorted[k];
                let class = set.label(sample);
                left_counts[class] += 1;
                right_counts[class] -= 1;

                let next = sorted[k + 1].0;
                if value == next {
                    continue;
                }
                let n_left = k + 1;
                let n_right = n_samples - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let decrease = n_samples as f64 * parent_impurity.value()
                    - n_left as f64 * self.criterion.impurity(&left_counts, n_left).value()
                    - n_right as f64 * self.criterion.impurity(&right_counts, n_right).value();
                if best.is_none_or(|(_, _, d)| decrease > d) {
                    best = Some((FeatureIndex::new(feature), (value + next) / 2.0, decrease));
                }
            }
        }

        let (feature, threshold, impurity_decrease) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&s| set.value(feature.index(), s) <= threshold);

        Some(SplitResult {
            feature,
            threshold,
            impurity_decrease,
            left,
            right,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn search(max_features: usize, min_samples_leaf: usize) -> SplitSearch {
        SplitSearch {
            criterion: SplitCriterion::Gini,
            max_features,
            min_samples_leaf,
        }
    }

    fn column_set(values: &[f64], labels: &[usize]) -> TrainingSet {
        let rows: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
        TrainingSet::from_rows(&rows, labels).unwrap()
    }

    #[test]
    fn gini_values() {
        assert!(SplitCriterion::Gini.impurity(&[10, 0], 10).is_pure());
        assert!((SplitCriterion::Gini.impurity(&[5, 5], 10).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn entropy_values() {
        assert!(SplitCriterion::Entropy.impurity(&[0, 7], 7).is_pure());
        let balanced = SplitCriterion::Entropy.impurity(&[5, 5], 10).value();
        assert!((balanced - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn separable_column_splits_between_groups() {
        let set = column_set(&[1.0, 2.0, 3.0, 10.0, 11.0, 12.0], &[0, 0, 0, 1, 1, 1]);
        let samples: Vec<usize> = (0..6).collect();
        let counts = set.class_counts(&samples);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let split = search(1, 1).find_best(&set, &samples, &counts, &mut rng).unwrap();
        assert_eq!(split.feature.index(), 0);
        assert!((split.threshold - 6.5).abs() < 1e-12);
        assert_eq!(split.left, vec![0, 1, 2]);
        assert_eq!(split.right, vec![3, 4, 5]);
        assert!((split.impurity_decrease - 3.0).abs() < 1e-12);
    }

    #[test]
    fn constant_features_do_not_use_up_the_budget() {
        // Feature 0 is constant, feature 1 separates. With max_features = 1
        // the search must still reach feature 1 whatever order it draws.
        let rows = vec![vec![5.0, 0.0], vec![5.0, 1.0], vec![5.0, 8.0], vec![5.0, 9.0]];
        let set = TrainingSet::from_rows(&rows, &[0, 0, 1, 1]).unwrap();
        let samples: Vec<usize> = (0..4).collect();
        let counts = set.class_counts(&samples);
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let split = search(1, 1).find_best(&set, &samples, &counts, &mut rng).unwrap();
            assert_eq!(split.feature.index(), 1);
        }
    }

    #[test]
    fn constant_node_has_no_split() {
        let set = column_set(&[5.0, 5.0, 5.0, 5.0], &[0, 0, 1, 1]);
        let samples: Vec<usize> = (0..4).collect();
        let counts = set.class_counts(&samples);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(search(1, 1).find_best(&set, &samples, &counts, &mut rng).is_none());
    }

    #[test]
    fn min_samples_leaf_enforced() {
        let set = column_set(&[1.0, 10.0], &[0, 1]);
        let samples = vec![0, 1];
        let counts = set.class_counts(&samples);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(search(1, 2).find_best(&set, &samples, &counts, &mut rng).is_none());
    }

    #[test]
    fn bootstrap_repeats_are_weighted() {
        // Sample 0 drawn three times: the left child carries three copies.
        let set = column_set(&[1.0, 2.0, 9.0], &[0, 0, 1]);
        let samples = vec![0, 0, 0, 2];
        let counts = set.class_counts(&samples);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let split = search(1, 1).find_best(&set, &samples, &counts, &mut rng).unwrap();
        assert_eq!(split.left, vec![0, 0, 0]);
        assert_eq!(split.right, vec![2]);
    }
}

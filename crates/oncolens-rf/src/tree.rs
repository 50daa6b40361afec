use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    RfError,
    node::{Node, NodeIndex},
    split::{SplitCriterion, SplitSearch},
    training::TrainingSet,
};

/// Configuration for a single CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `criterion`         | `Gini`                |
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `min_samples_leaf`  | 1                     |
/// | `max_features`      | `None` (all features) |
/// | `seed`              | 42                    |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) criterion: SplitCriterion,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: Option<usize>,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a config with the defaults listed above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: SplitCriterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the maximum depth (root is depth 0). `None` grows until leaves are pure.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each child.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set how many non-constant features each split examines. `None` means all.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the random seed for feature sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Train a decision tree on row-major `features` and zero-based `labels`.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                             |
    /// |---------------------------------------|--------------------------------------------------|
    /// | [`RfError::EmptyDataset`]             | `features` is empty                              |
    /// | [`RfError::ZeroFeatures`]             | rows have zero feature columns                   |
    /// | [`RfError::LabelCountMismatch`]       | `labels.len() != features.len()`                 |
    /// | [`RfError::FeatureCountMismatch`]     | rows have inconsistent lengths                   |
    /// | [`RfError::NonFiniteValue`]           | any value is NaN or infinite                     |
    /// | [`RfError::InvalidMaxFeatures`]       | `max_features` outside [1, n_features]           |
    /// | [`RfError::InvalidMaxDepth`]          | `max_depth` is `Some(0)`                         |
    /// | [`RfError::InvalidMinSamplesSplit`]   | `min_samples_split` < 2                          |
    /// | [`RfError::InvalidMinSamplesLeaf`]    | `min_samples_leaf` < 1                           |
    #[instrument(skip_all, fields(n_samples = features.len()))]
    pub fn fit(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, RfError> {
        let set = TrainingSet::from_rows(features, labels)?;
        self.validate(set.n_features())?;
        let samples: Vec<usize> = (0..set.n_samples()).collect();
        Ok(self.grow(&set, &samples))
    }

    /// Check the config against a feature count.
    pub(crate) fn validate(&self, n_features: usize) -> Result<(), RfError> {
        if self.max_depth == Some(0) {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(RfError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(RfError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }
        let max_features = self.max_features.unwrap_or(n_features);
        if max_features == 0 || max_features > n_features {
            return Err(RfError::InvalidMaxFeatures {
                max_features,
                n_features,
            });
        }
        Ok(())
    }

    /// Grow a tree over `samples` (indices into `set`, repeats allowed).
    ///
    /// The config must already have passed [`Self::validate`].
    pub(crate) fn grow(&self, set: &TrainingSet, samples: &[usize]) -> DecisionTree {
        let mut grower = TreeGrower {
            set,
            config: self,
            search: SplitSearch {
                criterion: self.criterion,
                max_features: self.max_features.unwrap_or(set.n_features()),
                min_samples_leaf: self.min_samples_leaf,
            },
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            arena: Vec::new(),
        };
        grower.grow(samples, 0);

        debug!(
            n_nodes = grower.arena.len(),
            n_samples = samples.len(),
            "decision tree grown"
        );

        DecisionTree {
            nodes: grower.arena,
            n_features: set.n_features(),
            n_classes: set.n_classes(),
        }
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first builder writing nodes into an arena (pre-order, root at 0).
struct TreeGrower<'a> {
    set: &'a TrainingSet,
    config: &'a DecisionTreeConfig,
    search: SplitSearch,
    rng: ChaCha8Rng,
    arena: Vec<Node>,
}

impl TreeGrower<'_> {
    fn grow(&mut self, samples: &[usize], depth: usize) -> NodeIndex {
        let n_samples = samples.len();
        let counts = self.set.class_counts(samples);
        let impurity = self.config.criterion.impurity(&counts, n_samples);

        let at_max_depth = self.config.max_depth.is_some_and(|d| depth >= d);
        let stop = at_max_depth || n_samples < self.config.min_samples_split || impurity.is_pure();
        let split = if stop {
            None
        } else {
            self.search.find_best(self.set, samples, &counts, &mut self.rng)
        };

        let index = NodeIndex::new(self.arena.len());
        let total = n_samples as f64;
        self.arena.push(Node::Leaf {
            distribution: counts.iter().map(|&c| c as f64 / total).collect(),
            impurity,
            n_samples,
        });

        // The leaf pushed above is overwritten once both children exist.
        if let Some(split) = split {
            let left = self.grow(&split.left, depth + 1);
            let right = self.grow(&split.right, depth + 1);
            self.arena[index.index()] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
                impurity,
                n_samples,
                impurity_decrease: split.impurity_decrease,
            };
        }
        index
    }
}

/// A fitted CART decision tree stored as a node arena.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
}

impl DecisionTree {
    /// Predict the class of a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        self.check_width(sample)?;
        Ok(crate::node::argmax(self.leaf_distribution(sample)))
    }

    /// Class distribution of the leaf reached by `sample`; sums to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>, RfError> {
        self.check_width(sample)?;
        Ok(self.leaf_distribution(sample).to_vec())
    }

    /// Mean Decrease in Impurity per feature, normalized to sum to 1.0.
    ///
    /// All zeros when the tree is a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                impurity_decrease,
                ..
            } = node
            {
                totals[feature.index()] += impurity_decrease;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    /// Total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf; a lone root leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            match &self.nodes[index] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left.index(), depth + 1));
                    stack.push((right.index(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Borrow the node arena (root at index 0).
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn check_width(&self, sample: &[f64]) -> Result<(), RfError> {
        if sample.len() == self.n_features {
            Ok(())
        } else {
            Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            })
        }
    }

    /// Walk from the root to a leaf. `sample` must have `n_features` entries.
    pub(crate) fn leaf_distribution(&self, sample: &[f64]) -> &[f64] {
        let mut index = 0usize;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution, .. } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if sample[feature.index()] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }
}

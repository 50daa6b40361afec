//! What a training run hands back besides the forest.

use crate::forest::RandomForest;
use crate::importance::RankedFeature;
use crate::split::SplitCriterion;

/// Settings and sizes a forest was actually fitted with.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingMetadata {
    pub n_trees: usize,
    pub n_features: usize,
    pub n_classes: usize,
    /// Training rows before bootstrapping.
    pub n_samples: usize,
    /// Rows drawn with replacement for each tree.
    pub bootstrap_draws: usize,
    /// Features examined per split after resolving [`crate::MaxFeatures`].
    pub max_features_resolved: usize,
    pub criterion: SplitCriterion,
    pub seed: u64,
}

/// A fitted forest, its ranked importances and the run metadata.
#[derive(Debug)]
pub struct RandomForestResult {
    forest: RandomForest,
    importances: Vec<RankedFeature>,
    metadata: TrainingMetadata,
}

impl RandomForestResult {
    pub(crate) fn new(
        forest: RandomForest,
        importances: Vec<RankedFeature>,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            forest,
            importances,
            metadata,
        }
    }

    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    #[must_use]
    pub fn into_forest(self) -> RandomForest {
        self.forest
    }

    /// MDI importances, rank 1 first.
    #[must_use]
    pub fn importances(&self) -> &[RankedFeature] {
        &self.importances
    }

    /// Top `n` features by importance (fewer if the forest has fewer columns).
    #[must_use]
    pub fn top_features(&self, n: usize) -> &[RankedFeature] {
        &self.importances[..n.min(self.importances.len())]
    }

    #[must_use]
    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }
}

//! Random forest classification: fit, predict, rank features.
//!
//! A bagged ensemble of CART decision trees with Gini/Entropy split
//! criteria, per-split feature subsampling, and parallel tree fitting via
//! rayon. Every tree draws its seed from a single master RNG before the
//! parallel region, so a fitted forest depends only on the config seed.

mod config;
mod error;
mod forest;
mod importance;
mod node;
mod predict;
mod result;
mod split;
mod training;
mod tree;

pub use config::{MaxFeatures, RandomForestConfig};
pub use error::RfError;
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use predict::ClassDistribution;
pub use result::{RandomForestResult, TrainingMetadata};
pub use split::SplitCriterion;
pub use tree::{DecisionTree, DecisionTreeConfig};

use std::fmt;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Return the zero-based position.
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_index!(
    /// Zero-based feature column index.
    FeatureIndex
);

arena_index!(
    /// Position of a node inside a tree's node arena.
    NodeIndex
);

/// Impurity of a node under the tree's split criterion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Impurity(f64);

impl Impurity {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// `true` when the node holds a single class.
    #[must_use]
    pub fn is_pure(self) -> bool {
        self.0 <= 0.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node in a decision tree arena.
///
/// Children are referenced by [`NodeIndex`]; the root is always index 0.
#[derive(Debug, Clone)]
pub enum Node {
    /// An interior split node. Samples with `value <= threshold` go left.
    Split {
        /// Feature tested at this node.
        feature: FeatureIndex,
        /// Split threshold (midpoint between adjacent distinct values).
        threshold: f64,
        /// Left child.
        left: NodeIndex,
        /// Right child.
        right: NodeIndex,
        /// Impurity before splitting.
        impurity: Impurity,
        /// Training samples (with bootstrap repeats) that reached this node.
        n_samples: usize,
        /// Sample-weighted impurity decrease, used for MDI importances.
        impurity_decrease: f64,
    },
    /// A terminal node carrying the class distribution of its samples.
    Leaf {
        /// Class probabilities, one entry per class of the forest.
        distribution: Vec<f64>,
        /// Leaf impurity.
        impurity: Impurity,
        /// Training samples in this leaf.
        n_samples: usize,
    },
}

impl Node {
    /// Impurity at this node.
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        match self {
            Node::Split { impurity, .. } | Node::Leaf { impurity, .. } => *impurity,
        }
    }

    /// Number of training samples that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// `true` for leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Majority class of a leaf. Ties go to the lower class index.
    #[must_use]
    pub fn prediction(&self) -> Option<usize> {
        match self {
            Node::Leaf { distribution, .. } => Some(argmax(distribution)),
            Node::Split { .. } => None,
        }
    }
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_newtypes_display_and_order() {
        assert_eq!(FeatureIndex::new(3).to_string(), "3");
        assert_eq!(NodeIndex::new(42).index(), 42);
        assert!(NodeIndex::new(1) < NodeIndex::new(2));
    }

    #[test]
    fn impurity_purity_and_display() {
        assert!(Impurity::new(0.0).is_pure());
        assert!(!Impurity::new(0.25).is_pure());
        assert_eq!(Impurity::new(0.333333).to_string(), "0.333333");
    }

    #[test]
    fn leaf_prediction_breaks_ties_low() {
        let leaf = Node::Leaf {
            distribution: vec![0.5, 0.5],
            impurity: Impurity::new(0.5),
            n_samples: 4,
        };
        assert_eq!(leaf.prediction(), Some(0));
        assert!(leaf.is_leaf());
    }

    #[test]
    fn split_has_no_prediction() {
        let split = Node::Split {
            feature: FeatureIndex::new(2),
            threshold: 3.5,
            left: NodeIndex::new(1),
            right: NodeIndex::new(2),
            impurity: Impurity::new(0.48),
            n_samples: 20,
            impurity_decrease: 4.0,
        };
        assert_eq!(split.prediction(), None);
        assert_eq!(split.n_samples(), 20);
        assert!((split.impurity().value() - 0.48).abs() < f64::EPSILON);
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.0]), 0);
    }
}

//! Error types for oncolens-metrics.

/// Errors from building a confusion matrix or a ROC curve.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Returned when no samples are given.
    #[error("no samples to evaluate")]
    EmptyInput,

    /// Returned when two paired inputs differ in length.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first input.
        left: usize,
        /// Length of the second input.
        right: usize,
    },

    /// Returned when a sample's label is not part of the matrix label order.
    #[error("sample {index} has a label outside the declared label order")]
    UnknownLabel {
        /// Zero-based sample position.
        index: usize,
    },

    /// Returned when metrics are requested for a label the matrix does not hold.
    #[error("positive label is not in the declared label order")]
    MissingLabel,

    /// Returned when a binary ground-truth value is neither 0 nor 1.
    #[error("sample {index} has label {value}, expected 0 or 1")]
    NonBinaryLabel {
        /// Zero-based sample position.
        index: usize,
        /// The offending value.
        value: usize,
    },

    /// Returned when a score is NaN or infinite.
    #[error("score at sample {index} is not finite")]
    NonFiniteScore {
        /// Zero-based sample position.
        index: usize,
    },

    /// Returned when ground truth holds only one class, leaving the ROC undefined.
    #[error("only one class present in ground truth; ROC is undefined")]
    SingleClass,

    /// Returned when fewer than two points are given to [`crate::auc`].
    #[error("need at least 2 points to compute an area, got {n_points}")]
    TooFewPoints {
        /// Points supplied.
        n_points: usize,
    },

    /// Returned when x coordinates are neither non-decreasing nor non-increasing.
    #[error("x coordinates are not monotonic")]
    NonMonotonic,
}

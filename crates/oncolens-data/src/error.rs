//! Error types for oncolens-data.

/// Errors from loading, encoding, or splitting the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Returned when the table has no rows.
    #[error("dataset has no rows")]
    EmptyDataset,

    /// Returned when the flat value buffer does not match rows × columns.
    #[error("expected {expected} values ({n_samples} rows x {n_features} columns), got {got}")]
    ShapeMismatch {
        /// Declared row count.
        n_samples: usize,
        /// Declared column count.
        n_features: usize,
        /// `n_samples * n_features`.
        expected: usize,
        /// Length of the value buffer.
        got: usize,
    },

    /// Returned when the number of targets differs from the number of rows.
    #[error("got {n_targets} targets for {n_samples} rows")]
    TargetCountMismatch {
        /// Row count.
        n_samples: usize,
        /// Target count.
        n_targets: usize,
    },

    /// Returned when the number of feature names differs from the column count.
    #[error("got {n_names} feature names for {n_features} columns")]
    FeatureNameMismatch {
        /// Column count.
        n_features: usize,
        /// Name count.
        n_names: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },

    /// Returned when a raw target is neither 0 nor 1.
    #[error("row {row} has target {raw}, expected 0 (malignant) or 1 (benign)")]
    UnknownTarget {
        /// Zero-based row.
        row: usize,
        /// The raw target value.
        raw: u32,
    },

    /// Returned when a category was not seen when the encoder was fitted.
    #[error("category {label} was not seen when fitting the encoder")]
    UnknownCategory {
        /// Display name of the category.
        label: String,
    },

    /// Returned when decoding an index the encoder does not know.
    #[error("class index {index} out of range for {n_classes} classes")]
    ClassIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of fitted classes.
        n_classes: usize,
    },

    /// Returned when the test fraction is not in (0.0, 1.0).
    #[error("test fraction must be in (0.0, 1.0), got {fraction}")]
    InvalidTestFraction {
        /// The invalid fraction.
        fraction: f64,
    },

    /// Returned when a partition would be smaller than the number of classes.
    #[error("{n_samples} rows split {n_train}/{n_test} cannot hold {n_classes} classes in each partition")]
    PartitionTooSmall {
        /// Total rows.
        n_samples: usize,
        /// Train rows.
        n_train: usize,
        /// Test rows.
        n_test: usize,
        /// Distinct classes.
        n_classes: usize,
    },

    /// Returned when a class has a single member and cannot be stratified.
    #[error("class {class} has only {count} member(s); stratification needs at least 2")]
    ClassTooSmall {
        /// Position of the class in sorted label order.
        class: usize,
        /// Members of that class.
        count: usize,
    },
}

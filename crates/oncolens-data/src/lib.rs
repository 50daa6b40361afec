//! Dataset access for the oncolens analysis.
//!
//! Loads the Wisconsin diagnostic breast cancer table, maps its raw targets
//! to [`Diagnosis`] categories, encodes categories for the classifier, and
//! splits rows into stratified train/test partitions.

mod dataset;
mod diagnosis;
mod error;
mod split;

pub use dataset::Dataset;
pub use diagnosis::{Diagnosis, LabelEncoder};
pub use error::DataError;
pub use split::{Partition, SplitConfig, take_rows};

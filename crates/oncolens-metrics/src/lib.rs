//! Evaluation metrics for the oncolens classifier.
//!
//! - [`ConfusionMatrix`]: counts over an explicit label order, with accuracy
//!   and per-label precision, recall and F1.
//! - [`roc_curve`], [`auc`], [`roc_auc_score`]: threshold sweep over scores
//!   and the area under the resulting curve.

mod confusion;
mod error;
mod roc;

pub use confusion::{BinaryMetrics, ClassMetrics, ConfusionMatrix};
pub use error::MetricsError;
pub use roc::{RocCurve, auc, roc_auc_score, roc_curve};

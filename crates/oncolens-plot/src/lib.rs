//! SVG rendering for the oncolens report figures.

mod error;
mod heatmap;
mod roc;

pub use error::PlotError;
pub use heatmap::render_confusion_heatmap;
pub use roc::render_roc_curve;

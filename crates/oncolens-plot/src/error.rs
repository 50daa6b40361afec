//! Error types for oncolens-plot.

use std::path::PathBuf;

/// Errors from rendering a figure.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when the drawing backend fails.
    #[error("failed to render {path}")]
    Render {
        /// Figure being written.
        path: PathBuf,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Returned when the heatmap is given a matrix that is not 2×2 or labels that do not match it.
    #[error("expected a 2x2 matrix with 2 labels, got {n_rows} rows and {n_labels} labels")]
    UnsupportedShape {
        /// Matrix rows.
        n_rows: usize,
        /// Labels supplied.
        n_labels: usize,
    },

    /// Returned when a ROC curve has no points or mismatched coordinates.
    #[error("ROC curve has {n_fpr} x and {n_tpr} y coordinates")]
    InvalidCurve {
        /// FPR values.
        n_fpr: usize,
        /// TPR values.
        n_tpr: usize,
    },
}

pub(crate) type RenderResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Make sure the directory holding `path` exists.
pub(crate) fn ensure_parent(path: &std::path::Path) -> Result<(), PlotError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| PlotError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

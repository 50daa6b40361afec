//! ROC curve figure.

use std::path::Path;

use oncolens_metrics::RocCurve;
use plotters::prelude::*;
use tracing::{info, instrument};

use crate::error::{PlotError, RenderResult, ensure_parent};

const SIZE: (u32, u32) = (800, 600);
const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
const NAVY: RGBColor = RGBColor(0, 0, 128);
const DASH: f64 = 0.02;

/// Render `curve` with its area in the legend, plus the chance diagonal.
///
/// The curve is a solid dark-orange line labelled `ROC curve (area = 0.xx)`;
/// the diagonal from (0, 0) to (1, 1) is dashed navy. The x-axis spans
/// [0, 1] and the y-axis [0, 1.05].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PlotError::InvalidCurve`] | No points, or FPR and TPR lengths differ |
/// | [`PlotError::CreateDir`] | Parent directory cannot be created |
/// | [`PlotError::Render`] | The SVG backend fails |
#[instrument(skip_all, fields(path = %path.display(), auc = auc))]
pub fn render_roc_curve(curve: &RocCurve, auc: f64, path: &Path) -> Result<(), PlotError> {
    if curve.is_empty() || curve.fpr.len() != curve.tpr.len() {
        return Err(PlotError::InvalidCurve {
            n_fpr: curve.fpr.len(),
            n_tpr: curve.tpr.len(),
        });
    }
    ensure_parent(path)?;

    draw_roc(curve, auc, path).map_err(|source| PlotError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    info!(n_points = curve.len(), "roc curve written");
    Ok(())
}

/// Short segments along the diagonal, alternating drawn and skipped.
fn dashes() -> impl Iterator<Item = [(f64, f64); 2]> {
    let n = (1.0 / (2.0 * DASH)).round() as usize;
    (0..n).map(|i| {
        let start = i as f64 * 2.0 * DASH;
        let end = (start + DASH).min(1.0);
        [(start, start), (end, end)]
    })
}

fn draw_roc(curve: &RocCurve, auc: f64, path: &Path) -> RenderResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("ROC Curve for Malignant Tumor Detection", ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, 0f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc("False Positive Rate (1 - Specificity)")
        .y_desc("True Positive Rate (Sensitivity/Recall)")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let line = DARK_ORANGE.stroke_width(2);
    chart
        .draw_series(LineSeries::new(curve.points(), line))?
        .label(format!("ROC curve (area = {auc:.2})"))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

    let chance = NAVY.stroke_width(2);
    chart.draw_series(dashes().map(|segment| PathElement::new(segment, chance)))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> RocCurve {
        RocCurve {
            fpr: vec![0.0, 0.0, 0.5, 0.5, 1.0],
            tpr: vec![0.0, 0.5, 0.5, 1.0, 1.0],
            thresholds: vec![f64::INFINITY, 0.8, 0.4, 0.35, 0.1],
        }
    }

    #[test]
    fn dashes_stay_on_diagonal() {
        let segments: Vec<_> = dashes().collect();
        assert_eq!(segments.len(), 25);
        assert_eq!(segments[0][0], (0.0, 0.0));
        for [(x0, y0), (x1, y1)] in segments {
            assert_eq!(x0, y0);
            assert_eq!(x1, y1);
            assert!(x1 <= 1.0 && x1 > x0);
        }
    }

    #[test]
    fn writes_svg_with_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roc.svg");
        render_roc_curve(&curve(), 0.75, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        for text in [
            "ROC Curve for Malignant Tumor Detection",
            "ROC curve (area = 0.75)",
            "False Positive Rate",
        ] {
            assert!(svg.contains(text), "missing {text}");
        }
    }

    #[test]
    fn rejects_empty_curve() {
        let empty = RocCurve {
            fpr: vec![],
            tpr: vec![],
            thresholds: vec![],
        };
        let dir = tempfile::tempdir().unwrap();
        let err = render_roc_curve(&empty, 0.5, &dir.path().join("roc.svg")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidCurve { n_fpr: 0, n_tpr: 0 }));
    }
}

//! Annotated confusion-matrix heatmap.

use std::path::Path;

use oncolens_metrics::ConfusionMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, instrument};

use crate::error::{PlotError, RenderResult, ensure_parent};

const SIZE: (u32, u32) = (800, 600);
const LIGHTEST: RGBColor = RGBColor(247, 251, 255);
const DARKEST: RGBColor = RGBColor(8, 48, 107);

/// Sequential blue scale: 0.0 is near-white, 1.0 is dark navy.
fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(
        lerp(LIGHTEST.0, DARKEST.0),
        lerp(LIGHTEST.1, DARKEST.1),
        lerp(LIGHTEST.2, DARKEST.2),
    )
}

fn upper_edge(index: u32) -> SegmentValue<u32> {
    if index == 0 {
        SegmentValue::Exact(1)
    } else {
        SegmentValue::Last
    }
}

/// Render a 2×2 confusion matrix as an annotated heatmap SVG at `path`.
///
/// `labels` names the rows and columns in matrix order. The first row is
/// drawn at the top, predicted labels run along the x-axis and true labels
/// along the y-axis. Each cell shows its count; darker cells hold more samples.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PlotError::UnsupportedShape`] | Matrix is not 2×2 or `labels.len() != 2` |
/// | [`PlotError::CreateDir`] | Parent directory cannot be created |
/// | [`PlotError::Render`] | The SVG backend fails |
#[instrument(skip_all, fields(path = %path.display()))]
pub fn render_confusion_heatmap<L: Copy + PartialEq>(
    cm: &ConfusionMatrix<L>,
    labels: &[&str],
    path: &Path,
) -> Result<(), PlotError> {
    let rows = cm.as_rows();
    if rows.len() != 2 || labels.len() != 2 || rows.iter().any(|r| r.len() != 2) {
        return Err(PlotError::UnsupportedShape {
            n_rows: rows.len(),
            n_labels: labels.len(),
        });
    }
    ensure_parent(path)?;

    draw_heatmap(rows, labels, path).map_err(|source| PlotError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    info!("confusion matrix heatmap written");
    Ok(())
}

fn draw_heatmap(rows: &[Vec<usize>], labels: &[&str], path: &Path) -> RenderResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Confusion Matrix", ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(100)
        .build_cartesian_2d((0u32..1u32).into_segmented(), (0u32..1u32).into_segmented())?;

    // Segment y = 1 is the top row, so matrix row r sits at y = 1 - r.
    let tick = |value: &SegmentValue<u32>, flip: bool| match value {
        SegmentValue::CenterOf(v) | SegmentValue::Exact(v) if *v < 2 => {
            let index = if flip { 1 - *v } else { *v };
            labels[index as usize].to_string()
        }
        _ => String::new(),
    };
    let x_tick = |v: &SegmentValue<u32>| tick(v, false);
    let y_tick = |v: &SegmentValue<u32>| tick(v, true);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(2)
        .y_labels(2)
        .x_label_formatter(&x_tick)
        .y_label_formatter(&y_tick)
        .x_desc("Predicted")
        .y_desc("True")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 16))
        .draw()?;

    let max = rows.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let mut cells = Vec::with_capacity(4);
    for (r, row) in (0u32..).zip(rows) {
        for (c, &count) in (0u32..).zip(row) {
            cells.push((c, 1 - r, count));
        }
    }

    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (upper_edge(x), upper_edge(y)),
            ],
            blues(count as f64 / max).filled(),
        )
    }))?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        let shade = count as f64 / max;
        let ink = if shade > 0.5 { &WHITE } else { &BLACK };
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
            ("sans-serif", 28).into_font().color(ink).pos(centered),
        )
    }))?;

    root.present()?;
    Ok(())
}

//! Receiver operating characteristic curve and area under it.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::MetricsError;

/// Points of a ROC curve, ordered by decreasing threshold.
///
/// The first point is always `(0, 0)` with an infinite threshold and the
/// last is `(1, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    /// False positive rate at each threshold.
    pub fpr: Vec<f64>,
    /// True positive rate at each threshold.
    pub tpr: Vec<f64>,
    /// Score thresholds; a sample is called positive when its score is `>=` the threshold.
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    /// Whether the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }

    /// `(fpr, tpr)` pairs in curve order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.fpr.iter().copied().zip(self.tpr.iter().copied())
    }

    /// Area under this curve.
    ///
    /// # Errors
    ///
    /// Propagates [`auc`] errors; a curve from [`roc_curve`] never fails.
    pub fn area(&self) -> Result<f64, MetricsError> {
        auc(&self.fpr, &self.tpr)
    }
}

/// Sweep every distinct score as a threshold and record (FPR, TPR).
///
/// `y_true` holds 0 (negative) or 1 (positive); higher scores mean more
/// likely positive. Points that lie on a straight segment between their
/// neighbours are dropped since they do not change the curve.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricsError::EmptyInput`] | No samples |
/// | [`MetricsError::LengthMismatch`] | `y_true.len() != scores.len()` |
/// | [`MetricsError::NonBinaryLabel`] | A label is not 0 or 1 |
/// | [`MetricsError::NonFiniteScore`] | A score is NaN or infinite |
/// | [`MetricsError::SingleClass`] | All labels are equal |
#[instrument(skip_all, fields(n_samples = y_true.len()))]
pub fn roc_curve(y_true: &[usize], scores: &[f64]) -> Result<RocCurve, MetricsError> {
    if y_true.is_empty() {
        return Err(MetricsError::EmptyInput);
    }
    if y_true.len() != scores.len() {
        return Err(MetricsError::LengthMismatch {
            left: y_true.len(),
            right: scores.len(),
        });
    }
    if let Some((index, &value)) = y_true.iter().enumerate().find(|(_, v)| **v > 1) {
        return Err(MetricsError::NonBinaryLabel { index, value });
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(MetricsError::NonFiniteScore { index });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    // Cumulative true/false positives at the last sample of each run of equal scores.
    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let mut tp = 0usize;
    for (i, &sample) in order.iter().enumerate() {
        tp += y_true[sample];
        let last_of_run = order
            .get(i + 1)
            .is_none_or(|&next| scores[next] != scores[sample]);
        if last_of_run {
            tps.push(tp);
            fps.push(i + 1 - tp);
            thresholds.push(scores[sample]);
        }
    }

    let n_pos = tp;
    let n_neg = scores.len() - tp;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricsError::SingleClass);
    }

    let keep = collinear_mask(&fps, &tps);
    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    for (i, _) in keep.iter().enumerate().filter(|(_, k)| **k) {
        curve.fpr.push(fps[i] as f64 / n_neg as f64);
        curve.tpr.push(tps[i] as f64 / n_pos as f64);
        curve.thresholds.push(thresholds[i]);
    }

    debug!(n_points = curve.len(), n_pos, n_neg, "roc curve computed");
    Ok(curve)
}

/// Keep the endpoints and every point where either count bends.
fn collinear_mask(fps: &[usize], tps: &[usize]) -> Vec<bool> {
    let n = fps.len();
    if n <= 2 {
        return vec![true; n];
    }
    let bends = |v: &[usize], i: usize| v[i - 1] + v[i + 1] != 2 * v[i];
    (0..n)
        .map(|i| i == 0 || i == n - 1 || bends(fps, i) || bends(tps, i))
        .collect()
}

/// Area under a piecewise-linear curve by the trapezoidal rule.
///
/// `x` may be non-decreasing or non-increasing; the result is positive for
/// a curve above the axis either way.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricsError::LengthMismatch`] | `x.len() != y.len()` |
/// | [`MetricsError::TooFewPoints`] | Fewer than 2 points |
/// | [`MetricsError::NonMonotonic`] | `x` changes direction |
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64, MetricsError> {
    if x.len() != y.len() {
        return Err(MetricsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(MetricsError::TooFewPoints { n_points: x.len() });
    }

    let direction = if x.windows(2).all(|w| w[1] >= w[0]) {
        1.0
    } else if x.windows(2).all(|w| w[1] <= w[0]) {
        -1.0
    } else {
        return Err(MetricsError::NonMonotonic);
    };

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

/// Area under the ROC curve of `scores` against binary `y_true`.
///
/// # Errors
///
/// Same conditions as [`roc_curve`].
pub fn roc_auc_score(y_true: &[usize], scores: &[f64]) -> Result<f64, MetricsError> {
    roc_curve(y_true, scores)?.area()
}

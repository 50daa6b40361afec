//! Text and JSON rendering of an [`AnalysisReport`].

use std::fmt;

use anyhow::{Context, Result};

use crate::pipeline::AnalysisReport;

/// The human-readable report printed to stdout.
pub struct TextReport<'a>(pub &'a AnalysisReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let m = &report.metrics;
        writeln!(f, "--- Model Performance Metrics ---")?;
        writeln!(f, "Accuracy: {:.4}", m.accuracy)?;
        writeln!(f, "Precision (Malignant): {:.4}", m.precision)?;
        writeln!(f, "Recall (Sensitivity) (Malignant): {:.4}", m.recall)?;
        writeln!(f, "F1-Score (Malignant): {:.4}", m.f1)?;
        writeln!(f, "AUC-ROC: {:.4}", report.auc_roc)?;
        writeln!(f)?;
        writeln!(f, "--- Confusion Matrix ---")?;
        write!(f, "{}", report.confusion_matrix)?;
        if !report.figures.is_empty() {
            writeln!(f)?;
            for path in &report.figures {
                writeln!(f, "Figure written: {}", path.display())?;
            }
        }
        Ok(())
    }
}

/// Pretty-printed JSON summary.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

#[cfg(test)]
mod tests {
    use oncolens_data::Diagnosis;
    use oncolens_metrics::{BinaryMetrics, ConfusionMatrix, roc_curve};

    use super::*;

    fn report() -> AnalysisReport {
        let truth = vec![Diagnosis::Malignant, Diagnosis::Benign, Diagnosis::Benign];
        let predicted = vec![Diagnosis::Malignant, Diagnosis::Benign, Diagnosis::Malignant];
        let confusion_matrix =
            ConfusionMatrix::from_labels(&truth, &predicted, &Diagnosis::DISPLAY_ORDER).unwrap();
        AnalysisReport {
            seed: 42,
            n_samples: 10,
            n_features: 2,
            n_train: 7,
            n_test: 3,
            n_trees: 4,
            metrics: BinaryMetrics {
                accuracy: 2.0 / 3.0,
                precision: 0.5,
                recall: 1.0,
                f1: 2.0 / 3.0,
            },
            auc_roc: 0.75,
            confusion_matrix,
            roc: roc_curve(&[0, 1, 1], &[0.2, 0.9, 0.4]).unwrap(),
            top_features: vec![],
            figures: vec![],
            truth,
            predicted,
            malignant_probability: vec![0.8, 0.1, 0.6],
        }
    }

    #[test]
    fn text_has_metric_lines_with_four_decimals() {
        let text = TextReport(&report()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Model Performance Metrics ---");
        assert_eq!(lines[1], "Accuracy: 0.6667");
        assert_eq!(lines[2], "Precision (Malignant): 0.5000");
        assert_eq!(lines[3], "Recall (Sensitivity) (Malignant): 1.0000");
        assert_eq!(lines[4], "F1-Score (Malignant): 0.6667");
        assert_eq!(lines[5], "AUC-ROC: 0.7500");
        assert_eq!(lines[7], "--- Confusion Matrix ---");
        assert!(lines[8].contains("Malignant") && lines[8].contains("Benign"));
        assert!(!text.contains("Figure written"));
    }

    #[test]
    fn json_round_trips_key_fields() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["auc_roc"], 0.75);
        assert_eq!(value["n_test"], 3);
        assert_eq!(value["confusion_matrix"]["labels"][0], "Malignant");
        assert_eq!(value["confusion_matrix"]["matrix"][1][1], 1);
        assert_eq!(value["predicted"][2], "Malignant");
    }
}

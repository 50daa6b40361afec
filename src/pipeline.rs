//! The end-to-end analysis: load, split, fit, evaluate, plot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use oncolens_data::{Dataset, Diagnosis, LabelEncoder, SplitConfig, take_rows};
use oncolens_metrics::{BinaryMetrics, ConfusionMatrix, RocCurve, roc_curve};
use oncolens_plot::{render_confusion_heatmap, render_roc_curve};
use oncolens_rf::{RandomForestConfig, SplitCriterion};

/// File name of the confusion heatmap inside the output directory.
pub const CONFUSION_FIGURE: &str = "confusion_matrix.svg";
/// File name of the ROC figure inside the output directory.
pub const ROC_FIGURE: &str = "roc_curve.svg";

/// Knobs for one analysis run.
///
/// Defaults: seed 42, 30% held out,
/// 100 trees of unlimited depth split on Gini impurity.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub seed: u64,
    pub test_fraction: f64,
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub criterion: SplitCriterion,
    /// Where figures are written; `None` skips rendering.
    pub output_dir: Option<PathBuf>,
    pub top_features: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.3,
            n_trees: 100,
            max_depth: None,
            criterion: SplitCriterion::Gini,
            output_dir: Some(PathBuf::from(".")),
            top_features: 5,
        }
    }
}

/// A feature with its share of the forest's impurity decrease.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureScore {
    pub rank: usize,
    pub name: String,
    pub importance: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub seed: u64,
    pub n_samples: usize,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub n_trees: usize,
    pub metrics: BinaryMetrics,
    pub auc_roc: f64,
    pub confusion_matrix: ConfusionMatrix<Diagnosis>,
    pub roc: RocCurve,
    pub top_features: Vec<FeatureScore>,
    pub figures: Vec<PathBuf>,
    /// True diagnosis of each test row, in test order.
    pub truth: Vec<Diagnosis>,
    /// Predicted diagnosis of each test row.
    pub predicted: Vec<Diagnosis>,
    /// Forest probability of `Malignant` for each test row.
    pub malignant_probability: Vec<f64>,
}

/// Runs the analysis with fixed options.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    options: AnalysisOptions,
}

impl Analysis {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Run on the embedded breast cancer table.
    pub fn run(&self) -> Result<AnalysisReport> {
        let dataset = Dataset::breast_cancer().context("failed to load breast cancer table")?;
        info!(
            n_samples = dataset.n_samples(),
            n_features = dataset.n_features(),
            "dataset loaded"
        );
        self.run_on(&dataset)
    }

    /// Run on an already loaded table.
    #[instrument(skip_all, fields(seed = self.options.seed, n_trees = self.options.n_trees))]
    pub fn run_on(&self, dataset: &Dataset) -> Result<AnalysisReport> {
        let opts = &self.options;

        // Alphabetical encoding puts Benign at 0 and Malignant at 1.
        let encoder = LabelEncoder::fit(dataset.diagnoses())?;
        let classes = encoder.encode_all(dataset.diagnoses())?;

        let partition = SplitConfig::new(opts.test_fraction)?
            .with_seed(opts.seed)
            .split(&classes)
            .context("stratified split failed")?;
        info!(
            n_train = partition.train.len(),
            n_test = partition.test.len(),
            "train/test split"
        );

        let x_train = take_rows(dataset.features(), &partition.train);
        let y_train = take_rows(&classes, &partition.train);
        let x_test = take_rows(dataset.features(), &partition.test);
        let truth = take_rows(dataset.diagnoses(), &partition.test);

        let fitted = RandomForestConfig::new(opts.n_trees)?
            .with_seed(opts.seed)
            .with_max_depth(opts.max_depth)
            .with_criterion(opts.criterion)
            .fit(&x_train, &y_train, dataset.feature_names())
            .context("random forest training failed")?;
        let forest = fitted.forest();
        let meta = fitted.metadata();
        info!(
            n_trees = meta.n_trees,
            max_features = meta.max_features_resolved,
            bootstrap_draws = meta.bootstrap_draws,
            criterion = ?meta.criterion,
            "forest fitted"
        );

        let distributions = forest
            .predict_proba_batch(&x_test)
            .context("prediction failed")?;
        let predicted = distributions
            .iter()
            .map(|d| encoder.decode(d.predicted_class()))
            .collect::<Result<Vec<_>, _>>()?;
        let malignant_column = encoder.encode(Diagnosis::Malignant)?;
        let malignant_probability = distributions
            .iter()
            .map(|d| d.probability(malignant_column))
            .collect::<Result<Vec<_>, _>>()?;

        let confusion_matrix =
            ConfusionMatrix::from_labels(&truth, &predicted, &Diagnosis::DISPLAY_ORDER)?;
        let metrics = confusion_matrix.metrics_for(Diagnosis::POSITIVE)?;

        // The ROC scores Benign as the numeric positive class (Malignant = 0,
        // Benign = 1), so the score is the complement of P(Malignant).
        let roc_labels: Vec<usize> = truth.iter().map(|d| d.raw_target() as usize).collect();
        let roc_scores: Vec<f64> = malignant_probability.iter().map(|p| 1.0 - p).collect();
        let roc = roc_curve(&roc_labels, &roc_scores).context("ROC curve is undefined")?;
        let auc_roc = roc.area()?;
        info!(
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            auc_roc,
            "model evaluated"
        );

        let top_features: Vec<FeatureScore> = fitted
            .top_features(opts.top_features)
            .iter()
            .map(|f| FeatureScore {
                rank: f.rank,
                name: f.name.clone(),
                importance: f.importance,
            })
            .collect();
        for feature in &top_features {
            debug!(rank = feature.rank, name = %feature.name, importance = feature.importance, "feature importance");
        }

        let mut figures = Vec::new();
        if let Some(dir) = &opts.output_dir {
            let names = Diagnosis::DISPLAY_ORDER.map(Diagnosis::name);
            let cm_path = dir.join(CONFUSION_FIGURE);
            render_confusion_heatmap(&confusion_matrix, &names, &cm_path)
                .with_context(|| format!("failed to write {}", cm_path.display()))?;
            let roc_path = dir.join(ROC_FIGURE);
            render_roc_curve(&roc, auc_roc, &roc_path)
                .with_context(|| format!("failed to write {}", roc_path.display()))?;
            figures.push(cm_path);
            figures.push(roc_path);
        }

        Ok(AnalysisReport {
            seed: opts.seed,
            n_samples: dataset.n_samples(),
            n_features: dataset.n_features(),
            n_train: partition.train.len(),
            n_test: partition.test.len(),
            n_trees: meta.n_trees,
            metrics,
            auc_roc,
            confusion_matrix,
            roc,
            top_features,
            figures,
            truth,
            predicted,
            malignant_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use oncolens_metrics::roc_auc_score;

    use super::*;

    fn quick(seed: u64) -> AnalysisOptions {
        AnalysisOptions {
            seed,
            n_trees: 25,
            output_dir: None,
            ..AnalysisOptions::default()
        }
    }

    #[test]
    fn partition_sizes_and_confusion_total() {
        let report = Analysis::new(quick(42)).run().unwrap();
        assert_eq!(report.n_samples, 569);
        assert_eq!(report.n_train, 398);
        assert_eq!(report.n_test, 171);
        assert_eq!(report.confusion_matrix.total(), 171);
        assert_eq!(report.confusion_matrix.labels(), Diagnosis::DISPLAY_ORDER);
        assert_eq!(report.truth.len(), 171);
        assert_eq!(report.predicted.len(), 171);
    }

    #[test]
    fn metrics_are_bounded_and_useful() {
        let report = Analysis::new(quick(42)).run().unwrap();
        let m = report.metrics;
        for value in [m.accuracy, m.precision, m.recall, m.f1, report.auc_roc] {
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
        assert!(m.accuracy > 0.9, "accuracy = {}", m.accuracy);
        assert!(report.auc_roc > 0.95, "auc = {}", report.auc_roc);
        assert!(report.malignant_probability.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn same_seed_same_report() {
        let a = Analysis::new(quick(7)).run().unwrap();
        let b = Analysis::new(quick(7)).run().unwrap();
        assert_eq!(a.malignant_probability, b.malignant_probability);
        assert_eq!(a.predicted, b.predicted);
        assert_eq!(a.confusion_matrix, b.confusion_matrix);
        assert_eq!(a.auc_roc, b.auc_roc);
    }

    #[test]
    fn default_run_is_reproducible_across_thread_counts() {
        let options = AnalysisOptions {
            output_dir: None,
            ..AnalysisOptions::default()
        };
        let first = Analysis::new(options.clone()).run().unwrap();
        let second = Analysis::new(options.clone()).run().unwrap();
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| Analysis::new(options).run())
            .unwrap();

        assert_eq!(first.n_trees, 100);
        assert_eq!(first.n_test, 171);
        for other in [&second, &single] {
            assert_eq!(first.malignant_probability, other.malignant_probability);
            assert_eq!(first.confusion_matrix, other.confusion_matrix);
            assert_eq!(first.auc_roc, other.auc_roc);
            assert_eq!(first.metrics.accuracy, other.metrics.accuracy);
            assert_eq!(first.metrics.f1, other.metrics.f1);
        }
    }

    #[test]
    fn roc_passes_through_corners_and_matches_reported_auc() {
        let report = Analysis::new(quick(42)).run().unwrap();
        assert_eq!(report.roc.points().next(), Some((0.0, 0.0)));
        assert_eq!(report.roc.points().last(), Some((1.0, 1.0)));

        let labels: Vec<usize> = report.truth.iter().map(|d| d.raw_target() as usize).collect();
        let scores: Vec<f64> = report.malignant_probability.iter().map(|p| 1.0 - p).collect();
        assert_eq!(roc_auc_score(&labels, &scores).unwrap(), report.auc_roc);
    }

    #[test]
    fn positive_metrics_follow_confusion_cells() {
        let report = Analysis::new(quick(42)).run().unwrap();
        let rows = report.confusion_matrix.as_rows();
        let (tp, fn_, fp) = (rows[0][0] as f64, rows[0][1] as f64, rows[1][0] as f64);
        assert!((report.metrics.recall - tp / (tp + fn_)).abs() < 1e-12);
        assert!((report.metrics.precision - tp / (tp + fp)).abs() < 1e-12);
    }

    #[test]
    fn top_features_are_ranked() {
        let report = Analysis::new(quick(42)).run().unwrap();
        assert_eq!(report.top_features.len(), 5);
        assert!(report.top_features.windows(2).all(|w| w[0].importance >= w[1].importance));
        assert_eq!(report.top_features[0].rank, 1);
    }

    #[test]
    fn figures_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalysisOptions {
            n_trees: 5,
            output_dir: Some(dir.path().to_path_buf()),
            ..AnalysisOptions::default()
        };
        let report = Analysis::new(options).run().unwrap();
        assert_eq!(report.figures.len(), 2);
        assert!(dir.path().join(CONFUSION_FIGURE).is_file());
        assert!(dir.path().join(ROC_FIGURE).is_file());
    }

    #[test]
    fn invalid_test_fraction_is_reported() {
        let options = AnalysisOptions {
            test_fraction: 1.5,
            ..quick(42)
        };
        assert!(Analysis::new(options).run().is_err());
    }
}

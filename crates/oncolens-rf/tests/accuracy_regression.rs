//! Accuracy regression tests for oncolens-rf.
//!
//! A deterministic two-class dataset shaped like a diagnostic panel: a few
//! informative measurements whose class means differ, the rest noise.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use oncolens_rf::RandomForestConfig;

/// 400 samples, 12 features, 2 classes (~37% class 1).
///
/// Features 0-3 shift by +1.5 for class 1, features 4-11 are noise in [0, 1].
fn make_panel() -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut features = Vec::with_capacity(400);
    let mut labels = Vec::with_capacity(400);
    for i in 0..400 {
        let class = usize::from(i % 8 < 3);
        labels.push(class);
        let row: Vec<f64> = (0..12)
            .map(|f| {
                let shift = if f < 4 { class as f64 * 1.5 } else { 0.0 };
                shift + rng.r#gen::<f64>()
            })
            .collect();
        features.push(row);
    }
    let names = (0..12).map(|f| format!("m{f}")).collect();
    (features, labels, names)
}

fn holdout_accuracy(train_every: usize) -> f64 {
    let (features, labels, names) = make_panel();
    let (mut train_x, mut train_y, mut test_x, mut test_y) = (vec![], vec![], vec![], vec![]);
    for (i, (row, &label)) in features.into_iter().zip(&labels).enumerate() {
        if i % train_every == 0 {
            test_x.push(row);
            test_y.push(label);
        } else {
            train_x.push(row);
            train_y.push(label);
        }
    }
    let result = RandomForestConfig::new(100)
        .unwrap()
        .fit(&train_x, &train_y, &names)
        .unwrap();
    let predictions = result.forest().predict_batch(&test_x).unwrap();
    let correct = predictions.iter().zip(&test_y).filter(|(p, t)| p == t).count();
    correct as f64 / test_y.len() as f64
}

/// Held-out accuracy on the shifted panel must exceed 0.9.
#[test]
fn holdout_accuracy_above_threshold() {
    let accuracy = holdout_accuracy(3);
    assert!(accuracy > 0.9, "holdout accuracy {accuracy} <= 0.9");
}

/// The four shifted measurements must occupy the top four importance ranks.
#[test]
fn informative_features_rank_first() {
    let (features, labels, names) = make_panel();
    let result = RandomForestConfig::new(100)
        .unwrap()
        .fit(&features, &labels, &names)
        .unwrap();
    let mut top: Vec<&str> = result
        .importances()
        .iter()
        .take(4)
        .map(|f| f.name.as_str())
        .collect();
    top.sort_unstable();
    assert_eq!(top, ["m0", "m1", "m2", "m3"]);
}

/// Same config and seed must give bit-identical probabilities.
#[test]
fn deterministic_probabilities() {
    let (features, labels, names) = make_panel();
    let config = RandomForestConfig::new(100).unwrap().with_seed(42);
    let a = config.fit(&features, &labels, &names).unwrap();
    let b = config.fit(&features, &labels, &names).unwrap();
    assert_eq!(
        a.forest().predict_proba_batch(&features).unwrap(),
        b.forest().predict_proba_batch(&features).unwrap()
    );
}

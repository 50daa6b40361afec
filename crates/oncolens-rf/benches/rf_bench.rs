//! Criterion benchmarks for oncolens-rf: forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use oncolens_rf::RandomForestConfig;

/// Same shape as the diagnostic table: 569 rows, 30 features, 2 classes.
fn make_table(seed: u64) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(569);
    let mut labels = Vec::with_capacity(569);
    for i in 0..569 {
        let class = usize::from(i % 8 < 3);
        labels.push(class);
        let row: Vec<f64> = (0..30)
            .map(|f| {
                let shift = if f % 3 == 0 { class as f64 } else { 0.0 };
                shift + rng.r#gen::<f64>()
            })
            .collect();
        features.push(row);
    }
    let names = (0..30).map(|f| format!("f{f}")).collect();
    (features, labels, names)
}

fn bench_rf_train(c: &mut Criterion) {
    let (features, labels, names) = make_table(42);
    let cfg = RandomForestConfig::new(100).unwrap().with_seed(42);

    c.bench_function("rf_train_569x30_100trees", |b| {
        b.iter(|| cfg.fit(&features, &labels, &names).unwrap());
    });
}

fn bench_rf_predict_proba(c: &mut Criterion) {
    let (features, labels, names) = make_table(42);
    let forest = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .fit(&features, &labels, &names)
        .unwrap()
        .into_forest();

    c.bench_function("rf_predict_proba_569x30_100trees", |b| {
        b.iter(|| forest.predict_proba_batch(&features).unwrap());
    });
}

criterion_group!(benches, bench_rf_train, bench_rf_predict_proba);
criterion_main!(benches);

//! Stratified train/test splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::DataError;

/// Row indices assigned to each side of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Rows used for fitting.
    pub train: Vec<usize>,
    /// Held-out rows used for evaluation.
    pub test: Vec<usize>,
}

/// Configuration for a seeded, stratified shuffle split.
///
/// ```
/// use oncolens_data::SplitConfig;
///
/// let labels = [0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
/// let partition = SplitConfig::new(0.2).unwrap().with_seed(42).split(&labels).unwrap();
/// assert_eq!(partition.test.len(), 2);
/// assert_eq!(partition.train.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct SplitConfig {
    test_fraction: f64,
    seed: u64,
}

impl SplitConfig {
    /// Create a split that holds out `test_fraction` of the rows (rounded up).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidTestFraction`] unless `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, DataError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DataError::InvalidTestFraction {
                fraction: test_fraction,
            });
        }
        Ok(Self {
            test_fraction,
            seed: 42,
        })
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Held-out fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Shuffle seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rows that go to the test side for `n_samples` rows.
    #[must_use]
    pub fn n_test(&self, n_samples: usize) -> usize {
        (self.test_fraction * n_samples as f64).ceil() as usize
    }

    /// Split row indices so every class keeps its share on both sides.
    ///
    /// Each class contributes its proportional share of the test rows;
    /// leftover rows after flooring go to the classes with the largest
    /// fractional remainders. The same labels and seed always give the
    /// same partition.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---------|------|
    /// | [`DataError::EmptyDataset`] | `labels` is empty |
    /// | [`DataError::ClassTooSmall`] | A class has fewer than 2 rows |
    /// | [`DataError::PartitionTooSmall`] | Either side would have fewer rows than there are classes |
    #[instrument(skip_all, fields(n_samples = labels.len(), test_fraction = self.test_fraction, seed = self.seed))]
    pub fn split<L: Copy + Ord>(&self, labels: &[L]) -> Result<Partition, DataError> {
        let n_samples = labels.len();
        if n_samples == 0 {
            return Err(DataError::EmptyDataset);
        }

        let mut classes: Vec<L> = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); classes.len()];
        for (row, label) in labels.iter().enumerate() {
            if let Ok(class) = classes.binary_search(label) {
                members[class].push(row);
            }
        }
        if let Some((class, rows)) = members.iter().enumerate().find(|(_, rows)| rows.len() < 2) {
            return Err(DataError::ClassTooSmall {
                class,
                count: rows.len(),
            });
        }

        let n_test = self.n_test(n_samples);
        let n_train = n_samples - n_test;
        if n_train < classes.len() || n_test < classes.len() {
            return Err(DataError::PartitionTooSmall {
                n_samples,
                n_train,
                n_test,
                n_classes: classes.len(),
            });
        }

        let counts: Vec<usize> = members.iter().map(Vec::len).collect();
        let test_counts = allocate(&counts, n_test);

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);
        for (rows, &k) in members.iter_mut().zip(&test_counts) {
            rows.shuffle(&mut rng);
            let (held_out, kept) = rows.split_at(k);
            test.extend_from_slice(held_out);
            train.extend_from_slice(kept);
        }
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        debug!(
            n_train = train.len(),
            n_test = test.len(),
            ?test_counts,
            "stratified split"
        );
        Ok(Partition { train, test })
    }
}

/// Split `total` across classes in proportion to `counts` by largest remainder.
///
/// Ties in the remainder go to the lower class index.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let mut shares: Vec<usize> = counts.iter().map(|&c| c * total / n).collect();
    let assigned: usize = shares.iter().sum();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    // Remainder numerators compare exactly in integers.
    by_remainder.sort_by_key(|&i| std::cmp::Reverse((counts[i] * total) % n));
    for &i in by_remainder.iter().cycle().take(total - assigned) {
        shares[i] += 1;
    }
    shares
}

/// Select `rows` from `items`, in the order given.
///
/// # Panics
///
/// Panics if a row index is out of bounds.
#[must_use]
pub fn take_rows<T: Clone>(items: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&row| items[row].clone()).collect()
}

//! Feature importance aggregation across trees.

/// A feature with its normalized importance and 1-based rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Normalized importance (all features sum to 1.0).
    pub importance: f64,
    /// 1 = most important.
    pub rank: usize,
}

/// Sum per-tree MDI importances, normalize, and rank by descending importance.
///
/// Equal importances keep column order.
pub(crate) fn aggregate_importances(per_tree: &[Vec<f64>], names: &[String]) -> Vec<RankedFeature> {
    let mut totals = vec![0.0f64; names.len()];
    for tree in per_tree {
        for (total, value) in totals.iter_mut().zip(tree) {
            *total += value;
        }
    }
    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter_mut().for_each(|v| *v /= sum);
    }

    let mut ranked: Vec<RankedFeature> = names
        .iter()
        .zip(totals)
        .map(|(name, importance)| RankedFeature {
            name: name.clone(),
            importance,
            rank: 0,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feature) in ranked.iter_mut().enumerate() {
        feature.rank = i + 1;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn ranks_by_summed_importance() {
        let ranked = aggregate_importances(&[vec![0.2, 0.8], vec![0.6, 0.4]], &names(2));
        assert_eq!(ranked[0].name, "f1");
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].importance - 0.6).abs() < 1e-12);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn all_zero_stays_zero() {
        let ranked = aggregate_importances(&[vec![0.0, 0.0]], &names(2));
        assert!(ranked.iter().all(|f| f.importance == 0.0));
        assert_eq!(ranked[0].name, "f0");
    }

    #[test]
    fn no_trees_gives_zero_importances() {
        let ranked = aggregate_importances(&[], &names(3));
        assert_eq!(ranked.len(), 3);
    }
}

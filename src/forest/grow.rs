//! Greedy tree growth by variance reduction.

use rand_xoshiro::Xoshiro256PlusPlus;

use super::tree::{RegressionTree, TreeBuilder};
use super::ForestParams;
use crate::data::RowMatrix;

struct Split {
    feature: u32,
    threshold: f32,
}

/// Grows one tree over a sample of row indices.
pub(super) struct TreeGrower<'a> {
    data: &'a RowMatrix,
    targets: &'a [f32],
    params: &'a ForestParams,
}

impl<'a> TreeGrower<'a> {
    pub(super) fn new(data: &'a RowMatrix, targets: &'a [f32], params: &'a ForestParams) -> Self {
        Self {
            data,
            targets,
            params,
        }
    }

    /// Grow a tree over `rows` (indices into the data, duplicates allowed).
    pub(super) fn grow(&self, rows: &mut [u32], rng: &mut Xoshiro256PlusPlus) -> RegressionTree {
        debug_assert!(!rows.is_empty());
        let mut builder = TreeBuilder::new();
        self.grow_node(&mut builder, rows, 0, rng);
        builder.build()
    }

    fn grow_node(
        &self,
        builder: &mut TreeBuilder,
        rows: &mut [u32],
        depth: usize,
        rng: &mut Xoshiro256PlusPlus,
    ) -> u32 {
        if depth >= self.params.max_depth || rows.len() < self.params.min_samples_split {
            return builder.add_leaf(self.leaf_value(rows));
        }
        let split = match self.best_split(rows, rng) {
            Some(split) => split,
            None => return builder.add_leaf(self.leaf_value(rows)),
        };

        let node = builder.add_split(split.feature, split.threshold);
        let mid = self.partition(rows, split.feature, split.threshold);
        debug_assert!(mid > 0 && mid < rows.len());
        let (left_rows, right_rows) = rows.split_at_mut(mid);
        let left = self.grow_node(builder, left_rows, depth + 1, rng);
        let right = self.grow_node(builder, right_rows, depth + 1, rng);
        builder.set_children(node, left, right);
        node
    }

    fn leaf_value(&self, rows: &[u32]) -> f32 {
        let sum: f64 = rows.iter().map(|&r| self.targets[r as usize] as f64).sum();
        (sum / rows.len() as f64) as f32
    }

    /// Partition `rows` in place by `feature < threshold`; returns the
    /// boundary index.
    fn partition(&self, rows: &mut [u32], feature: u32, threshold: f32) -> usize {
        let mut lo = 0;
        let mut hi = rows.len();
        while lo < hi {
            if self.data.row(rows[lo] as usize)[feature as usize] < threshold {
                lo += 1;
            } else {
                hi -= 1;
                rows.swap(lo, hi);
            }
        }
        lo
    }

    /// Exhaustive scan over candidate features and cut points, maximizing
    /// the split score `sum_l^2/n_l + sum_r^2/n_r`. Higher score means
    /// lower weighted child variance; a split is only taken when it beats
    /// the parent score.
    fn best_split(&self, rows: &[u32], rng: &mut Xoshiro256PlusPlus) -> Option<Split> {
        let num_rows = rows.len();
        let total_sum: f64 = rows.iter().map(|&r| self.targets[r as usize] as f64).sum();
        let parent_score = total_sum * total_sum / num_rows as f64;

        let mut best: Option<(f64, Split)> = None;
        let mut pairs: Vec<(f32, f32)> = Vec::with_capacity(num_rows);
        for feature in self.candidate_features(rng) {
            pairs.clear();
            pairs.extend(rows.iter().map(|&r| {
                (
                    self.data.row(r as usize)[feature as usize],
                    self.targets[r as usize],
                )
            }));
            pairs.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0f64;
            for i in 1..num_rows {
                left_sum += pairs[i - 1].1 as f64;
                // A cut is only possible between distinct feature values.
                if pairs[i - 1].0 == pairs[i].0 {
                    continue;
                }
                if i < self.params.min_samples_leaf || num_rows - i < self.params.min_samples_leaf {
                    continue;
                }
                let right_sum = total_sum - left_sum;
                let score = left_sum * left_sum / i as f64
                    + right_sum * right_sum / (num_rows - i) as f64;
                if score - parent_score <= 0.0 {
                    continue;
                }
                if best.as_ref().map_or(true, |(top, _)| score > *top) {
                    let threshold = split_threshold(pairs[i - 1].0, pairs[i].0);
                    best = Some((score, Split { feature, threshold }));
                }
            }
        }

        best.map(|(_, split)| split)
    }

    fn candidate_features(&self, rng: &mut Xoshiro256PlusPlus) -> Vec<u32> {
        let num_cols = self.data.num_cols();
        if self.params.feature_fraction >= 1.0 {
            return (0..num_cols as u32).collect();
        }
        let amount = ((num_cols as f64 * self.params.feature_fraction).round() as usize)
            .clamp(1, num_cols);
        rand::seq::index::sample(rng, num_cols, amount)
            .into_iter()
            .map(|i| i as u32)
            .collect()
    }
}

/// Midpoint between two adjacent sorted values. Falls back to the upper
/// value when rounding collapses the midpoint onto the lower one, so the
/// `value < threshold` partition reproduces the scan's left/right counts.
fn split_threshold(lower: f32, upper: f32) -> f32 {
    let mid = ((lower as f64 + upper as f64) / 2.0) as f32;
    if mid > lower {
        mid
    } else {
        upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn grow_one(
        rows: &[Vec<f32>],
        targets: &[f32],
        params: &ForestParams,
        seed: u64,
    ) -> RegressionTree {
        let data = RowMatrix::from_rows(rows);
        let mut indices: Vec<u32> = (0..rows.len() as u32).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        TreeGrower::new(&data, targets, params).grow(&mut indices, &mut rng)
    }

    #[test]
    fn pure_node_becomes_a_leaf() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let tree = grow_one(&rows, &[5.0, 5.0, 5.0], &ForestParams::default(), 0);
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict_row(&[2.0]), 5.0);
    }

    #[test]
    fn splits_on_the_informative_feature() {
        // Feature 0 is noise (constant), feature 1 separates the targets.
        let rows = vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 10.0],
            vec![1.0, 11.0],
            vec![1.0, 12.0],
        ];
        let targets = [0.0, 0.0, 0.0, 9.0, 9.0, 9.0];
        let tree = grow_one(&rows, &targets, &ForestParams::default(), 0);

        assert!(!tree.is_leaf(0));
        assert_eq!(tree.split_index(0), 1);
        assert_eq!(tree.predict_row(&[1.0, 1.5]), 0.0);
        assert_eq!(tree.predict_row(&[1.0, 11.5]), 9.0);
    }

    #[test]
    fn max_depth_limits_growth() {
        let rows: Vec<Vec<f32>> = (0..16).map(|i| vec![i as f32]).collect();
        let targets: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let params = ForestParams {
            max_depth: 1,
            ..ForestParams::default()
        };
        let tree = grow_one(&rows, &targets, &params, 0);

        // One split, two leaves.
        assert_eq!(tree.num_nodes(), 3);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let rows: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32]).collect();
        let targets = [0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 10.0];
        let params = ForestParams {
            min_samples_leaf: 4,
            ..ForestParams::default()
        };
        let tree = grow_one(&rows, &targets, &params, 0);

        // The best cut (5 vs 5) satisfies the constraint; the recursion
        // below it cannot cut 5 rows into two sides of at least 4.
        assert_eq!(tree.num_nodes(), 3);
        assert!(tree.is_leaf(tree.left_child(0)));
        assert!(tree.is_leaf(tree.right_child(0)));
    }

    #[test]
    fn duplicate_feature_values_never_split_apart() {
        // Two rows share x=1.0 with wildly different targets; a cut between
        // them is impossible.
        let rows = vec![vec![1.0], vec![1.0], vec![5.0]];
        let targets = [0.0, 100.0, 100.0];
        let tree = grow_one(&rows, &targets, &ForestParams::default(), 0);

        assert_eq!(tree.predict_row(&[1.0]), 50.0);
        assert_eq!(tree.predict_row(&[5.0]), 100.0);
    }

    #[test]
    fn threshold_separates_adjacent_values() {
        let rows = vec![vec![1.0], vec![2.0]];
        let targets = [0.0, 10.0];
        let tree = grow_one(&rows, &targets, &ForestParams::default(), 0);

        assert!(!tree.is_leaf(0));
        let threshold = tree.split_threshold(0);
        assert!(threshold > 1.0 && threshold <= 2.0);
        assert_eq!(tree.predict_row(&[1.0]), 0.0);
        assert_eq!(tree.predict_row(&[2.0]), 10.0);
    }

    #[test]
    fn adjacent_float_threshold_falls_back_to_upper() {
        let lower = 1.0f32;
        let upper = f32::from_bits(lower.to_bits() + 1);
        let threshold = split_threshold(lower, upper);
        assert!(threshold > lower);
        assert!(threshold <= upper);
    }
}

//! CART regression tree.
//!
//! The tree is grown greedily: at each node we scan every feature, sort the
//! node's rows by that feature and evaluate every threshold between two
//! adjacent distinct values. The split that removes the most squared error
//! wins. Nodes become leaves when they are pure, too small, at the depth
//! limit, or when no feature separates their rows.
//!
//! Nodes live in a flat arena; children are indices into it.

/// Number of model inputs: area, bedrooms, bathrooms, city code.
pub const N_FEATURES: usize = 4;

/// One feature vector.
pub type FeatureRow = [f64; N_FEATURES];

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    /// Number of rows (in sorted order) that go left.
    position: usize,
    threshold: f64,
    score: f64,
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree on the rows selected by `sample` (duplicates allowed, as
    /// produced by bootstrap resampling).
    ///
    /// # Panics
    /// Panics if `sample` is empty or contains an index outside `rows`.
    /// `rows` and `targets` must have the same length.
    pub fn fit(rows: &[FeatureRow], targets: &[f64], sample: &[usize], params: &TreeParams) -> Self {
        assert!(!sample.is_empty(), "cannot grow a tree on an empty sample");
        debug_assert_eq!(rows.len(), targets.len());

        let mut tree = Self { nodes: Vec::new() };
        let mut idx = sample.to_vec();
        tree.grow(rows, targets, &mut idx, 0, params);
        tree
    }

    pub fn predict(&self, x: &FeatureRow) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match &self.nodes[node] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        max_depth
    }

    fn grow(
        &mut self,
        rows: &[FeatureRow],
        targets: &[f64],
        idx: &mut [usize],
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let n = idx.len();
        let mut sum = 0.0;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &i in idx.iter() {
            let y = targets[i];
            sum += y;
            lo = lo.min(y);
            hi = hi.max(y);
        }
        let mean = sum / n as f64;

        let depth_ok = params.max_depth.is_none_or(|max| depth < max);
        let can_split = depth_ok && n >= params.min_samples_split && hi > lo;
        let split = if can_split {
            best_split(rows, targets, idx, mean, params.min_samples_leaf)
        } else {
            None
        };

        let Some(split) = split else {
            return self.push(Node::Leaf { value: mean });
        };

        // Reserve this node's slot before the children are pushed.
        let node = self.push(Node::Leaf { value: mean });

        let f = split.feature;
        idx.sort_unstable_by(|&a, &b| rows[a][f].total_cmp(&rows[b][f]));
        let (left_idx, right_idx) = idx.split_at_mut(split.position);
        let left = self.grow(rows, targets, left_idx, depth + 1, params);
        let right = self.grow(rows, targets, right_idx, depth + 1, params);

        self.nodes[node] = Node::Split {
            feature: f,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

/// Find the split with the largest squared-error reduction.
///
/// With targets centred on the node mean, the reduction of a split that puts
/// `n_l` rows with centred sum `s` on the left is `s² · n / (n_l · n_r)`, so
/// no sum of squares is ever formed. Ties keep the first candidate found
/// (lowest feature, then lowest threshold).
fn best_split(
    rows: &[FeatureRow],
    targets: &[f64],
    idx: &[usize],
    mean: f64,
    min_samples_leaf: usize,
) -> Option<SplitCandidate> {
    let n = idx.len();
    let min_leaf = min_samples_leaf.max(1);
    if n < 2 * min_leaf {
        return None;
    }

    let mut order = idx.to_vec();
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..N_FEATURES {
        order.sort_unstable_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left_sum = 0.0;
        for pos in 1..n {
            left_sum += targets[order[pos - 1]] - mean;

            let n_left = pos;
            let n_right = n - pos;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let x_left = rows[order[pos - 1]][feature];
            let x_right = rows[order[pos]][feature];
            if x_left >= x_right {
                continue;
            }

            let score = left_sum * left_sum * n as f64 / (n_left as f64 * n_right as f64);
            if !score.is_finite() {
                continue;
            }
            if best.is_none_or(|b| score > b.score) {
                let mut threshold = x_left + (x_right - x_left) / 2.0;
                // Midpoints of adjacent floats can round onto the right value.
                if threshold >= x_right {
                    threshold = x_left;
                }
                best = Some(SplitCandidate {
                    feature,
                    position: pos,
                    threshold,
                    score,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64) -> FeatureRow {
        [x, 0.0, 0.0, 0.0]
    }

    #[test]
    fn learns_step_function_exactly() {
        let rows: Vec<FeatureRow> = (0..10).map(|i| row(i as f64)).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 10.0 } else { 20.0 }).collect();
        let sample: Vec<usize> = (0..10).collect();

        let tree = RegressionTree::fit(&rows, &targets, &sample, &TreeParams::default());
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&row(2.0)), 10.0);
        assert_eq!(tree.predict(&row(4.4)), 10.0);
        assert_eq!(tree.predict(&row(4.6)), 20.0);
        assert_eq!(tree.predict(&row(100.0)), 20.0);
    }

    #[test]
    fn picks_the_informative_feature() {
        // Feature 0 is noise, feature 2 carries the signal.
        let rows: Vec<FeatureRow> = (0..8)
            .map(|i| [((i * 5) % 8) as f64, 0.0, (i / 4) as f64, 0.0])
            .collect();
        let targets: Vec<f64> = (0..8).map(|i| if i < 4 { 1.0 } else { 9.0 }).collect();
        let sample: Vec<usize> = (0..8).collect();

        let tree = RegressionTree::fit(&rows, &targets, &sample, &TreeParams::default());
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(&[0.0, 0.0, 0.0, 0.0]), 1.0);
        assert_eq!(tree.predict(&[0.0, 0.0, 1.0, 0.0]), 9.0);
    }

    #[test]
    fn fully_grown_tree_reproduces_distinct_training_rows() {
        let rows: Vec<FeatureRow> = (0..20).map(|i| [i as f64, (i % 3) as f64, 1.0, 0.0]).collect();
        let targets: Vec<f64> = (0..20).map(|i| ((i * 37) % 11) as f64).collect();
        let sample: Vec<usize> = (0..20).collect();

        let tree = RegressionTree::fit(&rows, &targets, &sample, &TreeParams::default());
        for (x, y) in rows.iter().zip(&targets) {
            assert_eq!(tree.predict(x), *y);
        }
    }

    #[test]
    fn identical_rows_become_a_mean_leaf() {
        let rows = vec![row(1.0); 4];
        let targets = vec![1.0, 2.0, 3.0, 6.0];
        let tree = RegressionTree::fit(&rows, &targets, &[0, 1, 2, 3], &TreeParams::default());
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict(&row(1.0)), 3.0);
    }

    #[test]
    fn depth_limit_and_leaf_size_are_honoured() {
        let rows: Vec<FeatureRow> = (0..32).map(|i| row(i as f64)).collect();
        let targets: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let sample: Vec<usize> = (0..32).collect();

        let stump = RegressionTree::fit(
            &rows,
            &targets,
            &sample,
            &TreeParams {
                max_depth: Some(0),
                ..TreeParams::default()
            },
        );
        assert_eq!(stump.n_leaves(), 1);
        assert_eq!(stump.predict(&row(0.0)), 15.5);

        let shallow = RegressionTree::fit(
            &rows,
            &targets,
            &sample,
            &TreeParams {
                max_depth: Some(2),
                ..TreeParams::default()
            },
        );
        assert_eq!(shallow.depth(), 2);
        assert_eq!(shallow.n_leaves(), 4);

        let coarse = RegressionTree::fit(
            &rows,
            &targets,
            &sample,
            &TreeParams {
                min_samples_leaf: 8,
                ..TreeParams::default()
            },
        );
        assert!(coarse.n_leaves() <= 4);
    }

    #[test]
    fn duplicated_bootstrap_rows_are_supported() {
        let rows: Vec<FeatureRow> = (0..4).map(|i| row(i as f64)).collect();
        let targets = vec![0.0, 10.0, 20.0, 30.0];
        let tree = RegressionTree::fit(&rows, &targets, &[0, 0, 3, 3, 3], &TreeParams::default());
        assert_eq!(tree.predict(&row(0.0)), 0.0);
        assert_eq!(tree.predict(&row(3.0)), 30.0);
    }
}

//! Structure-of-Arrays regression tree storage.

use serde::{Deserialize, Serialize};

/// A single regression tree in flat parallel arrays.
///
/// Nodes live in preorder with the root at index 0; child indices are local
/// to this tree. Encoded feature rows are always finite, so there is no
/// missing-value direction to track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Split feature index per node.
    split_indices: Box<[u32]>,
    /// Split threshold per node.
    split_thresholds: Box<[f32]>,
    /// Left child index per node (only valid for non-leaf nodes).
    left_children: Box<[u32]>,
    /// Right child index per node (only valid for non-leaf nodes).
    right_children: Box<[u32]>,
    /// Whether each node is a leaf.
    is_leaf: Box<[bool]>,
    /// Leaf values (indexed by node index, only valid for leaf nodes).
    leaf_values: Box<[f32]>,
}

impl RegressionTree {
    /// Number of nodes in this tree.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Check if a node is a leaf.
    #[inline]
    pub fn is_leaf(&self, node_idx: u32) -> bool {
        self.is_leaf[node_idx as usize]
    }

    /// Get split feature index for a node.
    #[inline]
    pub fn split_index(&self, node_idx: u32) -> u32 {
        self.split_indices[node_idx as usize]
    }

    /// Get split threshold for a node.
    #[inline]
    pub fn split_threshold(&self, node_idx: u32) -> f32 {
        self.split_thresholds[node_idx as usize]
    }

    /// Get left child index.
    #[inline]
    pub fn left_child(&self, node_idx: u32) -> u32 {
        self.left_children[node_idx as usize]
    }

    /// Get right child index.
    #[inline]
    pub fn right_child(&self, node_idx: u32) -> u32 {
        self.right_children[node_idx as usize]
    }

    /// Get leaf value for a node.
    #[inline]
    pub fn leaf_value(&self, node_idx: u32) -> f32 {
        self.leaf_values[node_idx as usize]
    }

    /// Traverse the tree to the leaf for the given features.
    ///
    /// `features` must cover every feature index this tree splits on.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        let mut idx = 0u32;

        while !self.is_leaf(idx) {
            let fvalue = features[self.split_index(idx) as usize];
            idx = if fvalue < self.split_threshold(idx) {
                self.left_child(idx)
            } else {
                self.right_child(idx)
            };
        }

        self.leaf_value(idx)
    }
}

/// Builder for constructing a [`RegressionTree`] node by node.
///
/// Splits are added before their children exist; the grower wires child
/// indices in once the subtrees are built.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split node with unresolved children. Returns the node index.
    pub fn add_split(&mut self, feature_index: u32, threshold: f32) -> u32 {
        let idx = self.split_indices.len() as u32;
        self.split_indices.push(feature_index);
        self.split_thresholds.push(threshold);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(false);
        self.leaf_values.push(0.0);
        idx
    }

    /// Add a leaf node. Returns the node index.
    pub fn add_leaf(&mut self, value: f32) -> u32 {
        let idx = self.split_indices.len() as u32;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(true);
        self.leaf_values.push(value);
        idx
    }

    /// Wire the children of a previously added split node.
    pub fn set_children(&mut self, node_idx: u32, left: u32, right: u32) {
        debug_assert!(!self.is_leaf[node_idx as usize]);
        self.left_children[node_idx as usize] = left;
        self.right_children[node_idx as usize] = right;
    }

    /// Build the tree storage.
    pub fn build(self) -> RegressionTree {
        debug_assert_eq!(self.split_indices.len(), self.split_thresholds.len());
        debug_assert_eq!(self.split_indices.len(), self.left_children.len());
        debug_assert_eq!(self.split_indices.len(), self.right_children.len());
        debug_assert_eq!(self.split_indices.len(), self.is_leaf.len());
        debug_assert_eq!(self.split_indices.len(), self.leaf_values.len());

        RegressionTree {
            split_indices: self.split_indices.into_boxed_slice(),
            split_thresholds: self.split_thresholds.into_boxed_slice(),
            left_children: self.left_children.into_boxed_slice(),
            right_children: self.right_children.into_boxed_slice(),
            is_leaf: self.is_leaf.into_boxed_slice(),
            leaf_values: self.leaf_values.into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a simple tree:
    ///        [0] feat0 < 0.5
    ///        /          \
    ///    [1] leaf=1.0   [2] feat1 < 0.3
    ///                    /          \
    ///               [3] leaf=2.0   [4] leaf=3.0
    fn build_test_tree() -> RegressionTree {
        let mut builder = TreeBuilder::new();

        let root = builder.add_split(0, 0.5);
        let left = builder.add_leaf(1.0);
        let right = builder.add_split(1, 0.3);
        let right_left = builder.add_leaf(2.0);
        let right_right = builder.add_leaf(3.0);
        builder.set_children(root, left, right);
        builder.set_children(right, right_left, right_right);

        builder.build()
    }

    #[test]
    fn tree_structure() {
        let tree = build_test_tree();

        assert_eq!(tree.num_nodes(), 5);

        assert!(!tree.is_leaf(0));
        assert_eq!(tree.split_index(0), 0);
        assert_eq!(tree.split_threshold(0), 0.5);
        assert_eq!(tree.left_child(0), 1);
        assert_eq!(tree.right_child(0), 2);

        assert!(tree.is_leaf(1));
        assert_eq!(tree.leaf_value(1), 1.0);

        assert!(!tree.is_leaf(2));
        assert_eq!(tree.split_index(2), 1);

        assert!(tree.is_leaf(3));
        assert!(tree.is_leaf(4));
    }

    #[test]
    fn predict_goes_left() {
        let tree = build_test_tree();
        // feat0 = 0.3 < 0.5 → node 1 (leaf=1.0)
        assert_eq!(tree.predict_row(&[0.3, 0.5]), 1.0);
    }

    #[test]
    fn predict_goes_right_then_left() {
        let tree = build_test_tree();
        // feat0 = 0.7 >= 0.5 → node 2; feat1 = 0.2 < 0.3 → node 3 (leaf=2.0)
        assert_eq!(tree.predict_row(&[0.7, 0.2]), 2.0);
    }

    #[test]
    fn predict_goes_right_then_right() {
        let tree = build_test_tree();
        // feat0 = 0.7 >= 0.5 → node 2; feat1 = 0.5 >= 0.3 → node 4 (leaf=3.0)
        assert_eq!(tree.predict_row(&[0.7, 0.5]), 3.0);
    }

    #[test]
    fn boundary_value_goes_right() {
        let tree = build_test_tree();
        // feat0 = 0.5 is not < 0.5 → right subtree.
        assert_eq!(tree.predict_row(&[0.5, 0.0]), 2.0);
    }

    #[test]
    fn single_leaf_tree() {
        let mut builder = TreeBuilder::new();
        builder.add_leaf(42.0);
        let tree = builder.build();
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.predict_row(&[0.0]), 42.0);
    }

    #[test]
    fn serde_roundtrip() {
        let tree = build_test_tree();
        let bytes = postcard::to_allocvec(&tree).unwrap();
        let back: RegressionTree = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(back, tree);
    }
}

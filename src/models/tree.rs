//! Regression tree ensembles (gbtree / dart).
//!
//! Trees are stored as flat node arrays. Structural checks (children point
//! forward, feature indices in range) happen once at load time in
//! `io::xgboost`, so traversal here always terminates.
//!
//! Thresholds, leaves and sums are `f32`, matching XGBoost's own arithmetic.

use crate::error::PredictError;

/// A single tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// Go to `left` when `x[feature] < threshold` (or the value is missing and
    /// `default_left` is set), else to `right`.
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf {
        value: f32,
    },
}

/// One regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Largest feature index any split reads, if the tree has splits.
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    /// Leaf value reached by `features`.
    pub fn leaf_value(&self, features: &[f64]) -> Result<f32, PredictError> {
        let mut idx = 0usize;
        loop {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| PredictError::Model(format!("tree node {idx} out of range")))?;
            match *node {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features.get(feature).map(|&v| v as f32).ok_or(PredictError::FeatureCount {
                        expected: feature + 1,
                        actual: features.len(),
                    })?;
                    let go_left = if x.is_nan() { default_left } else { x < threshold };
                    let next = if go_left { left } else { right };
                    if next <= idx {
                        return Err(PredictError::Model(format!("tree node {idx} links backwards")));
                    }
                    idx = next;
                }
            }
        }
    }
}

/// Additive tree ensemble with per-tree weights (all 1.0 for gbtree).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
    weights: Vec<f32>,
}

impl TreeEnsemble {
    /// `weights` must have one entry per tree.
    pub fn new(trees: Vec<Tree>, weights: Vec<f32>) -> Self {
        debug_assert_eq!(trees.len(), weights.len());
        Self { trees, weights }
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// `base_margin` plus the weighted leaf values, added tree by tree.
    pub fn margin(&self, base_margin: f32, features: &[f64]) -> Result<f32, PredictError> {
        self.trees
            .iter()
            .zip(&self.weights)
            .try_fold(base_margin, |acc, (tree, w)| Ok(acc + w * tree.leaf_value(features)?))
    }
}

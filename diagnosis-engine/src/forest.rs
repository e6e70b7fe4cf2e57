//! Tree-ensemble classifier evaluated from a JSON export
//!
//! The export mirrors a fitted random forest: a list of binary decision
//! trees stored as flat node arrays in pre-order, so every child index is
//! greater than its parent's. A split sends a sample left when
//! `x[feature] <= threshold`. Each leaf stores per-class weights.
//!
//! Prediction averages the normalised leaf distributions of all trees and
//! returns the first class with the highest mean probability.

use serde::Deserialize;

use crate::classifier::Classifier;
use crate::error::{EngineError, Result};
use crate::features::FeatureVector;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// On-disk shape of a classifier export
#[derive(Debug, Deserialize)]
pub struct TreeEnsembleArtifact {
    pub n_features: usize,
    pub classes: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    name: String,
    n_features: usize,
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    /// Build and validate an ensemble.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Artifact`] when the ensemble has no classes or
    /// trees, or when any tree is malformed: empty, a child index that does not
    /// point forward inside the tree, a split on a feature outside
    /// `n_features`, or a leaf whose weights do not match the class count.
    pub fn new(
        name: impl Into<String>,
        n_features: usize,
        classes: Vec<String>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self> {
        let name = name.into();
        if classes.is_empty() {
            return Err(EngineError::artifact(&name, "classifier has no classes"));
        }
        if trees.is_empty() {
            return Err(EngineError::artifact(&name, "classifier has no trees"));
        }
        for (tree_index, tree) in trees.iter().enumerate() {
            validate_tree(tree, n_features, classes.len())
                .map_err(|message| EngineError::artifact(&name, format!("tree {tree_index}: {message}")))?;
        }

        Ok(Self {
            name,
            n_features,
            classes,
            trees,
        })
    }

    pub fn from_artifact(name: impl Into<String>, artifact: TreeEnsembleArtifact) -> Result<Self> {
        Self::new(name, artifact.n_features, artifact.classes, artifact.trees)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probabilities over all trees, in `classes` order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelInference`] when `features` has the wrong
    /// length or contains NaN.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(EngineError::inference(
                &self.name,
                format!(
                    "expected {} features, got {}",
                    self.n_features,
                    features.len()
                ),
            ));
        }
        if let Some(position) = features.iter().position(|x| x.is_nan()) {
            return Err(EngineError::inference(
                &self.name,
                format!("feature {position} is NaN"),
            ));
        }

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let weights = self.leaf_for(tree, features)?;
            let sum: f64 = weights.iter().sum();
            for (total, weight) in totals.iter_mut().zip(weights) {
                *total += weight / sum;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n_trees = self.trees.len() as f64;
        for total in &mut totals {
            *total /= n_trees;
        }
        Ok(totals)
    }

    fn leaf_for<'t>(&self, tree: &'t DecisionTree, features: &[f64]) -> Result<&'t [f64]> {
        let mut index = 0;
        loop {
            match tree.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(value.as_slice()),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        EngineError::inference(&self.name, format!("no feature {feature}"))
                    })?;
                    index = if x <= threshold { *left } else { *right };
                }
                None => {
                    return Err(EngineError::inference(
                        &self.name,
                        format!("node {index} out of range"),
                    ))
                }
            }
        }
    }
}

fn validate_tree(tree: &DecisionTree, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("tree has no nodes".to_string());
    }
    let n_nodes = tree.nodes.len();
    for (index, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(format!(
                        "node {index} splits on feature {feature} of {n_features}"
                    ));
                }
                if threshold.is_nan() {
                    return Err(format!("node {index} has a NaN threshold"));
                }
                for child in [left, right] {
                    if *child <= index || *child >= n_nodes {
                        return Err(format!("node {index} has invalid child {child}"));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {index} has {} weights for {n_classes} classes",
                        value.len()
                    ));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {index} has a negative or non-finite weight"));
                }
                if value.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {index} has no weight"));
                }
            }
        }
    }
    Ok(())
}

impl Classifier for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<String> {
        let probabilities = self.predict_proba(features.as_slice())?;

        // First maximum wins ties.
        let mut best: Option<(usize, f64)> = None;
        for (position, p) in probabilities.iter().enumerate() {
            if best.map_or(true, |(_, top)| *p > top) {
                best = Some((position, *p));
            }
        }

        best.and_then(|(position, _)| self.classes.get(position))
            .cloned()
            .ok_or_else(|| EngineError::inference(&self.name, "no class scored"))
    }

    fn classes(&self) -> Vec<String> {
        self.classes.clone()
    }
}

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A trained scoring capability over an encoded feature vector.
///
/// Implementations are immutable once built and shared across threads.
pub trait Estimator: Debug + Send + Sync {
    fn family(&self) -> &'static str;

    /// Number of inputs the estimator was fit on.
    fn n_features(&self) -> usize;

    fn predict(&self, x: &[f64]) -> Result<f64, String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn check(&self) -> Result<(), String> {
        if !self.intercept.is_finite() {
            return Err("linear intercept is not finite".to_string());
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("linear coefficient {i} is not finite"));
        }
        Ok(())
    }
}

impl Estimator for LinearModel {
    fn family(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &[f64]) -> Result<f64, String> {
        if x.len() != self.coefficients.len() {
            return Err(format!(
                "expected {} inputs, got {}",
                self.coefficients.len(),
                x.len()
            ));
        }
        let dot: f64 = self.coefficients.iter().zip(x).map(|(c, v)| c * v).sum();
        Ok(self.intercept + dot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point forward so every walk from the root terminates.
    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature} but the schema has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {idx} has a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> Result<f64, String> {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x
                        .get(*feature)
                        .copied()
                        .ok_or_else(|| format!("input has no feature {feature}"))?;
                    if v.is_nan() {
                        return Err(format!("feature {feature} is NaN"));
                    }
                    idx = if v <= *threshold { *left } else { *right };
                }
                None => return Err(format!("walked off the tree at node {idx}")),
            }
        }
    }
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub fn check(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Estimator for ForestModel {
    fn family(&self) -> &'static str {
        "forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &[f64]) -> Result<f64, String> {
        if x.len() != self.n_features {
            return Err(format!(
                "expected {} inputs, got {}",
                self.n_features,
                x.len()
            ));
        }
        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.predict(x).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/estimator.rs"]
mod tests;

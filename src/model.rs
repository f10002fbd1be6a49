//! Gradient-boosted tree ensemble for binary classification.
//!
//! The artifact is a JSON export of a fitted scikit-learn
//! `GradientBoostingClassifier` (see `scripts/export_model.py`). Each tree is
//! stored in sklearn's flat array form: node `i` is a leaf when
//! `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::{
    error::AppError,
    types::{FeatureVector, FEATURE_COUNT},
};

const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let nodes = self.value.len();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|&len| len != nodes)
        {
            return Err("tree arrays differ in length".to_string());
        }
        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                continue;
            }
            // children always come after their parent, so traversal terminates
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    #[serde(default)]
    pub version: Option<String>,
    pub n_features: usize,
    pub learning_rate: f64,
    /// Log-odds of the positive class before any tree is applied.
    pub init_raw: f64,
    /// Class labels, negative first. The positive class means "benign".
    pub classes: [i64; 2],
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostingModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let model = Self::from_json(&content)?;
        info!(
            "Loaded model from {}: {} trees, learning rate {}",
            path.display(),
            model.trees.len(),
            model.learning_rate
        );
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let model: GradientBoostingModel = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.n_features != FEATURE_COUNT {
            return Err(AppError::Model(format!(
                "model expects {} features, pipeline produces {}",
                self.n_features, FEATURE_COUNT
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| AppError::Model(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }

    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        let x = features.to_f64();
        let boost: f64 = self.trees.iter().map(|tree| tree.predict(&x)).sum();
        self.init_raw + self.learning_rate * boost
    }

    /// Probability of the positive (benign) class.
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let raw = self.decision_function(features);
        let probability = sigmoid(raw);
        debug!("raw score {:.4}, probability {:.4}", raw, probability);
        probability
    }

    pub fn predict(&self, features: &FeatureVector) -> i64 {
        if self.predict_proba(features) > 0.5 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }

    pub fn is_benign(&self, features: &FeatureVector) -> bool {
        self.predict(features) == self.classes[1]
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

//! Random-forest regression oracle
//!
//! The trained model ships as a JSON export: a list of decision trees stored
//! as flat node arrays. Prediction averages the leaf reached in each tree.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use forecast_spi::{ForecastError, Regressor, RegressorLoader, Result};
use serde::{Deserialize, Serialize};

/// One node of a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Internal node: go left when `x[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node
    Leaf { value: f64 },
}

/// Decision tree as a flat node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, index: usize, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ForecastError::InvalidModel(format!("tree {} has no nodes", index)));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(ForecastError::InvalidModel(format!(
                        "tree {} node {} splits on feature {} (model has {})",
                        index, i, feature, n_features
                    )));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(ForecastError::InvalidModel(format!(
                            "tree {} node {} has invalid child {}",
                            index, i, child
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// Children always point forward, so the walk visits at most
    /// `nodes.len()` nodes.
    fn evaluate(&self, features: &[f64]) -> Result<f64> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().unwrap_or(0.0);
                    index = if x <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ForecastError::Oracle(format!(
            "tree walk did not reach a leaf (node {})",
            index
        )))
    }
}

/// Ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(alias = "n_features_in_")]
    pub n_features_in: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Decode and validate a JSON model.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let forest: Self = serde_json::from_str(json)
            .map_err(|e| ForecastError::InvalidModel(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    /// Decode and validate a JSON model from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let forest: Self = serde_json::from_reader(reader)
            .map_err(|e| ForecastError::InvalidModel(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ForecastError::InvalidModel("forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(i, tree)| tree.validate(i, self.n_features_in))
    }

    /// Number of trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether the forest has no trees.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Regressor for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features_in {
            return Err(ForecastError::Oracle(format!(
                "expected {} features, got {}",
                self.n_features_in,
                features.len()
            )));
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn expected_feature_count(&self) -> Option<usize> {
        Some(self.n_features_in)
    }

    fn model_type(&self) -> &str {
        "Random Forest"
    }
}

/// Loads a [`RandomForest`] from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonForestLoader {
    path: PathBuf,
}

impl JsonForestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegressorLoader for JsonForestLoader {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Box<dyn Regressor>> {
        if !self.path.exists() {
            return Err(ForecastError::ModelUnavailable(format!(
                "Model not found at: {}",
                self.path.display()
            )));
        }

        let file = File::open(&self.path)
            .map_err(|e| ForecastError::ModelUnavailable(e.to_string()))?;
        let forest = RandomForest::from_reader(BufReader::new(file))?;

        tracing::info!(
            "Random forest loaded from {}: {} trees, {} features",
            self.path.display(),
            forest.len(),
            forest.n_features_in
        );
        Ok(Box::new(forest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // feature 0 <= 5 ? 1.0 : (feature 1 <= 0 ? 2.0 : 3.0)
    const TWO_TREES: &str = r#"{
        "n_features_in": 2,
        "trees": [
            {"nodes": [
                {"feature": 0, "threshold": 5.0, "left": 1, "right": 2},
                {"value": 1.0},
                {"feature": 1, "threshold": 0.0, "left": 3, "right": 4},
                {"value": 2.0},
                {"value": 3.0}
            ]},
            {"nodes": [{"value": 5.0}]}
        ]
    }"#;

    #[test]
    fn test_predict_averages_trees() {
        let forest = RandomForest::from_json_str(TWO_TREES).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.predict(&[1.0, 0.0]).unwrap(), 3.0);
        assert_eq!(forest.predict(&[9.0, 0.0]).unwrap(), 3.5);
        assert_eq!(forest.predict(&[9.0, 1.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        let forest = RandomForest::from_json_str(TWO_TREES).unwrap();
        assert_eq!(forest.predict(&[5.0, 0.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_expected_feature_count_and_type() {
        let forest = RandomForest::from_json_str(TWO_TREES).unwrap();
        assert_eq!(forest.expected_feature_count(), Some(2));
        assert_eq!(forest.model_type(), "Random Forest");
    }

    #[test]
    fn test_wrong_arity_is_oracle_error() {
        let forest = RandomForest::from_json_str(TWO_TREES).unwrap();
        assert!(matches!(forest.predict(&[1.0]), Err(ForecastError::Oracle(_))));
    }

    #[test]
    fn test_sklearn_style_field_name() {
        let json = r#"{"n_features_in_": 1, "trees": [{"nodes": [{"value": 7.0}]}]}"#;
        let forest = RandomForest::from_json_str(json).unwrap();
        assert_eq!(forest.n_features_in, 1);
    }

    #[test]
    fn test_rejects_empty_forest() {
        let json = r#"{"n_features_in": 1, "trees": []}"#;
        assert!(matches!(
            RandomForest::from_json_str(json),
            Err(ForecastError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_rejects_empty_tree() {
        let json = r#"{"n_features_in": 1, "trees": [{"nodes": []}]}"#;
        assert!(RandomForest::from_json_str(json).is_err());
    }

    #[test]
    fn test_rejects_backward_child() {
        let json = r#"{"n_features_in": 1, "trees": [{"nodes": [
            {"feature": 0, "threshold": 1.0, "left": 0, "right": 1},
            {"value": 1.0}
        ]}]}"#;
        assert!(RandomForest::from_json_str(json).is_err());
    }

    #[test]
    fn test_rejects_out_of_bounds_child() {
        let json = r#"{"n_features_in": 1, "trees": [{"nodes": [
            {"feature": 0, "threshold": 1.0, "left": 1, "right": 9},
            {"value": 1.0}
        ]}]}"#;
        assert!(RandomForest::from_json_str(json).is_err());
    }

    #[test]
    fn test_rejects_unknown_feature() {
        let json = r#"{"n_features_in": 1, "trees": [{"nodes": [
            {"feature": 3, "threshold": 1.0, "left": 1, "right": 2},
            {"value": 1.0},
            {"value": 2.0}
        ]}]}"#;
        assert!(RandomForest::from_json_str(json).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RandomForest::from_json_str("{not json"),
            Err(ForecastError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_loader_missing_file() {
        let loader = JsonForestLoader::new("/nonexistent/random_forest_model.json");
        assert!(matches!(loader.load(), Err(ForecastError::ModelUnavailable(_))));
        assert!(loader.location().ends_with("random_forest_model.json"));
    }

    #[test]
    fn test_loader_reads_file() {
        let path = std::env::temp_dir().join(format!("forest-{}.json", std::process::id()));
        std::fs::write(&path, TWO_TREES).unwrap();

        let model = JsonForestLoader::new(&path).load().unwrap();
        assert_eq!(model.expected_feature_count(), Some(2));
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 3.0);

        std::fs::remove_file(&path).ok();
    }
}

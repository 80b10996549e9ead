//! Gradient-boosted oblivious decision trees
//!
//! Every level of an oblivious tree applies the same split, so a tree of depth
//! `d` is a list of `d` splits and `2^d` leaf values. Split `i` sets bit `i` of
//! the leaf index when the feature value is strictly greater than its border.

use crate::error::{ForecastError, Result};
use crate::models::{check_batch_width, validate_feature_names, Regressor};
use serde::{Deserialize, Serialize};

/// Deepest tree accepted when loading an artifact
pub const MAX_DEPTH: usize = 16;

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeSplit {
    pub feature_index: usize,
    pub border: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObliviousTree {
    pub splits: Vec<TreeSplit>,
    pub leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, row: &[f64]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .filter(|(_, split)| row[split.feature_index] > split.border)
            .fold(0, |index, (level, _)| index | (1 << level))
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        self.leaf_values[self.leaf_index(row)]
    }
}

/// Sum of oblivious trees, scaled and shifted: `scale · Σ leaf + bias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObliviousTreeEnsemble {
    feature_names: Vec<String>,
    trees: Vec<ObliviousTree>,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    bias: f64,
}

impl ObliviousTreeEnsemble {
    pub fn new(
        feature_names: Vec<String>,
        trees: Vec<ObliviousTree>,
        scale: f64,
        bias: f64,
    ) -> Result<Self> {
        let model = Self {
            feature_names,
            trees,
            scale,
            bias,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        validate_feature_names(&self.feature_names)?;

        if !self.scale.is_finite() || !self.bias.is_finite() {
            return Err(ForecastError::ModelError(
                "Scale and bias must be finite".to_string(),
            ));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            let depth = tree.splits.len();
            if depth > MAX_DEPTH {
                return Err(ForecastError::ModelError(format!(
                    "Tree {} has depth {}, maximum is {}",
                    index, depth, MAX_DEPTH
                )));
            }

            if tree.leaf_values.len() != 1 << depth {
                return Err(ForecastError::ModelError(format!(
                    "Tree {} has {} leaves, depth {} requires {}",
                    index,
                    tree.leaf_values.len(),
                    depth,
                    1usize << depth
                )));
            }

            if let Some(split) = tree
                .splits
                .iter()
                .find(|split| split.feature_index >= self.feature_names.len())
            {
                return Err(ForecastError::ModelError(format!(
                    "Tree {} splits on feature index {} of {}",
                    index,
                    split.feature_index,
                    self.feature_names.len()
                )));
            }
        }

        Ok(())
    }

    pub fn trees(&self) -> &[ObliviousTree] {
        &self.trees
    }
}

impl Regressor for ObliviousTreeEnsemble {
    fn name(&self) -> &str {
        "oblivious tree ensemble"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_batch_width(batch, self.feature_names.len())?;

        Ok(batch
            .iter()
            .map(|row| {
                let raw: f64 = self.trees.iter().map(|tree| tree.evaluate(row)).sum();
                self.scale * raw + self.bias
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["month".to_string(), "vol_tm1".to_string()]
    }

    #[test]
    fn test_leaf_index_bits_follow_split_order() {
        let tree = ObliviousTree {
            splits: vec![
                TreeSplit { feature_index: 0, border: 6.5 },
                TreeSplit { feature_index: 1, border: 100.0 },
            ],
            leaf_values: vec![1.0, 2.0, 3.0, 4.0],
        };

        assert_eq!(tree.evaluate(&[3.0, 50.0]), 1.0);
        assert_eq!(tree.evaluate(&[7.0, 50.0]), 2.0);
        assert_eq!(tree.evaluate(&[3.0, 150.0]), 3.0);
        assert_eq!(tree.evaluate(&[7.0, 150.0]), 4.0);
        // equal to the border goes left
        assert_eq!(tree.evaluate(&[6.5, 100.0]), 1.0);
    }

    #[test]
    fn test_ensemble_scale_and_bias() {
        let stump = ObliviousTree {
            splits: vec![TreeSplit { feature_index: 1, border: 0.0 }],
            leaf_values: vec![-1.0, 1.0],
        };
        let model = ObliviousTreeEnsemble::new(names(), vec![stump.clone(), stump], 2.0, 10.0)
            .unwrap();

        let predictions = model.predict(&[vec![1.0, 5.0], vec![1.0, -5.0]]).unwrap();
        assert_eq!(predictions, vec![14.0, 6.0]);
    }

    #[test]
    fn test_rejects_wrong_leaf_count() {
        let tree = ObliviousTree {
            splits: vec![TreeSplit { feature_index: 0, border: 1.0 }],
            leaf_values: vec![1.0, 2.0, 3.0],
        };
        assert!(ObliviousTreeEnsemble::new(names(), vec![tree], 1.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_feature_index() {
        let tree = ObliviousTree {
            splits: vec![TreeSplit { feature_index: 2, border: 1.0 }],
            leaf_values: vec![1.0, 2.0],
        };
        assert!(ObliviousTreeEnsemble::new(names(), vec![tree], 1.0, 0.0).is_err());
    }
}

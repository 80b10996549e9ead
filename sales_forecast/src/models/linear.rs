//! Linear regression over named features

use crate::error::{ForecastError, Result};
use crate::models::{check_batch_width, validate_feature_names, Regressor};
use serde::{Deserialize, Serialize};

/// `intercept + Σ coefficient · feature`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        validate_feature_names(&self.feature_names)?;

        if self.coefficients.len() != self.feature_names.len() {
            return Err(ForecastError::ModelError(format!(
                "Linear model has {} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelError(
                "Linear model parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "linear regression"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_batch_width(batch, self.feature_names.len())?;

        Ok(batch
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, c)| x * c)
                        .sum::<f64>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new(
            vec!["a".to_string(), "b".to_string()],
            vec![2.0, -1.0],
            0.5,
        )
        .unwrap();

        let predictions = model.predict(&[vec![1.0, 1.0], vec![3.0, 2.0]]).unwrap();
        assert_eq!(predictions, vec![1.5, 4.5]);
    }

    #[test]
    fn test_coefficient_count_must_match() {
        let result = LinearRegressor::new(vec!["a".to_string()], vec![1.0, 2.0], 0.0);
        assert!(matches!(result, Err(ForecastError::ModelError(_))));
    }
}

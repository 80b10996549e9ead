//! Trained regressors consumed by the predictor

use crate::error::{ForecastError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A trained point regressor over named features
pub trait Regressor: Debug + Send + Sync {
    /// Name of the model
    fn name(&self) -> &str;

    /// Feature names in the order rows passed to [`Regressor::predict`] must follow
    fn feature_names(&self) -> &[String];

    /// Predict one value per row of `batch`
    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Model artifact as stored on disk, tagged by `model_type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    ObliviousTrees(ObliviousTreeEnsemble),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::ObliviousTrees(model) => model.validate(),
        }
    }

    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            ModelArtifact::Linear(model) => Box::new(model),
            ModelArtifact::ObliviousTrees(model) => Box::new(model),
        }
    }
}

/// Load and validate a JSON model artifact
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Box<dyn Regressor>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))?;
    artifact.validate()?;

    let model = artifact.into_regressor();
    log::info!(
        "loaded {} from {} ({} features)",
        model.name(),
        path.display(),
        model.feature_names().len()
    );
    Ok(model)
}

/// Reject empty or duplicated feature name lists
pub(crate) fn validate_feature_names(names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(ForecastError::ModelError(
            "Model declares no feature names".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(ForecastError::ModelError(format!(
            "Duplicate feature name: {}",
            duplicate
        )));
    }

    Ok(())
}

/// Ensure every row has one value per declared feature
pub(crate) fn check_batch_width(batch: &[Vec<f64>], width: usize) -> Result<()> {
    if let Some((index, row)) = batch.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(ForecastError::ModelError(format!(
            "Row {} has {} values, model expects {}",
            index,
            row.len(),
            width
        )));
    }
    Ok(())
}

pub mod linear;
pub mod oblivious;

pub use linear::LinearRegressor;
pub use oblivious::{ObliviousTree, ObliviousTreeEnsemble, TreeSplit};

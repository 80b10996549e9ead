//! End-to-end forecasting: transactions in, predictions out

use crate::aggregate::aggregate;
use crate::config::ForecastConfig;
use crate::data::{Month, Transaction};
use crate::error::{ForecastError, Result};
use crate::features::FeatureBuilder;
use crate::models::{load_model, Regressor};
use crate::predict::{predict, PredictionTable};

/// A configured feature builder bound to a loaded model
#[derive(Debug)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    model: Box<dyn Regressor>,
}

impl ForecastPipeline {
    /// Load the model named by `config.model_path`
    pub fn from_config(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let path = config.model_path.as_ref().ok_or_else(|| {
            ForecastError::InvalidParameter("No model path configured".to_string())
        })?;
        let model = load_model(path)?;
        Ok(Self { config, model })
    }

    /// Use an already constructed model
    pub fn with_model(config: ForecastConfig, model: Box<dyn Regressor>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// Predict the volume of every group in `transactions` for `target`
    pub fn run(&self, transactions: &[Transaction], target: Month) -> Result<PredictionTable> {
        let builder = FeatureBuilder::new(self.config.history_policy);
        run_with(&builder, transactions, target, self.model.as_ref())
    }
}

/// Forecast `target` with the default history policy
pub fn forecast<R: Regressor + ?Sized>(
    transactions: &[Transaction],
    target: Month,
    model: &R,
) -> Result<PredictionTable> {
    run_with(&FeatureBuilder::default(), transactions, target, model)
}

fn run_with<R: Regressor + ?Sized>(
    builder: &FeatureBuilder,
    transactions: &[Transaction],
    target: Month,
    model: &R,
) -> Result<PredictionTable> {
    let matrix = aggregate(transactions);
    let features = builder.build(&matrix, target)?;
    let predictions = predict(&features, model)?;

    log::info!(
        "forecast {} with {}: {} transactions, {} groups",
        target,
        model.name(),
        transactions.len(),
        predictions.len()
    );
    Ok(predictions)
}

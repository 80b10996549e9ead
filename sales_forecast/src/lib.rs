//! # Sales Forecast
//!
//! Monthly sales-volume forecasts per (material, company, country, region,
//! manager) from a transaction history and a pre-trained regressor.
//!
//! ## Pipeline
//!
//! - **Aggregation**: transactions are summed into a group × month matrix with
//!   a contiguous month range; months without sales hold zero.
//! - **Features**: for a target month each group gets `month`, the six
//!   preceding monthly volumes `vol_tm6..vol_tm1` and the trailing 12-month
//!   `last_year_avg`, `last_year_min`, `last_year_max`. Nothing dated at or
//!   after the target month is read.
//! - **Prediction**: the regressor receives one batch in its own feature order
//!   and each prediction is paired with its group key.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::{load_model, forecast, Month, TransactionLoader};
//!
//! let transactions = TransactionLoader::from_csv("transactions.csv")?;
//! let model = load_model("baseline_model.json")?;
//! let target: Month = "2021-07".parse()?;
//!
//! let predictions = forecast(&transactions, target, model.as_ref())?;
//! predictions.write_csv(std::io::stdout())?;
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod predict;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{aggregate, VolumeMatrix};
pub use crate::config::ForecastConfig;
pub use crate::data::{GroupKey, Month, Transaction, TransactionLoader};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{
    build_features, Feature, FeatureBuilder, FeatureTable, FeatureVector, HistoryPolicy,
};
pub use crate::models::{load_model, Regressor};
pub use crate::pipeline::{forecast, ForecastPipeline};
pub use crate::predict::{predict, PredictionRecord, PredictionTable, OUTPUT_COLUMNS};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

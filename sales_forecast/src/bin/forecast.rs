//! forecast: predict monthly sales volume for every group in a transaction file.
//!
//! Usage:
//!   forecast --transactions sales.csv --month 2021-07 --model model.json
//!   forecast --transactions sales.csv --month 2021-07 --config forecast.json --output preds.csv

use anyhow::{Context, Result};
use clap::Parser;
use sales_forecast::{ForecastConfig, ForecastPipeline, HistoryPolicy, Month, TransactionLoader};
use std::io;
use std::path::PathBuf;

/// Monthly sales-volume forecast from a transaction history
#[derive(Parser, Debug)]
#[command(name = "forecast", version, about)]
struct Args {
    /// CSV with material_code, company_code, country, region, manager_code, month, volume
    #[arg(short, long)]
    transactions: PathBuf,

    /// Target month (YYYY-MM)
    #[arg(short, long)]
    month: Month,

    /// JSON model artifact (overrides the config file)
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// zero-fill or reject (overrides the config file)
    #[arg(long)]
    history_policy: Option<HistoryPolicy>,

    /// Output CSV; predictions go to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(model) = args.model {
        config = config.with_model_path(model);
    }
    if let Some(policy) = args.history_policy {
        config = config.with_history_policy(policy);
    }

    let transactions = TransactionLoader::from_config(&config)?
        .load(&args.transactions)
        .with_context(|| format!("loading transactions from {}", args.transactions.display()))?;

    let pipeline = ForecastPipeline::from_config(config).context("loading model")?;
    let predictions = pipeline
        .run(&transactions, args.month)
        .with_context(|| format!("forecasting {}", args.month))?;

    match &args.output {
        Some(path) => {
            predictions
                .to_csv_file(path)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} predictions to {}", predictions.len(), path.display());
        }
        None => predictions.write_csv(io::stdout().lock())?,
    }

    Ok(())
}

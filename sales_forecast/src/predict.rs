//! Prediction assembly over a feature table

use crate::data::GroupKey;
use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::models::Regressor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output columns, in order
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "material_code",
    "company_code",
    "country",
    "region",
    "manager_code",
    "prediction",
];

/// Predicted volume for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub material_code: String,
    pub company_code: String,
    pub country: String,
    pub region: String,
    pub manager_code: String,
    pub prediction: f64,
}

impl PredictionRecord {
    pub fn new(key: GroupKey, prediction: f64) -> Self {
        Self {
            material_code: key.material_code,
            company_code: key.company_code,
            country: key.country,
            region: key.region,
            manager_code: key.manager_code,
            prediction,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::new(
            self.material_code.as_str(),
            self.company_code.as_str(),
            self.country.as_str(),
            self.region.as_str(),
            self.manager_code.as_str(),
        )
    }
}

/// Predictions in feature-table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionTable {
    records: Vec<PredictionRecord>,
}

impl PredictionTable {
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<PredictionRecord> {
        self.records
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(OUTPUT_COLUMNS)?;
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}

/// Apply `model` to every row of `features` in a single batch
///
/// Columns are selected in the model's feature order; a name the table lacks
/// fails the whole call with [`ForecastError::MissingFeatureColumn`].
pub fn predict<R: Regressor + ?Sized>(features: &FeatureTable, model: &R) -> Result<PredictionTable> {
    let batch = features.select(model.feature_names())?;

    if batch.is_empty() {
        log::debug!("no feature rows for {}, skipping {}", features.target(), model.name());
        return Ok(PredictionTable::default());
    }

    let values = model.predict(&batch)?;
    if values.len() != features.len() {
        return Err(ForecastError::ModelError(format!(
            "{} returned {} predictions for {} rows",
            model.name(),
            values.len(),
            features.len()
        )));
    }

    let records = features
        .keys()
        .zip(values)
        .map(|(key, prediction)| PredictionRecord::new(key.clone(), prediction))
        .collect();

    Ok(PredictionTable::new(records))
}

//! Transaction data handling for forecasting

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from a year and a month number (1-12)
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!("Invalid month: {year}-{month:02}"))
            })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month number, 1 through 12
    pub fn number(&self) -> u32 {
        self.0.month()
    }

    /// Move forward (positive) or backward (negative) by whole calendar months
    pub fn shift(&self, months: i32) -> Result<Self> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };

        shifted.map(Self).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Month {} shifted by {} is out of range",
                self, months
            ))
        })
    }

    /// The following month, if representable
    pub fn succ(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Signed number of months from `self` to `later`
    pub fn months_until(&self, later: Month) -> i64 {
        let years = i64::from(later.year()) - i64::from(self.year());
        years * 12 + i64::from(later.number()) - i64::from(self.number())
    }

    /// All months from `first` to `last` inclusive, ascending
    pub fn range(first: Month, last: Month) -> Vec<Month> {
        std::iter::successors(Some(first), Month::succ)
            .take_while(|month| *month <= last)
            .collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// Accepts `YYYY-MM` or `YYYY-MM-DD`; the day is discarded
impl FromStr for Month {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")?,
        };
        Ok(Self::from_date(date))
    }
}

/// Identifies one forecastable series
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub material_code: String,
    pub company_code: String,
    pub country: String,
    pub region: String,
    pub manager_code: String,
}

impl GroupKey {
    pub fn new(
        material_code: impl Into<String>,
        company_code: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
        manager_code: impl Into<String>,
    ) -> Self {
        Self {
            material_code: material_code.into(),
            company_code: company_code.into(),
            country: country.into(),
            region: region.into(),
            manager_code: manager_code.into(),
        }
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.material_code,
            &self.company_code,
            &self.country,
            &self.region,
            &self.manager_code,
        ]
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields().join("/"))
    }
}

/// A single sales transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub key: GroupKey,
    pub month: Month,
    /// Sold volume; returns and adjustments may be zero or negative
    pub volume: f64,
}

impl Transaction {
    pub fn new(key: GroupKey, month: Month, volume: f64) -> Self {
        Self { key, month, volume }
    }
}

/// Raw CSV row before validation
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    material_code: String,
    company_code: String,
    country: String,
    region: String,
    manager_code: String,
    month: String,
    volume: f64,
}

/// Loader for transaction tables stored as CSV
#[derive(Debug, Clone)]
pub struct TransactionLoader {
    delimiter: u8,
    date_format: String,
}

impl Default for TransactionLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl TransactionLoader {
    /// Load transactions from a comma-separated file with ISO dates
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
        Self::default().load(path)
    }

    /// Create a loader using the delimiter and date format of `config`
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            delimiter: config.delimiter as u8,
            date_format: config.date_format.clone(),
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Load transactions from a CSV file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Transaction>> {
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read transactions from any CSV source with a header row
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut transactions = Vec::new();
        for (index, record) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            transactions.push(self.convert(record?, index + 1)?);
        }

        log::debug!("loaded {} transactions", transactions.len());
        Ok(transactions)
    }

    fn convert(&self, record: TransactionRecord, number: usize) -> Result<Transaction> {
        let key = GroupKey {
            material_code: record.material_code,
            company_code: record.company_code,
            country: record.country,
            region: record.region,
            manager_code: record.manager_code,
        };

        if key.fields().iter().any(|field| field.is_empty()) {
            return Err(ForecastError::DataError(format!(
                "Record {}: empty group key field in {}",
                number, key
            )));
        }

        if !record.volume.is_finite() {
            return Err(ForecastError::DataError(format!(
                "Record {}: volume must be finite, got {}",
                number, record.volume
            )));
        }

        let month = self.parse_month(&record.month).map_err(|_| {
            ForecastError::DataError(format!(
                "Record {}: cannot parse month '{}'",
                number, record.month
            ))
        })?;

        Ok(Transaction::new(key, month, record.volume))
    }

    fn parse_month(&self, raw: &str) -> Result<Month> {
        match NaiveDate::parse_from_str(raw, &self.date_format) {
            Ok(date) => Ok(Month::from_date(date)),
            Err(_) => raw.parse(),
        }
    }
}

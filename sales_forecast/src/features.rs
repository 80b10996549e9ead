//! Feature derivation for a target month
//!
//! Each group gets the calendar month of the target, the six monthly volumes
//! preceding it and trailing twelve-month statistics. Only months strictly
//! before the target are ever read.

use crate::aggregate::VolumeMatrix;
use crate::data::{GroupKey, Month};
use crate::error::{ForecastError, Result};
use crate::utils::{trailing_stats, WindowStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of lag months, `vol_tm6` through `vol_tm1`
pub const LAG_MONTHS: usize = 6;

/// Longest trailing window for the `last_year_*` statistics
pub const ROLLING_WINDOW: usize = 12;

/// A named model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Month,
    VolTm6,
    VolTm5,
    VolTm4,
    VolTm3,
    VolTm2,
    VolTm1,
    LastYearAvg,
    LastYearMin,
    LastYearMax,
}

impl Feature {
    /// Every feature in the order the baseline model was trained with
    pub const ALL: [Feature; 10] = [
        Feature::Month,
        Feature::VolTm6,
        Feature::VolTm5,
        Feature::VolTm4,
        Feature::VolTm3,
        Feature::VolTm2,
        Feature::VolTm1,
        Feature::LastYearAvg,
        Feature::LastYearMin,
        Feature::LastYearMax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Month => "month",
            Feature::VolTm6 => "vol_tm6",
            Feature::VolTm5 => "vol_tm5",
            Feature::VolTm4 => "vol_tm4",
            Feature::VolTm3 => "vol_tm3",
            Feature::VolTm2 => "vol_tm2",
            Feature::VolTm1 => "vol_tm1",
            Feature::LastYearAvg => "last_year_avg",
            Feature::LastYearMin => "last_year_min",
            Feature::LastYearMax => "last_year_max",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Features of one group for one target month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Calendar month of the target, 1-12
    pub month: u32,
    /// `vol_tm6` .. `vol_tm1`, oldest first
    pub lags: [f64; LAG_MONTHS],
    pub last_year_avg: f64,
    pub last_year_min: f64,
    pub last_year_max: f64,
}

impl FeatureVector {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Month => f64::from(self.month),
            Feature::VolTm6 => self.lags[0],
            Feature::VolTm5 => self.lags[1],
            Feature::VolTm4 => self.lags[2],
            Feature::VolTm3 => self.lags[3],
            Feature::VolTm2 => self.lags[4],
            Feature::VolTm1 => self.lags[5],
            Feature::LastYearAvg => self.last_year_avg,
            Feature::LastYearMin => self.last_year_min,
            Feature::LastYearMax => self.last_year_max,
        }
    }
}

/// Handling of lag months that precede all observed history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Missing months count as zero volume and a warning is logged
    #[default]
    ZeroFill,
    /// Missing months fail the call with `InsufficientHistory`
    Reject,
}

impl FromStr for HistoryPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "zero_fill" => Ok(HistoryPolicy::ZeroFill),
            "reject" => Ok(HistoryPolicy::Reject),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown history policy: {}",
                other
            ))),
        }
    }
}

/// Feature rows for every group of a volume matrix
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    target: Month,
    columns: Vec<Feature>,
    rows: Vec<(GroupKey, FeatureVector)>,
}

impl FeatureTable {
    /// A table exposing every feature column
    pub fn new(target: Month, rows: Vec<(GroupKey, FeatureVector)>) -> Self {
        Self {
            target,
            columns: Feature::ALL.to_vec(),
            rows,
        }
    }

    pub fn target(&self) -> Month {
        self.target
    }

    pub fn columns(&self) -> &[Feature] {
        &self.columns
    }

    pub fn has_column(&self, feature: Feature) -> bool {
        self.columns.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(GroupKey, FeatureVector)] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.rows.iter().map(|(key, _)| key)
    }

    pub fn get(&self, key: &GroupKey) -> Option<&FeatureVector> {
        self.rows
            .iter()
            .find(|(row_key, _)| row_key == key)
            .map(|(_, features)| features)
    }

    /// Project a column out of the table
    pub fn without_column(mut self, feature: Feature) -> Self {
        self.columns.retain(|column| *column != feature);
        self
    }

    /// Values of the named columns, one inner vector per row in table order
    pub fn select(&self, names: &[String]) -> Result<Vec<Vec<f64>>> {
        let selected = names
            .iter()
            .map(|name| {
                Feature::from_name(name)
                    .filter(|feature| self.has_column(*feature))
                    .ok_or_else(|| ForecastError::MissingFeatureColumn(name.clone()))
            })
            .collect::<Result<Vec<Feature>>>()?;

        Ok(self
            .rows
            .iter()
            .map(|(_, features)| selected.iter().map(|f| features.value(*f)).collect())
            .collect())
    }
}

/// Derives feature tables from volume matrices
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    policy: HistoryPolicy,
}

impl FeatureBuilder {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Build one feature row per group of `matrix` for `target`
    pub fn build(&self, matrix: &VolumeMatrix, target: Month) -> Result<FeatureTable> {
        let end = target.shift(-1)?;
        let start = target.shift(-(LAG_MONTHS as i32))?;

        let Some(first) = matrix.first_month() else {
            return Ok(FeatureTable::new(target, Vec::new()));
        };

        // History runs from the first matrix column to `end`; months past the
        // last column had no transactions and read as zero.
        let history_len = usize::try_from(first.months_until(end) + 1).unwrap_or(0);
        let lag_offsets: Vec<Option<usize>> = (0..LAG_MONTHS as i64)
            .map(|i| usize::try_from(first.months_until(start) + i).ok())
            .collect();

        let available = lag_offsets.iter().filter(|offset| offset.is_some()).count();
        if available < LAG_MONTHS {
            match self.policy {
                HistoryPolicy::Reject => {
                    return Err(ForecastError::InsufficientHistory {
                        target: target.to_string(),
                        required: LAG_MONTHS,
                        available,
                    });
                }
                HistoryPolicy::ZeroFill => log::warn!(
                    "target {}: only {} of {} lag months observed since {}, zero-filling the rest",
                    target,
                    available,
                    LAG_MONTHS,
                    first
                ),
            }
        }

        let rows: Vec<(GroupKey, FeatureVector)> = matrix
            .iter()
            .map(|(key, row)| {
                let mut history: Vec<f64> = row.iter().copied().take(history_len).collect();
                history.resize(history_len, 0.0);

                let mut lags = [0.0; LAG_MONTHS];
                for (lag, offset) in lags.iter_mut().zip(&lag_offsets) {
                    *lag = offset
                        .and_then(|index| history.get(index))
                        .copied()
                        .unwrap_or(0.0);
                }

                let stats =
                    trailing_stats(&history, ROLLING_WINDOW).unwrap_or(WindowStats::ZERO);

                let features = FeatureVector {
                    month: target.number(),
                    lags,
                    last_year_avg: stats.mean,
                    last_year_min: stats.min,
                    last_year_max: stats.max,
                };
                (key.clone(), features)
            })
            .collect();

        log::debug!(
            "built features for {} groups, target {}, {} history months",
            rows.len(),
            target,
            history_len
        );

        Ok(FeatureTable::new(target, rows))
    }
}

/// Build features with the default zero-fill policy
pub fn build_features(matrix: &VolumeMatrix, target: Month) -> Result<FeatureTable> {
    FeatureBuilder::default().build(matrix, target)
}

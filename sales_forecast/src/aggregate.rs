//! Aggregation of raw transactions into a group × month volume matrix

use crate::data::{GroupKey, Month, Transaction};
use std::collections::{BTreeMap, HashMap};

/// Summed monthly volume per group over a contiguous range of months
///
/// Every row has exactly one value per month of [`VolumeMatrix::months`];
/// months without transactions hold zero. Rows are ordered by [`GroupKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeMatrix {
    months: Vec<Month>,
    rows: BTreeMap<GroupKey, Vec<f64>>,
}

impl VolumeMatrix {
    /// Column months, ascending and without gaps
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn first_month(&self) -> Option<Month> {
        self.months.first().copied()
    }

    pub fn last_month(&self) -> Option<Month> {
        self.months.last().copied()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Volumes of one group, aligned with [`VolumeMatrix::months`]
    pub fn row(&self, key: &GroupKey) -> Option<&[f64]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Cell value; `None` when the group is unknown or the month lies outside the columns
    pub fn volume(&self, key: &GroupKey, month: Month) -> Option<f64> {
        let index = self.column_index(month)?;
        self.rows.get(key).map(|row| row[index])
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupKey> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[f64])> {
        self.rows.iter().map(|(key, row)| (key, row.as_slice()))
    }

    fn column_index(&self, month: Month) -> Option<usize> {
        let first = self.first_month()?;
        let offset = usize::try_from(first.months_until(month)).ok()?;
        (offset < self.months.len()).then_some(offset)
    }
}

/// Sum transaction volume per (group, month) and pivot months into columns
pub fn aggregate(transactions: &[Transaction]) -> VolumeMatrix {
    let mut sums: BTreeMap<GroupKey, HashMap<Month, f64>> = BTreeMap::new();
    let mut span: Option<(Month, Month)> = None;

    for transaction in transactions {
        *sums
            .entry(transaction.key.clone())
            .or_default()
            .entry(transaction.month)
            .or_insert(0.0) += transaction.volume;

        span = Some(match span {
            Some((first, last)) => (first.min(transaction.month), last.max(transaction.month)),
            None => (transaction.month, transaction.month),
        });
    }

    let Some((first, last)) = span else {
        log::debug!("no transactions supplied, returning an empty matrix");
        return VolumeMatrix::default();
    };

    let months = Month::range(first, last);
    let rows: BTreeMap<GroupKey, Vec<f64>> = sums
        .into_iter()
        .map(|(key, by_month)| {
            let row = months
                .iter()
                .map(|month| by_month.get(month).copied().unwrap_or(0.0))
                .collect();
            (key, row)
        })
        .collect();

    log::debug!(
        "aggregated {} transactions into {} groups over {} months ({} to {})",
        transactions.len(),
        rows.len(),
        months.len(),
        first,
        last
    );

    VolumeMatrix { months, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, number: u32) -> Month {
        Month::new(year, number).unwrap()
    }

    #[test]
    fn test_gap_months_become_zero_columns() {
        let key = GroupKey::new("M1", "C1", "US", "NA", "Mgr1");
        let transactions = vec![
            Transaction::new(key.clone(), month(2021, 1), 5.0),
            Transaction::new(key.clone(), month(2021, 4), 7.0),
        ];

        let matrix = aggregate(&transactions);
        assert_eq!(matrix.months().len(), 4);
        assert_eq!(matrix.row(&key).unwrap(), &[5.0, 0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_volume_outside_columns_is_none() {
        let key = GroupKey::new("M1", "C1", "US", "NA", "Mgr1");
        let matrix = aggregate(&[Transaction::new(key.clone(), month(2021, 1), 5.0)]);

        assert_eq!(matrix.volume(&key, month(2021, 1)), Some(5.0));
        assert_eq!(matrix.volume(&key, month(2020, 12)), None);
        assert_eq!(matrix.volume(&key, month(2021, 2)), None);
    }
}

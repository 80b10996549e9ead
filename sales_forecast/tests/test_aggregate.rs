use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::{aggregate, GroupKey, Month, Transaction};

fn key(material: &str) -> GroupKey {
    GroupKey::new(material, "C1", "US", "NA", "Mgr1")
}

fn month(year: i32, number: u32) -> Month {
    Month::new(year, number).unwrap()
}

#[test]
fn test_empty_input_gives_empty_matrix() {
    let matrix = aggregate(&[]);
    assert!(matrix.is_empty());
    assert!(matrix.months().is_empty());
    assert_eq!(matrix.first_month(), None);
}

#[test]
fn test_volumes_are_summed_per_group_and_month() {
    let transactions = vec![
        Transaction::new(key("M1"), month(2021, 1), 10.0),
        Transaction::new(key("M1"), month(2021, 1), 5.0),
        Transaction::new(key("M1"), month(2021, 1), -3.0),
        Transaction::new(key("M1"), month(2021, 2), 1.0),
        Transaction::new(key("M2"), month(2021, 2), 8.0),
    ];

    let matrix = aggregate(&transactions);

    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.months(), &[month(2021, 1), month(2021, 2)]);
    assert_eq!(matrix.row(&key("M1")).unwrap(), &[12.0, 1.0]);
    // M2 had nothing in January
    assert_eq!(matrix.row(&key("M2")).unwrap(), &[0.0, 8.0]);
}

#[test]
fn test_rows_are_ordered_by_key() {
    let transactions = vec![
        Transaction::new(key("M3"), month(2021, 1), 1.0),
        Transaction::new(key("M1"), month(2021, 1), 1.0),
        Transaction::new(key("M2"), month(2021, 1), 1.0),
    ];

    let matrix = aggregate(&transactions);
    let order: Vec<&str> = matrix.groups().map(|k| k.material_code.as_str()).collect();
    assert_eq!(order, vec!["M1", "M2", "M3"]);
}

#[rstest]
#[case(month(2020, 11), month(2021, 2), 4)]
#[case(month(2021, 6), month(2021, 6), 1)]
#[case(month(2019, 1), month(2021, 12), 36)]
fn test_columns_cover_every_month_in_span(
    #[case] first: Month,
    #[case] last: Month,
    #[case] expected: usize,
) {
    let transactions = vec![
        Transaction::new(key("M1"), last, 2.0),
        Transaction::new(key("M2"), first, 1.0),
    ];

    let matrix = aggregate(&transactions);
    assert_eq!(matrix.months().len(), expected);
    assert_eq!(matrix.first_month(), Some(first));
    assert_eq!(matrix.last_month(), Some(last));
    for (_, row) in matrix.iter() {
        assert_eq!(row.len(), expected);
    }
}

#[test]
fn test_cell_equals_sum_of_transactions() {
    let mut transactions = Vec::new();
    for i in 0..60 {
        let material = if i % 3 == 0 { "M1" } else { "M2" };
        let m = month(2021, 1 + (i % 6) as u32);
        transactions.push(Transaction::new(key(material), m, f64::from(i)));
    }

    let matrix = aggregate(&transactions);
    for group in ["M1", "M2"] {
        for m in matrix.months() {
            let expected: f64 = transactions
                .iter()
                .filter(|t| t.key == key(group) && t.month == *m)
                .map(|t| t.volume)
                .sum();
            assert_eq!(matrix.volume(&key(group), *m), Some(expected));
        }
    }
}

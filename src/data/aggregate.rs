// src/data/aggregate.rs
//
// Chart-local aggregation helpers. Results are transient view models,
// recomputed on every render and never shared between charts. Group
// order follows first encounter in the row list so arc/series order is
// stable across frames.

use super::{Dataset, RowId};

/// Sum of `value_column` grouped by `key_column`. NaN cells are skipped,
/// matching how the charts treat unparseable metrics.
pub fn group_sum(
    data: &Dataset,
    rows: &[RowId],
    key_column: &str,
    value_column: &str,
) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for &row in rows {
        let key = data.cell(row, key_column);
        let value = data.number(row, value_column);
        if !value.is_finite() {
            continue;
        }
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, sum)) => *sum += value,
            None => groups.push((key.to_string(), value)),
        }
    }
    groups
}

/// Row count grouped by `key_column`.
pub fn group_count(data: &Dataset, rows: &[RowId], key_column: &str) -> Vec<(String, usize)> {
    let mut groups: Vec<(String, usize)> = Vec::new();
    for &row in rows {
        let key = data.cell(row, key_column);
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => groups.push((key.to_string(), 1)),
        }
    }
    groups
}

/// Two-level rollup: sum of `value_column` grouped by `outer_column`
/// then `inner_column` (e.g. product x year for the line chart).
pub fn group_sum_by_two(
    data: &Dataset,
    rows: &[RowId],
    outer_column: &str,
    inner_column: &str,
    value_column: &str,
) -> Vec<(String, Vec<(String, f64)>)> {
    let mut groups: Vec<(String, Vec<RowId>)> = Vec::new();
    for &row in rows {
        let key = data.cell(row, outer_column);
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, members)) => members.push(row),
            None => groups.push((key.to_string(), vec![row])),
        }
    }
    groups
        .into_iter()
        .map(|(key, members)| {
            let inner = group_sum(data, &members, inner_column, value_column);
            (key, inner)
        })
        .collect()
}

/// Top-`n` groups by share of the overall total, as percentages in
/// descending order. Groups outside the top `n` are dropped.
pub fn top_breakdown(sums: &[(String, f64)], n: usize) -> Vec<(String, f64)> {
    let total: f64 = sums.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut ranked: Vec<(String, f64)> = sums.to_vec();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(n)
        .map(|(key, value)| (key, value / total * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dataset(csv: &str) -> Dataset {
        Dataset::from_reader(Cursor::new(csv.to_string())).unwrap()
    }

    #[test]
    fn group_sum_by_category() {
        let data = dataset("cat,val\nA,10\nA,5\nB,3\n");
        let rows: Vec<_> = data.row_ids().collect();
        let sums = group_sum(&data, &rows, "cat", "val");
        assert_eq!(sums, vec![("A".to_string(), 15.0), ("B".to_string(), 3.0)]);
    }

    #[test]
    fn group_sum_skips_unparseable_values() {
        let data = dataset("cat,val\nA,10\nA,n/a\nB,3\n");
        let rows: Vec<_> = data.row_ids().collect();
        let sums = group_sum(&data, &rows, "cat", "val");
        assert_eq!(sums, vec![("A".to_string(), 10.0), ("B".to_string(), 3.0)]);
    }

    #[test]
    fn group_count_by_category() {
        let data = dataset("cat,val\nA,10\nA,5\nB,3\n");
        let rows: Vec<_> = data.row_ids().collect();
        let counts = group_count(&data, &rows, "cat");
        assert_eq!(counts, vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    }

    #[test]
    fn two_level_rollup() {
        let data = dataset(
            "product,year,value\noil,2021,5\noil,2022,7\ngas,2021,2\noil,2021,1\n",
        );
        let rows: Vec<_> = data.row_ids().collect();
        let nested = group_sum_by_two(&data, &rows, "product", "year", "value");
        assert_eq!(
            nested,
            vec![
                (
                    "oil".to_string(),
                    vec![("2021".to_string(), 6.0), ("2022".to_string(), 7.0)]
                ),
                ("gas".to_string(), vec![("2021".to_string(), 2.0)]),
            ]
        );
    }

    #[test]
    fn top_three_by_percentage() {
        let sums = vec![
            ("x".to_string(), 50.0),
            ("y".to_string(), 30.0),
            ("z".to_string(), 15.0),
            ("w".to_string(), 5.0),
        ];
        let top = top_breakdown(&sums, 3);
        assert_eq!(
            top,
            vec![
                ("x".to_string(), 50.0),
                ("y".to_string(), 30.0),
                ("z".to_string(), 15.0),
            ]
        );
    }

    #[test]
    fn top_breakdown_of_empty_total() {
        assert!(top_breakdown(&[], 3).is_empty());
        assert!(top_breakdown(&[("a".to_string(), 0.0)], 3).is_empty());
    }
}

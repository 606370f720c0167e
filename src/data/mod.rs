// src/data/mod.rs
use std::io::Read;
use anyhow::{Context, Result};

pub mod aggregate;

/// Identity of a row within the current dataset. A selection never
/// survives a dataset replacement, so indices cannot dangle.
pub type RowId = usize;

/// The parsed CSV dataset: a header-defined column list plus one string
/// cell per column per row. Replaced wholesale on every file load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()
            .context("CSV file has no header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Malformed CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_ids(&self) -> std::ops::Range<RowId> {
        0..self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value as text; empty string when the column or row is absent.
    pub fn cell(&self, row: RowId, column: &str) -> &str {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Numeric coercion of a cell. Failures yield NaN, which flows
    /// silently into scale domains rather than erroring.
    pub fn number(&self, row: RowId, column: &str) -> f64 {
        self.cell(row, column).trim().parse().unwrap_or(f64::NAN)
    }

    /// Attribute names eligible for axis binding: every column except
    /// the excluded identifier/category columns.
    pub fn dimensions(&self, excluded: &[&str]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !excluded.contains(&c.as_str()))
            .cloned()
            .collect()
    }

    /// Distinct values of a column, sorted (used for the year selector).
    pub fn distinct_sorted(&self, column: &str) -> Vec<String> {
        let mut values = self.distinct_in_order(column);
        values.sort();
        values
    }

    /// Distinct values of a column in encounter order (used for the bar
    /// chart's initial band order).
    pub fn distinct_in_order(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut values: Vec<String> = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.get(idx) {
                if !values.iter().any(|seen| seen == v) {
                    values.push(v.clone());
                }
            }
        }
        values
    }

    /// Linear scale domain of a numeric column, ignoring NaN cells.
    pub fn column_extent(&self, column: &str) -> Option<(f64, f64)> {
        extent(self.row_ids().map(|row| self.number(row, column)))
    }
}

/// (min, max) over the finite values of an iterator, or None when no
/// finite value exists.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let mut result: Option<(f64, f64)> = None;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        result = Some(match result {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn iris_like() -> Dataset {
        let csv = "\
Id,SepalLengthCm,SepalWidthCm,species
1,5.1,3.5,setosa
2,4.9,3.0,setosa
3,7.0,oops,versicolor
";
        Dataset::from_reader(Cursor::new(csv)).unwrap()
    }

    #[test]
    fn parses_header_and_rows() {
        let data = iris_like();
        assert_eq!(data.columns(), &["Id", "SepalLengthCm", "SepalWidthCm", "species"]);
        assert_eq!(data.len(), 3);
        assert_eq!(data.cell(0, "species"), "setosa");
    }

    #[test]
    fn numeric_coercion_failure_is_nan() {
        let data = iris_like();
        assert_eq!(data.number(0, "SepalWidthCm"), 3.5);
        assert!(data.number(2, "SepalWidthCm").is_nan());
        assert!(data.number(0, "missing_column").is_nan());
    }

    #[test]
    fn dimensions_exclude_reserved_columns() {
        let data = iris_like();
        let dims = data.dimensions(&["Id", "species"]);
        assert_eq!(dims, vec!["SepalLengthCm".to_string(), "SepalWidthCm".to_string()]);
    }

    #[test]
    fn extent_is_min_max_of_finite_values() {
        assert_eq!(extent([1.0, 5.0, 3.0]), Some((1.0, 5.0)));
        assert_eq!(extent([f64::NAN, 2.0, f64::NAN]), Some((2.0, 2.0)));
        assert_eq!(extent([f64::NAN]), None);
        assert_eq!(extent([]), None);
    }

    #[test]
    fn distinct_values_in_order_and_sorted() {
        let csv = "year,country\n2022,B\n2021,A\n2022,B\n2021,C\n";
        let data = Dataset::from_reader(Cursor::new(csv)).unwrap();
        assert_eq!(data.distinct_in_order("country"), vec!["B", "A", "C"]);
        assert_eq!(data.distinct_sorted("year"), vec!["2021", "2022"]);
    }
}

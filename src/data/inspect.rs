use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::coerce::is_numeric_cell;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// ColumnType – inferred kind of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Every cell is empty or a finite number.
    Numeric,
    /// At least one cell is non-empty text that is not a number.
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "number"),
            ColumnType::Categorical => write!(f, "text"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnMetadata – what block authoring needs to know about the columns
// ---------------------------------------------------------------------------

/// Per-column type and, for categorical columns, their distinct values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMetadata {
    pub types: BTreeMap<String, ColumnType>,
    /// Distinct raw values in first-occurrence order (categorical columns only).
    pub distinct_values: BTreeMap<String, Vec<String>>,
}

impl ColumnMetadata {
    /// Inspect every column of `dataset`.
    pub fn inspect(dataset: &Dataset) -> Self {
        let mut meta = ColumnMetadata::default();

        for col in &dataset.column_names {
            // A missing cell reads as non-numeric text.
            let numeric = dataset
                .rows
                .iter()
                .all(|row| row.get(col).is_some_and(|raw| is_numeric_cell(raw)));

            if numeric {
                meta.types.insert(col.clone(), ColumnType::Numeric);
                continue;
            }

            meta.types.insert(col.clone(), ColumnType::Categorical);
            let mut seen = HashSet::new();
            let distinct: Vec<String> = dataset
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|raw| seen.insert(raw.as_str()))
                .cloned()
                .collect();
            meta.distinct_values.insert(col.clone(), distinct);
        }

        meta
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.types.get(column).copied()
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.column_type(column) == Some(ColumnType::Numeric)
    }

    /// Distinct values of a categorical column; empty for numeric or unknown
    /// columns.
    pub fn distinct(&self, column: &str) -> &[String] {
        self.distinct_values
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[&[(&str, &str)]]) -> Dataset {
        Dataset::from_records(rows.iter().map(|r| r.iter().copied()))
    }

    #[test]
    fn numeric_and_categorical_columns() {
        let ds = dataset(&[
            &[("age", "10"), ("city", "A")],
            &[("age", "20"), ("city", "B")],
        ]);
        let meta = ColumnMetadata::inspect(&ds);

        assert_eq!(meta.column_type("age"), Some(ColumnType::Numeric));
        assert_eq!(meta.column_type("city"), Some(ColumnType::Categorical));
        assert_eq!(meta.distinct("city"), ["A", "B"]);
        assert!(meta.distinct("age").is_empty());
        assert!(!meta.distinct_values.contains_key("age"));
    }

    #[test]
    fn one_text_cell_makes_column_categorical() {
        let ds = dataset(&[
            &[("score", "1")],
            &[("score", "2")],
            &[("score", "n/a")],
            &[("score", "3")],
        ]);
        let meta = ColumnMetadata::inspect(&ds);

        assert_eq!(meta.column_type("score"), Some(ColumnType::Categorical));
        assert_eq!(meta.distinct("score"), ["1", "2", "n/a", "3"]);
    }

    #[test]
    fn empty_cells_keep_column_numeric() {
        let ds = dataset(&[&[("v", "")], &[("v", "4.5")], &[("v", "")]]);
        assert!(ColumnMetadata::inspect(&ds).is_numeric("v"));
    }

    #[test]
    fn distinct_values_keep_first_occurrence_order() {
        let ds = dataset(&[
            &[("c", "zebra")],
            &[("c", "apple")],
            &[("c", "zebra")],
            &[("c", "")],
            &[("c", "apple")],
        ]);
        let meta = ColumnMetadata::inspect(&ds);
        assert_eq!(meta.distinct("c"), ["zebra", "apple", ""]);
    }

    #[test]
    fn empty_dataset_has_no_metadata() {
        let meta = ColumnMetadata::inspect(&Dataset::default());
        assert!(meta.types.is_empty());
        assert!(meta.distinct_values.is_empty());
    }
}

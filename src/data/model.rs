use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Row – one record of the source table
// ---------------------------------------------------------------------------

/// A single row: column_name → raw cell text.
///
/// Cells are kept exactly as read; numeric interpretation happens on demand
/// through [`crate::data::coerce`].
pub type Row = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table.
///
/// Rows are maps, so column *order* is recorded once here, taken from the
/// first record's keys. Every row is assumed to carry the same columns; this
/// is not enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Ordered list of column names.
    pub column_names: Vec<String>,
    /// All rows, in source order.
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from ordered `(column, value)` records.
    ///
    /// The column list is the key order of the first record.
    pub fn from_records<I, R, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut column_names = Vec::new();
        let mut rows = Vec::new();

        for (i, record) in records.into_iter().enumerate() {
            let mut row = Row::new();
            for (key, value) in record {
                let key = key.into();
                if i == 0 && !row.contains_key(&key) {
                    column_names.push(key.clone());
                }
                row.insert(key, value.into());
            }
            rows.push(row);
        }

        Dataset { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cell text, or `None` if the row or column does not exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Whether `column` is one of the dataset's columns.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_follows_first_record() {
        let ds = Dataset::from_records(vec![
            vec![("zeta", "1"), ("alpha", "x")],
            vec![("alpha", "y"), ("zeta", "2")],
        ]);
        assert_eq!(ds.column_names, vec!["zeta", "alpha"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(1, "zeta"), Some("2"));
        assert_eq!(ds.cell(1, "missing"), None);
        assert_eq!(ds.cell(5, "zeta"), None);
    }

    #[test]
    fn empty_records_give_empty_dataset() {
        let ds = Dataset::from_records(Vec::<Vec<(String, String)>>::new());
        assert!(ds.is_empty());
        assert!(ds.column_names.is_empty());
        assert!(!ds.has_column("a"));
    }
}

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::coerce::{parse_number, strict_number};
use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

/// Operator of a row condition.
///
/// Text that is not a known symbol is kept as `Unsupported` so that it can be
/// shown back to the user; such a condition matches no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComparisonOp {
    #[default]
    Eq,
    Ne,
    Gt,
    Lt,
    Unsupported(String),
}

impl ComparisonOp {
    /// Operators offered for categorical columns.
    pub const CATEGORICAL: [ComparisonOp; 2] = [ComparisonOp::Eq, ComparisonOp::Ne];
    /// Operators offered for numeric columns.
    pub const NUMERIC: [ComparisonOp; 4] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
    ];

    pub fn symbol(&self) -> &str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Unsupported(s) => s,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "==" => ComparisonOp::Eq,
            "!=" => ComparisonOp::Ne,
            ">" => ComparisonOp::Gt,
            "<" => ComparisonOp::Lt,
            other => ComparisonOp::Unsupported(other.to_string()),
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Condition – (column, operator, value)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: ComparisonOp,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: ComparisonOp, value: impl Into<String>) -> Self {
        Condition {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Whether `row` satisfies the condition.
    ///
    /// * `==` / `!=`: numeric comparison when both sides are whole numbers,
    ///   plain string comparison otherwise.
    /// * `>` / `<`: both sides parsed as numbers; false if either fails.
    /// * A missing cell never equals anything.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.column).map(String::as_str);
        match &self.operator {
            ComparisonOp::Eq => cell.is_some_and(|raw| loose_eq(raw, &self.value)),
            ComparisonOp::Ne => !cell.is_some_and(|raw| loose_eq(raw, &self.value)),
            ComparisonOp::Gt => compare_numbers(cell, &self.value, |a, b| a > b),
            ComparisonOp::Lt => compare_numbers(cell, &self.value, |a, b| a < b),
            ComparisonOp::Unsupported(_) => false,
        }
    }
}

fn loose_eq(cell: &str, value: &str) -> bool {
    match (strict_number(cell), strict_number(value)) {
        (Some(a), Some(b)) => a == b,
        _ => cell == value,
    }
}

fn compare_numbers(cell: Option<&str>, value: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (cell.and_then(parse_number), parse_number(value)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the rows of `dataset` satisfying `condition`, in source order.
pub fn filter_rows<'a>(dataset: &'a Dataset, condition: &Condition) -> Vec<&'a Row> {
    dataset
        .rows
        .iter()
        .filter(|row| condition.matches(row))
        .collect()
}

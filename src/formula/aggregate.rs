use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::data::coerce::{coerce_number, parse_number};
use crate::data::model::Row;

use super::eval::Diagnostic;

// ---------------------------------------------------------------------------
// Aggregation kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Aggregation {
    #[default]
    Sum,
    Average,
    /// Unknown kind; aggregates to `0`.
    Unsupported(String),
}

impl Aggregation {
    pub const ALL: [Aggregation; 2] = [Aggregation::Sum, Aggregation::Average];

    pub fn name(&self) -> &str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Average => "average",
            Aggregation::Unsupported(s) => s,
        }
    }
}

impl FromStr for Aggregation {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sum" => Aggregation::Sum,
            "average" | "avg" => Aggregation::Average,
            other => Aggregation::Unsupported(other.to_string()),
        })
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Reduce `column` over `rows`.
///
/// Cells that do not parse count as `0`. Non-empty unparseable cells are
/// reported through `diagnostics`; empty cells are silently zero.
/// The average of no rows is `0`.
pub fn aggregate(
    rows: &[&Row],
    column: &str,
    kind: &Aggregation,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    let total: f64 = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let raw = row.get(column).map(String::as_str).unwrap_or("");
            if !raw.is_empty() && parse_number(raw).is_none() {
                diagnostics.push(Diagnostic::UnparseableCell {
                    row: i,
                    column: column.to_string(),
                    raw: raw.to_string(),
                });
            }
            coerce_number(raw)
        })
        .sum();

    match kind {
        Aggregation::Sum => total,
        Aggregation::Average if rows.is_empty() => 0.0,
        Aggregation::Average => total / rows.len() as f64,
        Aggregation::Unsupported(name) => {
            diagnostics.push(Diagnostic::UnsupportedAggregation(name.clone()));
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<Row> {
        values
            .iter()
            .map(|v| Row::from([("x".to_string(), v.to_string())]))
            .collect()
    }

    #[test]
    fn sum_treats_unparseable_as_zero() {
        let data = rows(&["10", "20", "oops"]);
        let refs: Vec<&Row> = data.iter().collect();
        let mut diags = Vec::new();

        assert_eq!(aggregate(&refs, "x", &Aggregation::Sum, &mut diags), 30.0);
        assert_eq!(
            diags,
            [Diagnostic::UnparseableCell {
                row: 2,
                column: "x".into(),
                raw: "oops".into()
            }]
        );
    }

    #[test]
    fn average_divides_by_row_count() {
        let data = rows(&["1", "", "5"]);
        let refs: Vec<&Row> = data.iter().collect();
        let mut diags = Vec::new();

        assert_eq!(aggregate(&refs, "x", &Aggregation::Average, &mut diags), 2.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn average_of_nothing_is_zero() {
        let mut diags = Vec::new();
        let value = aggregate(&[], "x", &Aggregation::Average, &mut diags);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn unsupported_kind_yields_zero() {
        let data = rows(&["3"]);
        let refs: Vec<&Row> = data.iter().collect();
        let mut diags = Vec::new();
        let kind: Aggregation = "median".parse().unwrap();

        assert_eq!(aggregate(&refs, "x", &kind, &mut diags), 0.0);
        assert_eq!(diags, [Diagnostic::UnsupportedAggregation("median".into())]);
    }

    #[test]
    fn avg_is_an_alias() {
        assert_eq!("avg".parse::<Aggregation>().unwrap(), Aggregation::Average);
        assert_eq!(Aggregation::Average.to_string(), "average");
    }
}

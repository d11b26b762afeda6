use std::fmt;

use crate::data::filter::{filter_rows, ComparisonOp};
use crate::data::model::Dataset;

use super::aggregate::aggregate;
use super::block::{CombineOp, Formula, FormulaBlock};

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Something questionable noticed while evaluating.
///
/// Diagnostics are informational: the numeric result is the same whether or
/// not any are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A non-empty target cell that is not a number; counted as `0`.
    /// `row` is the position within the filtered rows.
    UnparseableCell { row: usize, column: String, raw: String },
    /// A condition operator that matches no rows.
    UnsupportedComparison(String),
    /// An aggregation kind that yields `0`.
    UnsupportedAggregation(String),
    /// A combinator that leaves the running value unchanged.
    UnsupportedCombinator(String),
    /// A block refers to a column the dataset does not have.
    UnknownColumn(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnparseableCell { row, column, raw } => {
                write!(f, "'{raw}' in column '{column}' (matched row {row}) is not a number, counted as 0")
            }
            Diagnostic::UnsupportedComparison(op) => {
                write!(f, "unsupported comparison '{op}', no rows match")
            }
            Diagnostic::UnsupportedAggregation(kind) => {
                write!(f, "unsupported aggregation '{kind}', value is 0")
            }
            Diagnostic::UnsupportedCombinator(op) => {
                write!(f, "unsupported operator '{op}', value passed through")
            }
            Diagnostic::UnknownColumn(col) => write!(f, "unknown column '{col}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Block evaluation
// ---------------------------------------------------------------------------

/// Resolve one block to its interim value.
pub fn evaluate_block(dataset: &Dataset, block: &FormulaBlock, diagnostics: &mut Vec<Diagnostic>) -> f64 {
    match block {
        FormulaBlock::Constant { value } => *value,
        FormulaBlock::ConditionalAggregate {
            condition,
            target_column,
            aggregation,
        } => {
            if let ComparisonOp::Unsupported(op) = &condition.operator {
                diagnostics.push(Diagnostic::UnsupportedComparison(op.clone()));
            }
            for col in [&condition.column, target_column] {
                if !dataset.is_empty() && !dataset.has_column(col) {
                    diagnostics.push(Diagnostic::UnknownColumn(col.clone()));
                }
            }

            let rows = filter_rows(dataset, condition);
            aggregate(&rows, target_column, aggregation, diagnostics)
        }
    }
}

// ---------------------------------------------------------------------------
// Sequential combination
// ---------------------------------------------------------------------------

/// Fold `curr` into `acc`.
///
/// Division by a zero `curr` yields `0`. Unsupported operators return `acc`
/// unchanged.
pub fn combine(acc: f64, curr: f64, op: &CombineOp) -> f64 {
    match op {
        CombineOp::Add => acc + curr,
        CombineOp::Sub => acc - curr,
        CombineOp::Mul => acc * curr,
        CombineOp::Div => {
            if curr != 0.0 {
                acc / curr
            } else {
                0.0
            }
        }
        CombineOp::Unsupported(_) => acc,
    }
}

/// Left fold of `values`, where `operators[i - 1]` folds in `values[i]`.
///
/// A missing operator defaults to `+`. Returns `None` for no values.
pub fn fold_interim(values: &[f64], operators: &[CombineOp]) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    let default_op = CombineOp::default();
    let result = rest.iter().enumerate().fold(*first, |acc, (i, &curr)| {
        combine(acc, curr, operators.get(i).unwrap_or(&default_op))
    });
    Some(result)
}

// ---------------------------------------------------------------------------
// Whole-formula computation
// ---------------------------------------------------------------------------

/// Output of one explicit computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeOutcome {
    /// One value per block, index-aligned with the formula.
    pub interim_values: Vec<f64>,
    /// `None` when the formula has no blocks.
    pub final_result: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Evaluate every block of `formula` against `dataset` and combine them.
///
/// Pure: neither input is modified and no state is kept between calls.
pub fn compute_result(dataset: &Dataset, formula: &Formula) -> ComputeOutcome {
    let mut diagnostics = Vec::new();

    let interim_values: Vec<f64> = formula
        .blocks()
        .iter()
        .map(|block| evaluate_block(dataset, block, &mut diagnostics))
        .collect();

    for op in formula.operators() {
        if let CombineOp::Unsupported(sym) = op {
            diagnostics.push(Diagnostic::UnsupportedCombinator(sym.clone()));
        }
    }

    let final_result = fold_interim(&interim_values, formula.operators());

    log::debug!(
        "Computed {} blocks over {} rows: interim {:?}, result {:?}",
        interim_values.len(),
        dataset.len(),
        interim_values,
        final_result
    );
    for diag in &diagnostics {
        log::warn!("{diag}");
    }

    ComputeOutcome {
        interim_values,
        final_result,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Condition;
    use crate::formula::Aggregation;

    fn people() -> Dataset {
        Dataset::from_records(vec![
            vec![("age", "10"), ("city", "A"), ("income", "100")],
            vec![("age", "20"), ("city", "B"), ("income", "250")],
            vec![("age", "30"), ("city", "A"), ("income", "n/a")],
            vec![("age", "40"), ("city", "A"), ("income", "50")],
        ])
    }

    fn conditional(column: &str, op: ComparisonOp, value: &str, target: &str, agg: Aggregation) -> FormulaBlock {
        FormulaBlock::ConditionalAggregate {
            condition: Condition::new(column, op, value),
            target_column: target.to_string(),
            aggregation: agg,
        }
    }

    #[test]
    fn divide_guard_checks_the_incoming_value() {
        let ops = [CombineOp::Add, CombineOp::Div];
        assert_eq!(fold_interim(&[10.0, 0.0, 5.0], &ops), Some(2.0));
        assert_eq!(fold_interim(&[10.0, 0.0], &[CombineOp::Div]), Some(0.0));
        assert_eq!(fold_interim(&[0.0, 4.0], &[CombineOp::Div]), Some(0.0));
    }

    #[test]
    fn combine_each_operator() {
        assert_eq!(combine(6.0, 3.0, &CombineOp::Add), 9.0);
        assert_eq!(combine(6.0, 3.0, &CombineOp::Sub), 3.0);
        assert_eq!(combine(6.0, 3.0, &CombineOp::Mul), 18.0);
        assert_eq!(combine(6.0, 3.0, &CombineOp::Div), 2.0);
        assert_eq!(combine(6.0, 3.0, &CombineOp::Unsupported("^".into())), 6.0);
    }

    #[test]
    fn fold_defaults_missing_operators_to_add() {
        assert_eq!(fold_interim(&[1.0, 2.0, 3.0], &[CombineOp::Mul]), Some(5.0));
        assert_eq!(fold_interim(&[], &[]), None);
        assert_eq!(fold_interim(&[7.5], &[CombineOp::Div]), Some(7.5));
    }

    #[test]
    fn conditional_sum_and_average() {
        let ds = people();
        let mut diags = Vec::new();

        let sum = conditional("city", ComparisonOp::Eq, "A", "income", Aggregation::Sum);
        assert_eq!(evaluate_block(&ds, &sum, &mut diags), 150.0);
        assert_eq!(diags.len(), 1);
        assert!(matches!(diags[0], Diagnostic::UnparseableCell { row: 1, .. }));

        let avg = conditional("age", ComparisonOp::Gt, "15", "age", Aggregation::Average);
        assert_eq!(evaluate_block(&ds, &avg, &mut diags), 30.0);
    }

    #[test]
    fn unknown_columns_are_reported_not_fatal() {
        let ds = people();
        let mut diags = Vec::new();
        let block = conditional("country", ComparisonOp::Ne, "X", "salary", Aggregation::Sum);

        assert_eq!(evaluate_block(&ds, &block, &mut diags), 0.0);
        assert_eq!(
            diags,
            [
                Diagnostic::UnknownColumn("country".into()),
                Diagnostic::UnknownColumn("salary".into())
            ]
        );
    }

    #[test]
    fn empty_formula_has_no_result() {
        let outcome = compute_result(&people(), &Formula::new());
        assert!(outcome.interim_values.is_empty());
        assert_eq!(outcome.final_result, None);
    }

    #[test]
    fn single_block_is_the_result() {
        let mut formula = Formula::new();
        formula.push_block(FormulaBlock::Constant { value: -4.25 });
        let outcome = compute_result(&people(), &formula);
        assert_eq!(outcome.interim_values, [-4.25]);
        assert_eq!(outcome.final_result, Some(-4.25));
    }

    #[test]
    fn unsupported_combinator_passes_through_and_is_reported() {
        let mut formula = Formula::new();
        formula.push_block(FormulaBlock::Constant { value: 3.0 });
        formula.push_block(FormulaBlock::Constant { value: 9.0 });
        formula.set_operator(0, "%".parse().unwrap()).unwrap();

        let outcome = compute_result(&Dataset::default(), &formula);
        assert_eq!(outcome.final_result, Some(3.0));
        assert_eq!(outcome.diagnostics, [Diagnostic::UnsupportedCombinator("%".into())]);
    }
}

/// Formula layer: block list editing and evaluation.
///
/// ```text
///   Formula { blocks: [B0, B1, .. Bn], operators: [op0, .. op(n-1)] }
///        │
///        ▼
///   ┌──────────┐   per block: constant, or filter rows → aggregate column
///   │   eval    │──────────────────────────────────────────────▶ [V0 .. Vn]
///   └──────────┘
///        │
///        ▼
///   fold left:  acc = V0;  acc = combine(acc, Vi, op(i-1))
/// ```
pub mod aggregate;
pub mod block;
pub mod eval;

pub use aggregate::{aggregate, Aggregation};
pub use block::{BlockKind, BlockPatch, CombineOp, ConditionPatch, Formula, FormulaBlock, FormulaError};
pub use eval::{combine, compute_result, evaluate_block, fold_interim, ComputeOutcome, Diagnostic};

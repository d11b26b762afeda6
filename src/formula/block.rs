use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::data::filter::{ComparisonOp, Condition};

use super::aggregate::Aggregation;

// ---------------------------------------------------------------------------
// Combinator – the arithmetic joining two neighbouring blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CombineOp {
    #[default]
    Add,
    Sub,
    Mul,
    Div,
    /// Unknown symbol; leaves the running value unchanged.
    Unsupported(String),
}

impl CombineOp {
    pub const ALL: [CombineOp; 4] = [CombineOp::Add, CombineOp::Sub, CombineOp::Mul, CombineOp::Div];

    pub fn symbol(&self) -> &str {
        match self {
            CombineOp::Add => "+",
            CombineOp::Sub => "-",
            CombineOp::Mul => "*",
            CombineOp::Div => "/",
            CombineOp::Unsupported(s) => s,
        }
    }
}

impl FromStr for CombineOp {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" => CombineOp::Add,
            "-" => CombineOp::Sub,
            "*" => CombineOp::Mul,
            "/" => CombineOp::Div,
            other => CombineOp::Unsupported(other.to_string()),
        })
    }
}

impl fmt::Display for CombineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// FormulaBlock – one value-producing unit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FormulaBlock {
    /// A literal number.
    Constant { value: f64 },
    /// Filter rows by `condition`, then reduce `target_column`.
    ConditionalAggregate {
        condition: Condition,
        target_column: String,
        aggregation: Aggregation,
    },
}

impl Default for FormulaBlock {
    fn default() -> Self {
        FormulaBlock::Constant { value: 0.0 }
    }
}

/// Discriminant of [`FormulaBlock`], used to switch a block's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Constant,
    ConditionalAggregate,
}

impl BlockKind {
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Constant => "Number",
            BlockKind::ConditionalAggregate => "Conditional",
        }
    }
}

impl FormulaBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            FormulaBlock::Constant { .. } => BlockKind::Constant,
            FormulaBlock::ConditionalAggregate { .. } => BlockKind::ConditionalAggregate,
        }
    }

    /// A fresh block of the given shape.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Constant => FormulaBlock::default(),
            BlockKind::ConditionalAggregate => FormulaBlock::ConditionalAggregate {
                condition: Condition::default(),
                target_column: String::new(),
                aggregation: Aggregation::default(),
            },
        }
    }

    /// Merge `patch` into this block.
    ///
    /// The kind switch is applied first, so a patch may change the shape and
    /// fill in fields of the new shape at once. Fields that do not belong to
    /// the resulting shape are ignored.
    fn apply(&mut self, patch: &BlockPatch) {
        if let Some(kind) = patch.kind {
            if kind != self.kind() {
                *self = FormulaBlock::empty(kind);
            }
        }

        match self {
            FormulaBlock::Constant { value } => {
                if let Some(v) = patch.value {
                    *value = v;
                }
            }
            FormulaBlock::ConditionalAggregate {
                condition,
                target_column,
                aggregation,
            } => {
                if let Some(cp) = &patch.condition {
                    if let Some(op) = &cp.operator {
                        condition.operator = op.clone();
                    }
                    if let Some(v) = &cp.value {
                        condition.value = v.clone();
                    }
                    // A new column invalidates the old value.
                    if let Some(col) = &cp.column {
                        condition.column = col.clone();
                        condition.value.clear();
                    }
                }
                if let Some(col) = &patch.target_column {
                    *target_column = col.clone();
                }
                if let Some(agg) = &patch.aggregation {
                    *aggregation = agg.clone();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub column: Option<String>,
    pub operator: Option<ComparisonOp>,
    pub value: Option<String>,
}

/// A partial update of one block. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub kind: Option<BlockKind>,
    pub value: Option<f64>,
    pub condition: Option<ConditionPatch>,
    pub target_column: Option<String>,
    pub aggregation: Option<Aggregation>,
    /// Operator joining this block to the next one.
    pub operator: Option<CombineOp>,
}

impl BlockPatch {
    pub fn kind(kind: BlockKind) -> Self {
        BlockPatch {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn value(value: f64) -> Self {
        BlockPatch {
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn condition(condition: ConditionPatch) -> Self {
        BlockPatch {
            condition: Some(condition),
            ..Default::default()
        }
    }

    pub fn target_column(column: impl Into<String>) -> Self {
        BlockPatch {
            target_column: Some(column.into()),
            ..Default::default()
        }
    }

    pub fn aggregation(aggregation: Aggregation) -> Self {
        BlockPatch {
            aggregation: Some(aggregation),
            ..Default::default()
        }
    }

    pub fn operator(op: CombineOp) -> Self {
        BlockPatch {
            operator: Some(op),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Formula – blocks interleaved with operators
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("block index {index} out of range (formula has {len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },
    #[error("block {index} is the last block and has no operator")]
    NoSuccessor { index: usize },
}

/// An ordered list of blocks joined by binary operators.
///
/// Invariant: `operators.len() == blocks.len().saturating_sub(1)`;
/// `operators[i]` joins `blocks[i]` and `blocks[i + 1]`. All index
/// bookkeeping lives in this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formula {
    blocks: Vec<FormulaBlock>,
    operators: Vec<CombineOp>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default block a new formula entry starts from: `Constant(0)`.
    pub fn create_block() -> FormulaBlock {
        FormulaBlock::default()
    }

    pub fn blocks(&self) -> &[FormulaBlock] {
        &self.blocks
    }

    pub fn operators(&self) -> &[CombineOp] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Operator between block `index` and its successor, if any.
    pub fn operator_after(&self, index: usize) -> Option<&CombineOp> {
        self.operators.get(index)
    }

    /// Append a block, joined to the previous one with `+`.
    pub fn push_block(&mut self, block: FormulaBlock) -> usize {
        if !self.blocks.is_empty() {
            self.operators.push(CombineOp::default());
        }
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Append a default block and return its index.
    pub fn add_block(&mut self) -> usize {
        self.push_block(Self::create_block())
    }

    /// Merge `patch` into block `index` and return the updated block.
    ///
    /// Setting `condition.column` clears `condition.value` in the same update.
    pub fn update_block(&mut self, index: usize, patch: &BlockPatch) -> Result<&FormulaBlock, FormulaError> {
        self.check_index(index)?;
        if patch.operator.is_some() && index + 1 >= self.blocks.len() {
            return Err(FormulaError::NoSuccessor { index });
        }

        if let Some(op) = &patch.operator {
            self.operators[index] = op.clone();
        }
        let block = &mut self.blocks[index];
        block.apply(patch);
        Ok(block)
    }

    /// Set the operator joining block `index` to block `index + 1`.
    pub fn set_operator(&mut self, index: usize, op: CombineOp) -> Result<(), FormulaError> {
        self.update_block(index, &BlockPatch::operator(op)).map(|_| ())
    }

    /// Remove block `index` together with the operator that followed it.
    ///
    /// Removing the last block drops the operator that preceded it instead,
    /// so the invariant holds. Block `index - 1` keeps its operator, which now
    /// joins it to the block that used to be at `index + 1`.
    pub fn remove_block(&mut self, index: usize) -> Result<FormulaBlock, FormulaError> {
        self.check_index(index)?;
        let removed = self.blocks.remove(index);
        if !self.operators.is_empty() {
            let op_index = index.min(self.operators.len() - 1);
            self.operators.remove(op_index);
        }
        Ok(removed)
    }

    fn check_index(&self, index: usize) -> Result<(), FormulaError> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(FormulaError::BlockOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants(values: &[f64]) -> Formula {
        let mut f = Formula::new();
        for &value in values {
            f.push_block(FormulaBlock::Constant { value });
        }
        f
    }

    fn values(f: &Formula) -> Vec<f64> {
        f.blocks()
            .iter()
            .map(|b| match b {
                FormulaBlock::Constant { value } => *value,
                FormulaBlock::ConditionalAggregate { .. } => f64::NAN,
            })
            .collect()
    }

    #[test]
    fn new_blocks_are_zero_constants_joined_with_plus() {
        let mut f = Formula::new();
        assert_eq!(f.add_block(), 0);
        assert_eq!(f.add_block(), 1);

        assert_eq!(f.blocks(), vec![FormulaBlock::Constant { value: 0.0 }; 2]);
        assert_eq!(f.operators(), [CombineOp::Add]);
        assert_eq!(f.operator_after(1), None);
    }

    #[test]
    fn switching_kind_starts_from_an_empty_shape() {
        let mut f = constants(&[5.0]);
        let block = f
            .update_block(0, &BlockPatch::kind(BlockKind::ConditionalAggregate))
            .unwrap()
            .clone();

        assert_eq!(block, FormulaBlock::empty(BlockKind::ConditionalAggregate));
        let block = f.update_block(0, &BlockPatch::kind(BlockKind::Constant)).unwrap();
        assert_eq!(*block, FormulaBlock::Constant { value: 0.0 });
    }

    #[test]
    fn changing_condition_column_resets_value() {
        let mut f = constants(&[0.0]);
        f.update_block(0, &BlockPatch::kind(BlockKind::ConditionalAggregate))
            .unwrap();
        f.update_block(
            0,
            &BlockPatch::condition(ConditionPatch {
                column: Some("city".into()),
                ..Default::default()
            }),
        )
        .unwrap();
        f.update_block(
            0,
            &BlockPatch::condition(ConditionPatch {
                operator: Some(ComparisonOp::Ne),
                value: Some("A".into()),
                ..Default::default()
            }),
        )
        .unwrap();

        let block = f
            .update_block(
                0,
                &BlockPatch::condition(ConditionPatch {
                    column: Some("region".into()),
                    value: Some("ignored".into()),
                    ..Default::default()
                }),
            )
            .unwrap();

        match block {
            FormulaBlock::ConditionalAggregate { condition, .. } => {
                assert_eq!(condition.column, "region");
                assert_eq!(condition.operator, ComparisonOp::Ne);
                assert_eq!(condition.value, "");
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn operator_patch_needs_a_successor() {
        let mut f = constants(&[1.0, 2.0]);
        f.set_operator(0, CombineOp::Mul).unwrap();
        assert_eq!(f.operators(), [CombineOp::Mul]);

        assert_eq!(
            f.set_operator(1, CombineOp::Sub),
            Err(FormulaError::NoSuccessor { index: 1 })
        );
        assert_eq!(
            f.update_block(7, &BlockPatch::value(1.0)).unwrap_err(),
            FormulaError::BlockOutOfRange { index: 7, len: 2 }
        );
    }

    #[test]
    fn removing_middle_block_drops_its_operator() {
        // a + b * c - d
        let mut f = constants(&[1.0, 2.0, 3.0, 4.0]);
        f.set_operator(1, CombineOp::Mul).unwrap();
        f.set_operator(2, CombineOp::Sub).unwrap();

        f.remove_block(1).unwrap();
        assert_eq!(values(&f), [1.0, 3.0, 4.0]);
        assert_eq!(f.operators(), [CombineOp::Add, CombineOp::Sub]);
    }

    #[test]
    fn removing_last_block_drops_preceding_operator() {
        let mut f = constants(&[1.0, 2.0, 3.0]);
        f.set_operator(0, CombineOp::Div).unwrap();
        f.set_operator(1, CombineOp::Mul).unwrap();

        f.remove_block(2).unwrap();
        assert_eq!(values(&f), [1.0, 2.0]);
        assert_eq!(f.operators(), [CombineOp::Div]);

        f.remove_block(0).unwrap();
        f.remove_block(0).unwrap();
        assert!(f.is_empty());
        assert!(f.operators().is_empty());
        assert!(f.remove_block(0).is_err());
    }
}

//! CSV formula calculator.
//!
//! The [`data`] layer owns datasets, cell coercion, column inspection and row
//! filtering; the [`formula`] layer owns the block list and its evaluation.
//! Neither depends on the UI, which lives in the `rusty-formula` binary.

pub mod data;
pub mod formula;
pub mod state;

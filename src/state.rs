use crate::data::inspect::ColumnMetadata;
use crate::data::model::Dataset;
use crate::formula::{compute_result, BlockPatch, CombineOp, ComputeOutcome, Formula, FormulaError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Nothing here recomputes implicitly: results change only through
/// [`AppState::compute`].
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Column types and distinct values of the current dataset.
    pub metadata: ColumnMetadata,

    /// The formula being authored.
    pub formula: Formula,

    /// Result of the last explicit computation.
    pub outcome: Option<ComputeOutcome>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and re-inspect its columns.
    ///
    /// The formula is kept as is; blocks may now refer to columns that no
    /// longer exist.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.metadata = ColumnMetadata::inspect(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    pub fn add_block(&mut self) -> usize {
        self.formula.add_block()
    }

    pub fn update_block(&mut self, index: usize, patch: &BlockPatch) {
        let result = self.formula.update_block(index, patch).map(|_| ());
        self.report(result);
    }

    pub fn set_operator(&mut self, index: usize, op: CombineOp) {
        let result = self.formula.set_operator(index, op);
        self.report(result);
    }

    pub fn remove_block(&mut self, index: usize) {
        let result = self.formula.remove_block(index).map(|_| ());
        self.report(result);
    }

    /// Evaluate the formula against the current dataset.
    ///
    /// Does nothing until a dataset is loaded.
    pub fn compute(&mut self) {
        if let Some(ds) = &self.dataset {
            self.outcome = Some(compute_result(ds, &self.formula));
        }
    }

    fn report(&mut self, result: Result<(), FormulaError>) {
        if let Err(e) = result {
            log::error!("Formula edit failed: {e}");
            self.status_message = Some(format!("Error: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{BlockKind, FormulaBlock};

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            vec![("k", "a"), ("v", "2")],
            vec![("k", "b"), ("v", "3")],
        ])
    }

    #[test]
    fn compute_is_explicit() {
        let mut state = AppState::default();
        state.add_block();
        state.compute();
        assert!(state.outcome.is_none(), "no dataset yet");

        state.set_dataset(dataset());
        state.update_block(0, &BlockPatch::value(4.0));
        assert!(state.outcome.is_none());

        state.compute();
        let outcome = state.outcome.clone().unwrap();
        assert_eq!(outcome.final_result, Some(4.0));

        // Edits after computing leave the old outcome in place.
        state.update_block(0, &BlockPatch::value(9.0));
        assert_eq!(state.outcome, Some(outcome));
    }

    #[test]
    fn new_dataset_keeps_formula_and_refreshes_metadata() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.add_block();
        state.update_block(0, &BlockPatch::kind(BlockKind::ConditionalAggregate));

        state.set_dataset(Dataset::from_records(vec![vec![("other", "x")]]));
        assert_eq!(state.formula.len(), 1);
        assert_eq!(state.formula.blocks()[0].kind(), BlockKind::ConditionalAggregate);
        assert!(state.metadata.column_type("k").is_none());
        assert!(state.metadata.column_type("other").is_some());
    }

    #[test]
    fn bad_edits_surface_as_status() {
        let mut state = AppState::default();
        state.remove_block(3);
        assert!(state.status_message.as_deref().unwrap().contains("out of range"));
        assert_eq!(state.formula.blocks(), Vec::<FormulaBlock>::new());
    }
}

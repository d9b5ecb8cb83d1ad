//! # Undo/Redo Stack
//!
//! Tracks transaction history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Applying a step yields its inverse, recorded alongside the step
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original steps
//! - New transactions clear the redo stack
//! - Every transaction is one batch; `begin_batch`/`end_batch` group several
//!   transactions into a single undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let tr = Transaction::replace_selection_with(&state, schema, nodes)?;
//!
//! stack.apply(&tr, &mut state, schema)?;
//! stack.undo(&mut state, schema)?;
//! stack.redo(&mut state, schema)?;
//! ```

use crate::state::{EditorState, Selection};
use crate::transaction::{Step, Transaction, TransactionError};
use tabula_schema::Schema;

/// A group of steps that are undone/redone together
#[derive(Debug, Clone)]
pub struct StepBatch {
    /// The steps in this batch (in application order)
    pub steps: Vec<Step>,

    /// The inverse steps (in reverse order for undo)
    pub inverses: Vec<Step>,

    /// Selection before the first step
    pub selection_before: Selection,

    /// Selection after the last step
    pub selection_after: Selection,

    pub description: Option<String>,
}

impl StepBatch {
    fn new(selection: Selection) -> Self {
        Self {
            steps: Vec::new(),
            inverses: Vec::new(),
            selection_before: selection.clone(),
            selection_after: selection,
            description: None,
        }
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<StepBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<StepBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<StepBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a transaction to the state and record it for undo.
    ///
    /// Steps are applied to a copy of the document, so a failing step leaves
    /// the state untouched.
    pub fn apply(
        &mut self,
        tr: &Transaction,
        state: &mut EditorState,
        schema: &Schema,
    ) -> Result<(), TransactionError> {
        let mut doc = state.doc.clone();
        let mut inverses = Vec::with_capacity(tr.steps.len());
        for step in &tr.steps {
            inverses.insert(0, step.apply(&mut doc, schema)?);
        }

        let selection_before = state.selection.clone();
        state.doc = doc;
        if let Some(selection) = &tr.selection {
            state.selection = selection.clone();
        }

        if tr.steps.is_empty() {
            return Ok(());
        }

        match &mut self.current_batch {
            Some(batch) => {
                batch.steps.extend(tr.steps.iter().cloned());
                // Inverses go in reverse order
                for inverse in inverses.into_iter().rev() {
                    batch.inverses.insert(0, inverse);
                }
                batch.selection_after = state.selection.clone();
            }
            None => {
                let mut batch = StepBatch::new(selection_before);
                batch.steps = tr.steps.clone();
                batch.inverses = inverses;
                batch.selection_after = state.selection.clone();
                batch.description = tr.description.clone();
                self.push_batch(batch);
            }
        }

        Ok(())
    }

    /// Start a batch of transactions (will be undone/redone together)
    pub fn begin_batch(&mut self, selection: &Selection) {
        self.current_batch = Some(StepBatch::new(selection.clone()));
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.steps.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: StepBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo history
        self.redo_stack.clear();
    }

    /// Undo the most recent batch
    pub fn undo(&mut self, state: &mut EditorState, schema: &Schema) -> Result<bool, TransactionError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };

        let mut doc = state.doc.clone();
        if let Err(err) = apply_all(&batch.inverses, &mut doc, schema) {
            self.undo_stack.push(batch);
            return Err(err);
        }
        state.doc = doc;
        state.selection = batch.selection_before.clone();

        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, state: &mut EditorState, schema: &Schema) -> Result<bool, TransactionError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        let mut doc = state.doc.clone();
        if let Err(err) = apply_all(&batch.steps, &mut doc, schema) {
            self.redo_stack.push(batch);
            return Err(err);
        }
        state.doc = doc;
        state.selection = batch.selection_after.clone();

        self.undo_stack.push(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_all(steps: &[Step], doc: &mut tabula_schema::Node, schema: &Schema) -> Result<(), TransactionError> {
    for step in steps {
        step.apply(doc, schema)?;
    }
    Ok(())
}

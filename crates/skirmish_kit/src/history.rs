//! Snapshot-based undo/redo.

use crate::error::BuildError;

/// Deep snapshots of some state. Every successful [`History::apply`] pushes
/// the previous state onto the undo stack and forgets anything redoable.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    undo: Vec<T>,
    redo: Vec<T>,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `op` against `state`. On error `state` is restored and the
    /// history is left as it was.
    pub fn apply<R, E>(
        &mut self,
        state: &mut T,
        op: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E> {
        let before = state.clone();
        match op(state) {
            Ok(value) => {
                self.undo.push(before);
                self.redo.clear();
                Ok(value)
            }
            Err(err) => {
                *state = before;
                Err(err)
            }
        }
    }

    pub fn undo(&mut self, state: &mut T) -> Result<(), BuildError> {
        let previous = self.undo.pop().ok_or(BuildError::EmptyHistory("undo"))?;
        self.redo.push(std::mem::replace(state, previous));
        Ok(())
    }

    pub fn redo(&mut self, state: &mut T) -> Result<(), BuildError> {
        let next = self.redo.pop().ok_or(BuildError::EmptyHistory("redo"))?;
        self.undo.push(std::mem::replace(state, next));
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

use super::{CommandContext, CommandResult, HistoryAction};

/// Bounded, linear undo/redo history.
///
/// Pushing a new action clears the redo stack; once `capacity` is reached the
/// oldest undo entry is evicted.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Stack of actions that can be undone
    undo_stack: Vec<HistoryAction>,
    /// Stack of actions that can be redone
    redo_stack: Vec<HistoryAction>,
    capacity: usize,
    /// Property the newest entry was recorded for, while it may still absorb
    /// further edits of that property
    merge_key: Option<&'static str>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            merge_key: None,
        }
    }

    /// Record an action whose effect has already happened
    pub fn push(&mut self, action: HistoryAction) {
        log::debug!("history push: {:?}", action);
        self.merge_key = None;
        self.redo_stack.clear();
        self.undo_stack.push(action);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
    }

    /// Record a continuous edit of one property.
    ///
    /// With `merge`, the action folds into the newest entry when that entry
    /// was recorded for the same `key` and the same target. Any other push,
    /// undo, redo or [`seal`](Self::seal) ends the run.
    pub fn push_merged(&mut self, action: HistoryAction, key: &'static str, merge: bool) {
        if merge && self.merge_key == Some(key) {
            if let Some(last) = self.undo_stack.last_mut() {
                if last.absorb(&action) {
                    log::debug!("history merge ({}): {:?}", key, action);
                    self.redo_stack.clear();
                    return;
                }
            }
        }
        self.push(action);
        self.merge_key = Some(key);
    }

    /// Stop the newest entry from absorbing later edits
    pub fn seal(&mut self) {
        self.merge_key = None;
    }

    /// Apply an action and record it if it succeeded
    pub fn execute(&mut self, action: HistoryAction, ctx: &mut CommandContext<'_>) -> CommandResult {
        action.apply(ctx)?;
        self.push(action);
        Ok(())
    }

    /// Undo the newest action. Returns `Ok(false)` when there is nothing to undo.
    ///
    /// An action that fails to revert is dropped rather than moved to the redo stack.
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult<bool> {
        self.merge_key = None;
        let Some(action) = self.undo_stack.pop() else {
            return Ok(false);
        };
        action.revert(ctx)?;
        self.redo_stack.push(action);
        if self.redo_stack.len() > self.capacity {
            self.redo_stack.remove(0);
        }
        Ok(true)
    }

    /// Re-apply the most recently undone action. Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult<bool> {
        self.merge_key = None;
        let Some(action) = self.redo_stack.pop() else {
            return Ok(false);
        };
        action.apply(ctx)?;
        self.undo_stack.push(action);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest undoable action
    pub fn last(&self) -> Option<&HistoryAction> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.merge_key = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

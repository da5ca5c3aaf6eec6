//! The editor host: owns the state, applies transactions, and notifies
//! subscribers after each successful dispatch.

use crate::error::EditorError;
use crate::node::Document;
use crate::state::{EditorState, Selection};
use crate::transaction::Transaction;

pub type Listener = Box<dyn FnMut(&EditorState)>;

pub struct Editor {
    state: EditorState,
    version: u64,
    listeners: Vec<Listener>,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self {
            state: EditorState::new(doc),
            version: 0,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn doc(&self) -> &Document {
        &self.state.doc
    }

    /// Monotonic revision counter; bumps once per applied transaction
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Selection is host-driven: set directly, no transaction involved
    pub fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection;
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Apply a transaction. The whole batch lands or the state is left
    /// untouched; subscribers only hear about successful dispatches.
    pub fn dispatch(&mut self, tx: Transaction) -> Result<(), EditorError> {
        if tx.is_empty() {
            return Ok(());
        }

        match tx.apply(&self.state.doc) {
            Ok(next) => {
                self.state.doc = next;
                self.version += 1;
                tracing::debug!(version = self.version, steps = tx.steps.len(), "applied transaction");
                for listener in &mut self.listeners {
                    listener(&self.state);
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction rejected");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{insert_image, CommandResult};
    use crate::transaction::Step;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_bumps_version_and_notifies() {
        let mut editor = Editor::new(Document::default());
        let notified = Rc::new(Cell::new(0));
        let seen = notified.clone();
        editor.subscribe(Box::new(move |_| seen.set(seen.get() + 1)));

        let CommandResult::Applied(tx) =
            insert_image(editor.state(), "https://x/y.png", "", None, None)
        else {
            panic!("insert applies");
        };
        editor.dispatch(tx).unwrap();

        assert_eq!(editor.version(), 1);
        assert_eq!(notified.get(), 1);
        assert_eq!(editor.doc().blocks.len(), 1);
    }

    #[test]
    fn test_failed_dispatch_leaves_state_and_version() {
        let mut editor = Editor::new(Document::default());
        let tx = Transaction::single(Step::Remove {
            id: "missing".to_string(),
        });

        assert!(editor.dispatch(tx).is_err());
        assert_eq!(editor.version(), 0);
        assert!(editor.doc().blocks.is_empty());
    }

    #[test]
    fn test_empty_transaction_is_a_silent_no_op() {
        let mut editor = Editor::new(Document::default());
        editor.dispatch(Transaction::default()).unwrap();
        assert_eq!(editor.version(), 0);
    }
}

//! Tab manager seams: close confirmation + draft persistence.

use super::runtime::BoxFuture;
use super::storage::StorageError;
use crate::kernel::tabs::EditorTab;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosePrompt {
    Single { file_name: String },
    All { unsaved: usize },
    Others { unsaved: usize },
}

impl ClosePrompt {
    pub fn message(&self) -> String {
        match self {
            ClosePrompt::Single { file_name } => {
                format!("\"{}\" has unsaved changes. Close anyway?", file_name)
            }
            ClosePrompt::All { unsaved } => {
                format!("{} tab(s) have unsaved changes. Close all anyway?", unsaved)
            }
            ClosePrompt::Others { unsaved } => {
                format!(
                    "{} other tab(s) have unsaved changes. Close anyway?",
                    unsaved
                )
            }
        }
    }
}

/// Asked before modified tabs are discarded. `false` aborts the close.
pub trait ConfirmClose {
    fn confirm<'a>(&'a self, prompt: &'a ClosePrompt) -> BoxFuture<'a, bool>;
}

/// Adapts a plain closure into a [`ConfirmClose`].
pub struct ConfirmFn<F>(pub F);

impl<F> ConfirmClose for ConfirmFn<F>
where
    F: Fn(&ClosePrompt) -> bool,
{
    fn confirm<'a>(&'a self, prompt: &'a ClosePrompt) -> BoxFuture<'a, bool> {
        let answer = (self.0)(prompt);
        Box::pin(async move { answer })
    }
}

/// Writes a tab's draft somewhere durable.
pub trait TabPersister {
    fn persist<'a>(&'a self, tab: &'a EditorTab) -> BoxFuture<'a, Result<(), StorageError>>;
}

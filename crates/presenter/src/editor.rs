use std::cell::RefCell;

use shared::domain::PointId;

/// Identity of whoever currently shows an edit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorId {
    Point(PointId),
    NewPoint,
}

/// Shared "active editor" slot. At most one form is open at a time; whoever
/// claims the token is told which editor it displaced so the board can close
/// that one.
#[derive(Debug, Default)]
pub struct EditorToken {
    holder: RefCell<Option<EditorId>>,
}

impl EditorToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the token and returns the previous holder, if it was someone else.
    pub fn claim(&self, editor: EditorId) -> Option<EditorId> {
        let previous = self.holder.borrow_mut().replace(editor.clone());
        previous.filter(|previous| *previous != editor)
    }

    /// Releases the token only when `editor` still holds it.
    pub fn release(&self, editor: &EditorId) -> bool {
        if !self.is_held_by(editor) {
            return false;
        }
        self.holder.replace(None);
        true
    }

    pub fn holder(&self) -> Option<EditorId> {
        self.holder.borrow().clone()
    }

    pub fn is_held_by(&self, editor: &EditorId) -> bool {
        self.holder.borrow().as_ref() == Some(editor)
    }
}

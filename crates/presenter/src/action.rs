use shared::domain::{Point, PointDraft, UpdateType, UserAction};

/// Mutation requested by a point or new-point presenter, routed through the
/// board so the action gate and busy states stay in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Update { update: UpdateType, point: Point },
    Add { update: UpdateType, draft: PointDraft },
    Delete { update: UpdateType, point: Point },
}

impl ViewAction {
    pub fn kind(&self) -> UserAction {
        match self {
            ViewAction::Update { .. } => UserAction::UpdatePoint,
            ViewAction::Add { .. } => UserAction::AddPoint,
            ViewAction::Delete { .. } => UserAction::DeletePoint,
        }
    }

    pub fn update_type(&self) -> UpdateType {
        match self {
            ViewAction::Update { update, .. }
            | ViewAction::Add { update, .. }
            | ViewAction::Delete { update, .. } => *update,
        }
    }
}

/// What became of a user command routed to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The store accepted the mutation.
    Applied,
    /// The remote call failed; the owning presenter shows the abort cue.
    Aborted,
    /// Another mutation holds the action gate.
    Busy,
    /// Rejected locally before reaching the store.
    Invalid,
    /// Nothing to do in the current state.
    Ignored,
}

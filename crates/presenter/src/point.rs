use shared::domain::{has_significant_difference, Point, PointId, UpdateType};
use tracing::debug;

use crate::{
    action::ViewAction,
    editor::EditorId,
    form::{DraftChange, FormError, PointEditForm},
    view::{Component, FormState, PointRow, Position, Slot},
    PresenterContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Default,
    Editing,
}

/// Owns one point's row and, while editing, its form.
pub struct PointPresenter {
    ctx: PresenterContext,
    point: Point,
    form: PointEditForm,
    mode: Mode,
    mounted: bool,
}

impl PointPresenter {
    pub fn new(ctx: PresenterContext, point: Point) -> Self {
        let form = PointEditForm::for_point(&point);
        Self {
            ctx,
            point,
            form,
            mode: Mode::Default,
            mounted: false,
        }
    }

    pub fn id(&self) -> &PointId {
        &self.point.id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn form(&self) -> &PointEditForm {
        &self.form
    }

    fn slot(&self) -> Slot {
        Slot::Point(self.point.id.clone())
    }

    fn editor_id(&self) -> EditorId {
        EditorId::Point(self.point.id.clone())
    }

    fn row(&self) -> Component {
        Component::Row(PointRow::build(&self.point, &self.ctx.cities, &self.ctx.offers))
    }

    fn form_component(&self) -> Component {
        Component::Form(self.form.component(&self.ctx.cities, &self.ctx.offers))
    }

    /// Mounts the row on first call; later calls refresh with the confirmed
    /// snapshot and close an open form.
    pub fn init(&mut self, point: Point) {
        self.form = PointEditForm::for_point(&point);
        self.point = point;
        if !self.mounted {
            self.ctx.surface.mount(self.slot(), self.row(), Position::End);
            self.mounted = true;
            return;
        }
        if self.mode == Mode::Editing {
            self.mode = Mode::Default;
            self.ctx.editor.release(&self.editor_id());
        }
        self.ctx.surface.replace(self.slot(), self.row());
    }

    pub fn destroy(&mut self) {
        if self.mounted {
            self.ctx.surface.remove(&self.slot());
            self.mounted = false;
        }
        self.ctx.editor.release(&self.editor_id());
        self.mode = Mode::Default;
    }

    /// Opens the form. Returns the editor that held the token before, which
    /// the caller must close.
    pub fn start_editing(&mut self) -> Option<EditorId> {
        if self.mode == Mode::Editing {
            return None;
        }
        let displaced = self.ctx.editor.claim(self.editor_id());
        self.form = PointEditForm::for_point(&self.point);
        self.mode = Mode::Editing;
        self.ctx.surface.replace(self.slot(), self.form_component());
        debug!(point_id = %self.point.id, "editing point");
        displaced
    }

    /// Back to the row with the confirmed snapshot restored into the form.
    pub fn reset_view(&mut self) {
        if self.mode != Mode::Editing {
            return;
        }
        self.form.reset(&self.point);
        self.mode = Mode::Default;
        self.ctx.editor.release(&self.editor_id());
        self.ctx.surface.replace(self.slot(), self.row());
    }

    pub fn edit(&mut self, change: DraftChange) -> Result<(), FormError> {
        if self.mode != Mode::Editing {
            return Err(FormError::Closed);
        }
        self.form.apply(change, &self.ctx.cities, &self.ctx.offers)?;
        self.ctx.surface.replace(self.slot(), self.form_component());
        Ok(())
    }

    /// The favorite control lives on the row, so there is nothing to toggle
    /// while the form replaces it.
    pub fn toggle_favorite(&self) -> Option<ViewAction> {
        if self.mode == Mode::Editing {
            return None;
        }
        Some(ViewAction::Update {
            update: UpdateType::Patch,
            point: self.point.with_favorite_toggled(),
        })
    }

    /// Minor when the edit can move the point between filters or sort
    /// positions, Patch otherwise.
    pub fn submit(&self) -> Result<ViewAction, FormError> {
        if self.mode != Mode::Editing {
            return Err(FormError::Closed);
        }
        let updated = self.form.draft().to_point()?;
        let update = if has_significant_difference(&updated, &self.point) {
            UpdateType::Minor
        } else {
            UpdateType::Patch
        };
        Ok(ViewAction::Update {
            update,
            point: updated,
        })
    }

    pub fn delete(&self) -> Result<ViewAction, FormError> {
        if self.mode != Mode::Editing {
            return Err(FormError::Closed);
        }
        Ok(ViewAction::Delete {
            update: UpdateType::Minor,
            point: self.point.clone(),
        })
    }

    pub fn set_saving(&mut self) {
        self.set_form_state(FormState::saving());
    }

    pub fn set_deleting(&mut self) {
        self.set_form_state(FormState::deleting());
    }

    /// Failure cue. An open form is re-enabled with its draft intact.
    pub fn set_aborting(&mut self) {
        if !self.mounted {
            return;
        }
        if self.mode == Mode::Editing {
            self.set_form_state(FormState::default());
        }
        self.ctx.surface.shake(&self.slot());
    }

    fn set_form_state(&mut self, state: FormState) {
        if self.mode != Mode::Editing {
            return;
        }
        self.form.set_state(state);
        self.ctx.surface.update_form(&self.slot(), state);
    }
}

#[cfg(test)]
#[path = "tests/point_tests.rs"]
mod tests;

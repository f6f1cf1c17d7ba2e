use std::rc::Rc;

use chrono::{DateTime, Utc};
use shared::domain::UpdateType;
use tracing::debug;

use crate::{
    action::ViewAction,
    editor::EditorId,
    form::{DraftChange, FormError, PointEditForm},
    view::{Component, FormState, NewPointButton, Position, Slot},
    PresenterContext,
};

/// The blank form shown above the list while a point is being created.
pub struct NewPointPresenter {
    ctx: PresenterContext,
    button: Rc<dyn NewPointButton>,
    form: Option<PointEditForm>,
}

impl NewPointPresenter {
    pub fn new(ctx: PresenterContext, button: Rc<dyn NewPointButton>) -> Self {
        Self {
            ctx,
            button,
            form: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&PointEditForm> {
        self.form.as_ref()
    }

    /// Opens the form unless it is already open. Returns the editor displaced
    /// from the token.
    pub fn init(&mut self, now: DateTime<Utc>) -> Option<EditorId> {
        if self.form.is_some() {
            return None;
        }
        let displaced = self.ctx.editor.claim(EditorId::NewPoint);
        let form = PointEditForm::blank(now);
        self.ctx.surface.mount(
            Slot::NewPoint,
            Component::Form(form.component(&self.ctx.cities, &self.ctx.offers)),
            Position::Start,
        );
        self.form = Some(form);
        self.button.set_disabled(true);
        debug!("new point form opened");
        displaced
    }

    pub fn destroy(&mut self) {
        if self.form.take().is_none() {
            return;
        }
        self.button.set_disabled(false);
        self.ctx.surface.remove(&Slot::NewPoint);
        self.ctx.editor.release(&EditorId::NewPoint);
        debug!("new point form closed");
    }

    pub fn edit(&mut self, change: DraftChange) -> Result<(), FormError> {
        let form = self.form.as_mut().ok_or(FormError::Closed)?;
        form.apply(change, &self.ctx.cities, &self.ctx.offers)?;
        let component = Component::Form(form.component(&self.ctx.cities, &self.ctx.offers));
        self.ctx.surface.replace(Slot::NewPoint, component);
        Ok(())
    }

    pub fn submit(&self) -> Result<ViewAction, FormError> {
        let form = self.form.as_ref().ok_or(FormError::Closed)?;
        form.draft().validate()?;
        Ok(ViewAction::Add {
            update: UpdateType::Minor,
            draft: form.draft().clone(),
        })
    }

    pub fn set_saving(&mut self) {
        self.set_form_state(FormState::saving());
    }

    pub fn set_aborting(&mut self) {
        if self.form.is_none() {
            return;
        }
        self.set_form_state(FormState::default());
        self.ctx.surface.shake(&Slot::NewPoint);
    }

    fn set_form_state(&mut self, state: FormState) {
        if let Some(form) = self.form.as_mut() {
            form.set_state(state);
            self.ctx.surface.update_form(&Slot::NewPoint, state);
        }
    }
}

#[cfg(test)]
#[path = "tests/new_point_tests.rs"]
mod tests;

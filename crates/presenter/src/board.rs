use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use chrono::Utc;
use client_core::{FilterStore, PointStore, StoreError, StoreEvent, SubscriptionId, TripInfo};
use shared::domain::{FilterType, Point, PointId, SortType, UpdateType};
use tracing::{debug, info, warn};

use crate::{
    action::{ActionOutcome, ViewAction},
    editor::EditorId,
    form::{DraftChange, FormError},
    new_point::NewPointPresenter,
    point::PointPresenter,
    ui_blocker::UiBlocker,
    view::{Component, EmptyMessage, NewPointButton, Position, Slot, SortBar},
    PresenterContext,
};

struct BoardState {
    sort: SortType,
    is_loading: bool,
    /// In render order.
    presenters: Vec<PointPresenter>,
    /// Board-level slots currently mounted (placeholder, sort bar, trip info).
    widgets: Vec<Slot>,
    trip_info: Option<TripInfo>,
}

impl BoardState {
    fn presenter_mut(&mut self, id: &PointId) -> Option<&mut PointPresenter> {
        self.presenters.iter_mut().find(|presenter| presenter.id() == id)
    }
}

/// Owns the list: one [`PointPresenter`] per visible point, the sort bar,
/// the trip summary and the new-point form. Re-renders in reaction to store
/// notifications and is the single entry point for mutating actions.
pub struct BoardPresenter {
    ctx: PresenterContext,
    points: Rc<PointStore>,
    filter: Rc<FilterStore>,
    blocker: UiBlocker,
    new_point: RefCell<NewPointPresenter>,
    state: RefCell<BoardState>,
    point_subscription: SubscriptionId,
    filter_subscription: SubscriptionId,
}

impl BoardPresenter {
    pub fn new(
        ctx: PresenterContext,
        points: Rc<PointStore>,
        filter: Rc<FilterStore>,
        blocker: UiBlocker,
        button: Rc<dyn NewPointButton>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let point_subscription = points.events().subscribe(Self::listener(weak.clone()));
            let filter_subscription = filter.events().subscribe(Self::listener(weak.clone()));
            Self {
                new_point: RefCell::new(NewPointPresenter::new(ctx.clone(), button)),
                ctx,
                points,
                filter,
                blocker,
                state: RefCell::new(BoardState {
                    sort: SortType::Day,
                    is_loading: true,
                    presenters: Vec::new(),
                    widgets: Vec::new(),
                    trip_info: None,
                }),
                point_subscription,
                filter_subscription,
            }
        })
    }

    fn listener(board: Weak<Self>) -> impl Fn(&StoreEvent) + 'static {
        move |event: &StoreEvent| {
            if let Some(board) = board.upgrade() {
                board.on_store_update(event);
            }
        }
    }

    pub fn init(&self) {
        self.render_board();
    }

    pub fn sort(&self) -> SortType {
        self.state.borrow().sort
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_blocked(&self) -> bool {
        self.blocker.is_blocked()
    }

    pub fn active_editor(&self) -> Option<EditorId> {
        self.ctx.editor.holder()
    }

    /// Ids of the rendered rows, top to bottom.
    pub fn rendered_ids(&self) -> Vec<PointId> {
        self.state
            .borrow()
            .presenters
            .iter()
            .map(|presenter| presenter.id().clone())
            .collect()
    }

    /// Filtered by the current filter at the current instant, then sorted.
    pub fn visible_points(&self) -> Vec<Point> {
        let sort = self.state.borrow().sort;
        self.visible_points_sorted(sort)
    }

    fn visible_points_sorted(&self, sort: SortType) -> Vec<Point> {
        let mut points = self.filter.filter().apply(&self.points.points(), Utc::now());
        sort.sort(&mut points);
        points
    }

    pub fn on_store_update(&self, event: &StoreEvent) {
        debug!(update = ?event.update, "board received store update");
        match event.update {
            UpdateType::Patch => {
                if let Some(point) = &event.point {
                    if let Some(presenter) = self.state.borrow_mut().presenter_mut(&point.id) {
                        presenter.init(point.clone());
                    }
                    self.refresh_trip_info();
                }
            }
            UpdateType::Minor => {
                self.clear_board(false);
                self.render_board();
            }
            UpdateType::Major => {
                self.clear_board(true);
                self.render_board();
            }
            UpdateType::Init => {
                self.state.borrow_mut().is_loading = false;
                self.clear_board(false);
                self.render_board();
            }
        }
    }

    fn render_board(&self) {
        let surface = &self.ctx.surface;
        let (is_loading, sort) = {
            let state = self.state.borrow();
            (state.is_loading, state.sort)
        };
        if is_loading {
            surface.mount(
                Slot::Loading,
                Component::Empty(EmptyMessage::Loading),
                Position::Start,
            );
            self.state.borrow_mut().widgets.push(Slot::Loading);
            return;
        }

        let visible = self.visible_points_sorted(sort);
        if visible.is_empty() {
            surface.mount(
                Slot::EmptyMessage,
                Component::Empty(EmptyMessage::NoPoints),
                Position::End,
            );
            self.state.borrow_mut().widgets.push(Slot::EmptyMessage);
            return;
        }

        let mut widgets = Vec::new();
        let trip_info = self.trip_info();
        if let Some(info) = &trip_info {
            surface.mount(Slot::TripInfo, Component::TripInfo(info.clone()), Position::Start);
            widgets.push(Slot::TripInfo);
        }
        surface.mount(Slot::Sort, Component::Sort(SortBar::new(sort)), Position::End);
        widgets.push(Slot::Sort);

        let presenters = visible
            .into_iter()
            .map(|point| {
                let mut presenter = PointPresenter::new(self.ctx.clone(), point.clone());
                presenter.init(point);
                presenter
            })
            .collect();

        let mut state = self.state.borrow_mut();
        state.widgets.extend(widgets);
        state.presenters = presenters;
        state.trip_info = trip_info;
    }

    fn clear_board(&self, reset_sort: bool) {
        self.new_point.borrow_mut().destroy();
        let (presenters, widgets) = {
            let mut state = self.state.borrow_mut();
            if reset_sort {
                state.sort = SortType::Day;
            }
            state.trip_info = None;
            (
                std::mem::take(&mut state.presenters),
                std::mem::take(&mut state.widgets),
            )
        };
        for mut presenter in presenters {
            presenter.destroy();
        }
        for slot in widgets {
            self.ctx.surface.remove(&slot);
        }
    }

    fn trip_info(&self) -> Option<TripInfo> {
        TripInfo::summarize(&self.points.points(), &self.ctx.cities, &self.ctx.offers)
    }

    /// Replaces the mounted summary when a patched point changed it.
    fn refresh_trip_info(&self) {
        let fresh = self.trip_info();
        {
            let mut state = self.state.borrow_mut();
            if state.trip_info.is_none() || state.trip_info == fresh {
                return;
            }
            state.trip_info = fresh.clone();
        }
        if let Some(info) = fresh {
            self.ctx.surface.replace(Slot::TripInfo, Component::TripInfo(info));
        }
    }

    /// Runs one mutation under the action gate. Store failures end up as the
    /// owning presenter's abort cue and are never returned to the caller.
    pub async fn handle_view_action(&self, action: ViewAction) -> ActionOutcome {
        let guard = match self.blocker.block() {
            Ok(guard) => guard,
            Err(err) => {
                warn!(action = ?action.kind(), "{err}");
                return ActionOutcome::Busy;
            }
        };
        self.mark_busy(&action);
        let result = guard.cover(self.apply(&action)).await;
        let outcome = match result {
            Ok(()) => {
                info!(action = ?action.kind(), update = ?action.update_type(), "action applied");
                ActionOutcome::Applied
            }
            Err(err) => {
                warn!(action = ?action.kind(), "action failed: {err}");
                self.mark_aborting(&action);
                ActionOutcome::Aborted
            }
        };
        guard.unblock().await;
        outcome
    }

    async fn apply(&self, action: &ViewAction) -> Result<(), StoreError> {
        match action {
            ViewAction::Update { update, point } => {
                self.points.update(*update, point).await.map(|_| ())
            }
            ViewAction::Add { update, draft } => self.points.add(*update, draft).await.map(|_| ()),
            ViewAction::Delete { update, point } => self.points.delete(*update, point).await,
        }
    }

    fn mark_busy(&self, action: &ViewAction) {
        match action {
            ViewAction::Update { point, .. } => {
                if let Some(presenter) = self.state.borrow_mut().presenter_mut(&point.id) {
                    presenter.set_saving();
                }
            }
            ViewAction::Delete { point, .. } => {
                if let Some(presenter) = self.state.borrow_mut().presenter_mut(&point.id) {
                    presenter.set_deleting();
                }
            }
            ViewAction::Add { .. } => self.new_point.borrow_mut().set_saving(),
        }
    }

    fn mark_aborting(&self, action: &ViewAction) {
        match action {
            ViewAction::Update { point, .. } | ViewAction::Delete { point, .. } => {
                if let Some(presenter) = self.state.borrow_mut().presenter_mut(&point.id) {
                    presenter.set_aborting();
                }
            }
            ViewAction::Add { .. } => self.new_point.borrow_mut().set_aborting(),
        }
    }

    fn close_editor(&self, editor: EditorId) {
        debug!(editor = ?editor, "closing displaced editor");
        match editor {
            EditorId::Point(id) => {
                if let Some(presenter) = self.state.borrow_mut().presenter_mut(&id) {
                    presenter.reset_view();
                }
            }
            EditorId::NewPoint => self.new_point.borrow_mut().destroy(),
        }
    }

    /// Resets sort and filter, then opens the blank form above the list.
    pub fn create_point(&self) {
        self.state.borrow_mut().sort = SortType::Day;
        self.filter.set_filter(UpdateType::Major, FilterType::Everything);
        let displaced = self.new_point.borrow_mut().init(Utc::now());
        if let Some(editor) = displaced {
            self.close_editor(editor);
        }
    }

    pub fn change_sort(&self, sort: SortType) -> ActionOutcome {
        {
            let mut state = self.state.borrow_mut();
            if state.sort == sort || !sort.is_enabled() {
                return ActionOutcome::Ignored;
            }
            state.sort = sort;
        }
        self.clear_board(false);
        self.render_board();
        ActionOutcome::Applied
    }

    pub fn open_editor(&self, id: &PointId) -> ActionOutcome {
        let displaced = {
            let mut state = self.state.borrow_mut();
            let Some(presenter) = state.presenter_mut(id) else {
                return ActionOutcome::Ignored;
            };
            presenter.start_editing()
        };
        if let Some(editor) = displaced {
            self.close_editor(editor);
        }
        ActionOutcome::Applied
    }

    /// Roll-up affordance on an open point form.
    pub fn roll_up(&self) -> ActionOutcome {
        match self.ctx.editor.holder() {
            Some(EditorId::Point(id)) => {
                self.close_editor(EditorId::Point(id));
                ActionOutcome::Applied
            }
            _ => ActionOutcome::Ignored,
        }
    }

    /// Cancel key: closes whichever editor is open.
    pub fn cancel_key(&self) -> ActionOutcome {
        match self.ctx.editor.holder() {
            Some(editor) => {
                self.close_editor(editor);
                ActionOutcome::Applied
            }
            None => ActionOutcome::Ignored,
        }
    }

    pub fn edit_draft(&self, change: DraftChange) -> Result<(), FormError> {
        match self.ctx.editor.holder() {
            Some(EditorId::Point(id)) => {
                let mut state = self.state.borrow_mut();
                let presenter = state.presenter_mut(&id).ok_or(FormError::Closed)?;
                presenter.edit(change)
            }
            Some(EditorId::NewPoint) => self.new_point.borrow_mut().edit(change),
            None => Err(FormError::Closed),
        }
    }

    /// Submits the open form. A draft that fails local validation keeps the
    /// form open and shakes it.
    pub async fn submit(&self) -> ActionOutcome {
        let (slot, prepared) = match self.ctx.editor.holder() {
            Some(EditorId::Point(id)) => {
                let prepared = match self.state.borrow_mut().presenter_mut(&id) {
                    Some(presenter) => presenter.submit(),
                    None => return ActionOutcome::Ignored,
                };
                (Slot::Point(id), prepared)
            }
            Some(EditorId::NewPoint) => (Slot::NewPoint, self.new_point.borrow().submit()),
            None => return ActionOutcome::Ignored,
        };
        match prepared {
            Ok(action) => self.handle_view_action(action).await,
            Err(err) => {
                warn!(slot = ?slot, "submit rejected: {err}");
                self.ctx.surface.shake(&slot);
                ActionOutcome::Invalid
            }
        }
    }

    /// Delete on a point form; on the new-point form it cancels creation.
    pub async fn delete(&self) -> ActionOutcome {
        match self.ctx.editor.holder() {
            Some(EditorId::Point(id)) => {
                let prepared = match self.state.borrow_mut().presenter_mut(&id) {
                    Some(presenter) => presenter.delete(),
                    None => return ActionOutcome::Ignored,
                };
                match prepared {
                    Ok(action) => self.handle_view_action(action).await,
                    Err(_) => ActionOutcome::Ignored,
                }
            }
            Some(EditorId::NewPoint) => {
                self.new_point.borrow_mut().destroy();
                self.on_store_update(&StoreEvent::new(UpdateType::Minor));
                ActionOutcome::Applied
            }
            None => ActionOutcome::Ignored,
        }
    }

    pub async fn toggle_favorite(&self, id: &PointId) -> ActionOutcome {
        let action = match self.state.borrow_mut().presenter_mut(id) {
            Some(presenter) => presenter.toggle_favorite(),
            None => return ActionOutcome::Ignored,
        };
        let Some(action) = action else {
            debug!(point_id = %id, "favorite toggle ignored while editing");
            return ActionOutcome::Ignored;
        };
        self.handle_view_action(action).await
    }
}

impl Drop for BoardPresenter {
    fn drop(&mut self) {
        self.points.events().unsubscribe(self.point_subscription);
        self.filter.events().unsubscribe(self.filter_subscription);
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;

use std::rc::Rc;

use client_core::{CitiesStore, FilterStore, OffersStore, PointStore, TripService};
use presenter::{
    ActionOutcome, BoardPresenter, FilterPresenter, PresenterContext, UiBlocker,
};
use tracing::info;

use crate::{
    commands::{HostCommand, HELP},
    config::Settings,
    terminal::TerminalSurface,
};

/// Wires stores and presenters onto one terminal surface.
pub struct App {
    pub surface: Rc<TerminalSurface>,
    pub points: Rc<PointStore>,
    board: Rc<BoardPresenter>,
    filters: Rc<FilterPresenter>,
}

impl App {
    /// Loads the catalogs first, then the points.
    pub async fn start(service: Rc<dyn TripService>, settings: &Settings) -> Self {
        let cities = Rc::new(CitiesStore::load(service.as_ref()).await);
        let offers = Rc::new(OffersStore::load(service.as_ref()).await);
        let points = Rc::new(PointStore::new(service));
        let filter = Rc::new(FilterStore::new());

        let surface = Rc::new(TerminalSurface::new());
        let ctx = PresenterContext::new(surface.clone(), cities, offers);
        let blocker = UiBlocker::new(settings.time_limit(), surface.clone());
        let filters = FilterPresenter::new(surface.clone(), points.clone(), filter.clone());
        let board = BoardPresenter::new(ctx, points.clone(), filter, blocker, surface.clone());

        filters.init();
        board.init();
        points.initialize().await;
        info!(points = points.len(), "itinerary ready");

        Self {
            surface,
            points,
            board,
            filters,
        }
    }

    /// Runs one command; returns a line of feedback for the user, if any.
    pub async fn handle(&self, command: HostCommand) -> Option<String> {
        let outcome = match command {
            HostCommand::Show | HostCommand::Quit => return None,
            HostCommand::Help => return Some(HELP.to_string()),
            HostCommand::Edit(index) => match self.surface.row_id(index) {
                Some(id) => self.board.open_editor(&id),
                None => return Some(format!("no row {}", index + 1)),
            },
            HostCommand::Favorite(index) => match self.surface.row_id(index) {
                Some(id) => self.board.toggle_favorite(&id).await,
                None => return Some(format!("no row {}", index + 1)),
            },
            HostCommand::Close => self.board.roll_up(),
            HostCommand::Escape => self.board.cancel_key(),
            HostCommand::Set(change) => match self.board.edit_draft(change) {
                Ok(()) => ActionOutcome::Applied,
                Err(err) => return Some(err.to_string()),
            },
            HostCommand::Save => self.board.submit().await,
            HostCommand::Delete => self.board.delete().await,
            HostCommand::New => {
                if self.surface.is_new_point_disabled() {
                    return Some("a new point is already open".to_string());
                }
                self.board.create_point();
                ActionOutcome::Applied
            }
            HostCommand::Filter(filter) => {
                if self.filters.select(filter) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Ignored
                }
            }
            HostCommand::Sort(sort) => self.board.change_sort(sort),
        };
        feedback(outcome)
    }
}

fn feedback(outcome: ActionOutcome) -> Option<String> {
    match outcome {
        ActionOutcome::Applied => None,
        ActionOutcome::Aborted => Some("the trip service rejected the change".into()),
        ActionOutcome::Busy => Some("still saving, try again in a moment".into()),
        ActionOutcome::Invalid => Some("the form is incomplete".into()),
        ActionOutcome::Ignored => Some("nothing to do".into()),
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;

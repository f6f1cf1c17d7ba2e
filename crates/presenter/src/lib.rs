//! Presentation layer of the itinerary editor: turns store state into
//! [`view::Component`]s on a host [`view::Surface`] and routes user actions
//! back to the stores.

use std::rc::Rc;

use client_core::{CitiesStore, OffersStore};

pub mod action;
pub mod board;
pub mod editor;
pub mod filter;
pub mod form;
pub mod new_point;
pub mod point;
pub mod ui_blocker;
pub mod view;

#[cfg(test)]
mod test_support;

pub use action::{ActionOutcome, ViewAction};
pub use board::BoardPresenter;
pub use editor::{EditorId, EditorToken};
pub use filter::FilterPresenter;
pub use form::{DraftChange, FormError};
pub use ui_blocker::{GateBusy, TimeLimit, UiBlocker};

/// Collaborators shared by every presenter on the board.
#[derive(Clone)]
pub struct PresenterContext {
    pub surface: Rc<dyn view::Surface>,
    pub cities: Rc<CitiesStore>,
    pub offers: Rc<OffersStore>,
    pub editor: Rc<EditorToken>,
}

impl PresenterContext {
    pub fn new(
        surface: Rc<dyn view::Surface>,
        cities: Rc<CitiesStore>,
        offers: Rc<OffersStore>,
    ) -> Self {
        Self {
            surface,
            cities,
            offers,
            editor: Rc::new(EditorToken::new()),
        }
    }
}

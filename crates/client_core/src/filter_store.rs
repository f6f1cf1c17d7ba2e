use std::cell::Cell;

use shared::domain::{FilterType, UpdateType};
use tracing::debug;

use crate::{observable::Observable, StoreEvent};

#[derive(Debug, Default)]
pub struct FilterStore {
    filter: Cell<FilterType>,
    events: Observable<StoreEvent>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &Observable<StoreEvent> {
        &self.events
    }

    pub fn filter(&self) -> FilterType {
        self.filter.get()
    }

    pub fn set_filter(&self, update: UpdateType, filter: FilterType) {
        debug!(filter = filter.as_str(), update = ?update, "filter changed");
        self.filter.set(filter);
        self.events.notify(&StoreEvent::new(update));
    }
}

use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use chrono::Utc;
use client_core::{FilterStore, PointStore, StoreEvent, SubscriptionId};
use shared::domain::{FilterType, UpdateType};
use tracing::debug;

use crate::view::{Component, FilterBar, FilterItem, Position, Slot, Surface};

/// Filter bar with per-filter counts. Selecting a filter is a major update:
/// the board resets its sort and re-renders.
pub struct FilterPresenter {
    surface: Rc<dyn Surface>,
    points: Rc<PointStore>,
    filter: Rc<FilterStore>,
    mounted: Cell<bool>,
    point_subscription: SubscriptionId,
    filter_subscription: SubscriptionId,
}

impl FilterPresenter {
    pub fn new(
        surface: Rc<dyn Surface>,
        points: Rc<PointStore>,
        filter: Rc<FilterStore>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let point_subscription = points.events().subscribe(Self::listener(weak.clone()));
            let filter_subscription = filter.events().subscribe(Self::listener(weak.clone()));
            Self {
                surface,
                points,
                filter,
                mounted: Cell::new(false),
                point_subscription,
                filter_subscription,
            }
        })
    }

    fn listener(presenter: Weak<Self>) -> impl Fn(&StoreEvent) + 'static {
        move |_: &StoreEvent| {
            if let Some(presenter) = presenter.upgrade() {
                presenter.init();
            }
        }
    }

    pub fn filter_bar(&self) -> FilterBar {
        let points = self.points.points();
        let current = self.filter.filter();
        let now = Utc::now();
        FilterBar {
            items: FilterType::ALL
                .into_iter()
                .map(|filter| {
                    let count = points.iter().filter(|point| filter.matches(point, now)).count();
                    FilterItem {
                        filter,
                        count,
                        checked: filter == current,
                        disabled: count == 0,
                    }
                })
                .collect(),
        }
    }

    /// Mounts the bar on first call, replaces it afterwards.
    pub fn init(&self) {
        let component = Component::Filters(self.filter_bar());
        if self.mounted.replace(true) {
            self.surface.replace(Slot::Filters, component);
        } else {
            self.surface.mount(Slot::Filters, component, Position::Start);
        }
    }

    /// Switches the board to `filter`. The current filter and filters with
    /// no matching points are not selectable.
    pub fn select(&self, filter: FilterType) -> bool {
        if self.filter.filter() == filter {
            return false;
        }
        let now = Utc::now();
        if !self.points.points().iter().any(|point| filter.matches(point, now)) {
            debug!(filter = filter.as_str(), "ignoring empty filter");
            return false;
        }
        debug!(filter = filter.as_str(), "filter selected");
        self.filter.set_filter(UpdateType::Major, filter);
        true
    }
}

impl Drop for FilterPresenter {
    fn drop(&mut self) {
        self.points.events().unsubscribe(self.point_subscription);
        self.filter.events().unsubscribe(self.filter_subscription);
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;

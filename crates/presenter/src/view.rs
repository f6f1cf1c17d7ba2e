//! Render contracts between presenters and the host, plus the view models
//! presenters hand over. Presenters decide *what* is shown; the host decides
//! how it looks.

use chrono::{DateTime, Duration, Utc};
use client_core::{CitiesStore, OffersStore, TripInfo};
use shared::domain::{
    Destination, FilterType, Offer, Point, PointDraft, PointId, PointType, SortType,
};

/// Addressable region of the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Loading,
    EmptyMessage,
    Sort,
    TripInfo,
    Filters,
    /// A row in the list; mounted rows keep mount order.
    Point(PointId),
    /// The new-point form, shown above the list.
    NewPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Empty(EmptyMessage),
    Sort(SortBar),
    TripInfo(TripInfo),
    Filters(FilterBar),
    Row(PointRow),
    Form(PointForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyMessage {
    Loading,
    NoPoints,
}

impl EmptyMessage {
    pub fn text(self) -> &'static str {
        match self {
            EmptyMessage::Loading => "Loading...",
            EmptyMessage::NoPoints => "Click New Event to create your first point",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    pub sort: SortType,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBar {
    pub items: Vec<SortItem>,
}

impl SortBar {
    pub fn new(current: SortType) -> Self {
        Self {
            items: SortType::ALL
                .into_iter()
                .map(|sort| SortItem {
                    sort,
                    checked: sort == current,
                    disabled: !sort.is_enabled(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub filter: FilterType,
    pub count: usize,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    pub items: Vec<FilterItem>,
}

/// Read-only row for one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointRow {
    pub id: PointId,
    pub kind: PointType,
    pub destination_name: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub duration: Duration,
    pub base_price: u32,
    pub offers: Vec<Offer>,
    pub is_favorite: bool,
}

impl PointRow {
    pub fn build(point: &Point, cities: &CitiesStore, offers: &OffersStore) -> Self {
        Self {
            id: point.id.clone(),
            kind: point.kind,
            destination_name: cities
                .by_id(&point.destination)
                .map(|city| city.name.clone())
                .unwrap_or_default(),
            date_from: point.date_from,
            date_to: point.date_to,
            duration: point.duration(),
            base_price: point.base_price,
            offers: offers
                .offers_for(point.kind)
                .iter()
                .filter(|offer| point.offers.contains(&offer.id))
                .cloned()
                .collect(),
            is_favorite: point.is_favorite,
        }
    }
}

/// Flags the host toggles in place on a mounted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormState {
    pub is_disabled: bool,
    pub is_saving: bool,
    pub is_deleting: bool,
}

impl FormState {
    pub fn saving() -> Self {
        Self {
            is_disabled: true,
            is_saving: true,
            is_deleting: false,
        }
    }

    pub fn deleting() -> Self {
        Self {
            is_disabled: true,
            is_saving: false,
            is_deleting: true,
        }
    }
}

/// Edit form for an existing point or for a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct PointForm {
    pub draft: PointDraft,
    pub destination: Option<Destination>,
    pub available_offers: Vec<Offer>,
    pub destination_names: Vec<String>,
    pub state: FormState,
    pub is_new: bool,
}

/// Where a newly mounted slot goes relative to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Start,
    End,
}

/// Host render target.
pub trait Surface {
    fn mount(&self, slot: Slot, component: Component, position: Position);
    fn replace(&self, slot: Slot, component: Component);
    /// In-place update of a mounted form's busy flags; draft values stay.
    fn update_form(&self, slot: &Slot, state: FormState);
    fn remove(&self, slot: &Slot);
    /// Transient failure cue on a mounted slot.
    fn shake(&self, slot: &Slot);
}

pub trait BusyIndicator {
    fn show(&self);
    fn hide(&self);
}

/// The host's "New event" affordance.
pub trait NewPointButton {
    fn set_disabled(&self, disabled: bool);
}

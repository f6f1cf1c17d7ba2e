//! Recording doubles for the host collaborators.

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, TimeZone, Utc};
use client_core::{
    testing::{point_record, sample_destinations, sample_offers},
    CitiesStore, OffersStore,
};
use shared::{
    domain::{Point, PointId},
    protocol::PointRecord,
};

use crate::{
    view::{BusyIndicator, Component, FormState, NewPointButton, PointForm, Position, Slot, Surface},
    PresenterContext,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Mount(Slot, Position),
    Replace(Slot),
    UpdateForm(Slot, FormState),
    Remove(Slot),
    Shake(Slot),
}

#[derive(Default)]
pub struct RecordingSurface {
    ops: RefCell<Vec<SurfaceOp>>,
    mounted: RefCell<Vec<(Slot, Component)>>,
}

impl RecordingSurface {
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn component(&self, slot: &Slot) -> Option<Component> {
        self.mounted
            .borrow()
            .iter()
            .find(|(mounted, _)| mounted == slot)
            .map(|(_, component)| component.clone())
    }

    pub fn is_mounted(&self, slot: &Slot) -> bool {
        self.component(slot).is_some()
    }

    pub fn form(&self, slot: &Slot) -> Option<PointForm> {
        match self.component(slot) {
            Some(Component::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn row_ids(&self) -> Vec<String> {
        self.mounted
            .borrow()
            .iter()
            .filter_map(|(slot, _)| match slot {
                Slot::Point(id) => Some(id.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn forms_open(&self) -> usize {
        self.mounted
            .borrow()
            .iter()
            .filter(|(_, component)| matches!(component, Component::Form(_)))
            .count()
    }

    pub fn shakes(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Shake(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn mount(&self, slot: Slot, component: Component, position: Position) {
        self.ops
            .borrow_mut()
            .push(SurfaceOp::Mount(slot.clone(), position));
        let mut mounted = self.mounted.borrow_mut();
        assert!(
            mounted.iter().all(|(existing, _)| *existing != slot),
            "{slot:?} mounted twice"
        );
        match position {
            Position::Start => mounted.insert(0, (slot, component)),
            Position::End => mounted.push((slot, component)),
        }
    }

    fn replace(&self, slot: Slot, component: Component) {
        self.ops.borrow_mut().push(SurfaceOp::Replace(slot.clone()));
        let mut mounted = self.mounted.borrow_mut();
        let entry = mounted
            .iter_mut()
            .find(|(existing, _)| *existing == slot)
            .unwrap_or_else(|| panic!("{slot:?} replaced before mount"));
        entry.1 = component;
    }

    fn update_form(&self, slot: &Slot, state: FormState) {
        self.ops
            .borrow_mut()
            .push(SurfaceOp::UpdateForm(slot.clone(), state));
        for (existing, component) in self.mounted.borrow_mut().iter_mut() {
            if existing == slot {
                if let Component::Form(form) = component {
                    form.state = state;
                }
            }
        }
    }

    fn remove(&self, slot: &Slot) {
        self.ops.borrow_mut().push(SurfaceOp::Remove(slot.clone()));
        self.mounted.borrow_mut().retain(|(existing, _)| existing != slot);
    }

    fn shake(&self, slot: &Slot) {
        self.ops.borrow_mut().push(SurfaceOp::Shake(slot.clone()));
    }
}

#[derive(Default)]
pub struct RecordingIndicator {
    pub events: RefCell<Vec<(&'static str, tokio::time::Instant)>>,
}

impl RecordingIndicator {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|(name, _)| *name).collect()
    }
}

impl BusyIndicator for RecordingIndicator {
    fn show(&self) {
        self.events
            .borrow_mut()
            .push(("show", tokio::time::Instant::now()));
    }

    fn hide(&self) {
        self.events
            .borrow_mut()
            .push(("hide", tokio::time::Instant::now()));
    }
}

#[derive(Default)]
pub struct RecordingButton {
    pub states: RefCell<Vec<bool>>,
}

impl RecordingButton {
    pub fn is_disabled(&self) -> bool {
        self.states.borrow().last().copied().unwrap_or(false)
    }
}

impl NewPointButton for RecordingButton {
    fn set_disabled(&self, disabled: bool) {
        self.states.borrow_mut().push(disabled);
    }
}

pub fn context() -> (PresenterContext, Rc<RecordingSurface>) {
    let surface = Rc::new(RecordingSurface::default());
    let ctx = PresenterContext::new(
        surface.clone(),
        Rc::new(CitiesStore::new(sample_destinations())),
        Rc::new(OffersStore::new(sample_offers())),
    );
    (ctx, surface)
}

pub fn day(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, day, hour, 0, 0).unwrap()
}

/// Taxi leg in March 2020, long in the past for every filter.
pub fn past_record(id: &str, day_of_month: u32, hours: u32, price: u32) -> PointRecord {
    point_record(
        id,
        day(day_of_month, 8),
        day(day_of_month, 8 + hours),
        price,
        "amsterdam",
    )
}

/// Taxi leg starting in 2099.
pub fn future_record(id: &str, price: u32) -> PointRecord {
    point_record(
        id,
        Utc.with_ymd_and_hms(2099, 1, 1, 8, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2099, 1, 1, 10, 0, 0).unwrap(),
        price,
        "geneva",
    )
}

pub fn point(record: PointRecord) -> Point {
    Point::try_from(record).expect("valid record")
}

pub fn id(value: &str) -> PointId {
    PointId::new(value)
}

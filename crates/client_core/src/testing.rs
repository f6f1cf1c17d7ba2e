//! In-memory trip service and fixtures for store and presenter tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    domain::{Destination, DestinationId, Offer, OfferGroup, OfferId, PointId, PointType},
    protocol::{NewPointRecord, PointRecord},
};

use crate::TripService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeCall {
    ListPoints,
    ListDestinations,
    ListOffers,
    CreatePoint,
    UpdatePoint,
    DeletePoint,
}

pub struct FakeTripService {
    points: RefCell<Vec<PointRecord>>,
    destinations: Vec<Destination>,
    offers: Vec<OfferGroup>,
    failing: RefCell<HashSet<FakeCall>>,
    latency: Cell<Duration>,
    calls: RefCell<Vec<FakeCall>>,
    next_id: Cell<u64>,
}

impl FakeTripService {
    pub fn new() -> Self {
        Self::with_points(Vec::new())
    }

    pub fn with_points(points: Vec<PointRecord>) -> Self {
        Self {
            points: RefCell::new(points),
            destinations: sample_destinations(),
            offers: sample_offers(),
            failing: RefCell::new(HashSet::new()),
            latency: Cell::new(Duration::ZERO),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn fail(&self, call: FakeCall) {
        self.failing.borrow_mut().insert(call);
    }

    pub fn recover(&self, call: FakeCall) {
        self.failing.borrow_mut().remove(&call);
    }

    /// Every call sleeps this long before answering (tokio time, so paused
    /// test clocks apply).
    pub fn set_latency(&self, latency: Duration) {
        self.latency.set(latency);
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: FakeCall) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|candidate| **candidate == call)
            .count()
    }

    pub fn stored_points(&self) -> Vec<PointRecord> {
        self.points.borrow().clone()
    }

    async fn enter(&self, call: FakeCall) -> Result<()> {
        self.calls.borrow_mut().push(call);
        let latency = self.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.failing.borrow().contains(&call) {
            return Err(anyhow!("{call:?} rejected by fake trip service"));
        }
        Ok(())
    }
}

impl Default for FakeTripService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl TripService for FakeTripService {
    async fn list_points(&self) -> Result<Vec<PointRecord>> {
        self.enter(FakeCall::ListPoints).await?;
        Ok(self.points.borrow().clone())
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        self.enter(FakeCall::ListDestinations).await?;
        Ok(self.destinations.clone())
    }

    async fn list_offers(&self) -> Result<Vec<OfferGroup>> {
        self.enter(FakeCall::ListOffers).await?;
        Ok(self.offers.clone())
    }

    async fn create_point(&self, point: &NewPointRecord) -> Result<PointRecord> {
        self.enter(FakeCall::CreatePoint).await?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let record = PointRecord {
            id: format!("created-{id}"),
            kind: point.kind,
            base_price: point.base_price,
            date_from: point.date_from,
            date_to: point.date_to,
            destination: point.destination.clone(),
            is_favorite: point.is_favorite,
            offers: point.offers.clone(),
        };
        self.points.borrow_mut().push(record.clone());
        Ok(record)
    }

    async fn update_point(&self, point: &PointRecord) -> Result<PointRecord> {
        self.enter(FakeCall::UpdatePoint).await?;
        let mut points = self.points.borrow_mut();
        let stored = points
            .iter_mut()
            .find(|candidate| candidate.id == point.id)
            .ok_or_else(|| anyhow!("point {} not found", point.id))?;
        *stored = point.clone();
        Ok(point.clone())
    }

    async fn delete_point(&self, id: &PointId) -> Result<()> {
        self.enter(FakeCall::DeletePoint).await?;
        let mut points = self.points.borrow_mut();
        let before = points.len();
        points.retain(|candidate| candidate.id != id.as_str());
        if points.len() == before {
            return Err(anyhow!("point {id} not found"));
        }
        Ok(())
    }
}

pub fn sample_destinations() -> Vec<Destination> {
    ["Amsterdam", "Geneva", "Chamonix", "Paris"]
        .into_iter()
        .map(|name| Destination {
            id: DestinationId::new(name.to_ascii_lowercase()),
            name: name.to_string(),
            description: format!("{name} is a lovely place."),
            pictures: Vec::new(),
        })
        .collect()
}

pub fn sample_offers() -> Vec<OfferGroup> {
    let offer = |id: &str, title: &str, price: u32| Offer {
        id: OfferId::new(id),
        title: title.to_string(),
        price,
    };
    vec![
        OfferGroup {
            kind: PointType::Taxi,
            offers: vec![
                offer("taxi-upgrade", "Upgrade to a business class", 50),
                offer("taxi-radio", "Choose the radio station", 10),
            ],
        },
        OfferGroup {
            kind: PointType::Flight,
            offers: vec![
                offer("flight-luggage", "Add luggage", 30),
                offer("flight-meal", "Add meal", 15),
            ],
        },
    ]
}

pub fn point_record(
    id: &str,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    base_price: u32,
    destination: &str,
) -> PointRecord {
    PointRecord {
        id: id.to_string(),
        kind: PointType::Taxi,
        base_price,
        date_from,
        date_to,
        destination: Some(destination.to_string()),
        is_favorite: false,
        offers: Vec::new(),
    }
}

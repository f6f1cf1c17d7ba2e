use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, ParseEnumError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(PointId);
id_newtype!(DestinationId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Bus,
    Drive,
    Flight,
    Ship,
    #[default]
    Taxi,
    Train,
    CheckIn,
    Restaurant,
    Sightseeing,
}

impl PointType {
    pub const ALL: [PointType; 9] = [
        PointType::Bus,
        PointType::Drive,
        PointType::Flight,
        PointType::Ship,
        PointType::Taxi,
        PointType::Train,
        PointType::CheckIn,
        PointType::Restaurant,
        PointType::Sightseeing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PointType::Bus => "bus",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::Ship => "ship",
            PointType::Taxi => "taxi",
            PointType::Train => "train",
            PointType::CheckIn => "check-in",
            PointType::Restaurant => "restaurant",
            PointType::Sightseeing => "sightseeing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointType::Bus => "Bus",
            PointType::Drive => "Drive",
            PointType::Flight => "Flight",
            PointType::Ship => "Ship",
            PointType::Taxi => "Taxi",
            PointType::Train => "Train",
            PointType::CheckIn => "Check-in",
            PointType::Restaurant => "Restaurant",
            PointType::Sightseeing => "Sightseeing",
        }
    }
}

impl FromStr for PointType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        PointType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.as_str().replace('-', "") == normalized)
            .ok_or_else(|| ParseEnumError::new("point type", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub offers: Vec<Offer>,
}

/// A confirmed trip leg, as last acknowledged by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub id: PointId,
    pub kind: PointType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: DestinationId,
    pub is_favorite: bool,
    pub offers: BTreeSet<OfferId>,
}

impl Point {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }

    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        now < self.date_from
    }

    pub fn is_present(&self, now: DateTime<Utc>) -> bool {
        self.date_from < now && now < self.date_to
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        now > self.date_to
    }

    pub fn to_draft(&self) -> PointDraft {
        PointDraft {
            id: Some(self.id.clone()),
            kind: self.kind,
            base_price: self.base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination: Some(self.destination.clone()),
            is_favorite: self.is_favorite,
            offers: self.offers.clone(),
        }
    }

    pub fn with_favorite_toggled(&self) -> Point {
        Point {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

/// Value-wise comparison of the fields that can move a point between filters
/// or change its position under any sort order.
pub fn has_significant_difference(update: &Point, confirmed: &Point) -> bool {
    update.base_price != confirmed.base_price
        || update.date_from != confirmed.date_from
        || update.duration() != confirmed.duration()
        || update.destination != confirmed.destination
        || update.offers != confirmed.offers
}

/// Editable form payload. `id` is `None` until the service has created the point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointDraft {
    pub id: Option<PointId>,
    pub kind: PointType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Option<DestinationId>,
    pub is_favorite: bool,
    pub offers: BTreeSet<OfferId>,
}

impl PointDraft {
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            kind: PointType::default(),
            base_price: 0,
            date_from: now,
            date_to: now,
            destination: None,
            is_favorite: false,
            offers: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.destination.is_none() {
            return Err(DraftError::MissingDestination);
        }
        if self.date_to < self.date_from {
            return Err(DraftError::InvertedDates {
                date_from: self.date_from,
                date_to: self.date_to,
            });
        }
        Ok(())
    }

    pub fn to_point(&self) -> Result<Point, DraftError> {
        self.validate()?;
        let id = self.id.clone().ok_or(DraftError::MissingId)?;
        let destination = self
            .destination
            .clone()
            .ok_or(DraftError::MissingDestination)?;
        Ok(Point {
            id,
            kind: self.kind,
            base_price: self.base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination,
            is_favorite: self.is_favorite,
            offers: self.offers.clone(),
        })
    }
}

pub fn sort_by_day(points: &mut [Point]) {
    points.sort_by_key(|point| point.date_from);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Everything,
        FilterType::Future,
        FilterType::Present,
        FilterType::Past,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::Everything => "everything",
            FilterType::Future => "future",
            FilterType::Present => "present",
            FilterType::Past => "past",
        }
    }

    pub fn matches(self, point: &Point, now: DateTime<Utc>) -> bool {
        match self {
            FilterType::Everything => true,
            FilterType::Future => point.is_future(now),
            FilterType::Present => point.is_present(now),
            FilterType::Past => point.is_past(now),
        }
    }

    /// Keeps the input order of the matching points.
    pub fn apply(self, points: &[Point], now: DateTime<Utc>) -> Vec<Point> {
        points
            .iter()
            .filter(|point| self.matches(point, now))
            .cloned()
            .collect()
    }
}

impl FromStr for FilterType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        FilterType::ALL
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("filter", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortType {
    #[default]
    Day,
    Event,
    Time,
    Price,
    Offers,
}

impl SortType {
    pub const ALL: [SortType; 5] = [
        SortType::Day,
        SortType::Event,
        SortType::Time,
        SortType::Price,
        SortType::Offers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortType::Day => "day",
            SortType::Event => "event",
            SortType::Time => "time",
            SortType::Price => "price",
            SortType::Offers => "offers",
        }
    }

    pub fn is_enabled(self) -> bool {
        !matches!(self, SortType::Event | SortType::Offers)
    }

    /// Stable, so equal keys keep the incoming day order. `Day` leaves the
    /// input untouched since callers already hold day-ordered points.
    pub fn sort(self, points: &mut [Point]) {
        match self {
            SortType::Time => points.sort_by_key(Point::duration),
            SortType::Price => points.sort_by_key(|point| point.base_price),
            SortType::Day | SortType::Event | SortType::Offers => {}
        }
    }
}

impl FromStr for SortType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        SortType::ALL
            .into_iter()
            .find(|sort| sort.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("sort", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    Patch,
    Minor,
    Major,
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    UpdatePoint,
    AddPoint,
    DeletePoint,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

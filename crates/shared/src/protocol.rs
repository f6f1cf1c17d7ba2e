use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{DestinationId, OfferId, Point, PointDraft, PointId, PointType},
    error::ProtocolError,
};

/// Point as exchanged with the trip service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PointType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub offers: Vec<String>,
}

/// Create payload; the service assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPointRecord {
    #[serde(rename = "type")]
    pub kind: PointType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Option<String>,
    pub is_favorite: bool,
    pub offers: Vec<String>,
}

impl TryFrom<PointRecord> for Point {
    type Error = ProtocolError;

    fn try_from(record: PointRecord) -> Result<Self, Self::Error> {
        let Some(destination) = record.destination else {
            return Err(ProtocolError::MissingDestination {
                point_id: record.id,
            });
        };
        if record.date_to < record.date_from {
            return Err(ProtocolError::InvertedDates {
                point_id: record.id,
            });
        }

        Ok(Point {
            id: PointId(record.id),
            kind: record.kind,
            base_price: record.base_price,
            date_from: record.date_from,
            date_to: record.date_to,
            destination: DestinationId(destination),
            is_favorite: record.is_favorite,
            offers: record.offers.into_iter().map(OfferId).collect(),
        })
    }
}

impl From<&Point> for PointRecord {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id.0.clone(),
            kind: point.kind,
            base_price: point.base_price,
            date_from: point.date_from,
            date_to: point.date_to,
            destination: Some(point.destination.0.clone()),
            is_favorite: point.is_favorite,
            offers: point.offers.iter().map(|offer| offer.0.clone()).collect(),
        }
    }
}

impl From<&PointDraft> for NewPointRecord {
    fn from(draft: &PointDraft) -> Self {
        Self {
            kind: draft.kind,
            base_price: draft.base_price,
            date_from: draft.date_from,
            date_to: draft.date_to,
            destination: draft.destination.as_ref().map(|id| id.0.clone()),
            is_favorite: draft.is_favorite,
            offers: draft.offers.iter().map(|offer| offer.0.clone()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;

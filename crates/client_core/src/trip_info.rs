use chrono::{DateTime, Utc};
use shared::domain::{sort_by_day, Point};

use crate::catalog::{CitiesStore, OffersStore};

const ROUTE_CITY_LIMIT: usize = 3;
const ROUTE_SEPARATOR: &str = " — ";

/// Header summary of the whole trip, independent of the active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInfo {
    pub title: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub total_cost: u64,
}

impl TripInfo {
    pub fn summarize(points: &[Point], cities: &CitiesStore, offers: &OffersStore) -> Option<Self> {
        let mut points = points.to_vec();
        sort_by_day(&mut points);

        let first = points.first()?;
        let date_to = points.iter().map(|point| point.date_to).max()?;

        let route: Vec<&str> = points
            .iter()
            .filter_map(|point| cities.by_id(&point.destination))
            .map(|city| city.name.as_str())
            .collect();

        Some(Self {
            title: route_title(&route),
            date_from: first.date_from,
            date_to,
            total_cost: points.iter().map(|point| point_cost(point, offers)).sum(),
        })
    }
}

fn route_title(route: &[&str]) -> String {
    match route {
        [] => String::new(),
        [first, .., last] if route.len() > ROUTE_CITY_LIMIT => {
            [*first, "...", *last].join(ROUTE_SEPARATOR)
        }
        _ => route.join(ROUTE_SEPARATOR),
    }
}

/// Base price plus every selected offer that belongs to the point's type.
pub fn point_cost(point: &Point, offers: &OffersStore) -> u64 {
    let extras: u64 = offers
        .offers_for(point.kind)
        .iter()
        .filter(|offer| point.offers.contains(&offer.id))
        .map(|offer| u64::from(offer.price))
        .sum();
    u64::from(point.base_price) + extras
}

#[cfg(test)]
#[path = "tests/trip_info_tests.rs"]
mod tests;

use super::*;
use crate::testing::{sample_destinations, sample_offers};
use chrono::TimeZone;
use shared::domain::{DestinationId, OfferId, PointId, PointType};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
}

fn leg(id: &str, day: u32, destination: &str, price: u32) -> Point {
    Point {
        id: PointId::new(id),
        kind: PointType::Taxi,
        base_price: price,
        date_from: at(day, 9),
        date_to: at(day, 11),
        destination: DestinationId::new(destination),
        is_favorite: false,
        offers: Default::default(),
    }
}

fn catalogs() -> (CitiesStore, OffersStore) {
    (
        CitiesStore::new(sample_destinations()),
        OffersStore::new(sample_offers()),
    )
}

#[test]
fn empty_trip_has_no_summary() {
    let (cities, offers) = catalogs();
    assert_eq!(TripInfo::summarize(&[], &cities, &offers), None);
}

#[test]
fn short_route_lists_every_city_in_day_order() {
    let (cities, offers) = catalogs();
    let points = vec![
        leg("b", 2, "geneva", 20),
        leg("a", 1, "amsterdam", 10),
        leg("c", 3, "chamonix", 30),
    ];

    let info = TripInfo::summarize(&points, &cities, &offers).expect("summary");
    assert_eq!(info.title, "Amsterdam — Geneva — Chamonix");
    assert_eq!(info.date_from, at(1, 9));
    assert_eq!(info.date_to, at(3, 11));
    assert_eq!(info.total_cost, 60);
}

#[test]
fn long_route_collapses_the_middle() {
    let (cities, offers) = catalogs();
    let points = vec![
        leg("a", 1, "amsterdam", 10),
        leg("b", 2, "geneva", 10),
        leg("c", 3, "chamonix", 10),
        leg("d", 4, "paris", 10),
    ];

    let info = TripInfo::summarize(&points, &cities, &offers).expect("summary");
    assert_eq!(info.title, "Amsterdam — ... — Paris");
}

#[test]
fn cost_includes_only_selected_offers_of_the_points_type() {
    let (_, offers) = catalogs();
    let mut point = leg("a", 1, "amsterdam", 100);
    point.offers.insert(OfferId::new("taxi-upgrade"));
    point.offers.insert(OfferId::new("flight-meal"));

    assert_eq!(point_cost(&point, &offers), 150);
}

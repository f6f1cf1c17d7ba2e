use super::*;
use crate::testing::{FakeCall, FakeTripService};

#[tokio::test]
async fn loads_destinations_and_looks_them_up() {
    let service = FakeTripService::new();
    let cities = CitiesStore::load(&service).await;

    assert_eq!(cities.all().len(), 4);
    assert_eq!(
        cities
            .by_id(&DestinationId::new("geneva"))
            .map(|city| city.name.as_str()),
        Some("Geneva")
    );
    assert_eq!(
        cities.by_name("  chamonix ").map(|city| city.id.as_str()),
        Some("chamonix")
    );
    assert!(cities.by_id(&DestinationId::new("atlantis")).is_none());
}

#[tokio::test]
async fn failed_catalog_loads_yield_empty_stores() {
    let service = FakeTripService::new();
    service.fail(FakeCall::ListDestinations);
    service.fail(FakeCall::ListOffers);

    let cities = CitiesStore::load(&service).await;
    let offers = OffersStore::load(&service).await;

    assert!(cities.all().is_empty());
    assert!(offers.all().is_empty());
    assert!(offers.offers_for(PointType::Taxi).is_empty());
}

#[tokio::test]
async fn offers_are_scoped_to_point_type() {
    let service = FakeTripService::new();
    let offers = OffersStore::load(&service).await;

    let taxi: Vec<_> = offers
        .offers_for(PointType::Taxi)
        .iter()
        .map(|offer| offer.id.as_str())
        .collect();
    assert_eq!(taxi, ["taxi-upgrade", "taxi-radio"]);
    assert!(offers.offers_for(PointType::Ship).is_empty());
    assert!(offers
        .find(PointType::Flight, &OfferId::new("taxi-upgrade"))
        .is_none());
    assert_eq!(
        offers
            .find(PointType::Flight, &OfferId::new("flight-meal"))
            .map(|offer| offer.price),
        Some(15)
    );
}

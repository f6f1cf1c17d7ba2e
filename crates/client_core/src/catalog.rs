//! Read-only reference data loaded once at startup: destinations and the
//! per-type offer catalog.

use shared::domain::{Destination, DestinationId, Offer, OfferGroup, OfferId, PointType};
use tracing::{info, warn};

use crate::TripService;

#[derive(Debug, Clone, Default)]
pub struct CitiesStore {
    cities: Vec<Destination>,
}

impl CitiesStore {
    pub fn new(cities: Vec<Destination>) -> Self {
        Self { cities }
    }

    pub async fn load(service: &dyn TripService) -> Self {
        match service.list_destinations().await {
            Ok(cities) => {
                info!(count = cities.len(), "loaded destinations");
                Self::new(cities)
            }
            Err(err) => {
                warn!("failed to load destinations: {err:#}");
                Self::default()
            }
        }
    }

    pub fn all(&self) -> &[Destination] {
        &self.cities
    }

    pub fn by_id(&self, id: &DestinationId) -> Option<&Destination> {
        self.cities.iter().find(|city| &city.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Destination> {
        let name = name.trim();
        self.cities
            .iter()
            .find(|city| city.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct OffersStore {
    groups: Vec<OfferGroup>,
}

impl OffersStore {
    pub fn new(groups: Vec<OfferGroup>) -> Self {
        Self { groups }
    }

    pub async fn load(service: &dyn TripService) -> Self {
        match service.list_offers().await {
            Ok(groups) => {
                info!(count = groups.len(), "loaded offer catalog");
                Self::new(groups)
            }
            Err(err) => {
                warn!("failed to load offer catalog: {err:#}");
                Self::default()
            }
        }
    }

    pub fn all(&self) -> &[OfferGroup] {
        &self.groups
    }

    /// Offers available for `kind`, in catalog order. Unknown types have none.
    pub fn offers_for(&self, kind: PointType) -> &[Offer] {
        self.groups
            .iter()
            .find(|group| group.kind == kind)
            .map(|group| group.offers.as_slice())
            .unwrap_or_default()
    }

    pub fn find(&self, kind: PointType, id: &OfferId) -> Option<&Offer> {
        self.offers_for(kind).iter().find(|offer| &offer.id == id)
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

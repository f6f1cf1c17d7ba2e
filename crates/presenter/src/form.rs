use chrono::{DateTime, Utc};
use client_core::{CitiesStore, OffersStore};
use shared::{
    domain::{OfferId, Point, PointDraft, PointType},
    error::DraftError,
};
use thiserror::Error;
use tracing::debug;

use crate::view::{FormState, PointForm};

/// A single user edit applied to an open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftChange {
    Type(PointType),
    /// City name as typed; resolved against the destinations catalog.
    Destination(String),
    BasePrice(u32),
    DateFrom(DateTime<Utc>),
    DateTo(DateTime<Utc>),
    ToggleOffer(OfferId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown destination {0:?}")]
    UnknownDestination(String),
    #[error("offer {offer} is not available for {kind}")]
    UnknownOffer { kind: &'static str, offer: OfferId },
    #[error("form is busy")]
    Disabled,
    #[error("no form is open")]
    Closed,
    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Draft plus busy flags behind one open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEditForm {
    draft: PointDraft,
    state: FormState,
    is_new: bool,
}

impl PointEditForm {
    pub fn for_point(point: &Point) -> Self {
        Self {
            draft: point.to_draft(),
            state: FormState::default(),
            is_new: false,
        }
    }

    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            draft: PointDraft::blank(now),
            state: FormState::default(),
            is_new: true,
        }
    }

    pub fn draft(&self) -> &PointDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn set_state(&mut self, state: FormState) {
        self.state = state;
    }

    /// Drops unsaved edits in favour of the confirmed snapshot.
    pub fn reset(&mut self, point: &Point) {
        self.draft = point.to_draft();
        self.state = FormState::default();
    }

    pub fn apply(
        &mut self,
        change: DraftChange,
        cities: &CitiesStore,
        offers: &OffersStore,
    ) -> Result<(), FormError> {
        if self.state.is_disabled {
            return Err(FormError::Disabled);
        }
        debug!(change = ?change, "applying draft change");
        match change {
            DraftChange::Type(kind) => {
                let available = offers.offers_for(kind);
                self.draft.kind = kind;
                self.draft
                    .offers
                    .retain(|id| available.iter().any(|offer| offer.id == *id));
            }
            DraftChange::Destination(name) => {
                let city = cities
                    .by_name(&name)
                    .ok_or_else(|| FormError::UnknownDestination(name.clone()))?;
                self.draft.destination = Some(city.id.clone());
            }
            DraftChange::BasePrice(price) => self.draft.base_price = price,
            DraftChange::DateFrom(date) => self.draft.date_from = date,
            DraftChange::DateTo(date) => self.draft.date_to = date,
            DraftChange::ToggleOffer(id) => {
                if offers.find(self.draft.kind, &id).is_none() {
                    return Err(FormError::UnknownOffer {
                        kind: self.draft.kind.as_str(),
                        offer: id,
                    });
                }
                if !self.draft.offers.remove(&id) {
                    self.draft.offers.insert(id);
                }
            }
        }
        Ok(())
    }

    pub fn component(&self, cities: &CitiesStore, offers: &OffersStore) -> PointForm {
        PointForm {
            draft: self.draft.clone(),
            destination: self
                .draft
                .destination
                .as_ref()
                .and_then(|id| cities.by_id(id))
                .cloned(),
            available_offers: offers.offers_for(self.draft.kind).to_vec(),
            destination_names: cities.all().iter().map(|city| city.name.clone()).collect(),
            state: self.state,
            is_new: self.is_new,
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;

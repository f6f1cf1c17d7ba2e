use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::anyhow;
use shared::{
    domain::{sort_by_day, Point, PointDraft, PointId, UpdateType},
    protocol::{NewPointRecord, PointRecord},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{observable::Observable, StoreEvent, TripService};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("can't update point {point_id}: {source}")]
    Update {
        point_id: PointId,
        source: anyhow::Error,
    },
    #[error("can't add point: {source}")]
    Add { source: anyhow::Error },
    #[error("can't delete point {point_id}: {source}")]
    Delete {
        point_id: PointId,
        source: anyhow::Error,
    },
}

/// Authoritative point collection. Only confirmed service responses reach
/// `points`; a failed round-trip leaves it exactly as it was.
pub struct PointStore {
    service: Rc<dyn TripService>,
    points: RefCell<Vec<Point>>,
    initialized: Cell<bool>,
    events: Observable<StoreEvent>,
}

impl PointStore {
    pub fn new(service: Rc<dyn TripService>) -> Self {
        Self {
            service,
            points: RefCell::new(Vec::new()),
            initialized: Cell::new(false),
            events: Observable::new(),
        }
    }

    pub fn events(&self) -> &Observable<StoreEvent> {
        &self.events
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Day-ordered snapshot of the collection.
    pub fn points(&self) -> Vec<Point> {
        self.points.borrow().clone()
    }

    pub fn get(&self, id: &PointId) -> Option<Point> {
        self.points.borrow().iter().find(|point| &point.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.points.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.borrow().is_empty()
    }

    pub async fn initialize(&self) {
        if self.initialized.replace(true) {
            warn!("point store already initialized; ignoring repeated load");
            return;
        }

        let loaded = match self.load().await {
            Ok(points) => {
                info!(count = points.len(), "loaded points");
                points
            }
            Err(err) => {
                warn!("failed to load points, starting empty: {err:#}");
                Vec::new()
            }
        };
        self.replace_all(loaded);
        self.events.notify(&StoreEvent::new(UpdateType::Init));
    }

    async fn load(&self) -> anyhow::Result<Vec<Point>> {
        let records = self.service.list_points().await?;
        records
            .into_iter()
            .map(|record| Point::try_from(record).map_err(anyhow::Error::from))
            .collect()
    }

    pub async fn update(&self, update: UpdateType, point: &Point) -> Result<Point, StoreError> {
        let to_error = |source| StoreError::Update {
            point_id: point.id.clone(),
            source,
        };

        let response = self
            .service
            .update_point(&PointRecord::from(point))
            .await
            .map_err(to_error)?;
        let updated = Point::try_from(response).map_err(|err| to_error(err.into()))?;
        if updated.id != point.id {
            return Err(to_error(anyhow!(
                "service answered with point {}",
                updated.id
            )));
        }

        {
            let mut points = self.points.borrow_mut();
            let Some(slot) = points.iter_mut().find(|candidate| candidate.id == updated.id) else {
                return Err(to_error(anyhow!("point is not in the store")));
            };
            *slot = updated.clone();
            sort_by_day(&mut points);
        }

        info!(point_id = %updated.id, update = ?update, "point updated");
        self.events
            .notify(&StoreEvent::with_point(update, updated.clone()));
        Ok(updated)
    }

    pub async fn add(&self, update: UpdateType, draft: &PointDraft) -> Result<Point, StoreError> {
        let response = self
            .service
            .create_point(&NewPointRecord::from(draft))
            .await
            .map_err(|source| StoreError::Add { source })?;
        let created = Point::try_from(response).map_err(|err| StoreError::Add {
            source: err.into(),
        })?;
        if self.get(&created.id).is_some() {
            return Err(StoreError::Add {
                source: anyhow!("service reused existing id {}", created.id),
            });
        }

        {
            let mut points = self.points.borrow_mut();
            points.push(created.clone());
            sort_by_day(&mut points);
        }

        info!(point_id = %created.id, update = ?update, "point added");
        self.events
            .notify(&StoreEvent::with_point(update, created.clone()));
        Ok(created)
    }

    pub async fn delete(&self, update: UpdateType, point: &Point) -> Result<(), StoreError> {
        self.service
            .delete_point(&point.id)
            .await
            .map_err(|source| StoreError::Delete {
                point_id: point.id.clone(),
                source,
            })?;

        self.points
            .borrow_mut()
            .retain(|candidate| candidate.id != point.id);

        info!(point_id = %point.id, update = ?update, "point deleted");
        self.events.notify(&StoreEvent::new(update));
        Ok(())
    }

    fn replace_all(&self, mut points: Vec<Point>) {
        sort_by_day(&mut points);
        *self.points.borrow_mut() = points;
    }
}

#[cfg(test)]
#[path = "tests/point_store_tests.rs"]
mod tests;

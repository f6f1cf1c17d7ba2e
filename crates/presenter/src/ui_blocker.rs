//! Action gate: serializes mutating actions and drives the busy indicator.
//!
//! The indicator stays hidden for actions shorter than the lower bound. Once
//! shown it stays visible until at least the upper bound measured from the
//! moment the gate was taken.

use std::{cell::Cell, future::Future, rc::Rc, time::Duration};

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::view::BusyIndicator;

pub const DEFAULT_LOWER_LIMIT: Duration = Duration::from_millis(350);
pub const DEFAULT_UPPER_LIMIT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimit {
    pub lower: Duration,
    pub upper: Duration,
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_LIMIT,
            upper: DEFAULT_UPPER_LIMIT,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("another action is still in progress")]
pub struct GateBusy;

pub struct UiBlocker {
    limits: TimeLimit,
    indicator: Rc<dyn BusyIndicator>,
    blocked_at: Cell<Option<Instant>>,
    visible: Cell<bool>,
}

impl UiBlocker {
    pub fn new(limits: TimeLimit, indicator: Rc<dyn BusyIndicator>) -> Self {
        Self {
            limits,
            indicator,
            blocked_at: Cell::new(None),
            visible: Cell::new(false),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked_at.get().is_some()
    }

    pub fn block(&self) -> Result<BlockGuard<'_>, GateBusy> {
        if self.is_blocked() {
            return Err(GateBusy);
        }
        self.blocked_at.set(Some(Instant::now()));
        Ok(BlockGuard { blocker: self })
    }

    /// Takes the gate for the whole lifetime of `action`.
    #[cfg(test)]
    pub async fn run<F: Future>(&self, action: F) -> Result<F::Output, GateBusy> {
        let guard = self.block()?;
        let output = guard.cover(action).await;
        guard.unblock().await;
        Ok(output)
    }

    fn elapsed(&self) -> Duration {
        self.blocked_at
            .get()
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    fn show(&self) {
        if !self.visible.replace(true) {
            debug!("showing busy indicator");
            self.indicator.show();
        }
    }

    fn release(&self) {
        self.blocked_at.set(None);
        if self.visible.replace(false) {
            debug!("hiding busy indicator");
            self.indicator.hide();
        }
    }
}

/// Held while a mutating action runs. Dropping it without [`BlockGuard::unblock`]
/// releases the gate and hides the indicator at once.
#[must_use = "dropping the guard releases the gate immediately"]
pub struct BlockGuard<'a> {
    blocker: &'a UiBlocker,
}

impl BlockGuard<'_> {
    /// Awaits `action`, showing the indicator if it outlives the lower bound.
    pub async fn cover<F: Future>(&self, action: F) -> F::Output {
        tokio::pin!(action);
        let until_visible = self.blocker.limits.lower.saturating_sub(self.blocker.elapsed());
        tokio::select! {
            biased;
            output = &mut action => return output,
            _ = sleep(until_visible) => {}
        }
        self.blocker.show();
        action.await
    }

    /// Keeps a visible indicator up until the upper bound, then releases.
    pub async fn unblock(self) {
        if self.blocker.visible.get() {
            let remaining = self.blocker.limits.upper.saturating_sub(self.blocker.elapsed());
            if !remaining.is_zero() {
                sleep(remaining).await;
            }
        }
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.blocker.release();
    }
}

#[cfg(test)]
#[path = "tests/ui_blocker_tests.rs"]
mod tests;

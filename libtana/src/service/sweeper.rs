//! Periodic expiry sweep
//!
//! A background task removes expired items at a fixed period and emits a
//! tick after every pass. The sweep itself is idempotent and re-evaluates
//! everything against the current clock, so correctness does not depend on
//! the actual fire interval; a late timer just catches up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{Event, InventoryService};
use crate::lifecycle::now_ms;

/// Handle to a running sweep task.
///
/// The task is aborted on [`shutdown`](Sweeper::shutdown) or drop.
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(super) fn spawn(service: InventoryService, period: Duration) -> Sweeper {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let now = now_ms();
            let removed = service.sweep_at(now);
            if removed > 0 {
                debug!(removed, "sweep removed expired items");
            }
            service.events().emit(Event::Tick { now_ms: now });
        }
    });

    Sweeper { handle }
}

//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are never read again still release their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::EntryMap;

/// Spawns a task that sweeps expired entries from `map` every `period`.
///
/// The task stops when `stop` receives a value or its sender is dropped.
/// The first sweep runs one full `period` after spawning.
///
/// # Arguments
/// * `map` - Entry map shared with the owning cache
/// * `period` - Interval between sweeps
/// * `stop` - One-shot cooperative stop signal
///
/// # Returns
/// A JoinHandle for the spawned task.
pub(crate) fn spawn_sweep_task(
    map: Arc<EntryMap>,
    period: Duration,
    mut stop: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {:?}", period);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop => {
                    debug!("Cache sweep task received stop signal");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = map.remove_expired();
                    if removed > 0 {
                        info!("Cache sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Cache sweep: no expired entries found");
                    }
                }
            }
        }
    })
}

//! Poll-driven reconciliation.
//!
//! `tick` runs one reconciliation step and is usable on its own (tests,
//! event loops that own their timers). `SyncLoop` runs `tick` on a tokio
//! interval until stopped or dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::core::clock::Clock;
use crate::core::state::GameState;
use crate::room::RoomId;
use crate::store::RoomStore;

use super::replica::ReplicaHandle;

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A newer remote copy replaced the local one.
    Adopted {
        /// Adopted revision.
        revision: u64,
    },
    /// A previously failed local write went through.
    Republished {
        /// Written revision.
        revision: u64,
    },
    /// Remote copy is not newer; nothing to do.
    UpToDate,
    /// Remote copy absent or unreadable, and nothing could be written.
    Unavailable,
}

/// One reconciliation step.
///
/// 1. Read the remote copy (failures read as absent).
/// 2. If it is strictly newer, adopt it and call `on_update`.
/// 3. Otherwise retry any unpublished local revision.
pub async fn tick<C, K, F>(
    store: &RoomStore<C, K>,
    replica: &ReplicaHandle,
    on_update: &mut F,
) -> TickOutcome
where
    C: Channel,
    K: Clock,
    F: FnMut(&GameState) + ?Sized,
{
    let room_id = replica.room().id().clone();
    let remote = store.read_remote(&room_id).await;
    let remote_seen = remote.is_some();

    if let Some(remote) = remote {
        let revision = remote.revision();
        if let Some(game) = replica.adopt_if_newer(remote) {
            debug!(room_id = %room_id, revision, "adopted remote revision");
            on_update(&game);
            return TickOutcome::Adopted { revision };
        }
    }

    if let Some(pending) = replica.pending_publish() {
        let revision = pending.revision();
        return match store.publish(&pending).await {
            Ok(()) => {
                replica.mark_published(revision);
                debug!(room_id = %room_id, revision, "republished local revision");
                TickOutcome::Republished { revision }
            }
            Err(e) => {
                warn!(room_id = %room_id, revision, error = %e, "republish failed");
                TickOutcome::Unavailable
            }
        };
    }

    if remote_seen {
        TickOutcome::UpToDate
    } else {
        TickOutcome::Unavailable
    }
}

/// Background polling task for one room.
///
/// The first tick runs immediately, then once per `poll_interval`. Missed
/// ticks are delayed, not bunched. Stopping (or dropping) the loop aborts
/// the task and no callback starts after `stop` returns. On a
/// multi-threaded runtime a callback already running on another worker may
/// still finish after `stop` returns; on a current-thread runtime none can.
#[derive(Debug)]
pub struct SyncLoop {
    room_id: RoomId,
    stopped: Arc<AtomicBool>,
    abort_handle: AbortHandle,
}

impl SyncLoop {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<C, K, F>(store: RoomStore<C, K>, replica: ReplicaHandle, mut on_update: F) -> Self
    where
        C: Channel,
        K: Clock,
        F: FnMut(&GameState) + Send + 'static,
    {
        let room_id = replica.room().id().clone();
        let period = store.config().poll_interval();
        let stopped = Arc::new(AtomicBool::new(false));

        let task_stopped = Arc::clone(&stopped);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut deliver = |game: &GameState| {
                if !task_stopped.load(Ordering::Acquire) {
                    on_update(game);
                }
            };

            loop {
                ticker.tick().await;
                if task_stopped.load(Ordering::Acquire) {
                    break;
                }
                tick(&store, &replica, &mut deliver).await;
            }
        });

        info!(room_id = %room_id, period_ms = period.as_millis() as u64, "sync loop started");
        Self {
            room_id,
            stopped,
            abort_handle: handle.abort_handle(),
        }
    }

    /// Room this loop polls.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Stop polling. Idempotent.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!(room_id = %self.room_id, "sync loop stopped");
        }
        self.abort_handle.abort();
    }

    /// Whether the task is still scheduled.
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && !self.abort_handle.is_finished()
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

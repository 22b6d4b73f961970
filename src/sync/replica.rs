//! The local copy of a room, shared between a session and its sync loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::core::state::GameState;
use crate::room::Room;
use crate::store::Commit;

/// A peer's copy of a room plus its publish status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replica {
    room: Room,
    /// Local revision not yet confirmed written to the channel.
    unpublished: bool,
}

impl Replica {
    /// Replica seeded from a local mutation.
    #[must_use]
    pub fn from_commit(commit: Commit) -> Self {
        Self {
            room: commit.room,
            unpublished: !commit.published,
        }
    }

    /// The room.
    #[must_use]
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Whether the current revision still needs writing.
    #[must_use]
    pub fn is_unpublished(&self) -> bool {
        self.unpublished
    }
}

/// Shared handle to a `Replica`.
///
/// The lock is never held across an await.
#[derive(Clone, Debug)]
pub struct ReplicaHandle {
    inner: Arc<Mutex<Replica>>,
}

impl ReplicaHandle {
    /// Wrap a replica.
    #[must_use]
    pub fn new(replica: Replica) -> Self {
        Self {
            inner: Arc::new(Mutex::new(replica)),
        }
    }

    /// Snapshot of the replica.
    #[must_use]
    pub fn snapshot(&self) -> Replica {
        self.lock().clone()
    }

    /// Snapshot of the room.
    #[must_use]
    pub fn room(&self) -> Room {
        self.lock().room.clone()
    }

    /// Current local revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.lock().room.revision()
    }

    /// Record the result of a local mutation.
    ///
    /// Ignored when the replica has meanwhile adopted a newer remote copy.
    /// Returns whether the commit was applied.
    pub fn record_local(&self, commit: Commit) -> bool {
        let mut replica = self.lock();
        if commit.room.revision() <= replica.room.revision() {
            debug!(
                room_id = %replica.room.id(),
                local = replica.room.revision(),
                committed = commit.room.revision(),
                "local commit superseded by remote"
            );
            return false;
        }
        *replica = Replica::from_commit(commit);
        true
    }

    /// Replace the local room with `remote` if it is strictly newer.
    ///
    /// Returns the adopted game state.
    pub(crate) fn adopt_if_newer(&self, remote: Room) -> Option<GameState> {
        let mut replica = self.lock();
        if !remote.is_newer_than(&replica.room) {
            return None;
        }
        let game = *remote.game();
        replica.room = remote;
        replica.unpublished = false;
        Some(game)
    }

    /// Room awaiting a retry write, if any.
    pub(crate) fn pending_publish(&self) -> Option<Room> {
        let replica = self.lock();
        replica.unpublished.then(|| replica.room.clone())
    }

    /// Clear the unpublished flag if `revision` is still current.
    pub(crate) fn mark_published(&self, revision: u64) {
        let mut replica = self.lock();
        if replica.room.revision() == revision {
            replica.unpublished = false;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Replica> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomId;

    fn room(revision: u64) -> Room {
        Room::new(RoomId::parse("REPL01").unwrap(), revision)
    }

    fn handle(revision: u64, published: bool) -> ReplicaHandle {
        ReplicaHandle::new(Replica::from_commit(Commit { room: room(revision), published }))
    }

    #[test]
    fn test_adopts_only_strictly_newer() {
        let replica = handle(5, true);

        assert_eq!(replica.adopt_if_newer(room(5)), None);
        assert_eq!(replica.adopt_if_newer(room(4)), None);
        assert_eq!(replica.revision(), 5);

        assert_eq!(replica.adopt_if_newer(room(7)), Some(GameState::new()));
        assert_eq!(replica.revision(), 7);
    }

    #[test]
    fn test_adopting_clears_unpublished() {
        let replica = handle(5, false);
        assert!(replica.pending_publish().is_some());

        replica.adopt_if_newer(room(6));
        assert!(replica.pending_publish().is_none());
    }

    #[test]
    fn test_record_local_rejects_stale_commit() {
        let replica = handle(10, true);
        assert!(!replica.record_local(Commit { room: room(9), published: true }));
        assert!(replica.record_local(Commit { room: room(11), published: false }));
        assert_eq!(replica.revision(), 11);
        assert!(replica.snapshot().is_unpublished());
    }

    #[test]
    fn test_mark_published_only_for_current_revision() {
        let replica = handle(3, false);
        replica.mark_published(2);
        assert!(replica.snapshot().is_unpublished());
        replica.mark_published(3);
        assert!(!replica.snapshot().is_unpublished());
    }
}

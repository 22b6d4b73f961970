use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::SyncConfig;
use crate::core::rng::RoomCodeRng;
use crate::room::{decode_room, encode_room, PeerIdentity, Room, RoomId};

use super::error::{JoinError, MoveRejected, StoreError};

/// Outcome of a local mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// The room after the mutation.
    pub room: Room,
    /// Whether the write to the channel succeeded.
    pub published: bool,
}

/// Room persistence over a channel.
///
/// Cheap to clone; clones share the channel and the room-code generator.
///
/// ## Usage
///
/// ```
/// use ttt_sync::channel::MemoryChannel;
/// use ttt_sync::core::{ManualClock, SyncConfig};
/// use ttt_sync::room::PeerIdentity;
/// use ttt_sync::store::RoomStore;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let channel = MemoryChannel::new();
/// let store = RoomStore::with_clock(channel, ManualClock::new(1_000), SyncConfig::default().with_seed(1));
///
/// let created = store.create().await;
/// assert!(created.published);
///
/// let moved = store.apply_local_move(&created.room, PeerIdentity::host(), 4).await.unwrap();
/// assert!(moved.room.revision() > created.room.revision());
///
/// let remote = store.read_remote(created.room.id()).await.unwrap();
/// assert_eq!(remote, moved.room);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct RoomStore<C: Channel, K: Clock = SystemClock> {
    channel: C,
    clock: K,
    config: Arc<SyncConfig>,
    codes: Arc<Mutex<RoomCodeRng>>,
}

impl<C: Channel> RoomStore<C, SystemClock> {
    /// Store using the system clock.
    pub fn new(channel: C, config: SyncConfig) -> Self {
        Self::with_clock(channel, SystemClock, config)
    }
}

impl<C: Channel, K: Clock> RoomStore<C, K> {
    /// Store with an explicit clock.
    pub fn with_clock(channel: C, clock: K, config: SyncConfig) -> Self {
        let config = config.sanitized();
        let codes = RoomCodeRng::from_seed_or_entropy(config.seed);
        Self {
            channel,
            clock,
            config: Arc::new(config),
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Clock used for revision stamps.
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Create a room under a fresh code, with the host seated, and write it
    /// to the channel.
    pub async fn create(&self) -> Commit {
        let id = {
            let mut codes = self.codes.lock().unwrap_or_else(PoisonError::into_inner);
            RoomId::generate(&mut codes, self.config.room_code_len)
        };
        let room = Room::new(id, self.clock.now_millis());
        info!(room_id = %room.id(), revision = room.revision(), "room created");
        self.commit(room).await
    }

    /// Join `room_id` as guest.
    ///
    /// The channel is always read. `inline` state (from an invite) takes
    /// precedence unless the channel holds a strictly newer revision, so an
    /// invite shared before the host's first move cannot roll that move
    /// back. The guest seat is filled on the chosen copy, the revision
    /// bumped, and the result written back.
    pub async fn join(&self, room_id: &RoomId, inline: Option<Room>) -> Result<Commit, JoinError> {
        let inline = inline.filter(|room| {
            let matches = room.id() == room_id;
            if !matches {
                warn!(room_id = %room_id, inline_id = %room.id(), "ignoring inline state for another room");
            }
            matches
        });
        let remote = self.read_remote(room_id).await;

        let existing = match (remote, inline) {
            (Some(remote), Some(inline)) if remote.is_newer_than(&inline) => {
                debug!(
                    room_id = %room_id,
                    inline = inline.revision(),
                    remote = remote.revision(),
                    "channel copy newer than inline state"
                );
                remote
            }
            (_, Some(inline)) => {
                debug!(room_id = %room_id, revision = inline.revision(), "joining from inline state");
                inline
            }
            (Some(remote), None) => remote,
            (None, None) => return Err(JoinError::RoomNotFound(room_id.clone())),
        };

        let room = existing.seat_guest(self.clock.now_millis());
        info!(room_id = %room_id, revision = room.revision(), "joined room");
        Ok(self.commit(room).await)
    }

    /// Play `cell` on behalf of the local peer and write the result.
    ///
    /// The cell is checked against the board before the turn, so an
    /// occupied cell reports `CellOccupied` whoever's turn it is. Checking
    /// the turn first would make a guest who replays an occupied cell right
    /// after moving see `NotYourTurn`; the two-peer scenario this store is
    /// tested against expects `CellOccupied` there. Any legal cell played
    /// out of turn is still `NotYourTurn`. Rejected moves leave `room`
    /// untouched and write nothing.
    pub async fn apply_local_move(
        &self,
        room: &Room,
        identity: PeerIdentity,
        cell: usize,
    ) -> Result<Commit, MoveRejected> {
        let next = room.play(cell, self.clock.now_millis())?;

        let turn = room.game().current_turn();
        if turn != identity.mark {
            return Err(MoveRejected::NotYourTurn {
                turn,
                mark: identity.mark,
            });
        }

        debug!(room_id = %room.id(), cell, mark = %identity.mark, revision = next.revision(), "local move");
        Ok(self.commit(next).await)
    }

    /// Start a new game in the same room and write it.
    pub async fn restart(&self, room: &Room) -> Commit {
        let next = room.restarted(self.clock.now_millis());
        info!(room_id = %room.id(), revision = next.revision(), "game restarted");
        self.commit(next).await
    }

    /// Best-effort read of the channel's copy of a room.
    ///
    /// Absent keys, channel failures, undecodable payloads and payloads for
    /// a different room all come back as `None`.
    pub async fn read_remote(&self, room_id: &RoomId) -> Option<Room> {
        let key = self.config.key_for(room_id.as_str());
        let payload = match self.channel.get(&key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "channel read failed");
                return None;
            }
        };

        match decode_room(&payload) {
            Ok(room) if room.id() == room_id => Some(room),
            Ok(room) => {
                warn!(room_id = %room_id, stored_id = %room.id(), "channel entry belongs to another room");
                None
            }
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "undecodable room payload");
                None
            }
        }
    }

    /// Write `room` to the channel under its key.
    pub async fn publish(&self, room: &Room) -> Result<(), StoreError> {
        let payload = encode_room(room)?;
        let key = self.config.key_for(room.id().as_str());
        self.channel.put(&key, payload).await?;
        debug!(room_id = %room.id(), revision = room.revision(), "published");
        Ok(())
    }

    async fn commit(&self, room: Room) -> Commit {
        let published = match self.publish(&room).await {
            Ok(()) => true,
            Err(e) => {
                warn!(room_id = %room.id(), revision = room.revision(), error = %e, "publish failed, will retry");
                false
            }
        };
        Commit { room, published }
    }
}

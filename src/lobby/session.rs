//! The local peer's room membership.
//!
//! ## Phases
//!
//! ```text
//! Idle ──create_room──▶ Hosting ──guest seen by sync──▶ Playing
//!  ▲                                                      │
//!  ├──────────────────────── leave_room ──────────────────┘
//!  │
//!  └── RoomNotFound ── Joining ◀──join_room── Idle
//!                        │
//!                        └──────────────▶ Playing
//! ```
//!
//! A session holds at most one membership. Creating or joining while in a
//! room leaves the old room first, so there is never more than one sync
//! loop per session.
//!
//! `Joining` is the span of a pending `join_room` future. That future holds
//! `&mut self`, so `phase` is never observed mid-join and only reports the
//! settled phases.

use thiserror::Error;
use tracing::info;

use crate::channel::Channel;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::SyncConfig;
use crate::core::state::GameState;
use crate::room::{PeerIdentity, Room, RoomId};
use crate::store::{Commit, JoinError, MoveRejected, RoomStore};
use crate::sync::{Replica, ReplicaHandle, SyncLoop};

use super::invite::Invite;

/// Where the local peer is in the room lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerPhase {
    /// Not in a room.
    Idle,
    /// Created a room; no guest yet.
    Hosting,
    /// Join in progress: the `join_room` future has not resolved.
    Joining,
    /// Both seats filled.
    Playing,
}

/// Session-level failures. None of them change local state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The action needs a room and the session has none.
    #[error("not in a room")]
    NotInRoom,

    /// The room code does not name a reachable room.
    #[error("room {0} not found, check the room code")]
    RoomNotFound(RoomId),

    /// The move was refused.
    #[error(transparent)]
    Rejected(#[from] MoveRejected),
}

impl From<JoinError> for SessionError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::RoomNotFound(id) => Self::RoomNotFound(id),
        }
    }
}

struct Membership {
    identity: PeerIdentity,
    replica: ReplicaHandle,
    sync: SyncLoop,
}

/// One local peer's view of multiplayer play.
///
/// Methods that touch the channel take `&mut self`, so a front end cannot
/// start a second move while one is still being written.
pub struct RoomSession<C: Channel, K: Clock = SystemClock> {
    store: RoomStore<C, K>,
    membership: Option<Membership>,
}

impl<C: Channel> RoomSession<C, SystemClock> {
    /// Session using the system clock.
    pub fn new(channel: C, config: SyncConfig) -> Self {
        Self::from_store(RoomStore::new(channel, config))
    }
}

impl<C: Channel, K: Clock> RoomSession<C, K> {
    /// Session with an explicit clock.
    pub fn with_clock(channel: C, clock: K, config: SyncConfig) -> Self {
        Self::from_store(RoomStore::with_clock(channel, clock, config))
    }

    /// Session over an existing store.
    pub fn from_store(store: RoomStore<C, K>) -> Self {
        Self {
            store,
            membership: None,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &RoomStore<C, K> {
        &self.store
    }

    /// Create a room as host and start syncing it.
    ///
    /// `on_update` runs for every newer remote state the sync loop adopts.
    /// Returns an invite carrying the new room inline.
    pub async fn create_room<F>(&mut self, on_update: F) -> Invite
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        self.leave_room();
        let commit = self.store.create().await;
        let invite = Invite::with_state(commit.room.clone());
        self.enter(PeerIdentity::host(), commit, on_update);
        invite
    }

    /// Join a room as guest and start syncing it.
    ///
    /// The channel copy is preferred; inline state in the invite is used
    /// when the channel misses or holds an older revision. On
    /// `RoomNotFound` the session is left `Idle`.
    pub async fn join_room<F>(&mut self, invite: Invite, on_update: F) -> Result<PeerIdentity, SessionError>
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        self.leave_room();
        let commit = self.store.join(&invite.room_id, invite.inline_state).await?;
        let identity = PeerIdentity::guest();
        self.enter(identity, commit, on_update);
        Ok(identity)
    }

    /// Stop syncing and forget the room. Idempotent.
    pub fn leave_room(&mut self) {
        if let Some(membership) = self.membership.take() {
            membership.sync.stop();
            info!(room_id = %membership.sync.room_id(), "left room");
        }
    }

    /// Play `cell` as the local peer.
    ///
    /// The move is written to the channel before this returns. Rejections
    /// leave the room unchanged.
    pub async fn play(&mut self, cell: usize) -> Result<GameState, SessionError> {
        let membership = self.membership.as_ref().ok_or(SessionError::NotInRoom)?;
        let room = membership.replica.room();
        let commit = self
            .store
            .apply_local_move(&room, membership.identity, cell)
            .await?;
        Ok(Self::record(&membership.replica, commit))
    }

    /// Start a new game in the current room.
    pub async fn restart(&mut self) -> Result<GameState, SessionError> {
        let membership = self.membership.as_ref().ok_or(SessionError::NotInRoom)?;
        let room = membership.replica.room();
        let commit = self.store.restart(&room).await;
        Ok(Self::record(&membership.replica, commit))
    }

    /// Current settled lifecycle phase. Never `Joining`.
    pub fn phase(&self) -> PeerPhase {
        match &self.membership {
            None => PeerPhase::Idle,
            Some(m) if m.replica.room().roster().guest_joined() => PeerPhase::Playing,
            Some(_) => PeerPhase::Hosting,
        }
    }

    /// Local identity while in a room.
    pub fn identity(&self) -> Option<PeerIdentity> {
        self.membership.as_ref().map(|m| m.identity)
    }

    /// Snapshot of the local room copy.
    pub fn room(&self) -> Option<Room> {
        self.membership.as_ref().map(|m| m.replica.room())
    }

    /// Snapshot of the local game.
    pub fn game_state(&self) -> Option<GameState> {
        self.room().map(|room| *room.game())
    }

    /// Whether the local peer may move now.
    pub fn is_my_turn(&self) -> bool {
        self.membership.as_ref().is_some_and(|m| {
            let room = m.replica.room();
            !room.game().is_over() && room.game().current_turn() == m.identity.mark
        })
    }

    /// Status line for the local peer, e.g. `"Your turn!"`.
    pub fn status_line(&self) -> Option<String> {
        self.membership
            .as_ref()
            .map(|m| m.replica.room().game().status_for(m.identity.mark))
    }

    /// Invite for the current room, carrying its latest local state.
    pub fn invite(&self) -> Option<Invite> {
        self.room().map(Invite::with_state)
    }

    /// Whether a sync loop is running.
    pub fn is_syncing(&self) -> bool {
        self.membership.as_ref().is_some_and(|m| m.sync.is_running())
    }

    fn enter<F>(&mut self, identity: PeerIdentity, commit: Commit, on_update: F)
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        let replica = ReplicaHandle::new(Replica::from_commit(commit));
        let sync = SyncLoop::start(self.store.clone(), replica.clone(), on_update);
        self.membership = Some(Membership {
            identity,
            replica,
            sync,
        });
    }

    fn record(replica: &ReplicaHandle, commit: Commit) -> GameState {
        let game = *commit.room.game();
        if replica.record_local(commit) {
            game
        } else {
            *replica.room().game()
        }
    }
}

impl<C: Channel, K: Clock> Drop for RoomSession<C, K> {
    fn drop(&mut self) {
        self.leave_room();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::channel::MemoryChannel;
    use crate::core::{ManualClock, Mark};
    use crate::rules::MoveError;

    fn session(channel: &MemoryChannel, clock: &ManualClock) -> RoomSession<MemoryChannel, ManualClock> {
        RoomSession::with_clock(channel.clone(), clock.clone(), SyncConfig::default())
    }

    fn ignore(_: &GameState) {}

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let session = session(&MemoryChannel::new(), &ManualClock::new(0));
        assert_eq!(session.phase(), PeerPhase::Idle);
        assert_eq!(session.identity(), None);
        assert_eq!(session.game_state(), None);
        assert!(!session.is_my_turn());
        assert!(!session.is_syncing());
    }

    #[tokio::test]
    async fn test_play_without_room() {
        let mut session = session(&MemoryChannel::new(), &ManualClock::new(0));
        assert_eq!(session.play(0).await, Err(SessionError::NotInRoom));
        assert_eq!(session.restart().await, Err(SessionError::NotInRoom));
    }

    #[tokio::test]
    async fn test_create_room_hosts_as_x() {
        let channel = MemoryChannel::new();
        let mut host = session(&channel, &ManualClock::new(1_000));

        let invite = host.create_room(ignore).await;

        assert_eq!(host.phase(), PeerPhase::Hosting);
        assert_eq!(host.identity(), Some(PeerIdentity::host()));
        assert_eq!(host.game_state(), Some(GameState::new()));
        assert!(host.is_my_turn());
        assert!(host.is_syncing());
        assert_eq!(host.status_line().as_deref(), Some("Your turn!"));
        assert_eq!(invite.inline_state, host.room());
    }

    #[tokio::test]
    async fn test_host_move_then_guest_join() {
        let channel = MemoryChannel::new();
        let clock = ManualClock::new(1_000);
        let mut host = session(&channel, &clock);
        let mut guest = session(&channel, &clock);

        let invite = host.create_room(ignore).await;
        let created = host.room().unwrap().revision();
        clock.advance(5);

        let game = host.play(0).await.unwrap();
        assert_eq!(game.board()[0], Some(Mark::X));
        assert_eq!(game.current_turn(), Mark::O);
        assert!(host.room().unwrap().revision() > created);
        assert!(!host.is_my_turn());

        let identity = guest
            .join_room(Invite::new(invite.room_id.clone()), ignore)
            .await
            .unwrap();
        assert_eq!(identity, PeerIdentity::guest());
        assert_eq!(guest.phase(), PeerPhase::Playing);
        assert_eq!(guest.game_state().unwrap().board()[0], Some(Mark::X));
        assert!(guest.is_my_turn());
        assert_eq!(guest.status_line().as_deref(), Some("Your turn!"));
    }

    #[tokio::test]
    async fn test_rejected_move_leaves_state() {
        let channel = MemoryChannel::new();
        let clock = ManualClock::new(1_000);
        let mut host = session(&channel, &clock);
        let mut guest = session(&channel, &clock);

        let invite = host.create_room(ignore).await;
        guest.join_room(Invite::new(invite.room_id), ignore).await.unwrap();

        assert_eq!(
            guest.play(0).await,
            Err(SessionError::Rejected(MoveRejected::NotYourTurn {
                turn: Mark::X,
                mark: Mark::O
            }))
        );

        let before = host.room();
        assert_eq!(
            host.play(9).await,
            Err(SessionError::Rejected(MoveRejected::Move(MoveError::CellOutOfRange { cell: 9 })))
        );
        assert_eq!(host.room(), before);
    }

    #[tokio::test]
    async fn test_join_unknown_room_stays_idle() {
        let mut guest = session(&MemoryChannel::new(), &ManualClock::new(0));
        let id = RoomId::parse("NOPE99").unwrap();

        let err = guest.join_room(Invite::new(id.clone()), ignore).await.unwrap_err();

        assert_eq!(err, SessionError::RoomNotFound(id));
        assert_eq!(err.to_string(), "room NOPE99 not found, check the room code");
        assert_eq!(guest.phase(), PeerPhase::Idle);
        assert!(!guest.is_syncing());
    }

    #[tokio::test]
    async fn test_join_from_inline_invite() {
        let clock = ManualClock::new(1_000);
        let mut host = session(&MemoryChannel::new(), &clock);
        // The guest cannot see the host's channel at all.
        let mut guest = session(&MemoryChannel::new(), &clock);

        host.create_room(ignore).await;
        host.play(4).await.unwrap();
        let invite = host.invite().unwrap();

        guest.join_room(invite, ignore).await.unwrap();
        assert_eq!(guest.game_state().unwrap().board()[4], Some(Mark::X));
    }

    #[tokio::test]
    async fn test_leave_room_is_idempotent() {
        let mut host = session(&MemoryChannel::new(), &ManualClock::new(0));
        host.create_room(ignore).await;

        host.leave_room();
        assert_eq!(host.phase(), PeerPhase::Idle);
        assert!(!host.is_syncing());
        host.leave_room();
        assert_eq!(host.phase(), PeerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_replaces_previous_room() {
        let channel = MemoryChannel::new();
        let clock = ManualClock::new(1_000);
        let mut host = session(&channel, &clock);
        let mut guest = session(&channel, &clock);

        let calls = Arc::new(Mutex::new(0usize));
        let first_calls = Arc::clone(&calls);
        let first = host
            .create_room(move |_: &GameState| *first_calls.lock().unwrap() += 1)
            .await;
        let second = host.create_room(ignore).await;

        assert_ne!(first.room_id, second.room_id);
        assert_eq!(host.room().unwrap().id(), &second.room_id);

        // A write to the abandoned room must not reach its old callback.
        clock.advance(100);
        guest.join_room(Invite::new(first.room_id), ignore).await.unwrap();
        guest.leave_room();
        tokio::time::sleep(Duration::from_millis(3_000)).await;

        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(host.phase(), PeerPhase::Hosting);
    }

    #[tokio::test]
    async fn test_restart_keeps_room() {
        let channel = MemoryChannel::new();
        let clock = ManualClock::new(1_000);
        let mut host = session(&channel, &clock);

        let invite = host.create_room(ignore).await;
        host.play(4).await.unwrap();
        let played = host.room().unwrap();

        let game = host.restart().await.unwrap();
        assert_eq!(game, GameState::new());
        let room = host.room().unwrap();
        assert_eq!(room.id(), &invite.room_id);
        assert_eq!(room.roster(), played.roster());
        assert!(room.revision() > played.revision());
        assert_eq!(host.store().read_remote(&invite.room_id).await, Some(room));
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_sees_guest_through_sync() {
        let channel = MemoryChannel::new();
        let clock = ManualClock::new(1_000);
        let mut host = session(&channel, &clock);
        let mut guest = session(&channel, &clock);

        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        let invite = host
            .create_room(move |game: &GameState| sink.lock().unwrap().push(*game))
            .await;
        assert_eq!(host.phase(), PeerPhase::Hosting);

        guest.join_room(Invite::new(invite.room_id), ignore).await.unwrap();
        guest.leave_room();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        assert_eq!(host.phase(), PeerPhase::Playing);
        assert_eq!(updates.lock().unwrap().len(), 1);
    }
}

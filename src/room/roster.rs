//! Seats and peer identity.
//!
//! The host always plays `X` and the guest always plays `O`, so a peer's
//! identity is fixed for as long as it stays in a room.

use serde::{Deserialize, Serialize};

use crate::core::mark::Mark;

/// Which peer occupies a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the room.
    Host,
    /// Joined an existing room.
    Guest,
}

impl Role {
    /// Mark played by this role.
    #[must_use]
    pub const fn mark(self) -> Mark {
        match self {
            Role::Host => Mark::X,
            Role::Guest => Mark::O,
        }
    }
}

/// Seat assignments per mark. `None` is an unfilled seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Roster {
    x: Option<Role>,
    o: Option<Role>,
}

impl Roster {
    /// Host seated at `X`, guest seat open.
    #[must_use]
    pub const fn host_only() -> Self {
        Self {
            x: Some(Role::Host),
            o: None,
        }
    }

    /// Host at `X`, guest at `O`.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            x: Some(Role::Host),
            o: Some(Role::Guest),
        }
    }

    /// Occupant of `mark`'s seat.
    #[must_use]
    pub const fn seat(&self, mark: Mark) -> Option<Role> {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Whether the guest has taken the `O` seat.
    #[must_use]
    pub const fn guest_joined(&self) -> bool {
        matches!(self.o, Some(Role::Guest))
    }

    /// Seat the guest.
    #[must_use]
    pub const fn with_guest(self) -> Self {
        Self {
            o: Some(Role::Guest),
            ..self
        }
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::host_only()
    }
}

/// The local peer's fixed identity within a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerIdentity {
    /// Mark this peer may play.
    pub mark: Mark,
    /// Whether this peer created the room.
    pub is_host: bool,
}

impl PeerIdentity {
    /// The room creator, playing `X`.
    #[must_use]
    pub const fn host() -> Self {
        Self::for_role(Role::Host)
    }

    /// The joining peer, playing `O`.
    #[must_use]
    pub const fn guest() -> Self {
        Self::for_role(Role::Guest)
    }

    /// Identity for a role.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        Self {
            mark: role.mark(),
            is_host: matches!(role, Role::Host),
        }
    }

    /// Role this identity plays.
    #[must_use]
    pub const fn role(&self) -> Role {
        if self.is_host {
            Role::Host
        } else {
            Role::Guest
        }
    }
}

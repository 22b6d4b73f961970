//! Invites: room code plus optional inline state.
//!
//! ## Query format
//!
//! ```text
//! room=AB12CD&s=<base64url(JSON room)>
//! ```
//!
//! `s` is optional. Parsing also accepts a leading `?`, a full URL, or a
//! bare room code. The inline state lets a peer bootstrap when the channel
//! cannot be read; when present it is used instead of a channel read on
//! join.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

use crate::room::{decode_room, encode_room, CodecError, Room, RoomId, RoomIdError};

/// An invite could not be built or parsed.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Query string without a `room` parameter.
    #[error("invite has no room code")]
    MissingRoom,

    /// Bad room code.
    #[error(transparent)]
    RoomId(#[from] RoomIdError),

    /// `s` is not base64url.
    #[error("inline state is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// `s` does not decode to UTF-8 text.
    #[error("inline state is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// `s` is not a valid room.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Inline state belongs to a different room.
    #[error("inline state is for room {state}, invite is for {room}")]
    Mismatch {
        /// Room named by the invite.
        room: RoomId,
        /// Room carried inline.
        state: RoomId,
    },
}

/// Everything a peer needs to join a room.
///
/// ```
/// use ttt_sync::lobby::Invite;
/// use ttt_sync::room::RoomId;
///
/// let invite = Invite::new(RoomId::parse("ab12cd").unwrap());
/// assert_eq!(invite.to_query().unwrap(), "room=AB12CD");
///
/// let parsed = Invite::parse("https://example.test/play?room=ab12cd").unwrap();
/// assert_eq!(parsed, invite);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invite {
    /// Room to join.
    pub room_id: RoomId,
    /// Full room state, for joining without a channel read.
    pub inline_state: Option<Room>,
}

impl Invite {
    /// Invite carrying only a room code.
    #[must_use]
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            inline_state: None,
        }
    }

    /// Invite carrying a room's code and full state.
    #[must_use]
    pub fn with_state(room: Room) -> Self {
        Self {
            room_id: room.id().clone(),
            inline_state: Some(room),
        }
    }

    /// Encode as a query string (no leading `?`).
    pub fn to_query(&self) -> Result<String, InviteError> {
        let mut query = format!("room={}", self.room_id);
        if let Some(room) = &self.inline_state {
            let json = encode_room(room)?;
            query.push_str("&s=");
            query.push_str(&URL_SAFE_NO_PAD.encode(json));
        }
        Ok(query)
    }

    /// Shareable link: `base_url?<query>`.
    pub fn link(&self, base_url: &str) -> Result<String, InviteError> {
        Ok(format!("{base_url}?{}", self.to_query()?))
    }

    /// Parse a bare room code, a query string, or a URL containing one.
    pub fn parse(input: &str) -> Result<Self, InviteError> {
        let input = input.trim();
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None => input,
        };

        if !query.contains('=') {
            return Ok(Self::new(RoomId::parse(query)?));
        }

        let mut room = None;
        let mut state = None;
        for pair in query.split(['&', '#']) {
            match pair.split_once('=') {
                Some(("room", value)) => room = Some(value),
                Some(("s", value)) => state = Some(value),
                _ => {}
            }
        }

        let room_id = RoomId::parse(room.ok_or(InviteError::MissingRoom)?)?;
        let inline_state = match state {
            Some(encoded) => {
                let json = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded)?)?;
                let room = decode_room(&json)?;
                if room.id() != &room_id {
                    return Err(InviteError::Mismatch {
                        room: room_id,
                        state: room.id().clone(),
                    });
                }
                Some(room)
            }
            None => None,
        };

        Ok(Self {
            room_id,
            inline_state,
        })
    }
}

impl From<RoomId> for Invite {
    fn from(room_id: RoomId) -> Self {
        Self::new(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Mark;

    fn played_room() -> Room {
        Room::new(RoomId::parse("INV123").unwrap(), 1_000)
            .play(4, 1_001)
            .unwrap()
    }

    #[test]
    fn test_query_with_state_parses_back() {
        let invite = Invite::with_state(played_room());
        let query = invite.to_query().unwrap();

        assert!(query.starts_with("room=INV123&s="));
        let parsed = Invite::parse(&query).unwrap();
        assert_eq!(parsed, invite);
        assert_eq!(
            parsed.inline_state.unwrap().game().board()[4],
            Some(Mark::X)
        );
    }

    #[test]
    fn test_link_and_url_parsing() {
        let invite = Invite::with_state(played_room());
        let link = invite.link("https://example.test/ttt/").unwrap();
        assert!(link.starts_with("https://example.test/ttt/?room=INV123"));
        assert_eq!(Invite::parse(&link).unwrap(), invite);
    }

    #[test]
    fn test_bare_code_and_query_forms() {
        let expected = Invite::new(RoomId::parse("ABC123").unwrap());
        assert_eq!(Invite::parse("abc123").unwrap(), expected);
        assert_eq!(Invite::parse("?room=abc123").unwrap(), expected);
        assert_eq!(Invite::parse("room=abc123&utm=x").unwrap(), expected);
    }

    #[test]
    fn test_missing_room() {
        assert!(matches!(Invite::parse("s=abc"), Err(InviteError::MissingRoom)));
    }

    #[test]
    fn test_bad_inline_state() {
        assert!(matches!(
            Invite::parse("room=ABC123&s=!!!"),
            Err(InviteError::Base64(_))
        ));

        let not_a_room = URL_SAFE_NO_PAD.encode("{\"hello\":1}");
        assert!(matches!(
            Invite::parse(&format!("room=ABC123&s={not_a_room}")),
            Err(InviteError::Codec(_))
        ));
    }

    #[test]
    fn test_state_for_other_room_rejected() {
        let query = Invite::with_state(played_room()).to_query().unwrap();
        let forged = query.replacen("room=INV123", "room=OTHER9", 1);
        assert!(matches!(
            Invite::parse(&forged),
            Err(InviteError::Mismatch { .. })
        ));
    }
}

//! Room identifiers.
//!
//! Room codes are short, case-insensitive, alphanumeric strings that people
//! read aloud and type. They are stored upper-cased so `abc123` and
//! `ABC123` name the same room.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::rng::RoomCodeRng;

/// A room code could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomIdError {
    /// Nothing left after trimming whitespace.
    #[error("room code is empty")]
    Empty,

    /// A character outside `A-Z`, `a-z`, `0-9`.
    #[error("room code contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Normalized room code.
///
/// ```
/// use ttt_sync::room::RoomId;
///
/// let id = RoomId::parse("  ab12cd ").unwrap();
/// assert_eq!(id.as_str(), "AB12CD");
/// assert!(RoomId::parse("ab-12").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Trim, upper-case and validate user input.
    pub fn parse(input: &str) -> Result<Self, RoomIdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RoomIdError::Empty);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(RoomIdError::InvalidChar(bad));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Fresh random code of `len` characters.
    pub fn generate(rng: &mut RoomCodeRng, len: usize) -> Self {
        Self(rng.room_code(len))
    }

    /// The normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

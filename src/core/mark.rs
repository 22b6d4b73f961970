//! Player marks.
//!
//! A game always has exactly two marks. `X` moves first and belongs to the
//! room's host; `O` belongs to the guest.

use serde::{Deserialize, Serialize};

/// One of the two player symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// First mover, held by the host.
    X,
    /// Second mover, held by the guest.
    O,
}

impl Mark {
    /// Both marks in turn order.
    pub const ALL: [Mark; 2] = [Mark::X, Mark::O];

    /// The opposing mark.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character symbol used on the wire and in status lines.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    /// Parse a wire symbol. Only the exact strings `"X"` and `"O"` are marks.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_alternates() {
        assert_eq!(Mark::X.other(), Mark::O);
        assert_eq!(Mark::O.other(), Mark::X);
        assert_eq!(Mark::X.other().other(), Mark::X);
    }

    #[test]
    fn test_symbol_parsing() {
        for mark in Mark::ALL {
            assert_eq!(Mark::from_symbol(mark.symbol()), Some(mark));
        }
        assert_eq!(Mark::from_symbol(""), None);
        assert_eq!(Mark::from_symbol("x"), None);
        assert_eq!(Mark::from_symbol("XO"), None);
    }

    #[test]
    fn test_serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&Mark::X).unwrap(), "\"X\"");
        let mark: Mark = serde_json::from_str("\"O\"").unwrap();
        assert_eq!(mark, Mark::O);
    }
}

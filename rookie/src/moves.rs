use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};
use arrayvec::ArrayVec;

use super::{Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = ArrayVec<Move, MAX_NUM_MOVES>;

/// Represents a move made on a chess board: a piece travelling from one [`Square`] to another.
///
/// There are no special move kinds. Castling, en passant, and promotion do not exist in these rules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a new [`Move`] from the given [`Square`]s.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Move, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4);
    /// assert_eq!(e2e4.from(), Square::E2);
    /// assert_eq!(e2e4.to(), Square::E4);
    /// ```
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Fetches the source (or "from") part of this [`Move`].
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`].
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the parts of this [`Move`] in a tuple.
    pub const fn parts(&self) -> (Square, Square) {
        (self.from, self.to)
    }

    /// Returns `true` if `uci` is a well-formed move string: exactly `[a-h][1-8][a-h][1-8]`.
    ///
    /// # Example
    /// ```
    /// # use rookie::Move;
    /// assert!(Move::is_uci("e2e4"));
    /// assert!(!Move::is_uci("e2e44"));
    /// assert!(!Move::is_uci("E2E4"));
    /// assert!(!Move::is_uci("e9e4"));
    /// ```
    pub fn is_uci(uci: &str) -> bool {
        let bytes = uci.as_bytes();
        bytes.len() == 4
            && (b'a'..=b'h').contains(&bytes[0])
            && (b'1'..=b'8').contains(&bytes[1])
            && (b'a'..=b'h').contains(&bytes[2])
            && (b'1'..=b'8').contains(&bytes[3])
    }

    /// Creates a [`Move`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// Anything other than exactly four characters `[a-h][1-8][a-h][1-8]` is rejected,
    /// including promotion suffixes.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Move, Square};
    /// let e2e4 = Move::from_uci("e2e4").unwrap();
    /// assert_eq!(e2e4, Move::new(Square::E2, Square::E4));
    /// assert!(Move::from_uci("e7e8q").is_err());
    /// assert!(Move::from_uci("").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        if !Move::is_uci(uci) {
            bail!("Invalid move string: Must be exactly 4 characters of the form [a-h][1-8][a-h][1-8]. Got {uci:?}");
        }

        // Length and charset were checked above, so these slices are ASCII.
        let from = uci.get(0..2).context("Move str must contain a `from` square.")?;
        let to = uci.get(2..4).context("Move str must contain a `to` square.")?;

        Ok(Self::new(Square::from_uci(from)?, Square::from_uci(to)?))
    }

    /// Converts this [`Move`] to a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Move, Square};
    /// assert_eq!(Move::new(Square::G8, Square::F6).to_uci(), "g8f6");
    /// ```
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_move_text() {
        for bad in ["e2e", "e2e4 ", " e2e4", "e2-e4", "a0a1", "i2i4", "e2E4", "1e2e"] {
            assert!(Move::from_uci(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn display_matches_input() {
        for text in ["a1h8", "h8a1", "e2e4", "b1c3"] {
            assert_eq!(Move::from_uci(text).unwrap().to_string(), text);
        }
    }
}

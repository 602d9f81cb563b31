use std::fmt;

use anyhow::{anyhow, bail, Result};

use super::{Color, File, Move, Piece, PieceId, Rank, Square, FEN_STARTPOS};

/// A mailbox chessboard.
///
/// Every square holds at most one [`PieceId`], and every [`PieceId`] knows the
/// square it stands on, or `None` once it has been captured. The two tables are
/// always kept in agreement.
///
/// [`Board`] is `Copy`, so trying a move out is as simple as calling
/// [`Board::with_move_made`] and inspecting the result.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<PieceId>; Square::COUNT],
    locations: [Option<Square>; PieceId::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] with no pieces on it.
    ///
    /// # Example
    /// ```
    /// # use rookie::Board;
    /// let board = Board::empty();
    /// assert_eq!(board.iter().count(), 0);
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    pub const fn empty() -> Self {
        Self {
            squares: [None; Square::COUNT],
            locations: [None; PieceId::COUNT],
        }
    }

    /// Creates a [`Board`] with all 32 pieces on their starting squares.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, PieceId};
    /// let board = Board::standard();
    /// assert_eq!(board.iter().count(), 32);
    /// for id in PieceId::iter() {
    ///     assert_eq!(board.location(id), Some(id.home()));
    /// }
    /// ```
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for id in PieceId::iter() {
            board.place(id, id.home());
        }
        board
    }

    /// Creates a [`Board`] from the piece placement field of a FEN string.
    ///
    /// If `fen` contains more than one field, only the first is read. Each piece is
    /// given the lowest free [`PieceId`] of its color and kind, so a placement that
    /// holds more pieces of one kind than a side starts with (two queens, say) is an error.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, PieceId, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    /// assert_eq!(board.id_at(Square::E1), Some(PieceId::WHITE_KING));
    /// assert_eq!(board.piece_at(Square::H1).unwrap().to_string(), "R");
    /// assert!(Board::from_fen("QQ2k3/8/8/8/8/8/8/4K3").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::empty();

        let placements = fen
            .split_whitespace()
            .next()
            .ok_or(anyhow!("Invalid FEN string: FEN string must have piece placements."))?;

        if placements.matches('/').count() != 7 {
            bail!("Missing placements for all 8 ranks.");
        }

        // Reversed so that White's back rank is row 0
        for (rank, placements) in placements.split('/').rev().enumerate() {
            let rank = Rank::new(rank as u8)?;
            let mut file = 0;

            for piece_char in placements.chars() {
                if let Ok(piece) = Piece::from_uci(piece_char) {
                    let square = Square::new(File::new(file)?, rank);
                    let id = board.next_free_id(piece).ok_or(anyhow!(
                        "Invalid FEN string: too many {piece:?} pieces. A side only has {} of them.",
                        piece.kind().roster_size()
                    ))?;

                    board.place(id, square);
                    file += 1;
                } else {
                    let Some(empty) = piece_char.to_digit(10) else {
                        bail!("Found non-piece, non-numeric char {piece_char:?} when parsing FEN.");
                    };
                    file = file.saturating_add(empty as u8);
                }
            }

            if file != File::COUNT as u8 {
                bail!("Invalid FEN string: rank {} describes {file} squares instead of 8.", rank.char());
            }
        }

        Ok(board)
    }

    /// Generates the piece placement field of a FEN string from this [`Board`].
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, FEN_STARTPOS};
    /// assert_eq!(Board::standard().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements: Vec<String> = Vec::with_capacity(Rank::COUNT);

        for rank in Rank::iter().rev() {
            let mut rank_str = String::with_capacity(File::COUNT);
            let mut empty_spaces = 0;

            for file in File::iter() {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty_spaces != 0 {
                        rank_str += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    rank_str.push(piece.to_uci());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                rank_str += &empty_spaces.to_string();
            }

            placements.push(rank_str);
        }

        placements.join("/")
    }

    /// The lowest [`PieceId`] of this color and kind that is not on the board.
    fn next_free_id(&self, piece: Piece) -> Option<PieceId> {
        PieceId::slots(piece.color(), piece.kind()).find(|id| !self.is_alive(*id))
    }

    /// Fetches the [`PieceId`] standing on `square`, if any.
    pub const fn id_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square.index()]
    }

    /// Fetches the [`Piece`] standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.id_at(square).map(|id| id.piece())
    }

    /// Fetches the [`Color`] of the piece standing on `square`, if any.
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.id_at(square).map(|id| id.color())
    }

    /// Returns `true` if there is a piece on `square`.
    pub const fn has(&self, square: Square) -> bool {
        self.squares[square.index()].is_some()
    }

    /// The square the piece with this id stands on, or `None` if it has been captured.
    pub const fn location(&self, id: PieceId) -> Option<Square> {
        self.locations[id.index()]
    }

    /// Returns `true` if the piece with this id is still on the board.
    pub const fn is_alive(&self, id: PieceId) -> bool {
        self.locations[id.index()].is_some()
    }

    /// The square of `color`'s king, or `None` if it is absent.
    pub const fn king(&self, color: Color) -> Option<Square> {
        self.location(PieceId::king(color))
    }

    /// Puts the piece with this id on `square`.
    ///
    /// If the piece was already somewhere else, it is lifted from there first.
    /// Whatever stood on `square` before is removed from the board and returned.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, PieceId, Square};
    /// let mut board = Board::empty();
    /// assert_eq!(board.place(PieceId::WHITE_KING, Square::E1), None);
    /// assert_eq!(board.place(PieceId::BLACK_KING, Square::E1), Some(PieceId::WHITE_KING));
    /// assert!(!board.is_alive(PieceId::WHITE_KING));
    /// ```
    pub fn place(&mut self, id: PieceId, square: Square) -> Option<PieceId> {
        if let Some(old) = self.locations[id] {
            self.squares[old] = None;
        }

        let displaced = self.take(square);
        self.squares[square] = Some(id);
        self.locations[id] = Some(square);
        displaced
    }

    /// Removes and returns whatever piece stands on `square`.
    pub fn take(&mut self, square: Square) -> Option<PieceId> {
        let id = self.squares[square].take()?;
        self.locations[id] = None;
        Some(id)
    }

    /// Moves whatever stands on the source square of `mv` to its destination,
    /// returning the id of a captured piece, if any.
    ///
    /// No legality checks are performed. Moving from an empty square does nothing.
    pub fn make_move(&mut self, mv: Move) -> Option<PieceId> {
        let (from, to) = mv.parts();
        let id = self.take(from)?;
        self.place(id, to)
    }

    /// Consumes `self` and returns a [`Board`] after having applied the provided [`Move`].
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, Move, Square};
    /// let board = Board::standard();
    /// let after = board.with_move_made(Move::from_uci("e2e4").unwrap());
    /// assert!(board.has(Square::E2));
    /// assert!(after.has(Square::E4) && !after.has(Square::E2));
    /// ```
    pub fn with_move_made(mut self, mv: Move) -> Self {
        self.make_move(mv);
        self
    }

    /// An iterator over every occupied square and the [`PieceId`] standing there, from A1 to H8.
    pub fn iter(&self) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        Square::iter().filter_map(move |square| self.id_at(square).map(|id| (square, id)))
    }

    /// An iterator over the living pieces of `color` and their squares.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (PieceId, Square)> + '_ {
        PieceId::iter()
            .filter(move |id| id.color() == color)
            .filter_map(move |id| self.location(id).map(|square| (id, square)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(198);

        for rank in Rank::iter().rev() {
            board += &format!("{rank}| ");

            for file in File::iter() {
                let occupant = match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => piece.to_string(),
                    None => String::from("."),
                };

                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in File::iter() {
            board += "--";
        }
        board += "\n   ";
        for file in File::iter() {
            board += &format!("{file} ");
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn startpos_fen_matches_standard_setup() {
        assert_eq!(Board::from_fen(FEN_STARTPOS).unwrap(), Board::standard());
    }

    #[test]
    fn fen_round_trip_keeps_placements() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn fen_assigns_lowest_free_ids() {
        let board = Board::from_fen("8/8/8/8/8/8/8/R6R").unwrap();
        let first = PieceId::new(Color::White, PieceKind::Rook, 1).unwrap();
        let second = PieceId::new(Color::White, PieceKind::Rook, 2).unwrap();
        assert_eq!(board.id_at(Square::A1), Some(first));
        assert_eq!(board.id_at(Square::H1), Some(second));
    }

    #[test]
    fn fen_rejects_bad_ranks() {
        assert!(Board::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("").is_err());
    }

    #[test]
    fn capture_clears_the_victim() {
        let mut board = Board::from_fen("8/8/8/3p4/4P3/8/8/8").unwrap();
        let pawn = board.id_at(Square::D5).unwrap();
        let captured = board.make_move(Move::new(Square::E4, Square::D5));
        assert_eq!(captured, Some(pawn));
        assert!(!board.is_alive(pawn));
        assert_eq!(board.iter().count(), 1);
    }

    #[test]
    fn moving_from_empty_square_is_a_no_op() {
        let board = Board::standard();
        assert_eq!(board.with_move_made(Move::new(Square::E4, Square::E5)), board);
    }
}

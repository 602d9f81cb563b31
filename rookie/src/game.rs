use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{anyhow, Result};
use log::{debug, info};
use thiserror::Error;

use super::{
    is_checkmate, is_in_check, is_valid_move, legal_moves_for, Board, Color, Move, MoveList,
    PieceId, Square,
};

/// Reasons a move can be refused by [`Game::make_move`].
///
/// A refused move never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The text of the move was not of the form `[a-h][1-8][a-h][1-8]`.
    #[error("Invalid move text {text:?}: {reason}")]
    Malformed { text: String, reason: String },

    /// A checkmate has already been delivered.
    #[error("The game is over")]
    GameOver,

    /// There is nothing to move on the source square.
    #[error("There is no piece on {0}")]
    EmptySquare(Square),

    /// The piece on the source square belongs to the side that is not on move.
    #[error("The {piece} cannot move: it is {side_to_move}'s turn")]
    NotYourTurn { piece: PieceId, side_to_move: Color },

    /// The piece cannot reach the destination.
    #[error("The {piece} cannot move {mv}")]
    IllegalMove { piece: PieceId, mv: Move },

    /// The move is geometrically fine but would leave the mover's own king attacked.
    #[error("{mv} would leave the {color} king in check")]
    LeavesKingInCheck { mv: Move, color: Color },
}

/// What happened when a move was accepted.
///
/// Hosts use this to update whatever they draw on screen: which piece moved,
/// which one (if any) left the board, and whether the opponent is now in check or mated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub gives_check: bool,
    pub checkmate: bool,
}

/// Everything that changes when a move is made, except the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    board: Board,
    side_to_move: Color,
    in_check: bool,
    checkmate: bool,
}

/// A game of chess in progress.
///
/// Tracks the [`Board`], whose turn it is, every move made so far, and whether
/// the side to move is in check or checkmated. Dereferences to the current [`Board`].
///
/// # Example
/// ```
/// # use rookie::{Color, Game};
/// let mut game = Game::new();
/// game.make_move_uci("e2e4").unwrap();
/// game.make_move_uci("e7e5").unwrap();
/// assert_eq!(game.side_to_move(), Color::White);
/// assert_eq!(game.history_string(), "e2e4 e7e5");
/// assert!(game.make_move_uci("e5e4").is_err()); // not Black's turn
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    current: Snapshot,
    history: Vec<Move>,
    previous: Vec<Snapshot>,
}

impl Game {
    /// Creates a new [`Game`] from the standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a new [`Game`] from an arbitrary [`Board`] with `side_to_move` on move.
    ///
    /// The check and checkmate flags are computed from the board.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        let in_check = is_in_check(&board, side_to_move);
        let checkmate = in_check && is_checkmate(&board, side_to_move);

        Self {
            current: Snapshot {
                board,
                side_to_move,
                in_check,
                checkmate,
            },
            history: Vec::with_capacity(128),
            previous: Vec::with_capacity(128),
        }
    }

    /// Creates a new [`Game`] from a FEN string.
    ///
    /// Only the piece placements and the active color are read. The active color defaults to White.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Color, Game};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R b").unwrap();
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_fen(fen)?;
        let active_color = fen.split_whitespace().nth(1).unwrap_or("w");
        let side_to_move = Color::from_str(active_color)
            .map_err(|_| anyhow!("Invalid FEN string: active color must be 'w' or 'b'. Got {active_color:?}"))?;

        Ok(Self::from_board(board, side_to_move))
    }

    /// The current [`Board`].
    pub const fn board(&self) -> &Board {
        &self.current.board
    }

    /// The [`Color`] of the side whose turn it is.
    pub const fn side_to_move(&self) -> Color {
        self.current.side_to_move
    }

    /// Returns `true` if the side to move is in check.
    pub const fn is_in_check(&self) -> bool {
        self.current.in_check
    }

    /// Returns `true` if the side to move has been checkmated. No further moves are accepted.
    pub const fn is_checkmate(&self) -> bool {
        self.current.checkmate
    }

    /// The side that delivered checkmate, if the game is over.
    pub const fn winner(&self) -> Option<Color> {
        if self.current.checkmate {
            Some(self.current.side_to_move.opponent())
        } else {
            None
        }
    }

    /// Every move accepted so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The move history as space-separated UCI text, as expected by `position startpos moves ...`.
    pub fn history_string(&self) -> String {
        self.history
            .iter()
            .map(Move::to_uci)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Attempts to make the provided [`Move`] for the side to move.
    ///
    /// The move is refused, leaving the game untouched, if the game is over, if the
    /// source square is empty or holds an opposing piece, if the piece cannot reach
    /// the destination, or if the move would leave the mover's own king in check.
    ///
    /// On success the turn passes to the other side and the check and checkmate
    /// flags are recomputed for it.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Game, Move, MoveError, Square};
    /// let mut game = Game::new();
    /// let record = game.make_move(Move::new(Square::G1, Square::F3)).unwrap();
    /// assert_eq!(record.captured, None);
    /// assert!(matches!(
    ///     game.make_move(Move::new(Square::F8, Square::A3)),
    ///     Err(MoveError::IllegalMove { .. })
    /// ));
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        if self.current.checkmate {
            return Err(MoveError::GameOver);
        }

        let (from, to) = mv.parts();
        let mover = self.current.side_to_move;
        let board = self.current.board;

        let piece = board.id_at(from).ok_or(MoveError::EmptySquare(from))?;

        if piece.color() != mover {
            return Err(MoveError::NotYourTurn {
                piece,
                side_to_move: mover,
            });
        }

        if !is_valid_move(&board, from, to) {
            return Err(MoveError::IllegalMove { piece, mv });
        }

        let after = board.with_move_made(mv);
        if is_in_check(&after, mover) {
            debug!("Refusing {mv}: the {mover} king would be in check");
            return Err(MoveError::LeavesKingInCheck { mv, color: mover });
        }

        let captured = board.id_at(to);
        let opponent = mover.opponent();
        let gives_check = is_in_check(&after, opponent);
        let checkmate = gives_check && is_checkmate(&after, opponent);

        self.previous.push(self.current);
        self.history.push(mv);
        self.current = Snapshot {
            board: after,
            side_to_move: opponent,
            in_check: gives_check,
            checkmate,
        };

        match captured {
            Some(victim) => debug!("{piece} {mv} captures {victim}"),
            None => debug!("{piece} {mv}"),
        }

        if checkmate {
            info!("Checkmate: {mover} wins after {} moves", self.history.len());
        } else if gives_check {
            debug!("{opponent} is in check");
        }

        Ok(MoveRecord {
            mv,
            piece,
            captured,
            gives_check,
            checkmate,
        })
    }

    /// Parses `uci` as a [`Move`] and attempts to make it. See [`Game::make_move`].
    pub fn make_move_uci(&mut self, uci: &str) -> Result<MoveRecord, MoveError> {
        let mv = Move::from_uci(uci).map_err(|err| MoveError::Malformed {
            text: uci.to_string(),
            reason: err.to_string(),
        })?;

        self.make_move(mv)
    }

    /// Every move [`Game::make_move`] would accept right now.
    ///
    /// Empty once the game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.current.checkmate {
            return MoveList::new();
        }

        legal_moves_for(&self.current.board, self.current.side_to_move)
    }

    /// Takes back the most recent move, returning it.
    ///
    /// Returns `None` if no moves have been made.
    ///
    /// # Example
    /// ```
    /// # use rookie::{Board, Game};
    /// let mut game = Game::new();
    /// game.make_move_uci("d2d4").unwrap();
    /// assert_eq!(game.undo().unwrap().to_uci(), "d2d4");
    /// assert_eq!(*game.board(), Board::standard());
    /// assert!(game.undo().is_none());
    /// ```
    pub fn undo(&mut self) -> Option<Move> {
        let previous = self.previous.pop()?;
        let mv = self.history.pop();
        self.current = previous;
        debug!("Took back {mv:?}");
        mv
    }
}

impl Deref for Game {
    type Target = Board;
    fn deref(&self) -> &Self::Target {
        &self.current.board
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.current.board)?;

        if let Some(winner) = self.winner() {
            write!(f, "Checkmate! {winner} wins")
        } else if self.current.in_check {
            write!(f, "{} to move (in check)", self.current.side_to_move)
        } else {
            write!(f, "{} to move", self.current.side_to_move)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_recorded() {
        let mut game = Game::new();
        for mv in ["e2e4", "d7d5"] {
            game.make_move_uci(mv).unwrap();
        }

        let pawn = game.id_at(Square::D5).unwrap();
        let record = game.make_move_uci("e4d5").unwrap();
        assert_eq!(record.captured, Some(pawn));
        assert!(!game.is_alive(pawn));
    }

    #[test]
    fn empty_square_is_refused() {
        let mut game = Game::new();
        assert_eq!(
            game.make_move_uci("e3e4"),
            Err(MoveError::EmptySquare(Square::E3))
        );
    }

    #[test]
    fn opponent_piece_is_refused() {
        let mut game = Game::new();
        let err = game.make_move_uci("e7e5").unwrap_err();
        assert!(matches!(
            err,
            MoveError::NotYourTurn {
                side_to_move: Color::White,
                ..
            }
        ));
        assert!(game.history().is_empty());
    }

    #[test]
    fn malformed_text_is_refused() {
        let mut game = Game::new();
        assert!(matches!(
            game.make_move_uci("e2e4q"),
            Err(MoveError::Malformed { .. })
        ));
    }

    #[test]
    fn legal_moves_are_accepted() {
        let game = Game::new();
        for mv in game.legal_moves() {
            assert!(game.clone().make_move(mv).is_ok(), "{mv} was refused");
        }
    }

    #[test]
    fn undo_restores_flags() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w").unwrap();
        game.make_move_uci("a1a8").unwrap();
        assert!(game.is_in_check());
        assert_eq!(game.side_to_move(), Color::Black);

        game.undo();
        assert!(!game.is_in_check());
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/R3K3");
    }

    #[test]
    fn display_reports_status() {
        let game = Game::new();
        assert!(game.to_string().ends_with("white to move"));
    }
}

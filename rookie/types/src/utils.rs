/// FEN placement string for the starting position of chess.
///
/// Only the placement field is meaningful to this crate; castling, en passant,
/// and move counters do not exist in these rules.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// An upper bound on the number of moves available to one side.
///
/// <https://www.chessprogramming.org/Chess_Position#cite_note-4>
///
/// Without promotion, the real bound is far lower.
pub const MAX_NUM_MOVES: usize = 218;

/// Deltas (rank, file) for the movement of the King.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];


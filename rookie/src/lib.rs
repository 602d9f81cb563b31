pub use rookie_types::*;

/// A mailbox chessboard that tracks the identity of every piece.
pub mod board;
/// High-level abstraction of a game in progress: turn order, history, check and checkmate flags.
///
/// You probably want to look here.
pub mod game;
/// The movement of a piece from one square to another.
pub mod moves;
/// Per-piece movement geometry, attack detection, check, and checkmate.
pub mod rules;

pub use board::*;
pub use game::*;
pub use moves::*;
pub use rules::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::game::*;
    pub use crate::moves::*;
    pub use crate::rules::*;
    pub use rookie_types::prelude::*;
}

/// Enums for piece kinds, colors, a struct for a chess piece, and the stable identities of all 32 pieces.
pub mod piece;
/// Squares on a chessboard (including files and ranks).
pub mod square;
/// Misc constants shared by the rules engine and its hosts.
pub mod utils;

pub use piece::*;
pub use square::*;
pub use utils::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::piece::*;
    pub use crate::square::*;
    pub use crate::utils::*;
}

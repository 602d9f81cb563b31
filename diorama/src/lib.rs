/// Parsing the commands typed at the table's prompt.
pub mod command;
pub use command::*;

/// Board geometry, default view and timings, and the command-line arguments.
pub mod config;

/// What is drawn: one entry per piece, the board, the camera and light, and the running animation.
pub mod scene;
pub use scene::*;

/// Drawing a scene. The terminal renderer prints a board diagram.
pub mod render;
pub use render::*;

/// # Universal Chess Interface (UCI), from the GUI side
///
/// * All communication is done via the engine's standard input and output with text commands,
///   one per line.
///
/// * After `uci`, the engine identifies itself with `id name ...` and lists its options,
///   then answers `uciok`. Options are set with `setoption name <id> [value <x>]`.
///
/// * `isready` is always answered with `readyok`, once the engine is done with whatever it was doing.
///
/// * Before every search the GUI sends `position startpos moves ...` with the whole game so far,
///   then `go`. The search ends with `bestmove <move> [ponder <move>]`.
///
/// * Lines the GUI does not understand are ignored.
///
/// ## Move Format
/// The move format is in long algebraic notation: `e2e4`, `e7e5`, `e7e8q` (for promotion).
///
/// A nullmove from the engine is sent as `0000`; some engines send `(none)` instead.
pub mod uci;
pub use uci::*;

/// The game loop that ties the rules, the scene and an optional engine together.
pub mod session;
pub use session::*;

pub mod prelude {
    pub use crate::command::*;
    pub use crate::render::*;
    pub use crate::scene::*;
    pub use crate::session::*;
    pub use crate::uci::*;
}

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use rookie::Color;

/// Scale applied to the chessboard mesh.
pub const BOARD_SCALE: f32 = 0.6;

/// Width of one square in world units.
pub const SQUARE_SIZE: f32 = BOARD_SCALE * 5.4;

/// Scale applied to every piece mesh.
pub const PIECE_SCALE: f32 = 0.015;

/// Height of the playing surface.
pub const PLATFORM_HEIGHT: f32 = -3.0;

/// World coordinate of the centre of A1, on both the x and y axes.
pub const BOARD_ORIGIN: f32 = -3.5 * SQUARE_SIZE;

/// Height a knight is lifted to while it jumps.
pub const KNIGHT_LIFT: f32 = 5.0;

/// Default length of a move animation, in milliseconds.
pub const ANIMATION_MS: u64 = 2000;

/// Default thinking time granted to an external engine, in milliseconds.
pub const MOVETIME_MS: u64 = 1000;

/// Camera angles start at `{theta, phi, radius}` = `{10, 270, 40}`.
pub const DEFAULT_CAMERA: (f32, f32, f32) = (10.0, 270.0, 40.0);

/// The light starts straight overhead.
pub const DEFAULT_LIGHT: (f32, f32, f32) = (0.0, 0.0, 15.0);

/// Default light power.
pub const DEFAULT_LIGHT_POWER: f32 = 400.0;

/// A chess table for the terminal: type moves, move the camera, and play against a UCI engine.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a UCI engine. Without one, both sides are played from the keyboard.
    #[arg(short, long)]
    pub engine: Option<PathBuf>,

    /// Engine option to set during the handshake, as `NAME=VALUE`. May be repeated.
    #[arg(short, long = "option", value_name = "NAME=VALUE", value_parser = parse_engine_option)]
    pub options: Vec<(String, String)>,

    /// Thinking time granted to the engine per move, in milliseconds.
    #[arg(short, long, default_value_t = MOVETIME_MS)]
    pub movetime: u64,

    /// The side played from the keyboard when an engine is configured.
    #[arg(short, long, default_value = "white", value_parser = parse_color)]
    pub play_as: Color,

    /// Length of a move animation, in milliseconds.
    #[arg(short, long, default_value_t = ANIMATION_MS)]
    pub animation_ms: u64,

    /// Print the board without colors.
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// The engine's thinking time per move.
    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime)
    }

    /// How long one move animation lasts.
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

/// Splits `NAME=VALUE` at the first `=`.
fn parse_engine_option(arg: &str) -> Result<(String, String)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or(anyhow!("usage: --option <NAME=VALUE>. Got {arg:?}"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("engine option name must not be empty. Got {arg:?}"));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_color(arg: &str) -> Result<Color> {
    Color::from_name(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_options_split_on_first_equals() {
        assert_eq!(
            parse_engine_option("Minimal Reporting=5").unwrap(),
            ("Minimal Reporting".to_string(), "5".to_string())
        );
        assert_eq!(
            parse_engine_option("Path=a=b").unwrap(),
            ("Path".to_string(), "a=b".to_string())
        );
        assert!(parse_engine_option("Hash").is_err());
        assert!(parse_engine_option("=5").is_err());
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["diorama"]);
        assert!(args.engine.is_none());
        assert!(args.options.is_empty());
        assert_eq!(args.play_as, Color::White);
        assert_eq!(args.movetime(), Duration::from_millis(MOVETIME_MS));
        assert_eq!(args.animation(), Duration::from_millis(ANIMATION_MS));
    }

    #[test]
    fn repeated_options() {
        let args = Args::parse_from([
            "diorama",
            "--engine",
            "stockfish",
            "-o",
            "Hash=16",
            "--option",
            "Threads=1",
            "--play-as",
            "black",
        ]);
        assert_eq!(args.options.len(), 2);
        assert_eq!(args.play_as, Color::Black);
    }
}

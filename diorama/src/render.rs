use std::{io::Write, time::Instant};

use anyhow::{Context, Result};
use colored::Colorize;
use rookie::{Color, File, PieceId, Rank, Square};

use crate::{square_at, Scene};

/// Something that can draw a [`Scene`].
///
/// A 3D front end would upload meshes and transforms here; the terminal
/// front end prints a diagram.
pub trait Renderer {
    /// Draws `scene` as it looks at `now`.
    fn draw(&mut self, scene: &Scene, now: Instant) -> Result<()>;
}

/// Prints the scene as a board diagram, with the view settings underneath.
///
/// A frame is only printed when it differs from the previous one, so a piece
/// crossing several squares prints once per square.
pub struct TerminalRenderer<W: Write> {
    out: W,
    colored: bool,
    last_frame: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self {
            out,
            colored,
            last_frame: String::new(),
        }
    }

    /// Forgets the last frame, so the next [`Renderer::draw`] always prints.
    pub fn invalidate(&mut self) {
        self.last_frame.clear();
    }

    /// Builds the text of one frame.
    pub fn frame(&self, scene: &Scene, now: Instant) -> String {
        let moving = scene.animation().map(|anim| anim.piece);

        let mut grid = [None; Square::COUNT];
        for (id, entry) in scene.entries() {
            if !entry.alive || Some(id) == moving {
                continue;
            }

            if let Some(square) = square_at(entry.position) {
                grid[square] = Some(id);
            }
        }

        // A piece in flight never hides one at rest
        if let Some(id) = moving {
            if let Some(square) = square_at(scene.displayed_position(id, now)) {
                grid[square].get_or_insert(id);
            }
        }

        let mut frame = String::with_capacity(512);

        for rank in Rank::iter().rev() {
            frame += &format!("{} {}", self.paint_label(rank.char()), self.paint_border("|"));

            for file in File::iter() {
                frame += &format!(" {} ", self.paint_square(grid[Square::new(file, rank)]));
            }

            frame += "\n";
        }

        frame += &format!("  {}\n  ", self.paint_border(&"-".repeat(24)));
        for file in File::iter() {
            frame += &format!(" {} ", self.paint_label(file.char()));
        }

        let view = scene.view;
        frame += &format!(
            "\ncamera: {} | light: {} | power: {}\n",
            view.camera, view.light, view.light_power
        );

        frame
    }

    fn paint_square(&self, occupant: Option<PieceId>) -> String {
        let Some(id) = occupant else {
            return self.paint_border(".");
        };

        let symbol = id.piece().to_string();
        if !self.colored {
            return symbol;
        }

        match id.color() {
            Color::White => symbol.bright_red().to_string(),
            Color::Black => symbol.bright_blue().to_string(),
        }
    }

    fn paint_label(&self, label: char) -> String {
        if self.colored {
            label.to_string().cyan().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_border(&self, border: &str) -> String {
        if self.colored {
            border.bright_magenta().to_string()
        } else {
            border.to_string()
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, scene: &Scene, now: Instant) -> Result<()> {
        let frame = self.frame(scene, now);
        if frame == self.last_frame {
            return Ok(());
        }

        write!(self.out, "{frame}").context("Failed to draw the board")?;
        self.out.flush().context("Failed to draw the board")?;
        self.last_frame = frame;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn prints_the_starting_position() {
        let scene = Scene::new(Duration::ZERO);
        let renderer = TerminalRenderer::new(Vec::new(), false);
        let frame = renderer.frame(&scene, Instant::now());

        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines[0], "8 | r  n  b  q  k  b  n  r ");
        assert_eq!(lines[1], "7 | p  p  p  p  p  p  p  p ");
        assert_eq!(lines[3], "5 | .  .  .  .  .  .  .  . ");
        assert_eq!(lines[7], "1 | R  N  B  Q  K  B  N  R ");
        assert!(frame.contains("power: 400"));
    }

    #[test]
    fn hopping_knight_does_not_hide_the_pawn_below() {
        let mut game = rookie::Game::new();
        let mut scene = Scene::new(Duration::from_millis(2000));
        let start = Instant::now();
        scene.apply(&game.make_move_uci("b1c3").unwrap(), start);

        let renderer = TerminalRenderer::new(Vec::new(), false);

        // Halfway between b1 and c3 is closest to c2
        let frame = renderer.frame(&scene, start + Duration::from_millis(1000));
        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines[5], "3 | .  .  .  .  .  .  .  . ");
        assert_eq!(lines[6], "2 | P  P  P  P  P  P  P  P ");
        assert_eq!(lines[7], "1 | R  .  B  Q  K  B  N  R ");

        let frame = renderer.frame(&scene, start + Duration::from_millis(2000));
        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines[5], "3 | .  .  N  .  .  .  .  . ");
    }

    #[test]
    fn identical_frames_are_printed_once() {
        let scene = Scene::new(Duration::ZERO);
        let mut renderer = TerminalRenderer::new(Vec::new(), false);
        let now = Instant::now();

        renderer.draw(&scene, now).unwrap();
        let printed = renderer.out.len();
        renderer.draw(&scene, now).unwrap();
        assert_eq!(renderer.out.len(), printed);

        renderer.invalidate();
        renderer.draw(&scene, now).unwrap();
        assert_eq!(renderer.out.len(), printed * 2);
    }
}

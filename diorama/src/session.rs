use std::{
    io::{BufRead, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use rookie::{Color, Game, Move, MoveError, MoveRecord};

use crate::{Command, Renderer, Scene, UciClient, UciSearchOptions};

/// Time between two frames of a running animation.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Something that picks moves for one side of the board.
pub trait Engine {
    /// The engine's reply for the position reached by `history`, as raw move text.
    fn best_move(&mut self, history: &str, search: &UciSearchOptions) -> Result<String>;

    /// Tells the engine the session is over.
    fn shutdown(self: Box<Self>) -> Result<()>;
}

impl<W: Write, R: BufRead> Engine for UciClient<W, R> {
    fn best_move(&mut self, history: &str, search: &UciSearchOptions) -> Result<String> {
        UciClient::best_move(self, history, search)
    }

    fn shutdown(self: Box<Self>) -> Result<()> {
        (*self).quit()
    }
}

/// How a session came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given side delivered checkmate.
    Checkmate(Color),

    /// The player typed `quit`.
    Quit,

    /// The input ran dry.
    EndOfInput,
}

/// Decodes an engine's `bestmove` token.
///
/// Promotion moves carry a fifth character (`q`, `r`, `b` or `n`) that this game has no use
/// for; it is dropped. Anything else past the fourth character is an error.
/// A null move (`0000` or `(none)`) is an error.
///
/// # Example
/// ```
/// # use diorama::session::decode_engine_move;
/// assert_eq!(decode_engine_move("e7e5").unwrap().to_uci(), "e7e5");
/// assert_eq!(decode_engine_move("a7a8q").unwrap().to_uci(), "a7a8");
/// assert!(decode_engine_move("(none)").is_err());
/// assert!(decode_engine_move("0000").is_err());
/// assert!(decode_engine_move("e2e4xyz").is_err());
/// ```
pub fn decode_engine_move(bestmove: &str) -> Result<Move> {
    if bestmove == "(none)" || bestmove == "0000" {
        bail!("the engine has no move to play ({bestmove})");
    }

    let promotion = |c: char| matches!(c, 'q' | 'r' | 'b' | 'n');
    let text = match bestmove.strip_suffix(promotion) {
        Some(text) if bestmove.len() == 5 => {
            warn!("Dropping the promotion suffix of engine move {bestmove:?}");
            text
        }
        _ => bestmove,
    };

    Move::from_uci(text).with_context(|| format!("the engine sent a malformed move {bestmove:?}"))
}

/// One game at the table: reads commands, drives the rules, keeps the scene in step, and draws it.
///
/// Without an [`Engine`], both sides are played from the input (hot-seat).
pub struct Session<R: BufRead, O: Write, D: Renderer> {
    game: Game,
    scene: Scene,
    input: R,
    out: O,
    renderer: D,
    engine: Option<Box<dyn Engine>>,
    human: Color,
    movetime: Duration,
}

impl<R: BufRead, O: Write, D: Renderer> Session<R, O, D> {
    /// A hot-seat session from the starting position.
    pub fn new(input: R, out: O, renderer: D, animation: Duration) -> Self {
        Self {
            game: Game::new(),
            scene: Scene::new(animation),
            input,
            out,
            renderer,
            engine: None,
            human: Color::White,
            movetime: Duration::ZERO,
        }
    }

    /// Hands every move of the side opposite `human` to `engine`, which gets `movetime` to think.
    ///
    /// The engine must already have completed its handshake.
    pub fn with_engine(mut self, engine: Box<dyn Engine>, human: Color, movetime: Duration) -> Self {
        self.engine = Some(engine);
        self.human = human;
        self.movetime = movetime;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The stream messages are written to.
    pub fn output(&self) -> &O {
        &self.out
    }

    /// Plays until checkmate, `quit`, or the end of the input.
    ///
    /// Errors from the engine end the session; the engine is shut down either way.
    pub fn run(&mut self) -> Result<Outcome> {
        let outcome = self.play();

        if let Some(engine) = self.engine.take() {
            if let Err(err) = engine.shutdown() {
                warn!("Failed to shut the engine down cleanly: {err:#}");
            }
        }

        if let Err(err) = &outcome {
            error!("Session aborted: {err:#}");
        }
        outcome
    }

    fn play(&mut self) -> Result<Outcome> {
        self.animate()?;

        loop {
            if let Some(winner) = self.game.winner() {
                self.announce(winner)?;
                return Ok(Outcome::Checkmate(winner));
            }

            if self.engine.is_some() && self.game.side_to_move() != self.human {
                self.engine_turn()?;
                continue;
            }

            write!(self.out, "{} > ", self.game.side_to_move())?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                info!("End of input");
                return Ok(Outcome::EndOfInput);
            }

            match Command::parse(&line) {
                Ok(cmd) => {
                    if let Some(outcome) = self.execute(cmd)? {
                        return Ok(outcome);
                    }
                }
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
    }

    /// Carries out one command typed by a player.
    fn execute(&mut self, cmd: Command) -> Result<Option<Outcome>> {
        debug!("Executing {cmd:?}");

        match cmd {
            Command::Move(mv) => match self.game.make_move(mv) {
                Ok(record) => self.moved(record)?,
                Err(MoveError::LeavesKingInCheck { .. }) => {
                    writeln!(self.out, "Check!! Try again.")?
                }
                Err(err) => {
                    debug!("Refused {mv}: {err}");
                    writeln!(self.out, "Invalid move!!")?
                }
            },

            Command::Camera(orbit) => {
                self.scene.view.camera = orbit;
                self.animate()?;
            }

            Command::Light(orbit) => {
                self.scene.view.light = orbit;
                self.animate()?;
            }

            Command::Power(power) => {
                self.scene.view.light_power = power;
                self.animate()?;
            }

            Command::Undo => self.undo()?,

            Command::Show => writeln!(self.out, "{}", self.game)?,

            Command::History => {
                if self.game.history().is_empty() {
                    writeln!(self.out, "No moves yet")?;
                } else {
                    writeln!(self.out, "{}", self.game.history_string())?;
                }
            }

            Command::Help => writeln!(self.out, "{}", Command::USAGE)?,

            Command::Quit => {
                info!("Quitting after {} moves", self.game.history().len());
                writeln!(self.out, "Thanks for playing!")?;
                return Ok(Some(Outcome::Quit));
            }
        }

        Ok(None)
    }

    /// Takes back one move, or two when playing an engine so the human is on move again.
    fn undo(&mut self) -> Result<()> {
        let Some(mv) = self.game.undo() else {
            writeln!(self.out, "Nothing to undo")?;
            return Ok(());
        };
        info!("Took back {mv}");

        if self.engine.is_some() && self.game.side_to_move() != self.human {
            if let Some(reply) = self.game.undo() {
                info!("Took back {reply}");
            }
        }

        self.scene.sync(&self.game);
        self.animate()
    }

    /// Asks the engine for a move and plays it.
    fn engine_turn(&mut self) -> Result<()> {
        let legal = self.game.legal_moves();
        if legal.is_empty() {
            bail!(
                "{} has no legal move; the game cannot continue",
                self.game.side_to_move()
            );
        }

        let search = UciSearchOptions {
            search_moves: legal.iter().map(Move::to_uci).collect(),
            move_time: Some(self.movetime),
            ..Default::default()
        };

        let history = self.game.history_string();
        let Some(engine) = self.engine.as_mut() else {
            bail!("no engine is attached");
        };
        let bestmove = engine.best_move(&history, &search)?;
        let mv = decode_engine_move(&bestmove)?;

        match self.game.make_move(mv) {
            Ok(record) => {
                writeln!(self.out, "Engine plays {mv}")?;
                self.moved(record)
            }
            Err(err) => bail!("the engine's move {bestmove:?} was refused: {err}"),
        }
    }

    /// Brings the scene up to date with an accepted move and plays the animation.
    fn moved(&mut self, record: MoveRecord) -> Result<()> {
        self.scene.apply(&record, Instant::now());
        self.animate()?;

        if record.gives_check && !record.checkmate {
            writeln!(self.out, "{} is in check", self.game.side_to_move())?;
        }
        Ok(())
    }

    /// Draws frames until the running animation, if any, is finished.
    fn animate(&mut self) -> Result<()> {
        loop {
            let now = Instant::now();
            self.renderer.draw(&self.scene, now)?;

            if !self.scene.tick(now) {
                return Ok(());
            }
            thread::sleep(FRAME_INTERVAL);
        }
    }

    fn announce(&mut self, winner: Color) -> Result<()> {
        match self.engine {
            Some(_) if winner == self.human => writeln!(self.out, "Checkmate!! You WON")?,
            Some(_) => writeln!(self.out, "Checkmate!! You LOST")?,
            None => writeln!(self.out, "Checkmate!! {winner} WON")?,
        }
        Ok(())
    }
}

use std::{
    fmt,
    io::{BufRead, BufReader, Write},
    path::Path,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, trace, warn};

/// The arguments of the `go` command that this client knows how to send.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct UciSearchOptions {
    /// ```text
    /// searchmoves <move_1> [<move_2> ... <move_i>]
    /// ```
    ///
    /// Restrict search to these moves only.
    pub search_moves: Vec<String>,

    /// ```text
    /// depth <x>
    /// ```
    /// Search `x` plies only.
    pub depth: Option<u32>,

    /// ```text
    /// movetime <x>
    /// ```
    /// Search exactly `x` milliseconds.
    pub move_time: Option<Duration>,
}

impl fmt::Display for UciSearchOptions {
    /// `searchmoves` is always written last, since everything after it is read as a move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(depth) = self.depth {
            write!(f, " depth {depth}")?;
        }
        if let Some(move_time) = self.move_time {
            write!(f, " movetime {}", move_time.as_millis())?;
        }
        if !self.search_moves.is_empty() {
            write!(f, " searchmoves {}", self.search_moves.join(" "))?;
        }
        Ok(())
    }
}

/// The commands this client sends to an engine.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum UciCommand {
    /// `uci`
    Uci,

    /// `isready`
    IsReady,

    /// `setoption name <name> [value <value>]`
    SetOption { name: String, value: Option<String> },

    /// `ucinewgame`
    UciNewGame,

    /// `position [fen <fen> | startpos] [moves <move_1> ... <move_i>]`
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },

    /// `go [depth <x>] [movetime <x>] [searchmoves <move_1> ... <move_i>]`
    Go(UciSearchOptions),

    /// `quit`
    Quit,
}

impl fmt::Display for UciCommand {
    /// Commands are formatted according to the UCI specifications, without the trailing newline.
    ///
    /// # Example
    /// ```
    /// # use diorama::uci::UciCommand;
    /// let position = UciCommand::Position { fen: None, moves: vec!["e2e4".into(), "e7e5".into()] };
    /// assert_eq!(position.to_string(), "position startpos moves e2e4 e7e5");
    ///
    /// let option = UciCommand::SetOption { name: "Minimal Reporting".into(), value: Some("5".into()) };
    /// assert_eq!(option.to_string(), "setoption name Minimal Reporting value 5");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uci => write!(f, "uci"),
            Self::IsReady => write!(f, "isready"),
            Self::SetOption { name, value } => match value {
                Some(value) => write!(f, "setoption name {name} value {value}"),
                None => write!(f, "setoption name {name}"),
            },
            Self::UciNewGame => write!(f, "ucinewgame"),
            Self::Position { fen, moves } => {
                match fen {
                    Some(fen) => write!(f, "position fen {fen}")?,
                    None => write!(f, "position startpos")?,
                }
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            }
            Self::Go(options) => write!(f, "go{options}"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// The lines an engine sends back that this client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciResponse {
    /// `id name <x>`
    IdName(String),

    /// `id author <x>`
    IdAuthor(String),

    /// `uciok`
    UciOk,

    /// `readyok`
    ReadyOk,

    /// `bestmove <move_1> [ponder <move_2>]`
    BestMove {
        bestmove: String,
        ponder: Option<String>,
    },

    /// `info ...`, kept verbatim.
    Info(String),

    /// Anything else, kept verbatim.
    Other(String),
}

impl UciResponse {
    /// Parse a line of engine output.
    ///
    /// Any line holding the token `bestmove` is a [`UciResponse::BestMove`], and the
    /// token that follows it is the move. Some engines prefix it with other text.
    ///
    /// # Example
    /// ```
    /// # use diorama::uci::UciResponse;
    /// assert_eq!(
    ///     UciResponse::parse("bestmove e7e5 ponder g1f3").unwrap(),
    ///     UciResponse::BestMove { bestmove: "e7e5".into(), ponder: Some("g1f3".into()) }
    /// );
    /// assert_eq!(UciResponse::parse("readyok").unwrap(), UciResponse::ReadyOk);
    /// assert!(UciResponse::parse("bestmove").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if let Some(i) = tokens.iter().position(|token| *token == "bestmove") {
            let bestmove = tokens
                .get(i + 1)
                .ok_or(anyhow!("engine sent `bestmove` without a move: {line:?}"))?;

            let ponder = tokens
                .iter()
                .skip(i + 2)
                .skip_while(|token| **token != "ponder")
                .nth(1)
                .map(|token| token.to_string());

            return Ok(Self::BestMove {
                bestmove: bestmove.to_string(),
                ponder,
            });
        }

        let (first, rest) = line.split_once(' ').unwrap_or((line, ""));
        let response = match first {
            "uciok" => Self::UciOk,
            "readyok" => Self::ReadyOk,
            "info" => Self::Info(rest.trim().to_string()),
            "id" => match rest.trim().split_once(' ') {
                Some(("name", name)) => Self::IdName(name.trim().to_string()),
                Some(("author", author)) => Self::IdAuthor(author.trim().to_string()),
                _ => Self::Other(line.to_string()),
            },
            _ => Self::Other(line.to_string()),
        };

        Ok(response)
    }
}

/// Talks to a UCI engine: one command out, then lines in until the expected answer arrives.
///
/// Generic over its streams so it can be driven by an engine process or by in-memory buffers.
pub struct UciClient<W: Write, R: BufRead> {
    writer: W,
    reader: R,
    child: Option<Child>,
    name: Option<String>,
}

impl UciClient<ChildStdin, BufReader<ChildStdout>> {
    /// Starts the engine at `path` with piped stdin and stdout.
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start engine {}", path.display()))?;

        let stdin = child
            .stdin
            .take()
            .context("Failed to open stdin for the engine")?;
        let stdout = child
            .stdout
            .take()
            .context("Failed to open stdout for the engine")?;

        info!("Started engine {} (pid {})", path.display(), child.id());

        let mut client = Self::new(stdin, BufReader::new(stdout));
        client.child = Some(child);
        Ok(client)
    }
}

impl<W: Write, R: BufRead> UciClient<W, R> {
    /// Wraps a pair of streams. No process is attached.
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            reader,
            child: None,
            name: None,
        }
    }

    /// The name the engine gave during the handshake.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The stream commands are written to.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Writes `cmd` followed by a newline, and flushes.
    pub fn send(&mut self, cmd: &UciCommand) -> Result<()> {
        trace!("> {cmd}");
        writeln!(self.writer, "{cmd}")
            .and_then(|_| self.writer.flush())
            .with_context(|| format!("Failed to send {cmd:?} to the engine"))
    }

    /// Reads and parses the next line from the engine.
    ///
    /// Fails if the engine has closed its output.
    pub fn read_response(&mut self) -> Result<UciResponse> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read from the engine")?;

        if read == 0 {
            bail!("The engine closed its output");
        }

        trace!("< {}", line.trim_end());
        UciResponse::parse(&line)
    }

    /// Reads lines until one matches `done`, returning it.
    fn read_until(
        &mut self,
        what: &str,
        mut done: impl FnMut(&UciResponse) -> bool,
    ) -> Result<UciResponse> {
        loop {
            let response = self
                .read_response()
                .with_context(|| format!("while waiting for `{what}`"))?;

            if done(&response) {
                return Ok(response);
            }

            match &response {
                UciResponse::IdName(name) => self.name = Some(name.clone()),
                UciResponse::Info(_) => {}
                other => debug!("Ignoring engine output while waiting for `{what}`: {other:?}"),
            }
        }
    }

    /// Puts the engine into UCI mode, applies `options`, and starts a new game.
    ///
    /// Sends `uci` and waits for `uciok`, sends one `setoption` per option, then
    /// `isready` until `readyok`, and finally `ucinewgame`.
    pub fn handshake(&mut self, options: &[(String, String)]) -> Result<()> {
        self.send(&UciCommand::Uci)?;
        self.read_until("uciok", |response| *response == UciResponse::UciOk)?;

        for (name, value) in options {
            self.send(&UciCommand::SetOption {
                name: name.clone(),
                value: Some(value.clone()),
            })?;
        }

        self.send(&UciCommand::IsReady)?;
        self.read_until("readyok", |response| *response == UciResponse::ReadyOk)?;
        self.send(&UciCommand::UciNewGame)?;

        info!(
            "Engine ready: {}",
            self.name.as_deref().unwrap_or("<unnamed engine>")
        );
        Ok(())
    }

    /// Asks for the best move after the space-separated `history`, played from the starting position.
    ///
    /// Returns the token following `bestmove` verbatim; the caller decides what it means.
    pub fn best_move(&mut self, history: &str, search: &UciSearchOptions) -> Result<String> {
        self.send(&UciCommand::Position {
            fen: None,
            moves: history.split_whitespace().map(str::to_string).collect(),
        })?;
        self.send(&UciCommand::Go(search.clone()))?;

        match self.read_until("bestmove", |response| {
            matches!(response, UciResponse::BestMove { .. })
        })? {
            UciResponse::BestMove { bestmove, .. } => {
                debug!("Engine plays {bestmove}");
                Ok(bestmove)
            }
            other => bail!("expected `bestmove` from the engine, got {other:?}"),
        }
    }

    /// Sends `quit` and waits for the engine process, if any, to exit.
    pub fn quit(mut self) -> Result<()> {
        self.send(&UciCommand::Quit)?;

        if let Some(mut child) = self.child.take() {
            let status = child.wait().context("Failed to wait for the engine to exit")?;
            info!("Engine exited with {status}");
        }

        Ok(())
    }
}

impl<W: Write, R: BufRead> Drop for UciClient<W, R> {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            warn!("Engine still running; killing it");
            if let Err(err) = child.kill().and_then(|_| child.wait()) {
                warn!("Failed to kill the engine: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_writes_searchmoves_last() {
        let go = UciCommand::Go(UciSearchOptions {
            search_moves: vec!["e7e5".into(), "d7d5".into()],
            depth: Some(4),
            move_time: Some(Duration::from_millis(1500)),
        });
        assert_eq!(go.to_string(), "go depth 4 movetime 1500 searchmoves e7e5 d7d5");
        assert_eq!(UciCommand::Go(UciSearchOptions::default()).to_string(), "go");
    }

    #[test]
    fn position_without_moves() {
        let position = UciCommand::Position {
            fen: None,
            moves: vec![],
        };
        assert_eq!(position.to_string(), "position startpos");
    }

    #[test]
    fn parse_bestmove_anywhere_in_the_line() {
        assert_eq!(
            UciResponse::parse("info depth 3 bestmove g8f6\n").unwrap(),
            UciResponse::BestMove {
                bestmove: "g8f6".into(),
                ponder: None
            }
        );
        assert_eq!(
            UciResponse::parse("bestmove (none)").unwrap(),
            UciResponse::BestMove {
                bestmove: "(none)".into(),
                ponder: None
            }
        );
    }

    #[test]
    fn parse_id_and_info() {
        assert_eq!(
            UciResponse::parse("id name Stockfish 16").unwrap(),
            UciResponse::IdName("Stockfish 16".into())
        );
        assert_eq!(
            UciResponse::parse("id author the Stockfish developers").unwrap(),
            UciResponse::IdAuthor("the Stockfish developers".into())
        );
        assert_eq!(
            UciResponse::parse("info depth 1 score cp 20").unwrap(),
            UciResponse::Info("depth 1 score cp 20".into())
        );
        assert_eq!(
            UciResponse::parse("option name Hash type spin").unwrap(),
            UciResponse::Other("option name Hash type spin".into())
        );
    }
}

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};
use rookie::Move;

/// A point on a sphere around the board, used to place the camera and the light.
///
/// `theta` is the elevation in degrees, `phi` the azimuth in degrees, and
/// `radius` the distance from the centre of the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
}

impl Orbit {
    pub const MIN_THETA: f32 = 10.0;
    pub const MAX_THETA: f32 = 80.0;
    pub const MIN_PHI: f32 = 0.0;
    pub const MAX_PHI: f32 = 360.0;

    pub const fn new(theta: f32, phi: f32, radius: f32) -> Self {
        Self { theta, phi, radius }
    }

    /// Parses `<theta> <phi> <radius>`, enforcing `theta` in `[10, 80]`, `phi` in `[0, 360]`, and `radius >= 0`.
    ///
    /// # Example
    /// ```
    /// # use diorama::Orbit;
    /// assert_eq!(Orbit::parse("45 90 20").unwrap(), Orbit::new(45.0, 90.0, 20.0));
    /// assert!(Orbit::parse("5 90 20").is_err());
    /// assert!(Orbit::parse("45 90").is_err());
    /// ```
    pub fn parse(args: &str) -> Result<Self> {
        let mut args = args.split_whitespace();
        let theta = parse_number("theta", args.next())?;
        let phi = parse_number("phi", args.next())?;
        let radius = parse_number("radius", args.next())?;

        if let Some(extra) = args.next() {
            bail!("unexpected argument {extra:?}: expected <theta> <phi> <radius>");
        }

        if !(Self::MIN_THETA..=Self::MAX_THETA).contains(&theta) {
            bail!(
                "theta must be between {} and {} degrees. Got {theta}",
                Self::MIN_THETA,
                Self::MAX_THETA
            );
        }
        if !(Self::MIN_PHI..=Self::MAX_PHI).contains(&phi) {
            bail!(
                "phi must be between {} and {} degrees. Got {phi}",
                Self::MIN_PHI,
                Self::MAX_PHI
            );
        }
        if radius < 0.0 {
            bail!("radius must not be negative. Got {radius}");
        }

        Ok(Self::new(theta, phi, radius))
    }
}

impl From<(f32, f32, f32)> for Orbit {
    fn from((theta, phi, radius): (f32, f32, f32)) -> Self {
        Self::new(theta, phi, radius)
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "theta {} phi {} radius {}", self.theta, self.phi, self.radius)
    }
}

/// Everything that can be typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `move <e2e4>`
    Move(Move),

    /// `camera <theta> <phi> <radius>`
    Camera(Orbit),

    /// `light <theta> <phi> <radius>`
    Light(Orbit),

    /// `power <p>`
    Power(f32),

    /// `undo`: take back the last move.
    Undo,

    /// `show`: print the board again.
    Show,

    /// `history`: print every move so far.
    History,

    /// `help`
    Help,

    /// `quit` or `exit`
    Quit,
}

impl Command {
    /// Usage text shown by `help` and after a malformed command.
    pub const USAGE: &'static str = "\
commands:
  move <e2e4>                        move a piece (files a-h, ranks 1-8)
  camera <theta> <phi> <radius>      theta in [10, 80], phi in [0, 360], radius >= 0
  light <theta> <phi> <radius>       same ranges as camera
  power <p>                          light power, p >= 0
  undo                               take back the last move
  show                               print the board
  history                            print the moves so far
  help                               print this message
  quit | exit                        leave the game";

    /// Parse a line of input, returning a [`Command`], if possible.
    ///
    /// # Example
    /// ```
    /// # use diorama::Command;
    /// # use rookie::Move;
    /// let cmd = Command::parse("move e2e4").unwrap();
    /// assert_eq!(cmd, Command::Move(Move::from_uci("e2e4").unwrap()));
    /// assert!(Command::parse("move e2e9").is_err());
    /// assert!(Command::parse("dance").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (first, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();

        match first {
            "move" => Self::parse_move(rest),
            "camera" => Ok(Self::Camera(Orbit::parse(rest)?)),
            "light" => Ok(Self::Light(Orbit::parse(rest)?)),
            "power" => Self::parse_power(rest),
            "undo" => Self::no_args(Self::Undo, rest),
            "show" => Self::no_args(Self::Show, rest),
            "history" => Self::no_args(Self::History, rest),
            "help" => Self::no_args(Self::Help, rest),
            "quit" | "exit" => Self::no_args(Self::Quit, rest),
            "" => bail!("empty command. Type `help` for a list of commands"),
            _ => bail!("unknown command {input:?}. Type `help` for a list of commands"),
        }
    }

    /// Attempt to parse the argument of [`Command::Move`].
    pub fn parse_move(args: &str) -> Result<Self> {
        if args.is_empty() {
            bail!("usage: move <e2e4>");
        }

        let mv = Move::from_uci(args).map_err(|_| {
            anyhow!("Invalid move command {args:?}: expected four characters like e2e4")
        })?;
        Ok(Self::Move(mv))
    }

    /// Attempt to parse the argument of [`Command::Power`].
    pub fn parse_power(args: &str) -> Result<Self> {
        let power: f32 = parse_number("power", Some(args).filter(|s| !s.is_empty()))?;
        if power < 0.0 {
            bail!("power must not be negative. Got {power}");
        }

        Ok(Self::Power(power))
    }

    fn no_args(cmd: Self, rest: &str) -> Result<Self> {
        if !rest.is_empty() {
            bail!("{cmd:?} takes no arguments. Got {rest:?}");
        }
        Ok(cmd)
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_number(name: &str, input: Option<&str>) -> Result<f32> {
    let input = input.ok_or(anyhow!("missing argument <{name}>"))?;
    let value: f32 = input
        .parse()
        .map_err(|_| anyhow!("invalid number for {name}: {input:?}"))?;

    if !value.is_finite() {
        bail!("{name} must be a finite number. Got {input:?}");
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_move() {
        assert_eq!(
            Command::parse("move h7h5").unwrap(),
            Command::Move(Move::from_uci("h7h5").unwrap())
        );
        assert_eq!(
            Command::parse("  move   a2a4  ").unwrap(),
            Command::Move(Move::from_uci("a2a4").unwrap())
        );

        for bad in ["move", "move e2", "move e2e4e5", "move E2E4", "move i2i4", "move e2 e4"] {
            assert!(Command::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_camera_bounds() {
        assert_eq!(
            Command::parse("camera 10 0 0").unwrap(),
            Command::Camera(Orbit::new(10.0, 0.0, 0.0))
        );
        assert_eq!(
            Command::parse("camera 80 360 100.5").unwrap(),
            Command::Camera(Orbit::new(80.0, 360.0, 100.5))
        );

        for bad in [
            "camera 9.9 0 10",
            "camera 80.1 0 10",
            "camera 45 -1 10",
            "camera 45 360.5 10",
            "camera 45 90 -1",
            "camera 45 90",
            "camera 45 90 10 5",
            "camera a b c",
            "camera NaN 90 10",
        ] {
            assert!(Command::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_light() {
        assert_eq!(
            Command::parse("light 30 180 15").unwrap(),
            Command::Light(Orbit::new(30.0, 180.0, 15.0))
        );
        assert!(Command::parse("light 0 0 15").is_err());
    }

    #[test]
    fn parse_power() {
        assert_eq!(Command::parse("power 0").unwrap(), Command::Power(0.0));
        assert_eq!(Command::parse("power 250.5").unwrap(), Command::Power(250.5));
        assert!(Command::parse("power -1").is_err());
        assert!(Command::parse("power").is_err());
        assert!(Command::parse("power bright").is_err());
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("undo").unwrap(), Command::Undo);
        assert_eq!(Command::parse("show").unwrap(), Command::Show);
        assert_eq!(Command::parse("history").unwrap(), Command::History);
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
        assert!(Command::parse("quit now").is_err());
        assert!(Command::parse("").is_err());
        assert!(Command::parse("e2e4").is_err());
    }
}

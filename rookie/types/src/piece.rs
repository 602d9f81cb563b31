use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::{File, Rank, Square};

/// Represents the color of a player or a piece.
///
/// In Western chess, White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// An iterator over both colors, starting with White.
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::all().into_iter()
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The direction, in ranks, that this color's pawns advance.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::Color;
    /// assert_eq!(Color::White.forward(), 1);
    /// assert_eq!(Color::Black.forward(), -1);
    /// ```
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Returns this [`Color`] as a `usize`.
    ///
    /// Will be `0` for White, `1` for Black.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Parses a [`Color`] from a human-friendly name, such as `white` or `b`.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::Color;
    /// assert_eq!(Color::from_name("Black").unwrap(), Color::Black);
    /// assert_eq!(Color::from_name("w").unwrap(), Color::White);
    /// assert!(Color::from_name("purple").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Color must be either 'white' or 'black' (case-insensitive). Found {name:?}"),
        }
    }

    /// Creates a [`Color`] based on the ASCII case of the provided character, with uppercase being White and lowercase being Black.
    pub const fn from_case(c: char) -> Self {
        if c.is_ascii_lowercase() {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "class") that a chess piece can be.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Creates a new [`PieceKind`] from a character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::PieceKind;
    /// assert_eq!(PieceKind::from_uci('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind}."),
        }
    }

    /// Converts this [`PieceKind`] to a lowercase character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// How many pieces of this kind each side starts with.
    pub const fn roster_size(&self) -> u8 {
        match self {
            Self::Pawn => 8,
            Self::Knight | Self::Bishop | Self::Rook => 2,
            Self::Queen | Self::King => 1,
        }
    }

    /// Offset of this kind's first slot within one color's half of the roster.
    ///
    /// Slots are laid out as pawns, rooks, knights, bishops, queen, king.
    const fn roster_offset(&self) -> u8 {
        match self {
            Self::Pawn => 0,
            Self::Rook => 8,
            Self::Knight => 10,
            Self::Bishop => 12,
            Self::Queen => 14,
            Self::King => 15,
        }
    }

    /// Starting files of this kind's roster slots, in slot order.
    const fn home_files(&self) -> &'static [File] {
        match self {
            Self::Pawn => &[
                File::A,
                File::B,
                File::C,
                File::D,
                File::E,
                File::F,
                File::G,
                File::H,
            ],
            Self::Rook => &[File::A, File::H],
            Self::Knight => &[File::B, File::G],
            Self::Bishop => &[File::C, File::F],
            Self::Queen => &[File::D],
            Self::King => &[File::E],
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a chess piece: a [`Color`] and a [`PieceKind`].
///
/// Says nothing about *which* piece of that kind it is. See [`PieceId`] for that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Fetches the [`Color`] and [`PieceKind`] of this [`Piece`].
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color, self.kind)
    }

    /// Creates a new [`Piece`] from a character, according to FEN notation.
    ///
    /// Uppercase is White, lowercase is Black.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::{Piece, Color, PieceKind};
    /// let knight = Piece::from_uci('n').unwrap();
    /// assert_eq!(knight.parts(), (Color::Black, PieceKind::Knight));
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        Ok(Self::new(Color::from_case(piece), kind))
    }

    /// Converts this [`Piece`] into a character, according to FEN notation.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::new(Color::White, PieceKind::Queen).to_uci(), 'Q');
    /// assert_eq!(Piece::new(Color::Black, PieceKind::Pawn).to_uci(), 'p');
    /// ```
    pub const fn to_uci(&self) -> char {
        match self.color {
            Color::White => self.kind.to_uci().to_ascii_uppercase(),
            Color::Black => self.kind.to_uci(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// The stable identity of one of the 32 pieces in a game.
///
/// Ids `0..16` belong to White and `16..32` to Black. Within a color, slots are
/// laid out as eight pawns (files a through h), two rooks, two knights, two
/// bishops, the queen, and the king. The first rook, knight, and bishop are the
/// queenside ones.
///
/// A [`PieceId`] stays attached to the same physical piece for the whole game,
/// which is what a renderer needs to animate and hide meshes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PieceId(u8);

impl PieceId {
    /// Total number of pieces in a game.
    pub const COUNT: usize = 32;

    /// Number of pieces per color.
    const PER_COLOR: u8 = 16;

    pub const WHITE_KING: Self = Self(15);
    pub const BLACK_KING: Self = Self(31);

    /// Creates the id of the `ordinal`th (`1`-based) piece of the given color and kind.
    ///
    /// Returns `None` if that side never has that many pieces of this kind.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::{Color, PieceId, PieceKind, Square};
    /// let rook = PieceId::new(Color::Black, PieceKind::Rook, 2).unwrap();
    /// assert_eq!(rook.home(), Square::H8);
    /// assert!(PieceId::new(Color::White, PieceKind::Queen, 2).is_none());
    /// ```
    pub const fn new(color: Color, kind: PieceKind, ordinal: u8) -> Option<Self> {
        if ordinal == 0 || ordinal > kind.roster_size() {
            return None;
        }

        let base = color.index() as u8 * Self::PER_COLOR;
        Some(Self(base + kind.roster_offset() + ordinal - 1))
    }

    /// An iterator over all 32 ids, White first.
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// An iterator over every id of the given color and kind, in slot order.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::{Color, PieceId, PieceKind};
    /// assert_eq!(PieceId::slots(Color::White, PieceKind::Pawn).count(), 8);
    /// assert_eq!(PieceId::slots(Color::Black, PieceKind::King).count(), 1);
    /// ```
    pub fn slots(color: Color, kind: PieceKind) -> impl Iterator<Item = Self> {
        (1..=kind.roster_size()).filter_map(move |ordinal| Self::new(color, kind, ordinal))
    }

    /// The id of the given color's king.
    pub const fn king(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }

    /// Returns this [`PieceId`] as a `usize`, for indexing into lists of [`PieceId::COUNT`] elements.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// The [`Color`] of the piece with this id.
    pub const fn color(&self) -> Color {
        if self.0 < Self::PER_COLOR {
            Color::White
        } else {
            Color::Black
        }
    }

    /// The [`PieceKind`] of the piece with this id.
    pub const fn kind(&self) -> PieceKind {
        match self.0 % Self::PER_COLOR {
            0..=7 => PieceKind::Pawn,
            8 | 9 => PieceKind::Rook,
            10 | 11 => PieceKind::Knight,
            12 | 13 => PieceKind::Bishop,
            14 => PieceKind::Queen,
            _ => PieceKind::King,
        }
    }

    /// The [`Piece`] with this id.
    pub const fn piece(&self) -> Piece {
        Piece::new(self.color(), self.kind())
    }

    /// `1`-based number of this piece among its color's pieces of the same kind.
    pub const fn ordinal(&self) -> u8 {
        self.0 % Self::PER_COLOR - self.kind().roster_offset() + 1
    }

    /// The square this piece occupies in the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use rookie_types::{Color, PieceId, PieceKind, Square};
    /// assert_eq!(PieceId::WHITE_KING.home(), Square::E1);
    /// let pawn = PieceId::new(Color::Black, PieceKind::Pawn, 3).unwrap();
    /// assert_eq!(pawn.home(), Square::C7);
    /// ```
    pub const fn home(&self) -> Square {
        let color = self.color();
        let kind = self.kind();
        let file = kind.home_files()[self.ordinal() as usize - 1];
        let rank = match kind {
            PieceKind::Pawn => Rank::second(color),
            _ => Rank::first(color),
        };

        Square::new(file, rank)
    }
}

impl<T> Index<PieceId> for [T; PieceId::COUNT] {
    type Output = T;
    fn index(&self, index: PieceId) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<PieceId> for [T; PieceId::COUNT] {
    fn index_mut(&mut self, index: PieceId) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for PieceId {
    /// Displays as `white pawn #3`; singletons omit the number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, kind) = (self.color(), self.kind());
        if kind.roster_size() == 1 {
            write!(f, "{color} {kind}")
        } else {
            write!(f, "{color} {kind} #{}", self.ordinal())
        }
    }
}

impl fmt::Debug for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\" ({})", self.0)
    }
}

use std::time::{Duration, Instant};

pub use glam::Vec3;
use rookie::{Board, Color, MoveRecord, Piece, PieceId, PieceKind, Square};

use crate::{
    config::{
        BOARD_ORIGIN, BOARD_SCALE, DEFAULT_CAMERA, DEFAULT_LIGHT, DEFAULT_LIGHT_POWER,
        KNIGHT_LIFT, PIECE_SCALE, PLATFORM_HEIGHT, SQUARE_SIZE,
    },
    Orbit,
};

/// The world position of the centre of `square`, resting on the platform.
///
/// # Example
/// ```
/// # use diorama::{world_position, config::{BOARD_ORIGIN, SQUARE_SIZE, PLATFORM_HEIGHT}};
/// # use rookie::Square;
/// let a1 = world_position(Square::A1);
/// assert_eq!((a1.x, a1.y, a1.z), (BOARD_ORIGIN, BOARD_ORIGIN, PLATFORM_HEIGHT));
///
/// let h8 = world_position(Square::H8);
/// assert!((h8.x - (BOARD_ORIGIN + 7.0 * SQUARE_SIZE)).abs() < 1e-5);
/// ```
pub fn world_position(square: Square) -> Vec3 {
    Vec3::new(
        BOARD_ORIGIN + square.col() as f32 * SQUARE_SIZE,
        BOARD_ORIGIN + square.row() as f32 * SQUARE_SIZE,
        PLATFORM_HEIGHT,
    )
}

/// The square whose centre is nearest to `position`, ignoring height.
///
/// Returns `None` for points off the edge of the board.
///
/// # Example
/// ```
/// # use diorama::{square_at, world_position};
/// # use rookie::Square;
/// for square in Square::iter() {
///     assert_eq!(square_at(world_position(square)), Some(square));
/// }
/// ```
pub fn square_at(position: Vec3) -> Option<Square> {
    let col = ((position.x - BOARD_ORIGIN) / SQUARE_SIZE).round();
    let row = ((position.y - BOARD_ORIGIN) / SQUARE_SIZE).round();

    if !(0.0..8.0).contains(&col) || !(0.0..8.0).contains(&row) {
        return None;
    }

    Square::from_coords(row as i8, col as i8)
}

/// The mesh that draws `piece`.
pub const fn mesh_for(piece: Piece) -> &'static str {
    match piece.parts() {
        (Color::White, PieceKind::Pawn) => "PEDONE13",
        (Color::White, PieceKind::Rook) => "TORRE3",
        (Color::White, PieceKind::Knight) => "Object3",
        (Color::White, PieceKind::Bishop) => "ALFIERE3",
        (Color::White, PieceKind::Queen) => "REGINA2",
        (Color::White, PieceKind::King) => "RE2",
        (Color::Black, PieceKind::Pawn) => "PEDONE12",
        (Color::Black, PieceKind::Rook) => "TORRE02",
        (Color::Black, PieceKind::Knight) => "Object02",
        (Color::Black, PieceKind::Bishop) => "ALFIERE02",
        (Color::Black, PieceKind::Queen) => "REGINA01",
        (Color::Black, PieceKind::King) => "RE01",
    }
}

/// The mesh that draws the board.
pub const BOARD_MESH: &str = "12951_Stone_Chess_Board";

/// The entry for the piece with this id, standing on its home square.
fn piece_entry(id: PieceId) -> SceneEntry {
    SceneEntry {
        mesh: mesh_for(id.piece()),
        scale: PIECE_SCALE,
        rotation: Rotation::UPRIGHT,
        position: world_position(id.home()),
        alive: true,
    }
}

/// A rotation of `degrees` about `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    pub axis: Vec3,
}

impl Rotation {
    pub const NONE: Self = Self {
        degrees: 0.0,
        axis: Vec3::X,
    };

    /// Piece meshes are modelled lying down and need standing up.
    pub const UPRIGHT: Self = Self {
        degrees: 90.0,
        axis: Vec3::X,
    };
}

/// Everything a renderer needs to draw one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEntry {
    pub mesh: &'static str,
    pub scale: f32,
    pub rotation: Rotation,
    pub position: Vec3,
    pub alive: bool,
}

/// A piece gliding from one square to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub piece: PieceId,
    pub start: Vec3,
    pub end: Vec3,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Animation {
    /// How far along the animation is at `now`, from `0.0` to `1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Where the piece is drawn at `now`.
    ///
    /// Knights hop over the board while travelling; everything else slides along it.
    /// Once finished, the piece rests exactly on `end`.
    pub fn position_at(&self, now: Instant) -> Vec3 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.end;
        }

        let mut position = self.start.lerp(self.end, t);
        position.z = if self.piece.kind() == PieceKind::Knight {
            KNIGHT_LIFT
        } else {
            self.end.z
        };
        position
    }
}

/// Camera and lighting, as set by the `camera`, `light`, and `power` commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub camera: Orbit,
    pub light: Orbit,
    pub light_power: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            camera: DEFAULT_CAMERA.into(),
            light: DEFAULT_LIGHT.into(),
            light_power: DEFAULT_LIGHT_POWER,
        }
    }
}

/// The presentation of a game: one [`SceneEntry`] per piece, the board, the camera, and at most one running [`Animation`].
///
/// The scene is only ever changed from the outcome of accepted moves, so it cannot disagree with the rules.
#[derive(Debug, Clone)]
pub struct Scene {
    board: SceneEntry,
    pieces: [SceneEntry; PieceId::COUNT],
    animation: Option<Animation>,
    animation_duration: Duration,
    pub view: ViewSettings,
}

impl Scene {
    /// Builds the scene for the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use diorama::{world_position, Scene};
    /// # use rookie::PieceId;
    /// # use std::time::Duration;
    /// let scene = Scene::new(Duration::from_millis(2000));
    /// for id in PieceId::iter() {
    ///     let entry = scene.entry(id);
    ///     assert!(entry.alive);
    ///     assert_eq!(entry.position, world_position(id.home()));
    /// }
    /// ```
    pub fn new(animation_duration: Duration) -> Self {
        let mut pieces = [piece_entry(PieceId::WHITE_KING); PieceId::COUNT];
        for id in PieceId::iter() {
            pieces[id] = piece_entry(id);
        }

        Self {
            board: SceneEntry {
                mesh: BOARD_MESH,
                scale: BOARD_SCALE,
                rotation: Rotation::NONE,
                position: Vec3::new(0.0, 0.0, PLATFORM_HEIGHT),
                alive: true,
            },
            pieces,
            animation: None,
            animation_duration,
            view: ViewSettings::default(),
        }
    }

    /// The entry for the board itself.
    pub const fn board(&self) -> &SceneEntry {
        &self.board
    }

    /// The entry for the piece with this id.
    pub fn entry(&self, id: PieceId) -> &SceneEntry {
        &self.pieces[id]
    }

    /// Every piece entry, paired with its id.
    pub fn entries(&self) -> impl Iterator<Item = (PieceId, &SceneEntry)> {
        PieceId::iter().zip(self.pieces.iter())
    }

    /// The running animation, if any.
    pub const fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Reflects an accepted move: the captured piece disappears, the mover's entry
    /// jumps to its destination, and an animation from the old square starts at `now`.
    ///
    /// An animation still running is cut short.
    pub fn apply(&mut self, record: &MoveRecord, now: Instant) {
        if let Some(captured) = record.captured {
            self.pieces[captured].alive = false;
        }

        let entry = &mut self.pieces[record.piece];
        let start = entry.position;
        let end = world_position(record.mv.to());
        entry.position = end;

        self.animation = Some(Animation {
            piece: record.piece,
            start,
            end,
            started_at: now,
            duration: self.animation_duration,
        });
    }

    /// Advances time to `now`, clearing a finished animation.
    ///
    /// Returns `true` while an animation is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.animation.is_some_and(|anim| anim.is_finished(now)) {
            self.animation = None;
        }

        self.animation.is_some()
    }

    /// Where the piece with this id should be drawn at `now`.
    pub fn displayed_position(&self, id: PieceId, now: Instant) -> Vec3 {
        match self.animation {
            Some(anim) if anim.piece == id => anim.position_at(now),
            _ => self.pieces[id].position,
        }
    }

    /// Rebuilds every piece entry from `board`, dropping any running animation.
    ///
    /// Used after a move is taken back, where there is nothing to animate.
    pub fn sync(&mut self, board: &Board) {
        self.animation = None;

        for id in PieceId::iter() {
            let entry = &mut self.pieces[id];
            match board.location(id) {
                Some(square) => {
                    entry.alive = true;
                    entry.position = world_position(square);
                }
                None => entry.alive = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookie::Game;

    const TWO_SECONDS: Duration = Duration::from_millis(2000);

    #[test]
    fn board_entry_sits_under_the_pieces() {
        let scene = Scene::new(TWO_SECONDS);
        assert_eq!(scene.board().mesh, BOARD_MESH);
        assert_eq!(scene.board().position.z, PLATFORM_HEIGHT);
        assert_eq!(scene.board().rotation, Rotation::NONE);
        assert_eq!(scene.entry(PieceId::WHITE_KING).mesh, "RE2");
        assert_eq!(scene.entry(PieceId::BLACK_KING).mesh, "RE01");
    }

    #[test]
    fn animation_interpolates_linearly() {
        let mut game = Game::new();
        let mut scene = Scene::new(TWO_SECONDS);
        let start = Instant::now();

        let record = game.make_move_uci("e2e4").unwrap();
        scene.apply(&record, start);

        let from = world_position(Square::E2);
        let to = world_position(Square::E4);
        let halfway = scene.displayed_position(record.piece, start + Duration::from_millis(1000));
        assert!((halfway.y - (from.y + to.y) / 2.0).abs() < 1e-4);
        assert_eq!(halfway.x, from.x);
        assert_eq!(halfway.z, PLATFORM_HEIGHT);

        assert!(scene.tick(start + Duration::from_millis(1999)));
        assert!(!scene.tick(start + TWO_SECONDS));
        assert_eq!(scene.displayed_position(record.piece, start + TWO_SECONDS), to);
    }

    #[test]
    fn knights_are_lifted_mid_flight() {
        let mut game = Game::new();
        let mut scene = Scene::new(TWO_SECONDS);
        let start = Instant::now();

        let record = game.make_move_uci("g1f3").unwrap();
        scene.apply(&record, start);

        let mid = scene.displayed_position(record.piece, start + Duration::from_millis(500));
        assert_eq!(mid.z, KNIGHT_LIFT);

        let end = scene.displayed_position(record.piece, start + TWO_SECONDS);
        assert_eq!(end, world_position(Square::F3));
    }

    #[test]
    fn zero_length_animation_finishes_immediately() {
        let mut game = Game::new();
        let mut scene = Scene::new(Duration::ZERO);
        let now = Instant::now();

        scene.apply(&game.make_move_uci("d2d4").unwrap(), now);
        assert!(!scene.tick(now));
    }

    #[test]
    fn sync_restores_taken_back_captures() {
        let mut game = Game::new();
        let mut scene = Scene::new(TWO_SECONDS);
        let now = Instant::now();

        for mv in ["e2e4", "d7d5", "e4d5"] {
            let record = game.make_move_uci(mv).unwrap();
            scene.apply(&record, now);
        }

        let victim = PieceId::new(Color::Black, PieceKind::Pawn, 4).unwrap();
        assert!(!scene.entry(victim).alive);

        game.undo();
        scene.sync(&game);
        assert!(scene.entry(victim).alive);
        assert_eq!(scene.entry(victim).position, world_position(Square::D5));
        assert!(!scene.is_animating());
    }
}

use arrayvec::ArrayVec;
use log::trace;

use super::{Board, Color, Move, MoveList, PieceKind, Square, KING_DELTAS};

/// Squares of every piece attacking a given square. One side never has more than 16 pieces.
pub type AttackerList = ArrayVec<Square, 16>;

/// Checks whether the piece on `from` may travel to `to`, according to its movement geometry.
///
/// Whose turn it is and whether the move exposes the mover's own king are *not*
/// considered here. See [`crate::Game::make_move`] for the full set of rules.
///
/// A move is rejected if `from` is empty, if `from == to`, or if `to` holds a
/// piece of the mover's own color.
///
/// # Example
/// ```
/// # use rookie::{is_valid_move, Board, Square};
/// let board = Board::standard();
/// assert!(is_valid_move(&board, Square::E2, Square::E4));
/// assert!(is_valid_move(&board, Square::G1, Square::F3));
/// assert!(!is_valid_move(&board, Square::F1, Square::C4)); // blocked by the e2 pawn
/// assert!(!is_valid_move(&board, Square::E4, Square::E5)); // nothing there
/// ```
pub fn is_valid_move(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };

    if from == to {
        return false;
    }

    // Can't capture your own pieces
    if board.color_at(to) == Some(piece.color()) {
        return false;
    }

    match piece.kind() {
        PieceKind::Pawn => is_valid_pawn_move(board, piece.color(), from, to),
        PieceKind::Knight => is_valid_knight_move(from, to),
        PieceKind::Bishop => is_valid_bishop_move(board, from, to),
        PieceKind::Rook => is_valid_rook_move(board, from, to),
        PieceKind::Queen => is_valid_queen_move(board, from, to),
        PieceKind::King => is_valid_king_move(from, to),
    }
}

fn is_valid_pawn_move(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let direction = color.forward();
    let (dr, dc) = from.delta_to(to);

    // Forward move
    if dc == 0 && dr == direction {
        return !board.has(to);
    }

    // Double move from the home row. The square in between is not inspected.
    if dc == 0 && dr == 2 * direction && from.row() == pawn_home_row(color) {
        return !board.has(to);
    }

    // Capture diagonally
    dc.abs() == 1 && dr == direction && board.has(to)
}

const fn pawn_home_row(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

fn is_valid_knight_move(from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2))
}

fn is_valid_bishop_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);

    // Must move diagonally
    if dr.abs() != dc.abs() {
        return false;
    }

    is_path_clear(board, from, to)
}

fn is_valid_rook_move(board: &Board, from: Square, to: Square) -> bool {
    // Must move horizontally or vertically
    if from.row() != to.row() && from.col() != to.col() {
        return false;
    }

    is_path_clear(board, from, to)
}

fn is_valid_queen_move(board: &Board, from: Square, to: Square) -> bool {
    is_valid_rook_move(board, from, to) || is_valid_bishop_move(board, from, to)
}

fn is_valid_king_move(from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    dr.abs() <= 1 && dc.abs() <= 1
}

fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    ray_between_exclusive(from, to).all(|square| !board.has(square))
}

/// The squares strictly between `from` and `to`, walking from `from`.
///
/// If the two squares do not share a row, column, or diagonal, the ray is empty.
///
/// # Example
/// ```
/// # use rookie::{ray_between_exclusive, Square};
/// let ray: Vec<_> = ray_between_exclusive(Square::A1, Square::D4).collect();
/// assert_eq!(ray, [Square::B2, Square::C3]);
/// assert_eq!(ray_between_exclusive(Square::A1, Square::B3).count(), 0);
/// assert_eq!(ray_between_exclusive(Square::E1, Square::E2).count(), 0);
/// ```
pub fn ray_between_exclusive(from: Square, to: Square) -> impl Iterator<Item = Square> {
    let (dr, dc) = from.delta_to(to);
    let aligned = dr == 0 || dc == 0 || dr.abs() == dc.abs();
    let steps = if aligned { dr.abs().max(dc.abs()) } else { 0 };
    let (step_r, step_c) = (dr.signum(), dc.signum());

    (1..steps).filter_map(move |i| from.offset(step_r * i, step_c * i))
}

/// Returns `true` if the piece on `from` attacks `target`.
///
/// Attack geometry is movement geometry, except that pawns only ever attack the
/// two squares diagonally in front of them. The contents of `target` are ignored.
///
/// # Example
/// ```
/// # use rookie::{attacks, Board, Square};
/// let board = Board::standard();
/// assert!(attacks(&board, Square::E2, Square::D3));
/// assert!(!attacks(&board, Square::E2, Square::E3));
/// assert!(attacks(&board, Square::B1, Square::C3));
/// ```
pub fn attacks(board: &Board, from: Square, target: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };

    if from == target {
        return false;
    }

    match piece.kind() {
        PieceKind::Pawn => {
            let (dr, dc) = from.delta_to(target);
            dr == piece.color().forward() && dc.abs() == 1
        }
        PieceKind::Knight => is_valid_knight_move(from, target),
        PieceKind::Bishop => is_valid_bishop_move(board, from, target),
        PieceKind::Rook => is_valid_rook_move(board, from, target),
        PieceKind::Queen => is_valid_queen_move(board, from, target),
        PieceKind::King => is_valid_king_move(from, target),
    }
}

/// Squares of every living piece of color `by` that attacks `square`.
///
/// # Example
/// ```
/// # use rookie::{attackers, Board, Color, Square};
/// let board = Board::standard();
/// let defenders = attackers(&board, Square::F3, Color::White);
/// assert_eq!(defenders.as_slice(), [Square::E2, Square::G2, Square::G1]);
/// ```
pub fn attackers(board: &Board, square: Square, by: Color) -> AttackerList {
    board
        .pieces(by)
        .map(|(_, from)| from)
        .filter(|from| attacks(board, *from, square))
        .collect()
}

/// Returns `true` if any living piece of color `by` attacks `square`.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board.pieces(by).any(|(_, from)| attacks(board, from, square))
}

/// Returns `true` if `color`'s king is attacked by any opposing piece, the opposing king included.
///
/// A side without a king on the board is never in check.
///
/// # Example
/// ```
/// # use rookie::{is_in_check, Board, Color};
/// let board = Board::from_fen("4k3/8/8/8/8/8/8/4R1K1").unwrap();
/// assert!(is_in_check(&board, Color::Black));
/// assert!(!is_in_check(&board, Color::White));
/// ```
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king(color) {
        Some(king) => is_attacked(board, king, color.opponent()),
        None => false,
    }
}

/// Returns `true` if `color` is in check and no single step of its king escapes it.
///
/// Only king steps are tried. Blocking the check or capturing the checker with
/// another piece is not considered, so some positions are reported as mate even
/// though an escape exists. `board` itself is never modified.
///
/// # Example
/// ```
/// # use rookie::{is_checkmate, Board, Color};
/// let back_rank = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1").unwrap();
/// assert!(is_checkmate(&back_rank, Color::Black));
///
/// let escapable = Board::from_fen("R5k1/5pp1/8/8/8/8/8/6K1").unwrap();
/// assert!(!is_checkmate(&escapable, Color::Black));
/// ```
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    if !is_in_check(board, color) {
        return false;
    }

    let Some(king) = board.king(color) else {
        return false;
    };

    for (dr, dc) in KING_DELTAS {
        let Some(to) = king.offset(dr, dc) else {
            continue;
        };

        if !is_valid_move(board, king, to) {
            continue;
        }

        let after = board.with_move_made(Move::new(king, to));
        if !is_in_check(&after, color) {
            trace!("{color} king escapes check via {king}{to}");
            return false;
        }
    }

    true
}

/// Every move for `color` that obeys movement geometry and does not leave its own king in check.
///
/// # Example
/// ```
/// # use rookie::{legal_moves_for, Board, Color};
/// // 16 pawn moves and 4 knight moves.
/// assert_eq!(legal_moves_for(&Board::standard(), Color::White).len(), 20);
/// ```
pub fn legal_moves_for(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();

    for (_, from) in board.pieces(color) {
        for to in Square::iter() {
            if !is_valid_move(board, from, to) {
                continue;
            }

            let mv = Move::new(from, to);
            if !is_in_check(&board.with_move_made(mv), color) {
                moves.push(mv);
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn pawn_double_step_only_from_home_row() {
        let board = board("8/8/8/8/8/4P3/3P4/8");
        assert!(is_valid_move(&board, Square::D2, Square::D4));
        assert!(!is_valid_move(&board, Square::E3, Square::E5));
    }

    #[test]
    fn pawn_double_step_ignores_the_square_in_between() {
        let board = board("8/8/8/8/8/4n3/4P3/8");
        assert!(!is_valid_move(&board, Square::E2, Square::E3));
        assert!(is_valid_move(&board, Square::E2, Square::E4));
    }

    #[test]
    fn pawns_capture_diagonally_forward_only() {
        let board = board("8/8/8/3p1p2/4P3/3p1p2/8/8");
        assert!(is_valid_move(&board, Square::E4, Square::D5));
        assert!(is_valid_move(&board, Square::E4, Square::F5));
        assert!(!is_valid_move(&board, Square::E4, Square::D3));
        assert!(!is_valid_move(&board, Square::E4, Square::F3));
    }

    #[test]
    fn pawns_never_capture_straight_ahead() {
        let board = board("8/8/8/4p3/4P3/8/8/8");
        assert!(!is_valid_move(&board, Square::E4, Square::E5));
        assert!(!is_valid_move(&board, Square::E5, Square::E4));
    }

    #[test]
    fn black_pawns_move_down_the_board() {
        let board = board("8/3p4/8/8/8/8/8/8");
        assert!(is_valid_move(&board, Square::D7, Square::D6));
        assert!(is_valid_move(&board, Square::D7, Square::D5));
        assert!(!is_valid_move(&board, Square::D7, Square::D8));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = board("8/8/8/3p4/8/8/8/R2B3Q");
        assert!(is_valid_move(&board, Square::A1, Square::C1));
        assert!(!is_valid_move(&board, Square::A1, Square::E1));
        assert!(!is_valid_move(&board, Square::H1, Square::A1));
        assert!(is_valid_move(&board, Square::H1, Square::E4));
        assert!(is_valid_move(&board, Square::D1, Square::H5));
    }

    #[test]
    fn queen_moves_like_rook_or_bishop_only() {
        let board = board("8/8/8/8/3Q4/8/8/8");
        assert!(is_valid_move(&board, Square::D4, Square::D8));
        assert!(is_valid_move(&board, Square::D4, Square::A7));
        assert!(!is_valid_move(&board, Square::D4, Square::E6));
    }

    #[test]
    fn knights_jump() {
        let board = Board::standard();
        assert!(is_valid_move(&board, Square::B1, Square::A3));
        assert!(!is_valid_move(&board, Square::B1, Square::D2));
        assert!(!is_valid_move(&board, Square::B1, Square::B3));
    }

    #[test]
    fn king_steps_one_square() {
        let board = board("8/8/8/8/4K3/8/8/8");
        for to in Square::iter() {
            let (dr, dc) = Square::E4.delta_to(to);
            let expected = to != Square::E4 && dr.abs() <= 1 && dc.abs() <= 1;
            assert_eq!(is_valid_move(&board, Square::E4, to), expected, "{to}");
        }
    }

    #[test]
    fn cannot_capture_own_piece() {
        let board = Board::standard();
        assert!(!is_valid_move(&board, Square::A1, Square::A2));
        assert!(!is_valid_move(&board, Square::D1, Square::E1));
    }

    #[test]
    fn every_attacker_is_considered() {
        // The knight cannot reach the king; the rook can.
        let board = board("4k3/8/8/8/8/8/1N6/4R1K1");
        assert!(is_in_check(&board, Color::Black));
        assert_eq!(attackers(&board, Square::E8, Color::White).as_slice(), [Square::E1]);
    }

    #[test]
    fn black_pawns_attack_downward() {
        let in_front = board("8/8/8/8/8/3p4/4K3/8");
        assert!(is_in_check(&in_front, Color::White));

        let behind = board("8/8/8/8/8/8/4K3/3p4");
        assert!(!is_in_check(&behind, Color::White));
    }

    #[test]
    fn adjacent_kings_give_check() {
        let board = board("8/8/8/3k4/4K3/8/8/8");
        assert!(is_in_check(&board, Color::White));
        assert!(is_in_check(&board, Color::Black));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let board = board("8/8/8/8/8/8/8/R7");
        assert!(!is_in_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn checkmate_only_tries_king_steps() {
        // The rook on a1 could capture the checker, but only king steps are tried.
        let board = board("6k1/8/8/8/8/8/5PPP/R3r1K1");
        assert!(is_in_check(&board, Color::White));
        assert!(is_valid_move(&board, Square::A1, Square::E1));
        assert!(is_checkmate(&board, Color::White));
    }

    #[test]
    fn checkmate_does_not_touch_the_board() {
        let board = board("R5k1/5ppp/8/8/8/8/8/6K1");
        let before = board;
        assert!(is_checkmate(&board, Color::Black));
        assert_eq!(board, before);
    }
}

use rookie::{is_valid_move, ray_between_exclusive, Board, Color, PieceId, PieceKind, Square};

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

#[test]
fn setup_places_every_piece_on_its_home_square() {
    let board = Board::standard();

    for color in Color::iter() {
        for (kind, expected) in [
            (PieceKind::Pawn, 8),
            (PieceKind::Rook, 2),
            (PieceKind::Knight, 2),
            (PieceKind::Bishop, 2),
            (PieceKind::Queen, 1),
            (PieceKind::King, 1),
        ] {
            let count = board
                .pieces(color)
                .filter(|(id, _)| id.kind() == kind)
                .count();
            assert_eq!(count, expected, "{color} {kind}");
        }
    }

    for id in PieceId::iter() {
        let square = board.location(id).unwrap();
        assert_eq!(square, id.home());
        assert_eq!(board.id_at(square), Some(id));
    }

    // 32 occupied squares for 32 pieces means none are shared.
    assert_eq!(board.iter().count(), PieceId::COUNT);
    assert_eq!(board.king(Color::White), Some(Square::E1));
    assert_eq!(board.king(Color::Black), Some(Square::E8));
}

#[test]
fn setup_ranks_hold_the_right_colors() {
    let board = Board::standard();
    for square in Square::iter() {
        let expected = match square.row() {
            0 | 1 => Some(Color::White),
            6 | 7 => Some(Color::Black),
            _ => None,
        };
        assert_eq!(board.color_at(square), expected, "{square}");
    }
}

#[test]
fn no_piece_may_stay_put() {
    let board = Board::standard();
    for (square, id) in board.iter() {
        assert!(!is_valid_move(&board, square, square), "{id} on {square}");
    }

    // The same holds for every kind standing in open space.
    for fen in [
        "8/8/8/3P4/8/8/8/8",
        "8/8/8/3n4/8/8/8/8",
        "8/8/8/3B4/8/8/8/8",
        "8/8/8/3r4/8/8/8/8",
        "8/8/8/3Q4/8/8/8/8",
        "8/8/8/3k4/8/8/8/8",
    ] {
        let board = self::board(fen);
        assert!(!is_valid_move(&board, Square::D5, Square::D5), "{fen}");
    }
}

#[test]
fn empty_squares_never_move() {
    let board = Board::standard();
    for from in Square::iter().filter(|sq| !board.has(*sq)) {
        for to in Square::iter() {
            assert!(!is_valid_move(&board, from, to), "{from}{to}");
        }
    }
}

#[test]
fn off_board_coordinates_are_never_squares() {
    for (row, col) in [(-1, 0), (0, -1), (8, 0), (0, 8), (8, 8), (-1, -1), (i8::MAX, 3)] {
        assert_eq!(Square::from_coords(row, col), None, "({row}, {col})");
    }

    for square in [Square::A1, Square::H1, Square::A8, Square::H8] {
        let off_board = [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter(|(dr, dc)| square.offset(*dr, *dc).is_none())
            .count();
        assert_eq!(off_board, 2, "{square}");
    }
}

#[test]
fn sliders_are_blocked_by_any_piece_in_between() {
    let lines = [
        (PieceKind::Rook, 'R', Square::A1, Square::A8),
        (PieceKind::Rook, 'r', Square::H8, Square::A8),
        (PieceKind::Bishop, 'B', Square::A1, Square::H8),
        (PieceKind::Bishop, 'b', Square::H1, Square::A8),
        (PieceKind::Queen, 'Q', Square::A8, Square::H1),
        (PieceKind::Queen, 'q', Square::D1, Square::D8),
    ];

    for (kind, symbol, from, to) in lines {
        let mut open = Board::empty();
        let color = Color::from_case(symbol);
        open.place(PieceId::new(color, kind, 1).unwrap(), from);
        assert!(is_valid_move(&open, from, to), "{kind} {from}{to} on an open board");

        for blocker_square in ray_between_exclusive(from, to) {
            for blocker_color in Color::iter() {
                let mut blocked = open;
                let blocker = PieceId::new(blocker_color, PieceKind::Pawn, 1).unwrap();
                blocked.place(blocker, blocker_square);
                assert!(
                    !is_valid_move(&blocked, from, to),
                    "{kind} {from}{to} should be blocked by a {blocker_color} piece on {blocker_square}"
                );
            }
        }
    }
}

#[test]
fn knights_jump_over_everything() {
    let board = board("8/8/8/2ppp3/2pNp3/2ppp3/8/8");
    let reachable = Square::iter()
        .filter(|to| is_valid_move(&board, Square::D4, *to))
        .count();
    assert_eq!(reachable, 8);
}

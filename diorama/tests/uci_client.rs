use std::{io::Cursor, time::Duration};

use diorama::{decode_engine_move, UciClient, UciSearchOptions};

fn client(script: &str) -> UciClient<Vec<u8>, Cursor<Vec<u8>>> {
    UciClient::new(Vec::new(), Cursor::new(script.as_bytes().to_vec()))
}

fn sent(client: &UciClient<Vec<u8>, Cursor<Vec<u8>>>) -> Vec<String> {
    String::from_utf8_lossy(client.writer())
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn handshake_then_best_move() {
    let mut engine = client(
        "id name Fairy 1.0\n\
         id author Someone\n\
         option name Minimal Reporting type spin default 0 min 0 max 10\n\
         uciok\n\
         readyok\n\
         info depth 1 score cp 12\n\
         info depth 2 score cp 8 pv e7e5\n\
         bestmove e7e5 ponder g1f3\n",
    );

    engine
        .handshake(&[("Minimal Reporting".to_string(), "5".to_string())])
        .unwrap();
    assert_eq!(engine.name(), Some("Fairy 1.0"));

    let search = UciSearchOptions {
        search_moves: vec!["e7e5".into(), "d7d5".into()],
        move_time: Some(Duration::from_millis(1000)),
        ..Default::default()
    };
    let reply = engine.best_move("e2e4", &search).unwrap();
    assert_eq!(reply, "e7e5");
    assert_eq!(decode_engine_move(&reply).unwrap().to_uci(), "e7e5");

    assert_eq!(
        sent(&engine),
        [
            "uci",
            "setoption name Minimal Reporting value 5",
            "isready",
            "ucinewgame",
            "position startpos moves e2e4",
            "go movetime 1000 searchmoves e7e5 d7d5",
        ]
    );
}

#[test]
fn first_move_sends_bare_startpos() {
    let mut engine = client("bestmove e2e4\n");
    engine
        .best_move("", &UciSearchOptions::default())
        .unwrap();
    assert_eq!(sent(&engine), ["position startpos", "go"]);
}

#[test]
fn engine_closing_its_output_is_an_error() {
    let mut engine = client("uciok\n");
    assert!(engine.handshake(&[]).is_err());

    let mut engine = client("info depth 1\n");
    assert!(engine
        .best_move("e2e4", &UciSearchOptions::default())
        .is_err());
}

#[test]
fn bestmove_without_a_move_is_an_error() {
    let mut engine = client("bestmove\n");
    assert!(engine
        .best_move("e2e4", &UciSearchOptions::default())
        .is_err());
}

#[test]
fn quit_without_a_process() {
    let engine = client("");
    engine.quit().unwrap();
}

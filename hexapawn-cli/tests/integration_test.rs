//! Integration tests for Hexapawn
//!
//! Tests the full stack: board rules, state enumeration, players and the
//! game controller

use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use std::rc::Rc;

use hexapawn_core::{
    board::{Board, Move, Position, Side},
    check_winner, create_strategy, AgentPlayer, Game, GameConfig, GameOutcome, HistoryEntry,
    HumanPlayer, PlayerConfig, StateTable, Strategy, StrategyError, StrategyKind, Termination,
    WinReason,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn mv(fr: i8, fc: i8, tr: i8, tc: i8) -> Move {
    Move::new(Position::new(fr, fc), Position::new(tr, tc))
}

/// Every board reachable from the 3x3 start, with the side to move
fn reachable_boards() -> Vec<(Board, Side)> {
    let table = StateTable::from_start(3).unwrap();
    table
        .entries()
        .iter()
        .map(|e| (Board::deserialize(&e.board, 3).unwrap(), e.to_move))
        .collect()
}

fn human(name: &str, script: &str) -> Box<HumanPlayer<Cursor<Vec<u8>>, Vec<u8>>> {
    Box::new(HumanPlayer::with_io(
        name,
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    ))
}

fn agent(name: &str, kind: StrategyKind, seed: u64) -> Box<AgentPlayer> {
    Box::new(AgentPlayer::new(name, create_strategy(kind, Some(seed))))
}

/// Stand-in for an external learner: plays first-legal and records reports
#[derive(Default)]
struct Recorder {
    reports: Rc<RefCell<Vec<(Vec<HistoryEntry>, Side, Side)>>>,
}

impl Strategy for Recorder {
    fn select_move(&mut self, board: &Board, side: Side) -> Result<Move, StrategyError> {
        board
            .get_legal_moves(side)
            .first()
            .copied()
            .ok_or(StrategyError::NoLegalMoves)
    }

    fn game_report(&mut self, history: &[HistoryEntry], side: Side, winner: Side) {
        self.reports.borrow_mut().push((history.to_vec(), side, winner));
    }
}

// ============================================================================
// BOARD PROPERTY TESTS
// ============================================================================

#[test]
fn test_legal_moves_stay_on_board() {
    for (board, _) in reachable_boards() {
        for side in Side::BOTH {
            for m in board.get_legal_moves(side) {
                assert!(board.is_valid_position(m.to), "{} on {}", m, board.serialize());
                assert!(board.is_valid_position(m.from));
            }
        }
    }
}

#[test]
fn test_forward_empty_and_diagonal_captures() {
    for (board, _) in reachable_boards() {
        for side in Side::BOTH {
            for m in board.get_legal_moves(side) {
                assert_eq!(board.get_piece(m.from), Some(side));
                assert_eq!(m.to.row - m.from.row, side.forward());

                let target = board.get_piece(m.to);
                if m.to.col == m.from.col {
                    assert_eq!(target, None, "forward into occupied square");
                } else {
                    assert_eq!((m.to.col - m.from.col).abs(), 1);
                    assert_eq!(target, Some(side.opponent()), "diagonal without capture");
                }
            }
        }
    }
}

#[test]
fn test_serialization_roundtrip_on_reachable_boards() {
    for (board, _) in reachable_boards() {
        let restored = Board::deserialize(&board.serialize(), board.size()).unwrap();
        assert_eq!(restored, board);
    }
}

#[test]
fn test_copy_independence_on_reachable_boards() {
    for (board, side) in reachable_boards() {
        let original = board.serialize();
        for m in board.get_legal_moves(side) {
            let mut copy = board.clone();
            copy.move_piece(m.from, m.to);
            assert_ne!(copy.serialize(), original);
            assert_eq!(board.serialize(), original);
        }
    }
}

#[test]
fn test_documented_board_examples() {
    let board = Board::deserialize("222000111", 3).unwrap();
    let from_corner: Vec<Move> = board
        .get_legal_moves(Side::One)
        .into_iter()
        .filter(|m| m.from == Position::new(2, 0))
        .collect();
    assert_eq!(from_corner, vec![mv(2, 0, 1, 0)]);

    let mut board = Board::default();
    board.move_piece(Position::new(2, 1), Position::new(1, 1));
    assert_eq!(board.serialize(), "222010101");
}

#[test]
fn test_winner_detection_matches_rules() {
    for (board, side) in reachable_boards() {
        for m in board.get_legal_moves(side) {
            let mut next = board.clone();
            next.move_piece(m.from, m.to);

            let promoted = m.to.row == side.opponent().home_row(3);
            let stuck = next.get_legal_moves(side.opponent()).is_empty();
            let expected = if promoted {
                Some(WinReason::Promotion)
            } else if stuck {
                Some(WinReason::NoLegalMoves)
            } else {
                None
            };
            assert_eq!(check_winner(&next, side), expected);
        }
    }
}

// ============================================================================
// GAME CONTROLLER TESTS
// ============================================================================

#[test]
fn test_human_game_to_promotion() {
    // Player one pushes the centre, player two advances, player one captures
    // into the back rank. Garbage and an illegal move are absorbed on the way.
    let one = human("ann", "2,1,1,1\nnonsense\n1,1,1,1\n1,1,0,0\n");
    let two = human("bob", "0,2,1,2\n");

    let mut game = Game::new(one, two);
    let outcome = game.play();

    assert_eq!(
        outcome,
        GameOutcome::Won {
            winner: Side::One,
            reason: WinReason::Promotion
        }
    );
    let boards: Vec<&str> = game.history().iter().map(|h| h.board.as_str()).collect();
    assert_eq!(boards, vec!["222000111", "222010101", "220012101"]);
    assert_eq!(game.history()[2].mv, mv(1, 1, 0, 0));
}

#[test]
fn test_human_quit_ends_session() {
    let mut game = Game::new(human("ann", "2,0,1,0\n"), human("bob", "q\n"));
    assert_eq!(
        game.play(),
        GameOutcome::Terminated {
            side: Side::Two,
            reason: Termination::Quit
        }
    );
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.winner(), None);
}

#[test]
fn test_agent_games_always_finish_with_valid_history() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let kinds = StrategyKind::ALL;

    for _ in 0..50 {
        let k1 = kinds[rng.gen_range(0..kinds.len())];
        let k2 = kinds[rng.gen_range(0..kinds.len())];
        let mut game = Game::new(agent("a", k1, rng.gen()), agent("b", k2, rng.gen()));

        let outcome = game.play();
        let winner = outcome.winner().expect("agent games always produce a winner");

        // Replay the history and check every move was legal for the side to move
        let mut board = Board::default();
        let mut side = Side::One;
        for entry in game.history() {
            assert_eq!(entry.board, board.serialize());
            assert!(board.get_legal_moves(side).contains(&entry.mv));
            board.move_piece(entry.mv.from, entry.mv.to);
            side = side.opponent();
        }
        assert_eq!(&board, game.board());
        assert!(check_winner(&board, side.opponent()).is_some());
        assert_eq!(winner, side.opponent());
    }
}

#[test]
fn test_seeded_games_are_reproducible() {
    let play = |seed| {
        let mut game = Game::new(
            agent("a", StrategyKind::Random, seed),
            agent("b", StrategyKind::Random, seed + 1),
        );
        game.play();
        game.history().to_vec()
    };
    assert_eq!(play(7), play(7));
}

#[test]
fn test_game_report_reaches_learner() {
    let learner = Recorder::default();
    let reports = learner.reports.clone();

    let mut game = Game::new(
        Box::new(AgentPlayer::new("learner", Box::new(learner))),
        agent("greedy", StrategyKind::Greedy, 1),
    );
    let outcome = game.play();
    let winner = outcome.winner().unwrap();

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    let (history, side, reported_winner) = &reports[0];
    assert_eq!(history.as_slice(), game.history());
    assert_eq!(*side, Side::One);
    assert_eq!(*reported_winner, winner);
}

#[test]
fn test_config_driven_game() {
    let config = GameConfig {
        board_size: 4,
        players: [
            PlayerConfig::agent("first", StrategyKind::First, None),
            PlayerConfig::agent("greedy", StrategyKind::Greedy, Some(3)),
        ],
        ..GameConfig::default()
    };
    let mut game = config.build_game().unwrap();
    assert_eq!(game.board().serialize(), "2222000000001111");
    assert!(game.play().winner().is_some());
}

// ============================================================================
// STATE TABLE TESTS
// ============================================================================

#[test]
fn test_state_table_covers_played_positions() {
    let table = StateTable::from_start(3).unwrap();

    for seed in 0..20 {
        let mut game = Game::new(
            agent("a", StrategyKind::Random, seed),
            agent("b", StrategyKind::Random, seed + 100),
        );
        game.play();

        let mut side = Side::One;
        for entry in game.history() {
            let moves = table
                .get(&entry.board, side)
                .unwrap_or_else(|| panic!("{} missing from table", entry.board));
            assert!(moves.contains(&entry.mv));
            side = side.opponent();
        }
    }
}

#[test]
fn test_state_table_json_export() {
    let table = StateTable::from_start(3).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["size"], 3);
    assert_eq!(value["entries"].as_array().unwrap().len(), table.len());
    assert_eq!(value["entries"][0]["board"], "222000111");
}

// ============================================================================
// CLI TESTS
// ============================================================================

/// Run the binary with `stdin` piped in; returns (stdout, stderr)
fn run_cli(args: &[&str], stdin: &str) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hexapawn"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[test]
fn test_json_play_with_human_keeps_stdout_parseable() {
    // Human pushes the left pawn, first-legal answers (0,1) -> (1,1), human quits
    let (stdout, stderr) = run_cli(
        &["play", "--json", "--player2", "first", "--seed", "1"],
        "2,0,1,0\nq\n",
    );

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["outcome"]["result"], "terminated");
    assert_eq!(value["outcome"]["side"], "one");
    assert_eq!(value["outcome"]["reason"], "quit");
    assert_eq!(value["history"].as_array().unwrap().len(), 2);
    assert_eq!(value["history"][1]["board"], "222100011");

    assert!(stderr.contains("Enter your move: "));
    assert!(stderr.contains("Moved Computer's piece from (0, 1) to (1, 1)"));
}

#[test]
fn test_text_play_prompts_on_stdout() {
    let (stdout, _) = run_cli(&["play", "--player2", "first"], "q\n");
    assert!(stdout.contains("Enter your move: "));
    assert!(stdout.contains("quit. Quitting..."));
}

//! Integration tests for the whole pipeline: keys, session, board, planner, scheduler

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tui_match3::core::Board;
use tui_match3::engine::{AnimationScheduler, ManualClock, Planner};
use tui_match3::input::{map_key, should_quit, Command, Cursor, Direction};
use tui_match3::session::{Session, SessionConfig};
use tui_match3::term::resting_states;
use tui_match3::types::{Cue, GameMode, PhaseKind, RenderState, TICK_MS};

type TestSession = Session<ManualClock, Vec<Cue>>;

fn free_session_with_swap() -> (TestSession, ManualClock, usize) {
    for seed in 1..500 {
        let clock = ManualClock::new(0);
        let config = SessionConfig {
            columns: 8,
            seed,
            mode: GameMode::Free,
            ..SessionConfig::default()
        };
        let session = Session::new(config, clock.clone(), Vec::new()).unwrap();
        if let Some(i) = (0..7).find(|&i| session.board().clone().attempt_swap(i, i + 1)) {
            return (session, clock, i);
        }
    }
    panic!("no seed produced a board with a kept swap");
}

/// Same dispatch the binary does for one key.
fn press(session: &mut TestSession, cursor: &mut Cursor, key: KeyEvent) {
    match map_key(key) {
        Some(Command::CursorLeft) => cursor.step(Direction::Left),
        Some(Command::CursorRight) => cursor.step(Direction::Right),
        Some(Command::Tap) => session.handle_tap(cursor.index()),
        Some(Command::SwapRight) => {
            if let Some(other) = cursor.neighbour(Direction::Right) {
                session.perform_swap(cursor.index(), other);
                cursor.set(other);
            }
        }
        Some(Command::SwapLeft) => {
            if let Some(other) = cursor.neighbour(Direction::Left) {
                session.perform_swap(cursor.index(), other);
                cursor.set(other);
            }
        }
        Some(Command::StartRound) => session.start_round(),
        Some(Command::Restart) => session.configure(session.mode()).unwrap(),
        None => {}
    }
}

#[test]
fn test_keyboard_tap_tap_swaps() {
    let (mut session, _clock, i) = free_session_with_swap();
    let mut cursor = Cursor::new(session.columns());

    for _ in 0..i {
        press(&mut session, &mut cursor, KeyEvent::from(KeyCode::Right));
    }
    assert_eq!(cursor.index(), i);
    press(&mut session, &mut cursor, KeyEvent::from(KeyCode::Char(' ')));
    assert_eq!(session.selected(), Some(i));

    press(&mut session, &mut cursor, KeyEvent::from(KeyCode::Char('l')));
    press(&mut session, &mut cursor, KeyEvent::from(KeyCode::Enter));
    assert_eq!(session.selected(), None);
    assert!(session.score() > 0);
    assert!(session.is_animating());
}

#[test]
fn test_shift_arrow_swaps_and_follows_the_tile() {
    let (mut session, _clock, i) = free_session_with_swap();
    let mut cursor = Cursor::new(session.columns());
    cursor.set(i);

    press(
        &mut session,
        &mut cursor,
        KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT),
    );
    assert_eq!(cursor.index(), i + 1);
    assert!(session.score() > 0);
}

#[test]
fn test_restart_and_quit_keys() {
    let (mut session, _clock, i) = free_session_with_swap();
    let mut cursor = Cursor::new(session.columns());
    session.perform_swap(i, i + 1);
    let played = session.tiles();

    press(&mut session, &mut cursor, KeyEvent::from(KeyCode::Char('r')));
    assert_eq!(session.score(), 0);
    assert_ne!(session.tiles(), played);
    assert!(!session.is_animating());

    assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
    assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
}

#[test]
fn test_many_swaps_settle_on_the_board_row() {
    let mut board = Board::new(12, 2024);
    let planner = Planner::default();
    let clock = ManualClock::new(0);
    let mut scheduler = AnimationScheduler::new(clock.clone(), Vec::<Cue>::new());
    let mut resting: Vec<RenderState> = Vec::new();
    let mut played = 0;

    for _ in 0..40 {
        let Some(i) = (0..11).find(|&i| board.clone().attempt_swap(i, i + 1)) else {
            break;
        };
        let before = board.tiles();
        let score_before = board.score();
        assert!(board.attempt_swap(i, i + 1));
        assert!(board.score() > score_before);

        let plan = planner.plan(&before, &board.tiles(), Some((i, i + 1)));
        assert_eq!(plan.first().map(|p| p.kind), Some(PhaseKind::Swap));

        scheduler.sink_mut().clear();
        scheduler.start(plan);
        let mut last = Vec::new();
        let mut ticks = 0;
        while scheduler.is_active() {
            let now = clock.advance(u64::from(TICK_MS));
            last = scheduler.tick(now).to_vec();
            ticks += 1;
            assert!(ticks < 1_000, "animation never settled");
        }

        last.sort_by(|a, b| a.position.total_cmp(&b.position));
        resting_states(&board.tiles(), &mut resting);
        assert_eq!(last, resting);
        assert_eq!(
            scheduler.sink().as_slice(),
            &[Cue::Move, Cue::Eliminate, Cue::Refill]
        );
        played += 1;
    }
    assert!(played > 0);
}

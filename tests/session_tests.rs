//! Session tests - rounds, events and the leaderboard working together

use std::cell::RefCell;
use std::rc::Rc;

use tui_match3::engine::{Clock, CueSink, ManualClock};
use tui_match3::session::{
    RecordScope, RecordStore, Session, SessionConfig, SessionEvent, SessionStatus,
};
use tui_match3::types::{Cue, GameMode};

type TestSession = Session<ManualClock, Vec<Cue>>;

fn kept_swap<C: Clock, S: CueSink>(session: &Session<C, S>) -> Option<usize> {
    (0..session.columns() - 1).find(|&i| session.board().clone().attempt_swap(i, i + 1))
}

/// A started session whose board has a kept swap, plus that swap's left index.
fn started(mode: GameMode) -> (TestSession, ManualClock, usize) {
    for seed in 1..500 {
        let clock = ManualClock::new(0);
        let config = SessionConfig {
            columns: 10,
            seed,
            mode,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, clock.clone(), Vec::new()).unwrap();
        session.start_round();
        if let Some(i) = kept_swap(&session) {
            return (session, clock, i);
        }
    }
    panic!("no seed produced a board with a kept swap");
}

fn finished_events(session: &mut TestSession) -> Rc<RefCell<Vec<SessionStatus>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.subscribe(move |event| {
        if let SessionEvent::Finished(status) = event {
            sink.borrow_mut().push(*status);
        }
    });
    seen
}

#[test]
fn test_score_attack_round_lands_on_leaderboard() {
    let mode = GameMode::ScoreAttack { duration_ms: 60_000 };
    let (mut session, clock, i) = started(mode);
    let finished = finished_events(&mut session);

    clock.set(1_000);
    assert!(session.perform_swap(i, i + 1));
    let score = session.score();
    assert!(score >= 30);

    clock.set(60_000);
    session.tick(60_000);
    let finished = finished.borrow();
    assert_eq!(finished.len(), 1);
    let status = finished[0];
    assert!(status.finished && !status.running);
    assert_eq!(status.score, score);
    assert_eq!(status.remaining_ms, Some(0));

    let mut records = RecordStore::in_memory();
    let record = records.record_round(&status).unwrap();
    assert_eq!(record.duration_minutes, Some(1));
    assert_eq!(records.records(RecordScope::ScoreAttack { minutes: 1 }), &[record]);
}

#[test]
fn test_finished_round_rejects_input_until_restarted() {
    let (mut session, clock, i) = started(GameMode::ScoreAttack { duration_ms: 5_000 });
    clock.set(5_000);
    session.tick(5_000);
    assert!(session.status(5_000).finished);

    let before = session.tiles();
    assert!(!session.perform_swap(i, i + 1));
    session.handle_tap(0);
    assert_eq!(session.selected(), None);
    assert!(!session.lock(0));
    assert_eq!(session.tiles(), before);

    session.start_round();
    let status = session.status(5_000);
    assert!(status.running && !status.finished);
    assert_eq!(status.score, 0);
}

#[test]
fn test_speed_run_finishes_on_the_winning_swap() {
    let (mut session, clock, i) = started(GameMode::SpeedRun { target_score: 10 });
    let finished = finished_events(&mut session);

    clock.set(4_321);
    assert!(session.perform_swap(i, i + 1));
    let status = finished.borrow()[0];
    assert_eq!(status.elapsed_ms, 4_321);
    assert_eq!(status.target_score, Some(10));

    let mut records = RecordStore::in_memory();
    records.record_round(&status).unwrap();
    let scope = RecordScope::SpeedRun { target: 10 };
    assert_eq!(scope.id(), "speed_run_10");
    assert_eq!(records.records(scope)[0].elapsed_ms, 4_321);
}

#[test]
fn test_tapping_neighbours_swaps_and_cues() {
    let (mut session, _clock, i) = started(GameMode::Free);
    session.handle_tap(i);
    assert!(session.is_selected(i));
    session.handle_tap(i + 1);

    assert_eq!(session.selected(), None);
    assert!(session.score() > 0);
    assert!(session.is_animating());
    assert_eq!(session.scheduler().sink().first(), Some(&Cue::Move));
}

#[test]
fn test_records_survive_a_reload() {
    let path = std::env::temp_dir().join(format!("tui-match3-session-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut store = RecordStore::load(&path).unwrap();
    assert!(store.records(RecordScope::SpeedRun { target: 300 }).is_empty());
    store.add_speed_run(310, 42_000, 300).unwrap();
    store.add_speed_run(300, 41_000, 300).unwrap();
    store.save().unwrap();

    let reloaded = RecordStore::load(&path).unwrap();
    let times: Vec<u64> = reloaded
        .records(RecordScope::SpeedRun { target: 300 })
        .iter()
        .map(|r| r.elapsed_ms)
        .collect();
    assert_eq!(times, vec![41_000, 42_000]);
    let _ = std::fs::remove_file(&path);
}

//! Board view tests - frames rendered from a live session

use tui_match3::engine::{Clock, ManualClock};
use tui_match3::session::{Session, SessionConfig};
use tui_match3::term::{
    resting_states, AnchorY, BoardFrame, BoardView, FrameBuffer, TerminalRenderer, Viewport,
};
use tui_match3::types::{Cue, GameMode, RenderState};

const VIEW: Viewport = Viewport {
    width: 60,
    height: 9,
};

/// Left edge of a 6-column row in `VIEW`: (60 - (6 * 3 + 2)) / 2.
const X0: u16 = 20;

fn session() -> (Session<ManualClock, Vec<Cue>>, ManualClock, usize) {
    for seed in 1..500 {
        let clock = ManualClock::new(0);
        let config = SessionConfig {
            columns: 6,
            seed,
            mode: GameMode::Free,
            ..SessionConfig::default()
        };
        let session = Session::new(config, clock.clone(), Vec::new()).unwrap();
        if let Some(i) = (0..5).find(|&i| session.board().clone().attempt_swap(i, i + 1)) {
            return (session, clock, i);
        }
    }
    panic!("no seed produced a board with a kept swap");
}

fn draw<C: Clock>(session: &Session<C, Vec<Cue>>, tiles: &[RenderState], now: u64) -> FrameBuffer {
    let frame = BoardFrame {
        columns: session.columns(),
        tiles,
        cursor: Some(0),
        selected: session.selected(),
        locked: session.locked(),
        status: session.status(now),
        phase: session.scheduler().current_phase().map(|p| p.kind),
        last_cue: session.scheduler().sink().last().copied(),
    };
    BoardView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&frame, VIEW)
}

fn row_cells(fb: &FrameBuffer) -> impl Iterator<Item = tui_match3::term::Cell> + '_ {
    (X0 + 1..X0 + 19).filter_map(|x| fb.get(x, 2))
}

/// Tick with late frames until the animation is over; returns the last time and frame.
fn settle(session: &mut Session<ManualClock, Vec<Cue>>, clock: &ManualClock) -> (u64, Vec<RenderState>) {
    let mut now = clock.now_ms();
    let mut frame = Vec::new();
    while session.is_animating() {
        now = clock.advance(10_000);
        frame = session.tick(now).to_vec();
    }
    (now, frame)
}

#[test]
fn test_resting_board_fills_the_row() {
    let (session, _clock, _) = session();
    let mut states = Vec::new();
    resting_states(&session.tiles(), &mut states);
    let fb = draw(&session, &states, 0);

    assert!(fb.row_text(0).trim_start().starts_with("SCORE 0   FREE PLAY"));
    assert_eq!(fb.row_text(2).trim(), format!("│{}│", "█".repeat(18)));
    assert!(row_cells(&fb).all(|c| !c.style.bold));
    assert_eq!(fb.get(X0 + 2, 4).map(|c| c.ch), Some('▲'));
}

#[test]
fn test_eliminate_phase_pops_tiles() {
    let (mut session, clock, i) = session();
    assert!(session.perform_swap(i, i + 1));
    assert!(session.locked().is_empty());

    let now = clock.advance(141);
    session.tick(now);
    let now = clock.advance(50);
    let states = session.tick(now).to_vec();
    let fb = draw(&session, &states, now);

    assert!(row_cells(&fb).any(|c| c.style.bold && c.ch == '█'));
    let info = fb.row_text(5);
    assert!(info.contains("eliminate"), "info line: {:?}", info);
    assert!(info.contains("CUE eliminate"), "info line: {:?}", info);
}

#[test]
fn test_settled_frame_matches_resting_board() {
    let (mut session, clock, i) = session();
    session.perform_swap(i, i + 1);
    let (now, settled) = settle(&mut session, &clock);

    let mut resting = Vec::new();
    resting_states(&session.tiles(), &mut resting);
    let mut by_position = settled.clone();
    by_position.sort_by(|a, b| a.position.total_cmp(&b.position));
    assert_eq!(by_position, resting);

    let animated = draw(&session, &settled, now);
    let still = draw(&session, &resting, now);
    assert_eq!(animated, still);
}

#[test]
fn test_renderer_sends_only_changes_after_a_swap() {
    let (mut session, clock, i) = session();
    let mut renderer = TerminalRenderer::with_writer(Vec::new());
    let mut states = Vec::new();

    resting_states(&session.tiles(), &mut states);
    let mut fb = draw(&session, &states, 0);
    renderer.draw_swap(&mut fb).unwrap();
    let full = renderer.writer().len();

    session.perform_swap(i, i + 1);
    let (now, _) = settle(&mut session, &clock);
    resting_states(&session.tiles(), &mut states);
    let mut fb = draw(&session, &states, now);
    renderer.draw_swap(&mut fb).unwrap();
    let diff = renderer.writer().len() - full;
    assert!(diff > 0 && diff < full, "diff {} vs full {}", diff, full);
}

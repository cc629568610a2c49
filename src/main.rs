//! Terminal match-3 runner (default binary).
//!
//! Interactive mode uses crossterm for input and the framebuffer renderer for
//! output; logs go to a file so the alternate screen stays clean.
//! `--headless <swaps>` plays the first kept swap repeatedly on a seeded board
//! and prints one JSON line per swap with the planned transition.

use std::cell::Cell;
use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tui_match3::core::Board;
use tui_match3::engine::{
    AnimationScheduler, Clock, CueSink, FnSink, ManualClock, Planner, SystemClock,
};
use tui_match3::input::{map_key, should_quit, Command, Cursor, Direction};
use tui_match3::session::{RecordStore, Session, SessionConfig, SessionEvent, SessionStatus};
use tui_match3::term::{
    resting_states, BoardFrame, BoardView, FrameBuffer, TerminalRenderer, Viewport,
};
use tui_match3::types::{Cue, GameMode, RenderState, DEFAULT_COLUMNS, TICK_MS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width in tiles
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,

    /// Seed for the first board
    #[arg(long, default_value_t = 1)]
    seed: u32,

    #[arg(long, value_enum, default_value_t = ModeArg::Free)]
    mode: ModeArg,

    /// Score attack duration
    #[arg(long, default_value_t = 1)]
    minutes: u64,

    /// Speed run target score
    #[arg(long, default_value_t = 300)]
    target: u32,

    /// Leaderboard file (JSON); records are kept in memory without it
    #[arg(long)]
    records: Option<PathBuf>,

    #[arg(long, default_value = "tui-match3.log")]
    log_file: PathBuf,

    /// Play this many swaps without a terminal and print plans as JSON lines
    #[arg(long, value_name = "SWAPS")]
    headless: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Free,
    ScoreAttack,
    SpeedRun,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let mode = match self.mode {
            ModeArg::Free => GameMode::Free,
            ModeArg::ScoreAttack => GameMode::ScoreAttack {
                duration_ms: self.minutes.saturating_mul(60_000),
            },
            ModeArg::SpeedRun => GameMode::SpeedRun {
                target_score: self.target,
            },
        };
        SessionConfig {
            columns: self.columns,
            seed: self.seed,
            mode,
            ..SessionConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.session_config();
    config.validate()?;
    info!(columns = config.columns, seed = config.seed, mode = config.mode.as_str(), "starting");

    if let Some(swaps) = args.headless {
        return run_headless(&config, swaps);
    }

    let records = match &args.records {
        Some(path) => RecordStore::load(path)?,
        None => RecordStore::in_memory(),
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, records);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if args.headless.is_some() {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        let file = File::create(&args.log_file)
            .with_context(|| format!("create log file {}", args.log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    };
    installed.map_err(|e| anyhow!("install log subscriber: {e}"))
}

fn run(term: &mut TerminalRenderer, config: SessionConfig, mut records: RecordStore) -> Result<()> {
    let last_cue = Rc::new(Cell::new(None::<Cue>));
    let cue_slot = Rc::clone(&last_cue);
    let sink = FnSink(move |cue: Cue| {
        debug!(cue = cue.as_str(), "cue");
        cue_slot.set(Some(cue));
    });

    let mut session = Session::new(config, SystemClock::new(), sink)?;
    let finished = Rc::new(Cell::new(None::<SessionStatus>));
    let finished_slot = Rc::clone(&finished);
    session.subscribe(move |event| {
        if let SessionEvent::Finished(status) = event {
            finished_slot.set(Some(*status));
        }
    });

    let view = BoardView::default();
    let mut cursor = Cursor::new(session.columns());
    let mut fb = FrameBuffer::new(0, 0);
    let mut states: Vec<RenderState> = Vec::with_capacity(session.columns() * 2);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Advance and render.
        let now = session.now();
        states.clear();
        states.extend_from_slice(session.tick(now));
        if states.is_empty() {
            resting_states(&session.tiles(), &mut states);
        }

        let frame = BoardFrame {
            columns: session.columns(),
            tiles: &states,
            cursor: Some(cursor.index()),
            selected: session.selected(),
            locked: session.locked(),
            status: session.status(now),
            phase: session.scheduler().current_phase().map(|p| p.kind),
            last_cue: last_cue.get(),
        };
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&frame, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if let Some(status) = finished.take() {
            if records.record_round(&status).is_some() {
                if let Err(e) = records.save() {
                    warn!(error = %e, "could not save records");
                }
            }
        }

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = map_key(key) {
                        apply(&mut session, &mut cursor, command)?;
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
        }
    }
}

fn apply<C: Clock, S: CueSink>(
    session: &mut Session<C, S>,
    cursor: &mut Cursor,
    command: Command,
) -> Result<()> {
    debug!(command = command.as_str(), cursor = cursor.index(), "command");
    match command {
        Command::CursorLeft => cursor.step(Direction::Left),
        Command::CursorRight => cursor.step(Direction::Right),
        Command::Tap => session.handle_tap(cursor.index()),
        Command::SwapLeft | Command::SwapRight => {
            let dir = if command == Command::SwapLeft {
                Direction::Left
            } else {
                Direction::Right
            };
            if let Some(other) = cursor.neighbour(dir) {
                session.perform_swap(cursor.index(), other);
                cursor.set(other);
            }
        }
        Command::StartRound => session.start_round(),
        Command::Restart => session.configure(session.mode())?,
    }
    Ok(())
}

/// Deterministic replay: board, planner and scheduler on a manual clock.
fn run_headless(config: &SessionConfig, swaps: usize) -> Result<()> {
    let mut board = Board::new(config.columns, config.seed);
    let planner = Planner::new(config.timings);
    let clock = ManualClock::new(0);
    let mut scheduler = AnimationScheduler::new(clock.clone(), Vec::<Cue>::new());

    for step in 0..swaps {
        let Some(i) = (0..board.columns().saturating_sub(1))
            .find(|&i| board.clone().attempt_swap(i, i + 1))
        else {
            info!(step, "no kept swap left on the board");
            break;
        };

        let before = board.tiles();
        board.attempt_swap(i, i + 1);
        let after = board.tiles();
        let plan = planner.plan(&before, &after, Some((i, i + 1)));

        let total_ms: u64 = plan.iter().map(|p| u64::from(p.duration_ms)).sum();
        scheduler.sink_mut().clear();
        scheduler.start(plan.clone());
        let mut ticks = 0u32;
        while scheduler.is_active() {
            let now = clock.advance(u64::from(TICK_MS));
            scheduler.tick(now);
            ticks += 1;
        }

        let line = json!({
            "step": step,
            "swap": [i, i + 1],
            "score": board.score(),
            "cascade": board.last_cascade(),
            "before": before.codes(),
            "after": after.codes(),
            "duration_ms": total_ms,
            "ticks": ticks,
            "cues": scheduler.sink(),
            "plan": plan,
        });
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

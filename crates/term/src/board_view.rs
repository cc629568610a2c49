//! BoardView: maps a session frame into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom, centred in the viewport:
//!
//! ```text
//! SCORE 120   SCORE ATTACK
//! ┌────────────────────────────────────┐
//! │██████▓▓▓███      ███···███████████│   <- tiles at fractional positions
//! └────────────────────────────────────┘
//!     ▲                                     <- keyboard cursor
//! TIME 0:42   CUE eliminate
//! ←/→ move  space tap  ⇧←/⇧→ swap  q quit
//! ```

use std::collections::BTreeSet;

use crate::engine::core::Snapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::session::SessionStatus;
use crate::types::{Cue, GameMode, PhaseKind, RenderState, TileKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Everything drawn for one tick.
#[derive(Debug, Clone, Copy)]
pub struct BoardFrame<'a> {
    pub columns: usize,
    /// Tiles to draw: the scheduler's frame while animating, resting tiles otherwise.
    pub tiles: &'a [RenderState],
    pub cursor: Option<usize>,
    pub selected: Option<usize>,
    pub locked: &'a BTreeSet<usize>,
    pub status: SessionStatus,
    pub phase: Option<PhaseKind>,
    pub last_cue: Option<Cue>,
}

/// Resting render states for a board row.
pub fn resting_states(tiles: &Snapshot, out: &mut Vec<RenderState>) {
    out.clear();
    out.extend(
        tiles
            .iter()
            .enumerate()
            .map(|(i, &tile)| RenderState::at_rest(tile, i)),
    );
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SELECTED_BG: Rgb = Rgb::new(70, 70, 105);
const LOCKED_BG: Rgb = Rgb::new(95, 55, 55);

/// Rows used by the layout.
const LAYOUT_H: u16 = 7;

pub fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::OrangeRicky => Rgb::new(255, 165, 0),
        TileKind::BlueRicky => Rgb::new(80, 120, 220),
        TileKind::ClevelandZ => Rgb::new(100, 220, 120),
        TileKind::RhodeIslandZ => Rgb::new(220, 80, 80),
    }
}

/// Shade by scale: full block at rest, lighter as the tile shrinks.
fn glyph_for_scale(scale: f32) -> char {
    if scale >= 0.9 {
        '█'
    } else if scale >= 0.6 {
        '▓'
    } else {
        '▒'
    }
}

/// Widest slot [`BoardView::new`] accepts.
pub const MAX_CELL_W: u16 = 16;

/// Terminal renderer for the match-3 row.
pub struct BoardView {
    /// Slot width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_w: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl BoardView {
    /// Slots `cell_w` columns wide, clamped to `1..=MAX_CELL_W`.
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL_W),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn cell_w(&self) -> u16 {
        self.cell_w
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, frame: &BoardFrame<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let row_w = (frame.columns as u16).saturating_mul(self.cell_w);
        let frame_w = row_w.saturating_add(2);
        let x0 = viewport.width.saturating_sub(frame_w) / 2;
        let y0 = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(LAYOUT_H) / 2,
            AnchorY::Top => 0,
        };
        let row_y = y0 + 2;

        self.draw_status_line(fb, frame, x0, y0);
        draw_border(fb, x0, y0 + 1, frame_w, 3);
        self.draw_slots(fb, frame, x0 + 1, row_y);
        self.draw_tiles(fb, frame.tiles, x0 + 1, row_y, row_w);
        if let Some(cursor) = frame.cursor.filter(|&c| c < frame.columns) {
            let cx = (x0 + 1)
                .saturating_add((cursor as u16).saturating_mul(self.cell_w))
                .saturating_add(self.cell_w / 2);
            fb.put_char(cx, y0 + 4, '▲', CellStyle::new(Rgb::WHITE, Rgb::BLACK).bold());
        }
        self.draw_info_line(fb, frame, x0, y0 + 5);
        draw_hint_line(fb, &frame.status, x0, y0 + 6);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, frame: &BoardFrame<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(frame, viewport, &mut fb);
        fb
    }

    fn draw_slots(&self, fb: &mut FrameBuffer, frame: &BoardFrame<'_>, x: u16, y: u16) {
        for col in 0..frame.columns {
            let bg = if frame.locked.contains(&col) {
                LOCKED_BG
            } else if frame.selected == Some(col) {
                SELECTED_BG
            } else {
                BOARD_BG
            };
            let sx = x.saturating_add((col as u16).saturating_mul(self.cell_w));
            fb.fill_rect(sx, y, self.cell_w, 1, ' ', CellStyle::new(bg, bg));
            let dot = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
            fb.put_char(sx.saturating_add(self.cell_w / 2), y, '·', dot);
        }
    }

    /// Tiles at `round(position × cell_w)`, shrunk around their centre by
    /// scale and blended into the slot background by alpha. Off-row columns
    /// are clipped.
    fn draw_tiles(&self, fb: &mut FrameBuffer, tiles: &[RenderState], x: u16, y: u16, row_w: u16) {
        let cell_w = i32::from(self.cell_w);
        for state in tiles {
            if state.alpha <= 0.0 {
                continue;
            }
            let left = (state.position * cell_w as f32).round() as i32;
            let visible = ((cell_w as f32 * state.scale.min(1.0)).round() as i32).clamp(1, cell_w);
            let inset = (cell_w - visible) / 2;
            let glyph = glyph_for_scale(state.scale);
            let color = kind_color(state.kind);

            for dx in inset..inset + visible {
                let px = left + dx;
                if px < 0 || px >= i32::from(row_w) {
                    continue;
                }
                let cx = x.saturating_add(px as u16);
                let bg = fb.get(cx, y).map(|c| c.style.bg).unwrap_or(BOARD_BG);
                let mut style = CellStyle::new(bg.mix(color, state.alpha), bg);
                style.bold = state.scale > 1.05;
                fb.put_char(cx, y, glyph, style);
            }
        }
    }

    fn draw_status_line(&self, fb: &mut FrameBuffer, frame: &BoardFrame<'_>, x: u16, y: u16) {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let cx = fb.put_str(x, y, "SCORE ", label);
        let cx = fb.put_u64(cx, y, u64::from(frame.status.score), value);
        fb.put_str(cx + 3, y, mode_label(frame.status.mode), label);
    }

    fn draw_info_line(&self, fb: &mut FrameBuffer, frame: &BoardFrame<'_>, x: u16, y: u16) {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let status = &frame.status;

        let mut cx = x;
        if let Some(target) = status.target_score {
            cx = fb.put_str(cx, y, "TARGET ", label);
            cx = fb.put_u64(cx, y, u64::from(target), value);
            cx += 3;
        }
        match status.remaining_ms {
            Some(remaining) => {
                cx = fb.put_str(cx, y, "LEFT ", label);
                cx = fb.put_clock(cx, y, remaining, value);
            }
            None => {
                cx = fb.put_str(cx, y, "TIME ", label);
                cx = fb.put_clock(cx, y, status.elapsed_ms, value);
            }
        }
        if let Some(phase) = frame.phase {
            cx = fb.put_str(cx + 3, y, phase.as_str(), value.dim());
        }
        if let Some(cue) = frame.last_cue {
            let cx = fb.put_str(cx + 3, y, "CUE ", label);
            fb.put_str(cx, y, cue.as_str(), value);
        }
    }
}

fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Free => "FREE PLAY",
        GameMode::ScoreAttack { .. } => "SCORE ATTACK",
        GameMode::SpeedRun { .. } => "SPEED RUN",
    }
}

fn draw_hint_line(fb: &mut FrameBuffer, status: &SessionStatus, x: u16, y: u16) {
    let style = CellStyle::default().dim();
    let text = if status.finished {
        "FINISHED  s play again  r restart  q quit"
    } else if !status.running {
        "s start round  q quit"
    } else {
        "←/→ move  space tap  ⇧←/⇧→ swap  q quit"
    };
    fb.put_str(x, y, text, style);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
    let (right, bottom) = (x + w - 1, y + h - 1);
    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for cx in x + 1..right {
        fb.put_char(cx, y, '─', style);
        fb.put_char(cx, bottom, '─', style);
    }
    for cy in y + 1..bottom {
        fb.put_char(x, cy, '│', style);
        fb.put_char(right, cy, '│', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tile, TileId};

    fn status() -> SessionStatus {
        SessionStatus {
            mode: GameMode::Free,
            score: 30,
            elapsed_ms: 5_000,
            remaining_ms: None,
            target_score: None,
            running: true,
            finished: false,
        }
    }

    fn state(id: u64, kind: TileKind, position: f32) -> RenderState {
        RenderState {
            id: TileId(id),
            kind,
            position,
            alpha: 1.0,
            scale: 1.0,
        }
    }

    fn render(tiles: &[RenderState], locked: &BTreeSet<usize>) -> FrameBuffer {
        let frame = BoardFrame {
            columns: 4,
            tiles,
            cursor: Some(1),
            selected: None,
            locked,
            status: status(),
            phase: None,
            last_cue: None,
        };
        BoardView::default()
            .with_anchor_y(AnchorY::Top)
            .render(&frame, Viewport::new(14, 7))
    }

    #[test]
    fn resting_row_draws_every_slot() {
        let tiles = [
            state(0, TileKind::OrangeRicky, 0.0),
            state(1, TileKind::BlueRicky, 1.0),
            state(2, TileKind::ClevelandZ, 2.0),
            state(3, TileKind::RhodeIslandZ, 3.0),
        ];
        let fb = render(&tiles, &BTreeSet::new());
        assert_eq!(fb.row_text(0).trim_end(), "SCORE 30   FRE");
        assert_eq!(fb.row_text(1), "┌────────────┐");
        assert_eq!(fb.row_text(2), "│████████████│");
        assert_eq!(fb.row_text(4), "     ▲        ");
        assert_eq!(fb.get(1, 2).unwrap().style.fg, kind_color(TileKind::OrangeRicky));
    }

    #[test]
    fn empty_slots_show_dots_and_off_board_is_clipped() {
        let tiles = [state(7, TileKind::BlueRicky, -0.67)];
        let fb = render(&tiles, &BTreeSet::new());
        // -0.67 * 3 rounds to -2: only the last column of the tile is on the row.
        assert_eq!(fb.row_text(2), "│█·  ·  ·  · │");
    }

    #[test]
    fn alpha_fades_towards_slot_background() {
        let mut half = state(0, TileKind::OrangeRicky, 0.0);
        half.alpha = 0.5;
        let mut gone = state(1, TileKind::BlueRicky, 1.0);
        gone.alpha = 0.0;

        let fb = render(&[half, gone], &BTreeSet::new());
        let fg = fb.get(1, 2).unwrap().style.fg;
        assert_eq!(fg, BOARD_BG.mix(kind_color(TileKind::OrangeRicky), 0.5));
        assert_eq!(fb.get(5, 2).unwrap().ch, '·');
    }

    #[test]
    fn shrinking_tiles_narrow_and_popping_tiles_are_bold() {
        let mut small = state(0, TileKind::ClevelandZ, 0.0);
        small.scale = 0.3;
        let mut pop = state(1, TileKind::ClevelandZ, 1.0);
        pop.scale = 1.2;

        let fb = render(&[small, pop], &BTreeSet::new());
        assert_eq!(&fb.row_text(2)[..], "│ ▒ ███ ·  · │");
        assert!(fb.get(4, 2).unwrap().style.bold);
    }

    #[test]
    fn oversized_cells_are_clamped() {
        let view = BoardView::new(u16::MAX);
        assert_eq!(view.cell_w(), MAX_CELL_W);
        assert_eq!(BoardView::new(0).cell_w(), 1);

        let tiles = [state(0, TileKind::BlueRicky, 0.0)];
        let locked = BTreeSet::new();
        let frame = BoardFrame {
            columns: 8,
            tiles: &tiles,
            cursor: Some(7),
            selected: None,
            locked: &locked,
            status: status(),
            phase: None,
            last_cue: None,
        };
        // Row is wider than the viewport: everything past the edge is clipped.
        let fb = view.render(&frame, Viewport::new(40, 7));
        assert_eq!(fb.get(1, 2).unwrap().ch, '█');
        assert!(fb.row_text(4).trim().is_empty());
    }

    #[test]
    fn locked_slots_are_highlighted() {
        let locked: BTreeSet<usize> = [2].into_iter().collect();
        let fb = render(&[], &locked);
        assert_eq!(fb.get(7, 2).unwrap().style.bg, LOCKED_BG);
        assert_eq!(fb.get(1, 2).unwrap().style.bg, BOARD_BG);
    }

    #[test]
    fn resting_states_follow_snapshot_order() {
        let snapshot = Snapshot::from(vec![
            Tile::new(TileId(5), TileKind::BlueRicky),
            Tile::new(TileId(2), TileKind::OrangeRicky),
        ]);
        let mut out = vec![state(9, TileKind::RhodeIslandZ, 4.0)];
        resting_states(&snapshot, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].id, TileId(2));
        assert_eq!(out[1].position, 1.0);
    }
}

//! Transition planner - rebuilds the visual story of a mutation from two snapshots
//!
//! The board only exposes before/after rows. Because every tile keeps its id
//! through compaction and refill, the planner can correlate the two rows by
//! identity and synthesize the phases a viewer should see:
//!
//! 1. **Swap**: the two swapped tiles trade places, everyone else holds
//! 2. **Eliminate**: removed tiles pop and fade at their post-swap slots
//! 3. **Refill**: survivors slide to their final slots while new tiles enter
//!    from off-board on the left
//!
//! Without a swap pair the planner falls back to a single flat phase straight
//! from old to new. Identical snapshots produce an empty plan.

use std::collections::{HashMap, HashSet};

use arrayvec::ArrayVec;
use tracing::debug;

use crate::core::Snapshot;
use crate::types::{
    Phase, PhaseKind, Tile, TileId, TransitionRecord, ELIMINATE_PHASE_MS, FLAT_PHASE_MS,
    REFILL_PHASE_MS, SWAP_PHASE_MS,
};

/// Ordered phases; at most swap, eliminate and refill.
pub type Plan = ArrayVec<Phase, 3>;

/// Phase durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTimings {
    pub swap_ms: u32,
    pub eliminate_ms: u32,
    pub refill_ms: u32,
    pub flat_ms: u32,
}

impl Default for PlanTimings {
    fn default() -> Self {
        Self {
            swap_ms: SWAP_PHASE_MS,
            eliminate_ms: ELIMINATE_PHASE_MS,
            refill_ms: REFILL_PHASE_MS,
            flat_ms: FLAT_PHASE_MS,
        }
    }
}

/// Identity correlation between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDiff {
    /// Ids present in both snapshots, in old order.
    pub shared: Vec<TileId>,
    /// Ids only in the old snapshot, in old order.
    pub removed: Vec<TileId>,
    /// Tiles only in the new snapshot with their final index, ascending by index.
    pub inserted: Vec<(Tile, usize)>,
}

impl IdentityDiff {
    pub fn between(old: &Snapshot, new: &Snapshot) -> Self {
        let new_ids: HashSet<TileId> = new.ids().collect();
        let old_ids: HashSet<TileId> = old.ids().collect();

        let (shared, removed): (Vec<TileId>, Vec<TileId>) =
            old.ids().partition(|id| new_ids.contains(id));
        let inserted = new
            .iter()
            .enumerate()
            .filter(|(_, t)| !old_ids.contains(&t.id))
            .map(|(i, t)| (*t, i))
            .collect();

        Self {
            shared,
            removed,
            inserted,
        }
    }

    /// Off-board origin of an inserted tile: shifted left by the number of inserts.
    fn insert_origin(&self, final_index: usize) -> i32 {
        final_index as i32 - self.inserted.len() as i32
    }
}

/// Builds animation plans from snapshot pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    timings: PlanTimings,
}

impl Planner {
    pub fn new(timings: PlanTimings) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> PlanTimings {
        self.timings
    }

    /// Plan the transition from `old` to `new`.
    ///
    /// `swap` is the adjacent pair the user swapped, when the mutation came from
    /// a kept swap. A pair that is not adjacent or not inside `old` is treated as
    /// absent. Never fails; identical snapshots yield an empty plan.
    pub fn plan(&self, old: &Snapshot, new: &Snapshot, swap: Option<(usize, usize)>) -> Plan {
        if old == new {
            return Plan::new();
        }

        let diff = IdentityDiff::between(old, new);
        let valid_swap = swap.filter(|&(i, j)| i.abs_diff(j) == 1 && i.max(j) < old.len());
        let plan = match valid_swap {
            Some(pair) => self.plan_swap(old, new, &diff, pair),
            None => self.plan_flat(old, new, &diff),
        };

        debug!(
            phases = plan.len(),
            removed = diff.removed.len(),
            inserted = diff.inserted.len(),
            swap = ?valid_swap,
            "planned transition"
        );
        plan
    }

    /// Three-act plan: swap, eliminate, refill.
    fn plan_swap(
        &self,
        old: &Snapshot,
        new: &Snapshot,
        diff: &IdentityDiff,
        (i, j): (usize, usize),
    ) -> Plan {
        let mut plan = Plan::new();

        let mut post_swap: Vec<Tile> = old.tiles().to_vec();
        post_swap.swap(i, j);
        let post_index = index_by_id(&post_swap);
        let new_index = index_by_id(new.tiles());

        let swap_records = old
            .iter()
            .enumerate()
            .map(|(from, tile)| {
                let to = post_index.get(&tile.id).copied().unwrap_or(from);
                TransitionRecord::moving(*tile, from as i32, to as i32)
            })
            .collect();
        push_phase(&mut plan, PhaseKind::Swap, swap_records, self.timings.swap_ms);

        if !diff.removed.is_empty() {
            let eliminate_records = post_swap
                .iter()
                .enumerate()
                .map(|(idx, tile)| {
                    let idx = idx as i32;
                    if new_index.contains_key(&tile.id) {
                        TransitionRecord::moving(*tile, idx, idx)
                    } else {
                        TransitionRecord::eliminating(*tile, idx)
                    }
                })
                .collect();
            push_phase(
                &mut plan,
                PhaseKind::Eliminate,
                eliminate_records,
                self.timings.eliminate_ms,
            );
        }

        let mut refill_records: Vec<TransitionRecord> = post_swap
            .iter()
            .enumerate()
            .filter_map(|(from, tile)| {
                new_index
                    .get(&tile.id)
                    .map(|&to| TransitionRecord::moving(*tile, from as i32, to as i32))
            })
            .collect();
        let survivors_move = refill_records.iter().any(TransitionRecord::is_displacing);
        if survivors_move || !diff.inserted.is_empty() {
            refill_records.extend(diff.inserted.iter().map(|&(tile, to)| {
                TransitionRecord::inserting(tile, diff.insert_origin(to), to as i32)
            }));
            push_phase(&mut plan, PhaseKind::Refill, refill_records, self.timings.refill_ms);
        }

        plan
    }

    /// Degraded single-phase plan straight from old to new.
    fn plan_flat(&self, old: &Snapshot, new: &Snapshot, diff: &IdentityDiff) -> Plan {
        let new_index = index_by_id(new.tiles());

        let mut records: Vec<TransitionRecord> = old
            .iter()
            .enumerate()
            .map(|(from, tile)| match new_index.get(&tile.id) {
                Some(&to) => TransitionRecord::moving(*tile, from as i32, to as i32),
                None => TransitionRecord::eliminating(*tile, from as i32),
            })
            .collect();
        records.extend(diff.inserted.iter().map(|&(tile, to)| {
            TransitionRecord::inserting(tile, diff.insert_origin(to), to as i32)
        }));

        let mut plan = Plan::new();
        push_phase(&mut plan, PhaseKind::Flat, records, self.timings.flat_ms);
        plan
    }
}

/// Plan with default timings.
pub fn plan(old: &Snapshot, new: &Snapshot, swap: Option<(usize, usize)>) -> Plan {
    Planner::default().plan(old, new, swap)
}

fn index_by_id(tiles: &[Tile]) -> HashMap<TileId, usize> {
    tiles.iter().enumerate().map(|(i, t)| (t.id, i)).collect()
}

/// Empty phases are dropped from the plan.
fn push_phase(plan: &mut Plan, kind: PhaseKind, records: Vec<TransitionRecord>, duration_ms: u32) {
    if records.is_empty() {
        return;
    }
    plan.push(Phase::new(kind, records, duration_ms));
}

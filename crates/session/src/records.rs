//! Leaderboard records for the timed modes
//!
//! Records are bucketed by scope: one bucket per score-attack duration and one
//! per speed-run target. Each bucket keeps at most [`MAX_RECORDS_PER_SCOPE`]
//! entries, best first.
//!
//! | Scope | Ordering |
//! |-------|----------|
//! | `score_attack_<minutes>` | score desc, minutes asc, elapsed asc, created asc |
//! | `speed_run_<target>` | elapsed asc, target desc, score desc, created asc |
//!
//! The store is a plain value handed to whoever needs it. Persistence is a
//! single JSON object mapping scope ids to record lists.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::controller::SessionStatus;
use crate::types::GameMode;

pub const MAX_RECORDS_PER_SCOPE: usize = 10;

const MS_PER_MINUTE: u64 = 60_000;

/// One finished timed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRecord {
    pub id: String,
    pub score: u32,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<u32>,
    /// Unix epoch milliseconds.
    pub created_at_ms: u64,
}

/// Leaderboard bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordScope {
    ScoreAttack { minutes: u32 },
    SpeedRun { target: u32 },
}

impl RecordScope {
    /// Storage key, e.g. `score_attack_2` or `speed_run_600`.
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Scope a finished round belongs to; free play has none.
    pub fn for_mode(mode: GameMode) -> Option<Self> {
        match mode {
            GameMode::Free => None,
            GameMode::ScoreAttack { duration_ms } => Some(RecordScope::ScoreAttack {
                minutes: minutes_of(duration_ms),
            }),
            GameMode::SpeedRun { target_score } => Some(RecordScope::SpeedRun {
                target: target_score.max(1),
            }),
        }
    }

    fn compare(&self, a: &ModeRecord, b: &ModeRecord) -> Ordering {
        match self {
            RecordScope::ScoreAttack { .. } => b
                .score
                .cmp(&a.score)
                .then_with(|| minutes_key(a).cmp(&minutes_key(b)))
                .then_with(|| a.elapsed_ms.cmp(&b.elapsed_ms))
                .then_with(|| a.created_at_ms.cmp(&b.created_at_ms)),
            RecordScope::SpeedRun { .. } => a
                .elapsed_ms
                .cmp(&b.elapsed_ms)
                .then_with(|| b.target_score.unwrap_or(0).cmp(&a.target_score.unwrap_or(0)))
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| a.created_at_ms.cmp(&b.created_at_ms)),
        }
    }
}

impl fmt::Display for RecordScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordScope::ScoreAttack { minutes } => write!(f, "score_attack_{}", minutes),
            RecordScope::SpeedRun { target } => write!(f, "speed_run_{}", target),
        }
    }
}

fn minutes_of(duration_ms: u64) -> u32 {
    (duration_ms / MS_PER_MINUTE).max(1).min(u64::from(u32::MAX)) as u32
}

fn minutes_key(record: &ModeRecord) -> u32 {
    record.duration_minutes.unwrap_or(u32::MAX)
}

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Reading or writing the records file failed.
    #[error("records file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The records file is not valid JSON of the expected shape.
    #[error("records file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-scope leaderboard, optionally backed by a JSON file.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    path: Option<PathBuf>,
    scopes: BTreeMap<String, Vec<ModeRecord>>,
}

impl RecordStore {
    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let scopes = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| RecordError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(RecordError::Io { path, source }),
        };
        let store = Self {
            path: Some(path),
            scopes,
        };
        debug!(scopes = store.scopes.len(), "records loaded");
        Ok(store)
    }

    /// Write to the backing file through a temporary sibling and a rename.
    /// In-memory stores do nothing.
    pub fn save(&self) -> Result<(), RecordError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| RecordError::Io {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.scopes).map_err(|source| {
            RecordError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), "records saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records of one scope, best first.
    pub fn records(&self, scope: RecordScope) -> &[ModeRecord] {
        self.scopes
            .get(&scope.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add_score_attack(
        &mut self,
        score: u32,
        elapsed_ms: u64,
        duration_minutes: u32,
    ) -> Option<ModeRecord> {
        let minutes = duration_minutes.max(1);
        let record = ModeRecord {
            id: Uuid::new_v4().to_string(),
            score,
            elapsed_ms,
            duration_minutes: Some(minutes),
            target_score: None,
            created_at_ms: unix_now_ms(),
        };
        self.insert(RecordScope::ScoreAttack { minutes }, record)
    }

    pub fn add_speed_run(&mut self, score: u32, elapsed_ms: u64, target_score: u32) -> Option<ModeRecord> {
        let target = target_score.max(1);
        let record = ModeRecord {
            id: Uuid::new_v4().to_string(),
            score,
            elapsed_ms,
            duration_minutes: None,
            target_score: Some(target),
            created_at_ms: unix_now_ms(),
        };
        self.insert(RecordScope::SpeedRun { target }, record)
    }

    /// Record a finished round; free play and unfinished rounds are ignored.
    pub fn record_round(&mut self, status: &SessionStatus) -> Option<ModeRecord> {
        if !status.finished {
            return None;
        }
        match status.mode {
            GameMode::Free => None,
            GameMode::ScoreAttack { duration_ms } => {
                self.add_score_attack(status.score, status.elapsed_ms, minutes_of(duration_ms))
            }
            GameMode::SpeedRun { target_score } => {
                self.add_speed_run(status.score, status.elapsed_ms, target_score)
            }
        }
    }

    /// Add `record` to `scope`, sort and trim. Returns the record if it made the cut.
    pub fn insert(&mut self, scope: RecordScope, record: ModeRecord) -> Option<ModeRecord> {
        let bucket = self.scopes.entry(scope.id()).or_default();
        bucket.push(record.clone());
        bucket.sort_by(|a, b| scope.compare(a, b));
        bucket.truncate(MAX_RECORDS_PER_SCOPE);

        let kept = bucket.iter().position(|r| r.id == record.id);
        match kept {
            Some(rank) => {
                info!(scope = %scope, rank = rank + 1, score = record.score, "new record");
                Some(record)
            }
            None => {
                debug!(scope = %scope, score = record.score, "record did not place");
                None
            }
        }
    }
}

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, score: u32, elapsed_ms: u64, created_at_ms: u64) -> ModeRecord {
        ModeRecord {
            id: id.to_string(),
            score,
            elapsed_ms,
            duration_minutes: Some(1),
            target_score: Some(300),
            created_at_ms,
        }
    }

    fn ids(records: &[ModeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn scope_ids() {
        assert_eq!(RecordScope::ScoreAttack { minutes: 2 }.id(), "score_attack_2");
        assert_eq!(RecordScope::SpeedRun { target: 600 }.id(), "speed_run_600");
        assert_eq!(
            RecordScope::for_mode(GameMode::ScoreAttack { duration_ms: 30_000 }),
            Some(RecordScope::ScoreAttack { minutes: 1 })
        );
        assert_eq!(RecordScope::for_mode(GameMode::Free), None);
    }

    #[test]
    fn score_attack_orders_by_score_then_elapsed_then_age() {
        let scope = RecordScope::ScoreAttack { minutes: 1 };
        let mut store = RecordStore::in_memory();
        store.insert(scope, record("low", 100, 60_000, 1));
        store.insert(scope, record("late", 200, 60_000, 5));
        store.insert(scope, record("early", 200, 60_000, 2));
        store.insert(scope, record("quick", 200, 59_000, 9));
        assert_eq!(ids(store.records(scope)), vec!["quick", "early", "late", "low"]);
    }

    #[test]
    fn speed_run_orders_by_elapsed_first() {
        let scope = RecordScope::SpeedRun { target: 300 };
        let mut store = RecordStore::in_memory();
        store.insert(scope, record("slow", 400, 90_000, 1));
        store.insert(scope, record("fast", 300, 50_000, 2));
        store.insert(scope, record("fast-high", 330, 50_000, 3));
        assert_eq!(ids(store.records(scope)), vec!["fast-high", "fast", "slow"]);
    }

    #[test]
    fn buckets_are_trimmed_to_ten() {
        let scope = RecordScope::ScoreAttack { minutes: 1 };
        let mut store = RecordStore::in_memory();
        for i in 0..10u32 {
            assert!(store.insert(scope, record(&format!("r{}", i), 100 + i, 60_000, 0)).is_some());
        }
        assert!(store.insert(scope, record("loser", 50, 60_000, 0)).is_none());
        assert!(store.insert(scope, record("winner", 500, 60_000, 0)).is_some());
        let records = store.records(scope);
        assert_eq!(records.len(), MAX_RECORDS_PER_SCOPE);
        assert_eq!(records[0].id, "winner");
        assert!(records.iter().all(|r| r.id != "r0"));
    }

    #[test]
    fn add_helpers_clamp_detail_and_assign_uuid() {
        let mut store = RecordStore::in_memory();
        let r = store.add_speed_run(120, 42_000, 0).unwrap();
        assert_eq!(r.target_score, Some(1));
        assert!(Uuid::parse_str(&r.id).is_ok());
        assert_eq!(store.records(RecordScope::SpeedRun { target: 1 }).len(), 1);

        let r = store.add_score_attack(80, 60_000, 0).unwrap();
        assert_eq!(r.duration_minutes, Some(1));
    }

    #[test]
    fn unfinished_and_free_rounds_are_not_recorded() {
        let mut store = RecordStore::in_memory();
        let mut status = SessionStatus {
            mode: GameMode::Free,
            score: 90,
            elapsed_ms: 1_000,
            remaining_ms: None,
            target_score: None,
            running: false,
            finished: true,
        };
        assert!(store.record_round(&status).is_none());

        status.mode = GameMode::ScoreAttack { duration_ms: 120_000 };
        status.finished = false;
        assert!(store.record_round(&status).is_none());

        status.finished = true;
        let r = store.record_round(&status).unwrap();
        assert_eq!(r.duration_minutes, Some(2));
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("tui-match3-records-{}", Uuid::new_v4()));
        let path = dir.join("records.json");

        let mut store = RecordStore::load(&path).unwrap();
        assert!(store.records(RecordScope::SpeedRun { target: 300 }).is_empty());
        store.insert(RecordScope::SpeedRun { target: 300 }, record("a", 300, 1_000, 1));
        store.save().unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(ids(loaded.records(RecordScope::SpeedRun { target: 300 })), vec!["a"]);

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(RecordStore::load(&path), Err(RecordError::Corrupt { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }
}

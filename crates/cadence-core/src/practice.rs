//! Daily practice documents: the live per-user "current day" state and the
//! immutable per-date archive it is frozen into at rollover.
//!
//! The live document is a singleton per user, overwritten in place during the
//! day. Yesterday's content is never edited retroactively — rollover copies
//! it to the archive before resetting the live document for tomorrow.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::types::CommitmentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Streak log keeps a month of entries.
pub const STREAK_HISTORY_MAX: usize = 30;
/// Other history logs keep roughly a quarter.
pub const HISTORY_MAX: usize = 90;
/// Secondary tasks allowed alongside the single priority.
pub const MAX_WINS: usize = 5;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A secondary task in the morning plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// Set when the item was carried over from a previous day.
    #[serde(default)]
    pub saved: bool,
}

/// A leadership commitment tracked within the day. `Committed` is terminal;
/// anything else carries into tomorrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRep {
    pub id: String,
    pub text: String,
    pub status: CommitmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Morning {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub priority_done: bool,
    #[serde(default)]
    pub wins: Vec<WinItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evening {
    #[serde(default)]
    pub went_well: String,
    #[serde(default)]
    pub got_hard: String,
    #[serde(default)]
    pub tomorrow_shift: String,
    #[serde(default)]
    pub habits: BTreeMap<String, bool>,
}

impl Evening {
    pub fn has_reflection(&self) -> bool {
        !(self.went_well.trim().is_empty()
            && self.got_hard.trim().is_empty()
            && self.tomorrow_shift.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub done: u32,
    pub total: u32,
}

// ---------------------------------------------------------------------------
// History records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakEntry {
    pub date: NaiveDate,
    pub streak: u32,
    pub did_activity: bool,
    pub weekend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRecord {
    pub id: String,
    pub text: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepDayRecord {
    pub date: NaiveDate,
    pub committed: usize,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionRecord {
    pub date: NaiveDate,
    pub went_well: String,
    pub got_hard: String,
    pub tomorrow_shift: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRecord {
    pub date: NaiveDate,
    pub tallies: BTreeMap<String, Tally>,
}

// ---------------------------------------------------------------------------
// PracticeState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeState {
    pub date: NaiveDate,
    #[serde(default)]
    pub morning: Morning,
    #[serde(default)]
    pub evening: Evening,
    #[serde(default)]
    pub scorecard: BTreeMap<String, Tally>,
    #[serde(default)]
    pub day_reps: Vec<DayRep>,
    /// Whether the user logged their grounding rep today.
    #[serde(default)]
    pub grounding_done: bool,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_streak_date: Option<NaiveDate>,
    #[serde(default)]
    pub streak_history: Vec<StreakEntry>,
    #[serde(default)]
    pub wins_history: Vec<WinRecord>,
    #[serde(default)]
    pub reps_history: Vec<RepDayRecord>,
    #[serde(default)]
    pub reflections_history: Vec<ReflectionRecord>,
    #[serde(default)]
    pub scorecard_history: Vec<ScorecardRecord>,
}

impl PracticeState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            morning: Morning::default(),
            evening: Evening::default(),
            scorecard: BTreeMap::new(),
            day_reps: Vec::new(),
            grounding_done: false,
            streak: 0,
            last_streak_date: None,
            streak_history: Vec::new(),
            wins_history: Vec::new(),
            reps_history: Vec::new(),
            reflections_history: Vec::new(),
            scorecard_history: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// The live document, or None if the user never started one.
    pub fn load(root: &Path, user: &str) -> Result<Option<Self>> {
        io::load_doc(&paths::practice_path(root, user))
    }

    /// The live document, creating a fresh one for `date` if absent.
    pub fn load_or_new(root: &Path, user: &str, date: NaiveDate) -> Result<Self> {
        Ok(Self::load(root, user)?.unwrap_or_else(|| Self::new(date)))
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        io::save_doc(&paths::practice_path(root, user), self)
    }

    // ---------------------------------------------------------------------------
    // Day mutations
    // ---------------------------------------------------------------------------

    pub fn set_priority(&mut self, text: impl Into<String>) {
        self.morning.priority = text.into();
    }

    pub fn add_win(&mut self, text: impl Into<String>) -> Option<&WinItem> {
        if self.morning.wins.len() >= MAX_WINS {
            return None;
        }
        self.morning.wins.push(WinItem {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            done: false,
            saved: false,
        });
        self.morning.wins.last()
    }

    /// Mark a win done by id. Returns false if no such item.
    pub fn complete_win(&mut self, id: &str) -> bool {
        match self.morning.wins.iter_mut().find(|w| w.id == id) {
            Some(win) => {
                win.done = true;
                true
            }
            None => false,
        }
    }

    pub fn add_day_rep(&mut self, text: impl Into<String>) -> &DayRep {
        self.day_reps.push(DayRep {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            status: CommitmentStatus::Planned,
        });
        self.day_reps.last().unwrap()
    }

    /// Move a day rep to its terminal committed state. Returns false if no
    /// such item.
    pub fn commit_day_rep(&mut self, id: &str) -> bool {
        match self.day_reps.iter_mut().find(|r| r.id == id) {
            Some(rep) => {
                rep.status = CommitmentStatus::Committed;
                true
            }
            None => false,
        }
    }

    pub fn set_reflection(&mut self, went_well: &str, got_hard: &str, tomorrow_shift: &str) {
        self.evening.went_well = went_well.to_string();
        self.evening.got_hard = got_hard.to_string();
        self.evening.tomorrow_shift = tomorrow_shift.to_string();
    }

    pub fn record_score(&mut self, category: &str, done: u32, total: u32) {
        self.scorecard
            .insert(category.to_string(), Tally { done, total });
    }

    /// True if the user did anything that counts toward the streak today.
    pub fn did_activity(&self) -> bool {
        self.grounding_done
            || self.morning.wins.iter().any(|w| w.done)
            || self
                .day_reps
                .iter()
                .any(|r| r.status == CommitmentStatus::Committed)
    }

    // ---------------------------------------------------------------------------
    // History maintenance (bounded, deduplicated)
    // ---------------------------------------------------------------------------

    /// Wins append chronologically, like the streak log; the day-keyed logs
    /// below prepend so their newest record is first.
    pub fn log_win(&mut self, record: WinRecord) {
        if self.wins_history.iter().any(|w| w.id == record.id) {
            return;
        }
        self.wins_history.push(record);
        if self.wins_history.len() > HISTORY_MAX {
            let excess = self.wins_history.len() - HISTORY_MAX;
            self.wins_history.drain(..excess);
        }
    }

    pub fn log_rep_day(&mut self, record: RepDayRecord) {
        if self.reps_history.iter().any(|r| r.date == record.date) {
            return;
        }
        self.reps_history.insert(0, record);
        self.reps_history.truncate(HISTORY_MAX);
    }

    pub fn log_reflection(&mut self, record: ReflectionRecord) {
        if self
            .reflections_history
            .iter()
            .any(|r| r.date == record.date)
        {
            return;
        }
        self.reflections_history.insert(0, record);
        self.reflections_history.truncate(HISTORY_MAX);
    }

    pub fn log_scorecard(&mut self, record: ScorecardRecord) {
        if self.scorecard_history.iter().any(|s| s.date == record.date) {
            return;
        }
        self.scorecard_history.insert(0, record);
        self.scorecard_history.truncate(HISTORY_MAX);
    }

    pub fn log_streak(&mut self, entry: StreakEntry) {
        if self.streak_history.iter().any(|s| s.date == entry.date) {
            return;
        }
        self.streak_history.push(entry);
        if self.streak_history.len() > STREAK_HISTORY_MAX {
            let excess = self.streak_history.len() - STREAK_HISTORY_MAX;
            self.streak_history.drain(..excess);
        }
    }
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// Freeze a day's state into the per-date archive. Re-runs merge the same
/// content back over itself, so an at-least-once scheduler is safe.
pub fn archive_write(root: &Path, user: &str, state: &PracticeState) -> Result<()> {
    io::save_doc(
        &paths::archive_path(root, user, &state.date.to_string()),
        state,
    )
}

pub fn archive_load(root: &Path, user: &str, date: NaiveDate) -> Result<Option<PracticeState>> {
    io::load_doc(&paths::archive_path(root, user, &date.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn live_state_roundtrip() {
        let dir = TempDir::new().unwrap();
        assert!(PracticeState::load(dir.path(), "maria").unwrap().is_none());

        let mut state = PracticeState::new(date(31));
        state.set_priority("board deck outline");
        state.add_win("thank the on-call engineer");
        state.save(dir.path(), "maria").unwrap();

        let loaded = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn win_cap_enforced() {
        let mut state = PracticeState::new(date(31));
        for i in 0..MAX_WINS {
            assert!(state.add_win(format!("task {i}")).is_some());
        }
        assert!(state.add_win("one too many").is_none());
        assert_eq!(state.morning.wins.len(), MAX_WINS);
    }

    #[test]
    fn activity_detection() {
        let mut state = PracticeState::new(date(31));
        assert!(!state.did_activity());

        state.grounding_done = true;
        assert!(state.did_activity());

        state.grounding_done = false;
        let id = state.add_win("w").unwrap().id.clone();
        assert!(!state.did_activity());
        state.complete_win(&id);
        assert!(state.did_activity());

        let mut other = PracticeState::new(date(31));
        let rep_id = other.add_day_rep("give feedback to sam").id.clone();
        assert!(!other.did_activity());
        other.commit_day_rep(&rep_id);
        assert!(other.did_activity());
    }

    #[test]
    fn histories_dedup_and_cap() {
        let mut state = PracticeState::new(date(31));

        let record = WinRecord {
            id: "w1".to_string(),
            text: "done".to_string(),
            date: date(30),
        };
        state.log_win(record.clone());
        state.log_win(record);
        assert_eq!(state.wins_history.len(), 1);

        for d in 1..=31 {
            state.log_streak(StreakEntry {
                date: date(d),
                streak: d,
                did_activity: true,
                weekend: false,
            });
        }
        assert_eq!(state.streak_history.len(), STREAK_HISTORY_MAX);
        // Oldest entry dropped, newest kept.
        assert_eq!(state.streak_history.first().unwrap().date, date(2));
        assert_eq!(state.streak_history.last().unwrap().date, date(31));

        let reflection = ReflectionRecord {
            date: date(30),
            went_well: "shipped".to_string(),
            got_hard: "standup ran long".to_string(),
            tomorrow_shift: "delegate triage".to_string(),
        };
        state.log_reflection(reflection.clone());
        state.log_reflection(reflection);
        assert_eq!(state.reflections_history.len(), 1);
    }

    #[test]
    fn wins_log_appends_and_drops_oldest() {
        let mut state = PracticeState::new(date(31));
        for i in 0..HISTORY_MAX + 2 {
            state.log_win(WinRecord {
                id: format!("w{i}"),
                text: format!("win {i}"),
                date: date(31),
            });
        }
        assert_eq!(state.wins_history.len(), HISTORY_MAX);
        // Chronological: oldest surviving entry first, newest last.
        assert_eq!(state.wins_history.first().unwrap().id, "w2");
        assert_eq!(
            state.wins_history.last().unwrap().id,
            format!("w{}", HISTORY_MAX + 1)
        );
    }

    #[test]
    fn archive_write_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(date(30));
        state.set_priority("1:1 prep");
        archive_write(dir.path(), "maria", &state).unwrap();

        let loaded = archive_load(dir.path(), "maria", date(30)).unwrap().unwrap();
        assert_eq!(loaded.morning.priority, "1:1 prep");
        assert!(archive_load(dir.path(), "maria", date(29)).unwrap().is_none());
    }

    #[test]
    fn reflection_presence() {
        let mut evening = Evening::default();
        assert!(!evening.has_reflection());
        evening.got_hard = "  ".to_string();
        assert!(!evening.has_reflection());
        evening.went_well = "hard conversation went fine".to_string();
        assert!(evening.has_reflection());
    }
}

//! Weekly status derivation and the denormalized stats cache.
//!
//! `WeekStatus` is always derived from the rep documents and is the source of
//! truth; `WeeklyStats` is a cache of it, re-persisted by every rep mutation
//! in that week. Nothing reads `WeeklyStats` to make a lifecycle decision —
//! only the roster view and the missed-week counter consume it.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::rep::Rep;
use crate::types::RepStatus;
use crate::week::WeekId;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// WeekStatus
// ---------------------------------------------------------------------------

/// A week's live status, derived from the rep set. Pure data; no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekStatus {
    pub week: WeekId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// True once at least one rep in the week is completed.
    pub requirement_met: bool,
    /// All non-canceled reps.
    pub total_committed: usize,
    pub total_completed: usize,
    pub total_active: usize,
    pub total_missed: usize,
    pub total_canceled: usize,
    pub reps: Vec<Rep>,
}

impl WeekStatus {
    pub fn compute(week: WeekId, reps: Vec<Rep>, tz: FixedOffset) -> Self {
        let (start, end) = week.boundaries(tz);
        let count = |s: RepStatus| reps.iter().filter(|r| r.status == s).count();
        let total_completed = count(RepStatus::Completed);
        let total_canceled = count(RepStatus::Canceled);
        WeekStatus {
            week,
            start,
            end,
            requirement_met: total_completed >= 1,
            total_committed: reps.len() - total_canceled,
            total_completed,
            total_active: count(RepStatus::Active),
            total_missed: count(RepStatus::Missed),
            total_canceled,
            reps,
        }
    }
}

/// Derive a week's status from the stored reps, optionally cohort-scoped.
pub fn status_for(
    root: &Path,
    user: &str,
    week: WeekId,
    cohort: Option<&str>,
    tz: FixedOffset,
) -> Result<WeekStatus> {
    let reps = Rep::list_week(root, user, week, cohort)?;
    Ok(WeekStatus::compute(week, reps, tz))
}

// ---------------------------------------------------------------------------
// WeeklyStats
// ---------------------------------------------------------------------------

/// Denormalized per-(user, week) summary document. Treated strictly as a
/// cache: recomputable from the rep set at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week: WeekId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cohort: String,
    pub requirement_met: bool,
    pub committed: usize,
    pub completed: usize,
    pub missed: usize,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyStats {
    pub fn load(root: &Path, user: &str, week: WeekId) -> Result<Option<Self>> {
        io::load_doc(&paths::week_stats_path(root, user, &week.to_string()))
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        io::save_doc(
            &paths::week_stats_path(root, user, &self.week.to_string()),
            self,
        )
    }

    /// All recorded stats documents for a user, most recent week first.
    pub fn list(root: &Path, user: &str) -> Result<Vec<Self>> {
        let dir = paths::weeks_dir(root, user);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut all = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(stats) = io::load_doc::<WeeklyStats>(&entry.path())? {
                all.push(stats);
            }
        }
        all.sort_by(|a, b| b.week.cmp(&a.week));
        Ok(all)
    }
}

/// Recompute and overwrite the stats document for a week. Idempotent: with no
/// intervening rep mutation, repeated calls produce the same document (modulo
/// `updated_at`). Invoked from within every rep-mutating operation.
pub fn persist(
    root: &Path,
    user: &str,
    week: WeekId,
    cohort: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<WeeklyStats> {
    let status = status_for(root, user, week, None, tz)?;
    let stats = WeeklyStats {
        week,
        start: status.start,
        end: status.end,
        cohort: cohort.to_string(),
        requirement_met: status.requirement_met,
        committed: status.total_committed,
        completed: status.total_completed,
        missed: status.total_missed,
        updated_at: now,
    };
    stats.save(root, user)?;
    Ok(stats)
}

/// Length of the most recent contiguous run of recorded weeks whose
/// requirement was not met, walking week ids descending and stopping at the
/// first met week. Weeks with no stats document at all are skipped, not
/// counted — a week with zero engagement never wrote a document, and whether
/// such silence should escalate is a coaching-policy call, not an engine one.
pub fn consecutive_missed_weeks(root: &Path, user: &str, cohort: Option<&str>) -> Result<u32> {
    let mut count = 0;
    for stats in WeeklyStats::list(root, user)? {
        if let Some(c) = cohort {
            if stats.cohort != c {
                continue;
            }
        }
        if stats.requirement_met {
            break;
        }
        count += 1;
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Coach-facing roster: one row per cohort member, joining the week's status,
//! the missed-week run, and the computed nudge. Read-only over the store,
//! but sweeps overdue reps first so the view reflects expired deadlines.

use crate::error::Result;
use crate::nudge::{self, Nudge};
use crate::paths;
use crate::rep::{self, Rep};
use crate::stats::{self, WeeklyStats};
use crate::week::WeekId;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user: String,
    pub week: WeekId,
    pub requirement_met: bool,
    pub completed: usize,
    pub active: usize,
    pub missed: usize,
    pub consecutive_missed_weeks: u32,
    pub nudge: Nudge,
}

/// Build the cohort roster for a week. Users with no reps or stats in the
/// cohort are omitted — they were never enrolled as far as the store knows.
pub fn roster(
    root: &Path,
    cohort: &str,
    week: WeekId,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Vec<RosterEntry>> {
    let mut entries = Vec::new();
    for user in paths::list_users(root)? {
        let in_cohort = Rep::list(root, &user)?.iter().any(|r| r.cohort == cohort)
            || WeeklyStats::list(root, &user)?
                .iter()
                .any(|s| s.cohort == cohort);
        if !in_cohort {
            continue;
        }

        rep::sweep_overdue(root, &user, Some(cohort), now, tz)?;

        let status = stats::status_for(root, &user, week, Some(cohort), tz)?;
        let missed_run = stats::consecutive_missed_weeks(root, &user, Some(cohort))?;
        let nudge = nudge::decide(now, tz, &status, missed_run);

        entries.push(RosterEntry {
            user,
            week,
            requirement_met: status.requirement_met,
            completed: status.total_completed,
            active: status.total_active,
            missed: status.total_missed,
            consecutive_missed_weeks: missed_run,
            nudge,
        });
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

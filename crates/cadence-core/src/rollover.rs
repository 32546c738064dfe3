//! End-of-day rollover: archive the live practice document, carry unfinished
//! work into tomorrow, and advance the streak.
//!
//! Invoked once per user per day by an external scheduler. Every step is
//! idempotent against re-invocation on the same logical date: the date guard
//! turns a double run into a no-op, and the archive/history writes dedup by
//! id or date. Users are processed sequentially; one user's failure never
//! aborts the batch.

use crate::error::{CadenceError, Result};
use crate::paths;
use crate::practice::{
    self, Morning, PracticeState, RepDayRecord, ReflectionRecord, ScorecardRecord, StreakEntry,
    WinRecord,
};
use crate::types::CommitmentStatus;
use crate::week;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverOutcome {
    /// The day was archived and the live state reset for tomorrow.
    Rolled,
    /// The user has no live practice document; nothing to roll.
    NoLiveState,
    /// The live state already carries tomorrow's date (double invocation).
    AlreadyRolled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverSummary {
    pub processed: u32,
    pub skipped: u32,
    pub errors: u32,
}

// ---------------------------------------------------------------------------
// Per-user rollover
// ---------------------------------------------------------------------------

/// Roll one user's day over. `now` is evaluated in the reference timezone to
/// derive today and tomorrow; the archived date is whatever the live document
/// is stamped with.
pub fn run_user(
    root: &Path,
    user: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<RolloverOutcome> {
    if !paths::user_dir(root, user).exists() {
        return Err(CadenceError::UserNotFound(user.to_string()));
    }
    let Some(state) = PracticeState::load(root, user)? else {
        return Ok(RolloverOutcome::NoLiveState);
    };

    let today = week::local_date(now, tz);
    let tomorrow = week::next_date(today);
    let data_date = state.date;
    if data_date == tomorrow {
        return Ok(RolloverOutcome::AlreadyRolled);
    }

    // Freeze the day before touching anything else.
    practice::archive_write(root, user, &state)?;

    let mut next = state.clone();
    next.date = tomorrow;

    // Morning carry-over: unfinished wins with text survive; finished ones go
    // to the wins log. Empty unfinished items are dropped.
    let mut carried_wins = Vec::new();
    for win in &state.morning.wins {
        if win.done {
            next.log_win(WinRecord {
                id: win.id.clone(),
                text: win.text.clone(),
                date: data_date,
            });
        } else if !win.text.trim().is_empty() {
            let mut carried = win.clone();
            carried.saved = true;
            carried_wins.push(carried);
        }
    }
    next.morning = Morning {
        priority: String::new(),
        priority_done: false,
        wins: carried_wins,
    };

    // Commitments: committed ones are summarized per day, the rest carry.
    let (committed, carried_reps): (Vec<_>, Vec<_>) = state
        .day_reps
        .iter()
        .cloned()
        .partition(|r| r.status == CommitmentStatus::Committed);
    if !committed.is_empty() {
        next.log_rep_day(RepDayRecord {
            date: data_date,
            committed: committed.len(),
            items: committed.iter().map(|r| r.text.clone()).collect(),
        });
    }
    next.day_reps = carried_reps;

    if state.evening.has_reflection() {
        next.log_reflection(ReflectionRecord {
            date: data_date,
            went_well: state.evening.went_well.clone(),
            got_hard: state.evening.got_hard.clone(),
            tomorrow_shift: state.evening.tomorrow_shift.clone(),
        });
    }
    next.log_scorecard(ScorecardRecord {
        date: data_date,
        tallies: state.scorecard.clone(),
    });

    // Streak: activity extends it, weekends preserve it, weekdays without
    // activity reset it.
    let did_activity = state.did_activity();
    let weekend = week::is_weekend(data_date);
    if did_activity {
        next.streak = state.streak + 1;
        next.last_streak_date = Some(data_date);
    } else if !weekend {
        next.streak = 0;
    }
    next.log_streak(StreakEntry {
        date: data_date,
        streak: next.streak,
        did_activity,
        weekend,
    });

    // Tomorrow starts clean.
    next.evening = Default::default();
    next.scorecard = BTreeMap::new();
    next.grounding_done = false;

    next.save(root, user)?;
    Ok(RolloverOutcome::Rolled)
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Roll every user. Per-user failures are logged with the user id and
/// counted; a failure to enumerate users propagates so the scheduler can mark
/// the whole run failed.
pub fn run_all(root: &Path, now: DateTime<Utc>, tz: FixedOffset) -> Result<RolloverSummary> {
    let users = paths::list_users(root)?;
    let mut summary = RolloverSummary::default();
    for user in users {
        match run_user(root, &user, now, tz) {
            Ok(RolloverOutcome::Rolled) => summary.processed += 1,
            Ok(outcome) => {
                tracing::debug!(user = %user, ?outcome, "rollover skipped");
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "rollover failed");
                summary.errors += 1;
            }
        }
    }
    tracing::info!(
        processed = summary.processed,
        skipped = summary.skipped,
        errors = summary.errors,
        "daily rollover complete"
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Noon on the given date in the reference timezone.
    fn noon(d: NaiveDate) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(
            chrono::Datelike::year(&d),
            chrono::Datelike::month(&d),
            chrono::Datelike::day(&d),
            12,
            0,
            0,
        )
        .unwrap()
    }

    // 2026-08-31 is a Monday.
    fn monday() -> NaiveDate {
        date(2026, 8, 31)
    }

    #[test]
    fn missing_live_state_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(paths::user_dir(dir.path(), "maria")).unwrap();
        assert_eq!(
            run_user(dir.path(), "maria", noon(monday()), tz()).unwrap(),
            RolloverOutcome::NoLiveState
        );
    }

    #[test]
    fn unknown_user_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_user(dir.path(), "nobody", noon(monday()), tz()),
            Err(CadenceError::UserNotFound(_))
        ));
    }

    #[test]
    fn carry_over_filters_wins() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        let a = state.add_win("send the recap").unwrap().id.clone();
        state.add_win("draft goals");
        state.add_win(""); // empty, incomplete: dropped
        state.complete_win(&a);
        state.save(dir.path(), "maria").unwrap();

        run_user(dir.path(), "maria", noon(monday()), tz()).unwrap();

        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.date, date(2026, 9, 1));
        assert_eq!(next.morning.wins.len(), 1);
        assert_eq!(next.morning.wins[0].text, "draft goals");
        assert!(next.morning.wins[0].saved);
        assert!(!next.morning.wins[0].done);

        assert_eq!(next.wins_history.len(), 1);
        assert_eq!(next.wins_history[0].text, "send the recap");
        assert_eq!(next.wins_history[0].date, monday());
    }

    #[test]
    fn committed_reps_logged_planned_reps_carried() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        let done = state.add_day_rep("recognize ana in standup").id.clone();
        state.add_day_rep("ask sam about the deadline");
        state.commit_day_rep(&done);
        state.save(dir.path(), "maria").unwrap();

        run_user(dir.path(), "maria", noon(monday()), tz()).unwrap();

        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.day_reps.len(), 1);
        assert_eq!(next.day_reps[0].text, "ask sam about the deadline");
        assert_eq!(next.reps_history.len(), 1);
        assert_eq!(next.reps_history[0].committed, 1);
        assert_eq!(
            next.reps_history[0].items,
            vec!["recognize ana in standup".to_string()]
        );
    }

    #[test]
    fn streak_increments_on_activity() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        state.streak = 4;
        state.grounding_done = true;
        state.save(dir.path(), "maria").unwrap();

        run_user(dir.path(), "maria", noon(monday()), tz()).unwrap();
        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.streak, 5);
        assert_eq!(next.last_streak_date, Some(monday()));
        let entry = next.streak_history.last().unwrap();
        assert!(entry.did_activity);
        assert!(!entry.weekend);
        assert_eq!(entry.streak, 5);
    }

    #[test]
    fn streak_resets_on_idle_weekday() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        state.streak = 4;
        state.save(dir.path(), "maria").unwrap();

        run_user(dir.path(), "maria", noon(monday()), tz()).unwrap();
        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.streak, 0);
    }

    #[test]
    fn weekend_grace_preserves_streak() {
        for day in [date(2026, 8, 29), date(2026, 8, 30)] {
            let dir = TempDir::new().unwrap();
            let mut state = PracticeState::new(day);
            state.streak = 4;
            state.save(dir.path(), "maria").unwrap();

            run_user(dir.path(), "maria", noon(day), tz()).unwrap();
            let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
            assert_eq!(next.streak, 4, "streak must survive idle {day}");
            assert!(next.streak_history.last().unwrap().weekend);
        }
    }

    #[test]
    fn reflection_and_scorecard_logged() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        state.set_reflection("good 1:1", "", "start on time");
        state.record_score("bookends", 2, 2);
        state.save(dir.path(), "maria").unwrap();

        run_user(dir.path(), "maria", noon(monday()), tz()).unwrap();
        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.reflections_history.len(), 1);
        assert_eq!(next.reflections_history[0].went_well, "good 1:1");
        assert_eq!(next.scorecard_history.len(), 1);
        assert_eq!(
            next.scorecard_history[0].tallies["bookends"],
            practice::Tally { done: 2, total: 2 }
        );
        // Tomorrow starts clean.
        assert!(!next.evening.has_reflection());
        assert!(next.scorecard.is_empty());
        assert!(!next.grounding_done);
    }

    #[test]
    fn double_rollover_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let mut state = PracticeState::new(monday());
        state.streak = 1;
        state.grounding_done = true;
        state.save(dir.path(), "maria").unwrap();

        let now = noon(monday());
        assert_eq!(
            run_user(dir.path(), "maria", now, tz()).unwrap(),
            RolloverOutcome::Rolled
        );
        assert_eq!(
            run_user(dir.path(), "maria", now, tz()).unwrap(),
            RolloverOutcome::AlreadyRolled
        );

        let next = PracticeState::load(dir.path(), "maria").unwrap().unwrap();
        assert_eq!(next.streak, 2, "streak must not double-increment");
        assert_eq!(next.streak_history.len(), 1);

        // Archive written once, for the archived date.
        let archived = practice::archive_load(dir.path(), "maria", monday())
            .unwrap()
            .unwrap();
        assert_eq!(archived.date, monday());
        assert!(archived.grounding_done);
    }

    #[test]
    fn batch_isolates_per_user_failures() {
        let dir = TempDir::new().unwrap();

        let state = PracticeState::new(monday());
        state.save(dir.path(), "ana").unwrap();

        // A corrupt live document for another user must not stop the batch.
        let bad = paths::practice_path(dir.path(), "zoe");
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&bad, "{{not yaml").unwrap();

        // And a user with no document is skipped, not errored.
        std::fs::create_dir_all(paths::user_dir(dir.path(), "kim")).unwrap();

        let summary = run_all(dir.path(), noon(monday()), tz()).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
    }
}

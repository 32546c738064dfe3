//! Rep documents and the lifecycle engine.
//!
//! A rep is a single committed leadership action, tracked against its week's
//! window. Transitions: `active -> {completed, canceled, missed}`; a missed
//! rep can seed a roll-forward (a new active rep in the current week) but
//! never leaves the missed state itself. Reps are never hard-deleted.
//!
//! Every mutating operation re-persists the affected week's stats document in
//! the same logical unit, so the denormalized cache is a post-condition of
//! the mutation rather than caller discipline.

use crate::error::{CadenceError, Result};
use crate::io;
use crate::paths;
use crate::stats;
use crate::types::{RepKind, RepStatus};
use crate::week::WeekId;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Rep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rep {
    pub id: String,
    pub user: String,
    pub cohort: String,
    /// The counterpart this action is directed at.
    pub person: String,
    pub kind: RepKind,
    pub status: RepStatus,
    pub week: WeekId,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Id of the missed rep this one was rolled forward from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolled_forward_from: Option<String>,
}

/// Fields accepted by [`commit`].
#[derive(Debug, Clone)]
pub struct NewRep {
    pub person: String,
    pub kind: RepKind,
    pub cohort: String,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub rolled_forward_from: Option<String>,
}

/// Mutable fields accepted by [`update`]. Status is never settable here.
#[derive(Debug, Clone, Default)]
pub struct RepPatch {
    pub person: Option<String>,
    pub kind: Option<RepKind>,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Rep {
    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path, user: &str, id: &str) -> Result<Self> {
        io::load_doc(&paths::rep_path(root, user, id))?
            .ok_or_else(|| CadenceError::RepNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        io::save_doc(&paths::rep_path(root, &self.user, &self.id), self)
    }

    /// All reps for a user, oldest first. Missing directory means no reps.
    pub fn list(root: &Path, user: &str) -> Result<Vec<Self>> {
        let dir = paths::reps_dir(root, user);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut reps = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(rep) = io::load_doc::<Rep>(&entry.path())? {
                reps.push(rep);
            }
        }
        reps.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reps)
    }

    /// Reps committed in a given week, optionally scoped to a cohort.
    pub fn list_week(
        root: &Path,
        user: &str,
        week: WeekId,
        cohort: Option<&str>,
    ) -> Result<Vec<Self>> {
        let mut reps = Self::list(root, user)?;
        reps.retain(|r| r.week == week && cohort.map(|c| r.cohort == c).unwrap_or(true));
        Ok(reps)
    }

    /// Reps still in play for deadline evaluation: active and missed.
    pub fn list_open(root: &Path, user: &str, cohort: Option<&str>) -> Result<Vec<Self>> {
        let mut reps = Self::list(root, user)?;
        reps.retain(|r| {
            matches!(r.status, RepStatus::Active | RepStatus::Missed)
                && cohort.map(|c| r.cohort == c).unwrap_or(true)
        });
        Ok(reps)
    }

    fn ensure_not_terminal(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(CadenceError::TerminalRep {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle operations
// ---------------------------------------------------------------------------

/// Commit a new rep for the week containing `now`. The deadline defaults to
/// that week's Saturday-end boundary unless explicitly given.
pub fn commit(
    root: &Path,
    user: &str,
    new: NewRep,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Rep> {
    paths::validate_id(user)?;
    if new.person.trim().is_empty() {
        return Err(CadenceError::MissingField("person"));
    }
    if new.cohort.trim().is_empty() {
        return Err(CadenceError::MissingField("cohort"));
    }
    paths::validate_id(&new.cohort)?;

    let week = WeekId::of(now, tz);
    let rep = Rep {
        id: uuid::Uuid::new_v4().to_string(),
        user: user.to_string(),
        cohort: new.cohort.clone(),
        person: new.person,
        kind: new.kind,
        status: RepStatus::Active,
        week,
        deadline: new.deadline.unwrap_or_else(|| week.default_deadline(tz)),
        created_at: now,
        updated_at: now,
        completed_at: None,
        canceled_at: None,
        cancel_reason: None,
        notes: new.notes,
        rolled_forward_from: new.rolled_forward_from,
    };
    rep.save(root)?;
    stats::persist(root, user, week, &new.cohort, now, tz)?;
    Ok(rep)
}

/// Edit the mutable fields of a non-terminal rep.
pub fn update(
    root: &Path,
    user: &str,
    id: &str,
    patch: RepPatch,
    now: DateTime<Utc>,
) -> Result<Rep> {
    let mut rep = Rep::load(root, user, id)?;
    rep.ensure_not_terminal()?;

    if let Some(person) = patch.person {
        if person.trim().is_empty() {
            return Err(CadenceError::MissingField("person"));
        }
        rep.person = person;
    }
    if let Some(kind) = patch.kind {
        rep.kind = kind;
    }
    if let Some(deadline) = patch.deadline {
        rep.deadline = deadline;
    }
    if let Some(notes) = patch.notes {
        rep.notes = Some(notes);
    }
    rep.updated_at = now;
    rep.save(root)?;
    Ok(rep)
}

pub fn complete(
    root: &Path,
    user: &str,
    id: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Rep> {
    let mut rep = Rep::load(root, user, id)?;
    match rep.status {
        RepStatus::Completed => return Err(CadenceError::AlreadyCompleted(rep.id)),
        RepStatus::Canceled => return Err(CadenceError::CompleteCanceled(rep.id)),
        RepStatus::Active | RepStatus::Missed => {}
    }
    rep.status = RepStatus::Completed;
    rep.completed_at = Some(now);
    rep.updated_at = now;
    rep.save(root)?;
    stats::persist(root, user, rep.week, &rep.cohort, now, tz)?;
    Ok(rep)
}

pub fn cancel(
    root: &Path,
    user: &str,
    id: &str,
    reason: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Rep> {
    if reason.trim().is_empty() {
        return Err(CadenceError::CancelReasonRequired);
    }
    let mut rep = Rep::load(root, user, id)?;
    rep.ensure_not_terminal()?;
    rep.status = RepStatus::Canceled;
    rep.cancel_reason = Some(reason.trim().to_string());
    rep.canceled_at = Some(now);
    rep.updated_at = now;
    rep.save(root)?;
    stats::persist(root, user, rep.week, &rep.cohort, now, tz)?;
    Ok(rep)
}

/// Transition an active rep to missed. Returns false without touching the
/// document when the rep is not active — the sweep routinely re-visits
/// already-settled reps, so this is a no-op rather than an error.
pub fn mark_missed(
    root: &Path,
    user: &str,
    id: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<bool> {
    let mut rep = Rep::load(root, user, id)?;
    if rep.status != RepStatus::Active {
        return Ok(false);
    }
    rep.status = RepStatus::Missed;
    rep.updated_at = now;
    rep.save(root)?;
    stats::persist(root, user, rep.week, &rep.cohort, now, tz)?;
    Ok(true)
}

/// Create a new active rep in the current week from a missed one, carrying
/// over person, kind, and notes, with a back-reference to the source. The
/// source rep keeps its missed status.
pub fn roll_forward(
    root: &Path,
    user: &str,
    id: &str,
    cohort: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Rep> {
    let source = Rep::load(root, user, id)?;
    if source.status != RepStatus::Missed {
        return Err(CadenceError::NotMissed {
            id: source.id,
            status: source.status.to_string(),
        });
    }
    commit(
        root,
        user,
        NewRep {
            person: source.person.clone(),
            kind: source.kind,
            cohort: cohort.to_string(),
            deadline: None,
            notes: source.notes.clone(),
            rolled_forward_from: Some(source.id.clone()),
        },
        now,
        tz,
    )
}

/// Lazily detect overdue work: every active rep whose deadline is strictly
/// before `now` is transitioned to missed. There is no background timer —
/// read paths that need an up-to-date view call this first (app load,
/// periodic poll). Returns the ids that were newly marked.
pub fn sweep_overdue(
    root: &Path,
    user: &str,
    cohort: Option<&str>,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Vec<String>> {
    let open = Rep::list_open(root, user, cohort)?;
    let mut swept = Vec::new();
    for rep in open {
        if rep.status == RepStatus::Active && rep.deadline < now {
            if mark_missed(root, user, &rep.id, now, tz)? {
                swept.push(rep.id);
            }
        }
    }
    Ok(swept)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    // Monday of 2026-W36.
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 31, 9, 0, 0).unwrap()
    }

    fn new_rep(person: &str) -> NewRep {
        NewRep {
            person: person.to_string(),
            kind: RepKind::Feedback,
            cohort: "spring-26".to_string(),
            deadline: None,
            notes: None,
            rolled_forward_from: None,
        }
    }

    #[test]
    fn commit_assigns_week_and_default_deadline() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();

        assert_eq!(rep.status, RepStatus::Active);
        assert_eq!(rep.week, WeekId::of(monday(), tz()));
        assert_eq!(rep.deadline, rep.week.default_deadline(tz()));

        let loaded = Rep::load(dir.path(), "maria", &rep.id).unwrap();
        assert_eq!(loaded.person, "jordan");
    }

    #[test]
    fn commit_requires_person_and_cohort() {
        let dir = TempDir::new().unwrap();
        let mut missing_person = new_rep("  ");
        missing_person.person = "   ".to_string();
        assert!(matches!(
            commit(dir.path(), "maria", missing_person, monday(), tz()),
            Err(CadenceError::MissingField("person"))
        ));

        let mut missing_cohort = new_rep("jordan");
        missing_cohort.cohort = String::new();
        assert!(matches!(
            commit(dir.path(), "maria", missing_cohort, monday(), tz()),
            Err(CadenceError::MissingField("cohort"))
        ));
    }

    #[test]
    fn commit_writes_week_stats() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        let path = paths::week_stats_path(dir.path(), "maria", &rep.week.to_string());
        assert!(path.exists());
    }

    #[test]
    fn update_edits_allowed_fields_only() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();

        let later = monday() + chrono::Duration::hours(1);
        let updated = update(
            dir.path(),
            "maria",
            &rep.id,
            RepPatch {
                person: Some("sam".to_string()),
                notes: Some("prep talking points".to_string()),
                ..Default::default()
            },
            later,
        )
        .unwrap();
        assert_eq!(updated.person, "sam");
        assert_eq!(updated.notes.as_deref(), Some("prep talking points"));
        assert_eq!(updated.status, RepStatus::Active);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn terminal_reps_are_immutable() {
        let dir = TempDir::new().unwrap();
        let done = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        complete(dir.path(), "maria", &done.id, monday(), tz()).unwrap();

        let gone = commit(dir.path(), "maria", new_rep("alex"), monday(), tz()).unwrap();
        cancel(dir.path(), "maria", &gone.id, "left the team", monday(), tz()).unwrap();

        for id in [&done.id, &gone.id] {
            assert!(matches!(
                update(
                    dir.path(),
                    "maria",
                    id,
                    RepPatch {
                        person: Some("x".to_string()),
                        ..Default::default()
                    },
                    monday()
                ),
                Err(CadenceError::TerminalRep { .. })
            ));
            assert!(cancel(dir.path(), "maria", id, "reason", monday(), tz()).is_err());
            // Not an error, but also not a transition.
            assert!(!mark_missed(dir.path(), "maria", id, monday(), tz()).unwrap());
        }

        assert!(matches!(
            complete(dir.path(), "maria", &done.id, monday(), tz()),
            Err(CadenceError::AlreadyCompleted(_))
        ));
        assert!(matches!(
            complete(dir.path(), "maria", &gone.id, monday(), tz()),
            Err(CadenceError::CompleteCanceled(_))
        ));
    }

    #[test]
    fn cancel_requires_reason() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        for reason in ["", "   "] {
            assert!(matches!(
                cancel(dir.path(), "maria", &rep.id, reason, monday(), tz()),
                Err(CadenceError::CancelReasonRequired)
            ));
        }
        // Also required when canceling a missed rep.
        mark_missed(dir.path(), "maria", &rep.id, monday(), tz()).unwrap();
        assert!(matches!(
            cancel(dir.path(), "maria", &rep.id, " ", monday(), tz()),
            Err(CadenceError::CancelReasonRequired)
        ));
        let canceled =
            cancel(dir.path(), "maria", &rep.id, "  no longer relevant ", monday(), tz()).unwrap();
        assert_eq!(canceled.cancel_reason.as_deref(), Some("no longer relevant"));
        assert!(canceled.canceled_at.is_some());
    }

    #[test]
    fn roll_forward_preserves_lineage() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        mark_missed(dir.path(), "maria", &rep.id, monday(), tz()).unwrap();

        let next_week = monday() + chrono::Duration::days(7);
        let rolled =
            roll_forward(dir.path(), "maria", &rep.id, "spring-26", next_week, tz()).unwrap();

        assert_eq!(rolled.rolled_forward_from.as_deref(), Some(rep.id.as_str()));
        assert_eq!(rolled.status, RepStatus::Active);
        assert_eq!(rolled.person, "jordan");
        assert_eq!(rolled.week, WeekId::of(next_week, tz()));

        let source = Rep::load(dir.path(), "maria", &rep.id).unwrap();
        assert_eq!(source.status, RepStatus::Missed);
    }

    #[test]
    fn roll_forward_requires_missed_source() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        assert!(matches!(
            roll_forward(dir.path(), "maria", &rep.id, "spring-26", monday(), tz()),
            Err(CadenceError::NotMissed { .. })
        ));
    }

    #[test]
    fn sweep_marks_only_overdue_active_reps() {
        let dir = TempDir::new().unwrap();
        let overdue = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        let mut extended = new_rep("alex");
        extended.deadline = Some(overdue.deadline + chrono::Duration::days(7));
        let current = commit(dir.path(), "maria", extended, monday(), tz()).unwrap();

        // Past this week's Saturday boundary but before the extended deadline.
        let after_deadline = overdue.deadline + chrono::Duration::hours(1);
        let swept = sweep_overdue(dir.path(), "maria", None, after_deadline, tz()).unwrap();
        assert_eq!(swept, vec![overdue.id.clone()]);

        assert_eq!(
            Rep::load(dir.path(), "maria", &overdue.id).unwrap().status,
            RepStatus::Missed
        );
        assert_eq!(
            Rep::load(dir.path(), "maria", &current.id).unwrap().status,
            RepStatus::Active
        );

        // Re-running the sweep settles nothing new.
        let again = sweep_overdue(dir.path(), "maria", None, after_deadline, tz()).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn sweep_leaves_future_deadlines_alone() {
        let dir = TempDir::new().unwrap();
        let rep = commit(dir.path(), "maria", new_rep("jordan"), monday(), tz()).unwrap();
        let before_deadline = rep.deadline - chrono::Duration::hours(1);
        let swept = sweep_overdue(dir.path(), "maria", None, before_deadline, tz()).unwrap();
        assert!(swept.is_empty());
        let loaded = Rep::load(dir.path(), "maria", &rep.id).unwrap();
        assert_eq!(loaded.status, RepStatus::Active);
    }

    #[test]
    fn list_orders_by_creation() {
        let dir = TempDir::new().unwrap();
        let first = commit(dir.path(), "maria", new_rep("a"), monday(), tz()).unwrap();
        let second = commit(
            dir.path(),
            "maria",
            new_rep("b"),
            monday() + chrono::Duration::minutes(5),
            tz(),
        )
        .unwrap();
        let reps = Rep::list(dir.path(), "maria").unwrap();
        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0].id, first.id);
        assert_eq!(reps[1].id, second.id);
    }

    #[test]
    fn load_missing_rep() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Rep::load(dir.path(), "maria", "nope"),
            Err(CadenceError::RepNotFound(_))
        ));
    }
}

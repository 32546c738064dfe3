//! Nudge policy: decides how urgently to prompt a user (or flag their coach)
//! given the week's status and the recent missed-week run.
//!
//! Pure and total — every input combination maps to exactly one level, first
//! match wins. Delivery (push/email/SMS) is someone else's problem; this only
//! computes what to say and when.

use crate::stats::WeekStatus;
use crate::types::NudgeLevel;
use crate::week;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Day-of-week index (Sunday = 0) from which mid-week prompts kick in.
const THURSDAY: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nudge {
    pub level: NudgeLevel,
    pub message: String,
}

impl Nudge {
    fn new(level: NudgeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Decide the nudge for `now` given the week's status and the count of
/// consecutive requirement-missed weeks.
pub fn decide(
    now: DateTime<Utc>,
    tz: FixedOffset,
    status: &WeekStatus,
    consecutive_missed: u32,
) -> Nudge {
    if status.requirement_met {
        return Nudge::new(
            NudgeLevel::None,
            format!("Rep requirement met for {}.", status.week),
        );
    }

    if consecutive_missed >= 2 {
        return Nudge::new(
            NudgeLevel::Escalation,
            format!(
                "{consecutive_missed} weeks in a row without a completed rep — flagged for your coach."
            ),
        );
    }

    let today = week::local_date(now, tz);
    let dow = week::day_of_week(today);

    if status.total_committed == 0 {
        if dow >= THURSDAY {
            return Nudge::new(
                NudgeLevel::Warning,
                format!(
                    "No rep committed for {} and the week closes Saturday.",
                    status.week
                ),
            );
        }
        return Nudge::new(
            NudgeLevel::Reminder,
            format!("Commit a rep for {}.", status.week),
        );
    }

    if status.total_active >= 1 {
        if week::days_until_saturday(today) <= 1 {
            return Nudge::new(
                NudgeLevel::Urgent,
                format!(
                    "{} open rep(s) and the week closes tomorrow night.",
                    status.total_active
                ),
            );
        }
        if dow >= THURSDAY {
            return Nudge::new(
                NudgeLevel::Reminder,
                format!("{} open rep(s) this week.", status.total_active),
            );
        }
    }

    Nudge::new(NudgeLevel::None, String::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

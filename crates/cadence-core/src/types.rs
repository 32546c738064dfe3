use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RepStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a rep. `Completed` and `Canceled` are terminal;
/// `Missed` is terminal for the rep itself but may seed a roll-forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepStatus {
    Active,
    Completed,
    Canceled,
    Missed,
}

impl RepStatus {
    pub fn all() -> &'static [RepStatus] {
        &[
            RepStatus::Active,
            RepStatus::Completed,
            RepStatus::Canceled,
            RepStatus::Missed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepStatus::Active => "active",
            RepStatus::Completed => "completed",
            RepStatus::Canceled => "canceled",
            RepStatus::Missed => "missed",
        }
    }

    /// No field edits are allowed once a rep reaches a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, RepStatus::Completed | RepStatus::Canceled)
    }
}

impl fmt::Display for RepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepStatus {
    type Err = crate::error::CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RepStatus::Active),
            "completed" => Ok(RepStatus::Completed),
            "canceled" => Ok(RepStatus::Canceled),
            "missed" => Ok(RepStatus::Missed),
            _ => Err(crate::error::CadenceError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RepKind
// ---------------------------------------------------------------------------

/// Fixed taxonomy of leadership micro-actions a rep can commit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepKind {
    Feedback,
    Recognition,
    HardConversation,
    Delegation,
    CoachingQuestion,
    Boundary,
}

impl RepKind {
    pub fn all() -> &'static [RepKind] {
        &[
            RepKind::Feedback,
            RepKind::Recognition,
            RepKind::HardConversation,
            RepKind::Delegation,
            RepKind::CoachingQuestion,
            RepKind::Boundary,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepKind::Feedback => "feedback",
            RepKind::Recognition => "recognition",
            RepKind::HardConversation => "hard_conversation",
            RepKind::Delegation => "delegation",
            RepKind::CoachingQuestion => "coaching_question",
            RepKind::Boundary => "boundary",
        }
    }
}

impl fmt::Display for RepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepKind {
    type Err = crate::error::CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feedback" => Ok(RepKind::Feedback),
            "recognition" => Ok(RepKind::Recognition),
            "hard_conversation" | "hard-conversation" => Ok(RepKind::HardConversation),
            "delegation" => Ok(RepKind::Delegation),
            "coaching_question" | "coaching-question" => Ok(RepKind::CoachingQuestion),
            "boundary" => Ok(RepKind::Boundary),
            _ => Err(crate::error::CadenceError::InvalidKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CommitmentStatus
// ---------------------------------------------------------------------------

/// State of a daily commitment inside the practice document. `Committed` is
/// terminal; anything else carries over at rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    Planned,
    Committed,
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitmentStatus::Planned => "planned",
            CommitmentStatus::Committed => "committed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// NudgeLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeLevel {
    None,
    Reminder,
    Warning,
    Urgent,
    Escalation,
}

impl NudgeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NudgeLevel::None => "none",
            NudgeLevel::Reminder => "reminder",
            NudgeLevel::Warning => "warning",
            NudgeLevel::Urgent => "urgent",
            NudgeLevel::Escalation => "escalation",
        }
    }
}

impl fmt::Display for NudgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_roundtrip() {
        for status in RepStatus::all() {
            let parsed = RepStatus::from_str(status.as_str()).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(RepStatus::Completed.is_terminal());
        assert!(RepStatus::Canceled.is_terminal());
        assert!(!RepStatus::Active.is_terminal());
        // Missed is not terminal for mutation purposes: it can be rolled forward.
        assert!(!RepStatus::Missed.is_terminal());
    }

    #[test]
    fn kind_roundtrip() {
        for kind in RepKind::all() {
            let parsed = RepKind::from_str(kind.as_str()).unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn kind_accepts_hyphenated_aliases() {
        assert_eq!(
            RepKind::from_str("hard-conversation").unwrap(),
            RepKind::HardConversation
        );
    }

    #[test]
    fn unknown_values_name_the_problem() {
        let err = RepKind::from_str("bogus").unwrap_err();
        assert_eq!(err.to_string(), "unknown rep kind 'bogus'");
        let err = RepStatus::from_str("pending").unwrap_err();
        assert_eq!(err.to_string(), "unknown rep status 'pending'");
    }

    #[test]
    fn nudge_levels_ordered_by_severity() {
        assert!(NudgeLevel::None < NudgeLevel::Reminder);
        assert!(NudgeLevel::Urgent < NudgeLevel::Escalation);
    }
}

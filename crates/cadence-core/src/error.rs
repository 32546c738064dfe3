use thiserror::Error;

#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("not initialized: run 'cadence init'")]
    NotInitialized,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("cancel reason is required")]
    CancelReasonRequired,

    #[error("invalid id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("unknown rep status '{0}'")]
    InvalidStatus(String),

    #[error("unknown rep kind '{0}'")]
    InvalidKind(String),

    #[error("invalid week id '{0}': expected YYYY-Www")]
    InvalidWeekId(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("rep not found: {0}")]
    RepNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("cannot mutate rep {id}: already {status}")]
    TerminalRep { id: String, status: String },

    #[error("rep {0} is already completed")]
    AlreadyCompleted(String),

    #[error("cannot complete rep {0}: it was canceled")]
    CompleteCanceled(String),

    #[error("cannot roll forward rep {id}: status is {status}, not missed")]
    NotMissed { id: String, status: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CadenceError>;

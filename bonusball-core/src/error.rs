use thiserror::Error;

pub type Result<T> = std::result::Result<T, BonusBallError>;

#[derive(Error, Debug)]
pub enum BonusBallError {
    #[error("Invalid selection: ball {number} is outside 1..={total}")]
    InvalidSelection { number: u32, total: u32 },

    #[error("Invalid duration: {weeks} weeks (must be a positive whole number)")]
    InvalidDuration { weeks: i64 },

    #[error("Stale pool state: expected version {expected}, store holds {found}")]
    StaleState { expected: u64, found: u64 },

    #[error("Access denied")]
    AccessDenied,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Result lookup error: {0}")]
    Lookup(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl BonusBallError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for BonusBallError {
    fn from(err: dialoguer::Error) -> Self {
        BonusBallError::Dialog(err.to_string())
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API key rejected ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("No players found in the Challenger/Grandmaster/Master leaderboards")]
    NoLeaderboardData,
}

impl AppError {
    /// Only a rejected credential aborts a run; everything else is absorbed
    /// at the match, player or tier boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// How the client reacts to a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    RateLimited,
    NotFound,
    Unauthorized,
    Other,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => StatusClass::RateLimited,
            404 => StatusClass::NotFound,
            401 | 403 => StatusClass::Unauthorized,
            _ => StatusClass::Other,
        }
    }
}

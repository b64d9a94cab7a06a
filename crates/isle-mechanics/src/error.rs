//! Error types for the mechanics crate.

/// Errors that can occur while configuring mechanics.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A modifier table could not be parsed.
    #[error("invalid modifier table: {0}")]
    InvalidConfig(String),

    /// A die with fewer than two sides was requested.
    #[error("invalid die: {0}")]
    InvalidDie(String),
}

impl From<serde_json::Error> for MechError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

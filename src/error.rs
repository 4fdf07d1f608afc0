use thiserror::Error;

/// Typed error hierarchy for the ingestion and analytics core.
///
/// Serializes as a plain string (the presentation shell only needs an
/// `error.message`-style payload) while giving Rust code typed variants
/// that can be matched or propagated with `?`.
#[derive(Debug, Error)]
pub enum Error {
    /// A transcript with this filepath has already been ingested. The
    /// caller decides whether to skip or delete-and-replace.
    #[error("transcript already ingested: {0}")]
    DuplicateTranscript(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Io(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicateTranscript(_))
    }
}

/// Serialize as a plain string so shells receive the same `"error message"`
/// string regardless of variant.
impl serde::Serialize for Error {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

// ── From impls ─────────────────────────────────────────────────────────────

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Returns true when a rusqlite error is a UNIQUE constraint violation.
/// Used to surface re-ingestion of a known filepath as `DuplicateTranscript`.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

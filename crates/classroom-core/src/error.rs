//! Error types for the classroom core.
//!
//! Every error here is recoverable: lookups that miss, rejected input, and
//! failed snapshot I/O all leave in-memory state authoritative.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing a persisted snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot exists but is not a valid document.
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Rejected quiz session operations. A rejected call never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The selected option is outside `0..4`.
    #[error("option {0} is out of range (expected 0-3)")]
    InvalidOption(usize),

    /// The operation is not valid in the session's current state.
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    /// The player name was blank.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    /// The session was built without any questions.
    #[error("a session needs at least one question")]
    NoQuestions,
}

/// Failures from the student registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No student carries the requested identifier.
    #[error("student with ID {0} not found")]
    NotFound(i64),

    /// The operation needs at least one student.
    #[error("no students in the registry")]
    EmptyCollection,

    /// A field value was rejected before any mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A malformed question definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("expected exactly 4 options, found {0}")]
    OptionCount(usize),

    #[error("correct answer index {0} is out of range (expected 0-3)")]
    AnswerOutOfRange(usize),

    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
}

impl StoreError {
    /// Returns `true` if the snapshot existed but could not be understood.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            StoreError::Decode { .. } | StoreError::UnsupportedVersion { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(
            RegistryError::NotFound(42).to_string(),
            "student with ID 42 not found"
        );
    }

    #[test]
    fn corrupt_classification() {
        let version = StoreError::UnsupportedVersion {
            found: 9,
            expected: 1,
        };
        assert!(version.is_corrupt());

        let io = StoreError::Io {
            path: PathBuf::from("x.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!io.is_corrupt());
    }
}

//! Quiz session state machine, leaderboard, and student registry.
//!
//! This crate holds everything the front ends drive: it performs no terminal
//! I/O of its own. Persistence goes through the [`store::RecordStore`] trait.

pub mod error;
pub mod model;
pub mod questions;
pub mod registry;
pub mod scoreboard;
pub mod session;
pub mod store;

pub use error::{QuestionError, RegistryError, SessionError, StoreError};
pub use model::{Question, QuizResult, Student, StudentId, StudentPatch};
pub use registry::StudentRegistry;
pub use scoreboard::ScoreBoard;
pub use session::QuizSession;
pub use store::SaveOutcome;

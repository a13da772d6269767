pub mod init;
pub mod leaderboard;
pub mod quiz;
pub mod students;
pub mod validate;

use classroom_core::SaveOutcome;

/// Tell the user when a change could not be written to disk.
pub(crate) fn report_save(outcome: &SaveOutcome) {
    if let Some(e) = outcome.error() {
        eprintln!("Warning: change applied but not saved: {e}");
    }
}

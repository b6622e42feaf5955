use crate::journal::{format_line, EventJournal, JournalError};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::info;

const CLEANUP_NOTICE: &str = "ℹ️ No alerts in the last hour. Cleaning logs.";
const CLEANUP_MARKER: &str = "(Logs auto-cleaned after inactivity)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionAction {
    Untouched,
    Deleted,
    Cleaned,
}

pub fn enforce_retention(
    journal: &mut EventJournal,
    idle: Duration,
    now: DateTime<Local>,
) -> Result<RetentionAction, JournalError> {
    if !journal.exists() {
        return Ok(RetentionAction::Untouched);
    }

    let Some(last_write) = journal.last_write() else {
        journal.remove()?;
        info!(path = %journal.path().display(), "removed log with no recorded activity");
        return Ok(RetentionAction::Deleted);
    };

    let quiet_for = now.signed_duration_since(last_write);
    let idle_limit = chrono::Duration::from_std(idle).unwrap_or(chrono::Duration::MAX);
    if quiet_for <= idle_limit {
        return Ok(RetentionAction::Untouched);
    }

    journal.record(CLEANUP_NOTICE, now)?;
    journal.reset(&format_line(now, CLEANUP_MARKER))?;
    info!(
        path = %journal.path().display(),
        quiet_secs = quiet_for.num_seconds(),
        "log cleaned after inactivity"
    );
    Ok(RetentionAction::Cleaned)
}

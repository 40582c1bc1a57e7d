//! Activity history screen.

use chickyen_core::{ActivityKind, ActivityLog};
use chrono::TimeZone;

pub const CLEAR_LOGS_PROMPT: &str =
    "Are you sure you want to permanently delete all activity logs?";

/// Timestamp layout of a log entry.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntryView {
    pub kind: ActivityKind,
    pub description: String,
    pub admin_name: String,
    pub timestamp: String,
    pub action_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsView {
    pub title: &'static str,
    pub description: &'static str,
    pub heading: &'static str,
    /// "Clear History" is shown to owners only.
    pub can_clear: bool,
    pub entries: Vec<LogEntryView>,
}

/// Render log entries with timestamps in `tz`.
#[must_use]
pub fn render_logs<Tz>(logs: &[ActivityLog], is_owner: bool, tz: &Tz) -> LogsView
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    LogsView {
        title: "Activity History",
        description: "Audit trail of all administrative actions.",
        heading: "Recent Events",
        can_clear: is_owner,
        entries: logs
            .iter()
            .map(|log| LogEntryView {
                kind: log.kind(),
                description: log.description.clone(),
                admin_name: log.admin_name.clone(),
                timestamp: log
                    .timestamp
                    .with_timezone(tz)
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
                action_type: log.action_type.clone(),
            })
            .collect(),
    }
}

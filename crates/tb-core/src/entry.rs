//! Tracked intervals.

use serde::Serialize;

/// One tracked interval belonging to a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Storage-assigned, monotonically increasing identifier.
    pub id: i64,

    /// Name of the sheet the interval belongs to.
    pub sheet: String,

    /// Unix timestamp (seconds) the interval started.
    pub start_time: i64,

    /// Unix timestamp (seconds) the interval ended, `None` while running.
    pub end_time: Option<i64>,

    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque data owned by command hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Entry {
    /// Whether the interval is still running.
    pub const fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length in seconds, counting a running interval through `now`.
    pub fn duration_at(&self, now: i64) -> i64 {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

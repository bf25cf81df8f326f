//! Timesheet state engine.
//!
//! Clock-in, clock-out, alter, switch and kill, plus the status and report
//! queries built on them. The rules enforced here:
//! - a sheet has at most one running entry
//! - an entry never ends before it starts
//! - a new entry never starts before the sheet's most recent clock-out
//!
//! The ordering check only looks at the latest clock-out, so an entry
//! backdated with an explicit time may still overlap an older interval.
//!
//! Nothing here opens its own transaction; see the
//! [crate documentation](crate#transactions).

use chrono::TimeZone;
use tb_core::{DEFAULT_SHEET, DateRange, Entry, Report};

use crate::{Database, DbError};

/// Parameters of a clock-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockIn {
    /// Sheet to switch to before clocking in; the current sheet when `None`.
    pub switch: Option<String>,
    pub description: Option<String>,
    /// Start of the new interval (Unix seconds).
    pub at: i64,
    /// Clock out of the current sheet first, at the same time.
    pub out: bool,
    /// Reuse the description of the sheet's most recent closed interval.
    pub resume: bool,
    /// Hook data stored verbatim.
    pub extra: Option<String>,
}

/// Result of a kill request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// The caller declined; nothing changed.
    Canceled { sheet: String },
    /// The sheet's entries were deleted.
    Deleted {
        sheet: String,
        entries: usize,
        /// The current sheet moved to the default sheet.
        switched_to_default: bool,
    },
}

/// Whether a sheet is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    Idle,
    Active {
        /// Seconds since the running interval started.
        elapsed: i64,
        /// The interval's description without trailing periods.
        notes: Option<String>,
    },
}

impl Database {
    /// Starts a new interval.
    pub fn clock_in(&self, request: &ClockIn) -> Result<Entry, DbError> {
        if request.resume && request.description.is_some() {
            return Err(DbError::ConflictingDescription);
        }

        let sheet = match &request.switch {
            Some(sheet) => {
                self.switch(sheet)?;
                sheet.clone()
            }
            None => self.current_sheet()?,
        };

        if request.out {
            self.clock_out(request.at)?;
        }

        if self.active_entry(&sheet)?.is_some() {
            return Err(DbError::SheetAlreadyActive { sheet });
        }

        let mut description = request.description.clone();
        if let Some(previous) = self.last_closed_entry(&sheet)? {
            if let Some(previous_end) = previous.end_time {
                if request.at < previous_end {
                    return Err(DbError::TimeOrderingViolation {
                        at: request.at,
                        previous_end,
                    });
                }
            }
            if request.resume {
                description = previous.description;
            }
        }

        let id = self.insert_entry(
            &sheet,
            request.at,
            description.as_deref(),
            request.extra.as_deref(),
        )?;
        tracing::info!(%sheet, entry_id = id, start_time = request.at, "clocked in");

        Ok(Entry {
            id,
            sheet,
            start_time: request.at,
            end_time: None,
            description,
            extra: request.extra.clone(),
        })
    }

    /// Closes the running interval of the current sheet at `at`.
    ///
    /// Returns the closed entry.
    pub fn clock_out(&self, at: i64) -> Result<Entry, DbError> {
        let sheet = self.current_sheet()?;
        let active = self
            .active_entry(&sheet)?
            .ok_or(DbError::SheetNotActive { sheet })?;

        if at < active.start_time {
            return Err(DbError::NegativeDuration {
                start: active.start_time,
                end: at,
            });
        }

        self.set_end_time(active.id, at)?;
        tracing::info!(
            sheet = %active.sheet,
            entry_id = active.id,
            duration = at - active.start_time,
            "clocked out"
        );

        Ok(Entry {
            end_time: Some(at),
            ..active
        })
    }

    /// Replaces the description of the current sheet's running interval.
    pub fn alter(&self, description: &str) -> Result<Entry, DbError> {
        let sheet = self.current_sheet()?;
        let active = self
            .active_entry(&sheet)?
            .ok_or(DbError::SheetNotActive { sheet })?;

        self.set_description(active.id, description)?;
        tracing::debug!(entry_id = active.id, "description altered");

        Ok(Entry {
            description: Some(description.to_string()),
            ..active
        })
    }

    /// Makes `sheet` the current sheet.
    ///
    /// The sheet does not need any entries. Returns whether the current
    /// sheet changed.
    pub fn switch(&self, sheet: &str) -> Result<bool, DbError> {
        if self.current_sheet()? == sheet {
            return Ok(false);
        }
        self.set_current_sheet(sheet)?;
        tracing::info!(sheet, "switched timesheet");
        Ok(true)
    }

    /// Deletes every entry of `sheet` (the current sheet when `None`) once
    /// `confirm` agrees.
    ///
    /// Deleting the current sheet moves the current sheet to the default one.
    pub fn kill<F>(&self, sheet: Option<&str>, confirm: F) -> Result<KillOutcome, DbError>
    where
        F: FnOnce(&str) -> bool,
    {
        let current = self.current_sheet()?;
        let sheet = sheet.map_or_else(|| current.clone(), str::to_string);

        if !confirm(&sheet) {
            tracing::debug!(%sheet, "kill canceled");
            return Ok(KillOutcome::Canceled { sheet });
        }

        let entries = self.delete_sheet(&sheet)?;
        let switched_to_default = sheet == current && self.switch(DEFAULT_SHEET)?;
        tracing::info!(%sheet, entries, "timesheet deleted");

        Ok(KillOutcome::Deleted {
            sheet,
            entries,
            switched_to_default,
        })
    }

    /// Reports whether `sheet` is running as of `now`.
    pub fn status(&self, sheet: &str, now: i64) -> Result<SheetStatus, DbError> {
        if self.entry_count(sheet)? == 0 {
            return Err(DbError::EmptySheet {
                sheet: sheet.to_string(),
            });
        }

        Ok(match self.active_entry(sheet)? {
            None => SheetStatus::Idle,
            Some(active) => SheetStatus::Active {
                elapsed: now - active.start_time,
                notes: active
                    .description
                    .map(|d| d.trim_end_matches('.').to_string()),
            },
        })
    }

    /// Builds the day-grouped report of `sheet` within `range`.
    pub fn report<Tz: TimeZone>(
        &self,
        sheet: &str,
        range: DateRange,
        now: i64,
        tz: &Tz,
    ) -> Result<Report, DbError> {
        let entries = self.list_entries(sheet, range)?;
        Ok(Report::build(sheet, &entries, now, tz))
    }
}

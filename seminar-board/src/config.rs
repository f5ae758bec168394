//! Schedule configuration types
//!
//! This module defines the knobs the engines need: the fixed civil timezone,
//! the main event duration, and the announcement thresholds. Rendering and
//! announcer settings live in the application layer.

use crate::types::{BoardError, Result, Timestamp};
use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for the configured interval lengths (one day)
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Configuration for the schedule engines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    /// UTC offset of the venue's civil time, in whole hours (default: +9, KST)
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,

    /// Length of the main interval in minutes (default: 120)
    #[serde(default = "default_main_duration")]
    pub main_duration_minutes: i64,

    /// Warning window before setup in which a setup bar is "imminent" (default: 30)
    #[serde(default = "default_imminent_window")]
    pub imminent_window_minutes: i64,

    /// Lead time of the early announcement before setup (default: 5.0)
    #[serde(default = "default_announce_lead")]
    pub announce_lead_minutes: f64,

    /// Half-width of the trigger window around each threshold (default: 0.1)
    #[serde(default = "default_trigger_tolerance")]
    pub trigger_tolerance_minutes: f64,

    /// First hour shown on the timeline (default: 5)
    #[serde(default = "default_view_start")]
    pub view_start_hour: u32,

    /// Last hour shown on the timeline (default: 21)
    #[serde(default = "default_view_end")]
    pub view_end_hour: u32,
}

fn default_utc_offset() -> i32 {
    9
}

fn default_main_duration() -> i64 {
    120
}

fn default_imminent_window() -> i64 {
    30
}

fn default_announce_lead() -> f64 {
    5.0
}

fn default_trigger_tolerance() -> f64 {
    0.1
}

fn default_view_start() -> u32 {
    5
}

fn default_view_end() -> u32 {
    21
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
            main_duration_minutes: default_main_duration(),
            imminent_window_minutes: default_imminent_window(),
            announce_lead_minutes: default_announce_lead(),
            trigger_tolerance_minutes: default_trigger_tolerance(),
            view_start_hour: default_view_start(),
            view_end_hour: default_view_end(),
        }
    }
}

impl ScheduleConfig {
    /// Create a new schedule configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the UTC offset in hours
    pub fn with_utc_offset(mut self, hours: i32) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    /// Builder method: set the main interval duration
    pub fn with_main_duration(mut self, minutes: i64) -> Self {
        self.main_duration_minutes = minutes;
        self
    }

    /// Builder method: set the imminent window before setup
    pub fn with_imminent_window(mut self, minutes: i64) -> Self {
        self.imminent_window_minutes = minutes;
        self
    }

    /// Builder method: set the early announcement lead time
    pub fn with_announce_lead(mut self, minutes: f64) -> Self {
        self.announce_lead_minutes = minutes;
        self
    }

    /// Builder method: set the visible timeline window
    pub fn with_view_hours(mut self, start: u32, end: u32) -> Self {
        self.view_start_hour = start;
        self.view_end_hour = end;
        self
    }

    /// Check the configuration before the evaluator starts
    ///
    /// A bad timezone has no meaningful fallback, so this is fatal for the
    /// whole pipeline.
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;

        if !(1..=MAX_DURATION_MINUTES).contains(&self.main_duration_minutes) {
            return Err(BoardError::InvalidConfig(format!(
                "main_duration_minutes must be within 1..={}, got {}",
                MAX_DURATION_MINUTES, self.main_duration_minutes
            )));
        }
        if !(0..=MAX_DURATION_MINUTES).contains(&self.imminent_window_minutes) {
            return Err(BoardError::InvalidConfig(format!(
                "imminent_window_minutes must be within 0..={}, got {}",
                MAX_DURATION_MINUTES, self.imminent_window_minutes
            )));
        }
        if !(self.trigger_tolerance_minutes >= 0.0) {
            return Err(BoardError::InvalidConfig(format!(
                "trigger_tolerance_minutes must not be negative, got {}",
                self.trigger_tolerance_minutes
            )));
        }
        if self.view_start_hour >= self.view_end_hour || self.view_end_hour > 24 {
            return Err(BoardError::InvalidConfig(format!(
                "view window {}..{} is not a valid hour range",
                self.view_start_hour, self.view_end_hour
            )));
        }

        Ok(())
    }

    /// The fixed civil timezone
    pub fn timezone(&self) -> Result<FixedOffset> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(BoardError::InvalidUtcOffset(self.utc_offset_hours));
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or(BoardError::InvalidUtcOffset(self.utc_offset_hours))
    }

    /// Current wall-clock time in the fixed timezone
    pub fn now(&self) -> Result<Timestamp> {
        Ok(Utc::now().with_timezone(&self.timezone()?))
    }

    /// Calendar date of `now` in the fixed timezone
    pub fn today(&self, now: Timestamp) -> Result<NaiveDate> {
        Ok(now.with_timezone(&self.timezone()?).date_naive())
    }

    /// Main interval length (saturates instead of overflowing)
    pub fn main_duration(&self) -> Duration {
        Duration::try_minutes(self.main_duration_minutes).unwrap_or(Duration::MAX)
    }

    /// Imminent window length (saturates instead of overflowing)
    pub fn imminent_window(&self) -> Duration {
        Duration::try_minutes(self.imminent_window_minutes).unwrap_or(Duration::MAX)
    }
}

//! Core types for the seminar board library
//!
//! This module defines the records the record builder emits and the status
//! values the engines derive from them. Records are rebuilt from scratch on
//! every parse; nothing here is persisted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the board (fixed civil timezone)
pub type Timestamp = DateTime<FixedOffset>;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Location used when a section has no location line
pub const UNSET_LOCATION: &str = "미정";

/// Errors that can occur while setting up the board
///
/// Per-section parse failures never surface here; they are contained in the
/// record builder and only reduce the number of scheduled events.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Invalid UTC offset: {0} hours (expected -12..=14)")]
    InvalidUtcOffset(i32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Broadcast arrangement announced in the trailing lines of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastKind {
    /// No broadcast keyword found
    #[default]
    None,
    /// "생중계"
    Live,
    /// "녹화"
    Recorded,
}

impl BroadcastKind {
    /// Scan free-form text for the broadcast keywords (live wins over recorded)
    pub fn detect(text: &str) -> Self {
        if text.contains("생중계") {
            BroadcastKind::Live
        } else if text.contains("녹화") {
            BroadcastKind::Recorded
        } else {
            BroadcastKind::None
        }
    }
}

impl fmt::Display for BroadcastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastKind::None => write!(f, "일반"),
            BroadcastKind::Live => write!(f, "생중계"),
            BroadcastKind::Recorded => write!(f, "녹화"),
        }
    }
}

/// One parsed section of the pasted schedule text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Venue name (`UNSET_LOCATION` when absent)
    pub location: String,
    /// Sponsoring office
    pub office: String,
    /// Staff on duty, comma separated when two people share the slot
    pub staff: String,
    /// Office aide
    pub aide: String,
    /// Event title, verbatim
    pub title: String,
    /// Broadcast arrangement
    pub broadcast: BroadcastKind,
    /// Setup time of day, if it parsed
    pub setup_time: Option<NaiveTime>,
    /// Official start time of day, if it parsed
    pub start_time: Option<NaiveTime>,
    /// Calendar date the times refer to
    pub date: NaiveDate,
}

impl RawEvent {
    /// A blank record dated `date`, as produced for an empty section
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            location: UNSET_LOCATION.to_string(),
            office: String::new(),
            staff: String::new(),
            aide: String::new(),
            title: String::new(),
            broadcast: BroadcastKind::None,
            setup_time: None,
            start_time: None,
            date,
        }
    }

    /// Individual staff names (the staff field may hold two, comma separated)
    pub fn staff_members(&self) -> Vec<&str> {
        self.staff
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Which half of an event an interval covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Preparation window: setup time until start time
    Setup,
    /// The event itself: start time plus the main duration
    Main,
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalKind::Setup => write!(f, "셋팅"),
            IntervalKind::Main => write!(f, "본행사"),
        }
    }
}

/// A timed bar on a location's lane
///
/// `begin <= end` is not guaranteed: a setup time typed after the start time
/// yields a reversed interval, which classifies and renders without panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Owning location (not unique; several events may share a lane)
    pub location: String,
    /// Setup or main
    pub kind: IntervalKind,
    /// Inclusive start instant
    pub begin: Timestamp,
    /// Exclusive end instant
    pub end: Timestamp,
}

impl Interval {
    /// True if the interval has no positive duration
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.begin
    }
}

/// A complete event: the parsed record and its two intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// The parsed record this event was built from
    pub record: RawEvent,
    /// Setup interval (`setup_time` → `start_time`)
    pub setup: Interval,
    /// Main interval (`start_time` → `start_time + duration`)
    pub main: Interval,
}

impl ScheduledEvent {
    /// Venue of this event
    pub fn location(&self) -> &str {
        &self.record.location
    }

    /// Absolute setup instant (the announcement reference point)
    pub fn setup_at(&self) -> Timestamp {
        self.setup.begin
    }

    /// Both intervals, setup first
    pub fn intervals(&self) -> [&Interval; 2] {
        [&self.setup, &self.main]
    }
}

/// Live status of an interval or, aggregated, of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing happening yet
    Idle,
    /// Inside a setup interval
    SettingUp,
    /// Within the warning window before setup starts
    Imminent,
    /// Inside a main interval
    Live,
    /// Past the end of the interval
    Ended,
}

impl Status {
    /// Display color used by the dashboard palette
    ///
    /// Idle is split by interval kind so waiting setup bars stay visually
    /// distinct from waiting main bars.
    pub fn palette_color(&self, kind: IntervalKind) -> &'static str {
        match (self, kind) {
            (Status::Ended, _) => "#E0E0E0",
            (Status::Live, _) => "#FEBD17",
            (Status::SettingUp, _) | (Status::Imminent, _) => "#F94680",
            (Status::Idle, IntervalKind::Main) => "#1BC0BA",
            (Status::Idle, IntervalKind::Setup) => "#FDB8D9",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "대기"),
            Status::SettingUp => write!(f, "셋팅중"),
            Status::Imminent => write!(f, "셋팅임박"),
            Status::Live => write!(f, "ON AIR"),
            Status::Ended => write!(f, "종료"),
        }
    }
}

//! Seminar Board Library
//!
//! Turns a pasted venue schedule into a live status board: which rooms are
//! idle, about to be set up, setting up, on air or done, plus the setup
//! announcements that are due right now.
//!
//! # Architecture
//!
//! Data flows one way:
//! - [`record_builder`] splits the raw text into sections and builds setup
//!   and main intervals for every section with both times
//! - [`status`] classifies each interval against "now" and folds a badge per
//!   location
//! - [`triggers`] decides which T-5 / T-0 announcements are newly due
//! - [`layout`] assigns lanes and color families to locations
//!
//! The library does NOT:
//! - Store schedule history
//! - Draw anything
//! - Speak announcements
//!
//! Those live in the application layer (seminar-board-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use seminar_board::{Board, ScheduleConfig};
//!
//! let config = ScheduleConfig::new().with_utc_offset(9);
//! let mut board = Board::new(config.clone()).unwrap();
//! board.load("3.15(금) 14시/13시30분\n제1세미나실 - 홍길동\n국토위\n세미나");
//!
//! let tick = board.tick(config.now().unwrap());
//! for lane in &tick.snapshot.lanes {
//!     println!("{} {}", lane.lane.label, lane.badge);
//! }
//! for announcement in &tick.announcements {
//!     println!("{}", announcement.message());
//! }
//! ```

// Public modules
pub mod board;
pub mod config;
pub mod layout;
pub mod record_builder;
pub mod status;
pub mod time_parser;
pub mod triggers;
pub mod types;

// Re-export main types for convenience
pub use board::{Board, BoardSnapshot, EventSnapshot, IntervalSnapshot, LaneSnapshot, Tick};
pub use config::ScheduleConfig;
pub use layout::{assign_lanes, short_label, ColorBucket, Lane};
pub use record_builder::{build_schedule, history_title, parse_sections, Schedule};
pub use status::{aggregate_badge, Segment, StatusEngine};
pub use time_parser::{parse_time_fragment, TimeParseError};
pub use triggers::{Announcement, AnnouncementLedger, ThresholdKind, TriggerEngine};
pub use types::{
    BoardError, BroadcastKind, Interval, IntervalKind, RawEvent, Result, ScheduledEvent,
    Status, Timestamp, UNSET_LOCATION,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty board renders nothing
        let board = Board::new(ScheduleConfig::default()).unwrap();
        let now = board.config().now().unwrap();
        assert!(board.snapshot(now).is_empty());
    }
}

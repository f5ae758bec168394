//! Trigger engine
//!
//! Decides when a setup announcement is due. Two thresholds exist per
//! location: five minutes before setup and setup time itself. The evaluator
//! ticks roughly once a second, so each threshold is a narrow window rather
//! than an exact instant, and the [`AnnouncementLedger`] guarantees that a
//! key fires at most once no matter how many ticks land in the window.

use crate::config::ScheduleConfig;
use crate::types::{ScheduledEvent, Timestamp};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Which announcement threshold was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// Shortly before setup (five minutes by default)
    TMinus5,
    /// Setup time
    TZero,
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdKind::TMinus5 => write!(f, "T-5"),
            ThresholdKind::TZero => write!(f, "T-0"),
        }
    }
}

/// A due announcement, delivered once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub location: String,
    pub staff: String,
    pub threshold: ThresholdKind,
}

impl Announcement {
    /// Text to speak
    pub fn message(&self) -> String {
        match self.threshold {
            ThresholdKind::TMinus5 => format!("{}, 셋팅 시작 5분 전입니다.", self.location),
            ThresholdKind::TZero => format!("{}, 셋팅 시작 시간입니다.", self.location),
        }
    }
}

/// Keys that have already been announced
///
/// Owned by the long-lived evaluator. Only [`TriggerEngine::evaluate`] adds
/// keys; there is no way to un-announce a single key. [`reset`] clears the
/// whole ledger and is meant for loading a different schedule.
///
/// [`reset`]: AnnouncementLedger::reset
#[derive(Debug, Clone, Default)]
pub struct AnnouncementLedger {
    announced: HashSet<(String, ThresholdKind)>,
}

impl AnnouncementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `(location, threshold)` has fired
    pub fn contains(&self, location: &str, threshold: ThresholdKind) -> bool {
        self.announced.contains(&(location.to_string(), threshold))
    }

    pub fn len(&self) -> usize {
        self.announced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.announced.is_empty()
    }

    /// Forget everything (schedule reload)
    pub fn reset(&mut self) {
        if !self.announced.is_empty() {
            log::debug!("Clearing {} announced triggers", self.announced.len());
        }
        self.announced.clear();
    }

    /// Record a key; false if it was already there
    fn insert(&mut self, location: &str, threshold: ThresholdKind) -> bool {
        self.announced.insert((location.to_string(), threshold))
    }
}

/// Threshold windows around each event's setup instant
#[derive(Debug, Clone, Copy)]
pub struct TriggerEngine {
    lead_minutes: f64,
    tolerance_minutes: f64,
}

impl TriggerEngine {
    pub fn new(lead_minutes: f64, tolerance_minutes: f64) -> Self {
        Self { lead_minutes, tolerance_minutes }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.announce_lead_minutes, config.trigger_tolerance_minutes)
    }

    /// Announcements newly due at `now`
    ///
    /// Every returned key is added to `ledger`, so a second call with the
    /// same `now` returns nothing.
    pub fn evaluate(
        &self,
        events: &[ScheduledEvent],
        now: Timestamp,
        ledger: &mut AnnouncementLedger,
    ) -> Vec<Announcement> {
        let mut due = Vec::new();

        for event in events {
            let diff = minutes_until(event.setup_at(), now);

            for threshold in self.crossed(diff) {
                if ledger.insert(event.location(), threshold) {
                    log::info!("Trigger {} due for {}", threshold, event.location());
                    due.push(Announcement {
                        location: event.location().to_string(),
                        staff: event.record.staff.clone(),
                        threshold,
                    });
                } else {
                    log::trace!("Trigger {} already announced for {}", threshold, event.location());
                }
            }
        }

        due
    }

    /// Thresholds whose window contains `diff` minutes-to-setup
    fn crossed(&self, diff: f64) -> impl Iterator<Item = ThresholdKind> {
        let windows = [
            (ThresholdKind::TMinus5, self.lead_minutes),
            (ThresholdKind::TZero, 0.0),
        ];
        let tolerance = self.tolerance_minutes;
        windows
            .into_iter()
            .filter(move |(_, center)| (center - tolerance..=center + tolerance).contains(&diff))
            .map(|(kind, _)| kind)
    }
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

/// Fractional minutes from `now` until `setup_at` (negative once past)
fn minutes_until(setup_at: Timestamp, now: Timestamp) -> f64 {
    (setup_at - now).num_milliseconds() as f64 / 60_000.0
}

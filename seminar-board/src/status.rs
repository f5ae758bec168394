//! Status engine
//!
//! Maps each interval to a [`Status`] for a given "now", splits intervals for
//! progressive-fill rendering, and folds a location's statuses into a single
//! badge. Everything here is a pure function of its inputs.
//!
//! Both the per-interval classification and the badge are ordered rule
//! tables evaluated top to bottom; the first matching rule wins.

use crate::config::ScheduleConfig;
use crate::types::{Interval, IntervalKind, Status, Timestamp};
use chrono::Duration;
use serde::Serialize;

/// One classification rule: a predicate and the status it assigns
struct IntervalRule {
    matches: fn(&Interval, Timestamp, Duration) -> bool,
    status: fn(IntervalKind) -> Status,
}

fn has_ended(interval: &Interval, now: Timestamp, _: Duration) -> bool {
    now >= interval.end
}

fn is_running(interval: &Interval, now: Timestamp, _: Duration) -> bool {
    interval.begin <= now && now < interval.end
}

fn is_within_warning(interval: &Interval, now: Timestamp, window: Duration) -> bool {
    let opens = interval.begin.checked_sub_signed(window);
    interval.kind == IntervalKind::Setup
        && opens.map_or(true, |opens| opens <= now)
        && now < interval.begin
}

fn always(_: &Interval, _: Timestamp, _: Duration) -> bool {
    true
}

fn running_status(kind: IntervalKind) -> Status {
    match kind {
        IntervalKind::Main => Status::Live,
        IntervalKind::Setup => Status::SettingUp,
    }
}

const INTERVAL_RULES: &[IntervalRule] = &[
    IntervalRule { matches: has_ended, status: |_| Status::Ended },
    IntervalRule { matches: is_running, status: running_status },
    IntervalRule { matches: is_within_warning, status: |_| Status::Imminent },
    IntervalRule { matches: always, status: |_| Status::Idle },
];

/// Badge rules over all statuses of one location
struct BadgeRule {
    matches: fn(&[Status]) -> bool,
    badge: Status,
}

const BADGE_RULES: &[BadgeRule] = &[
    BadgeRule { matches: |s| s.contains(&Status::Live), badge: Status::Live },
    BadgeRule { matches: |s| s.contains(&Status::SettingUp), badge: Status::SettingUp },
    BadgeRule { matches: |s| s.contains(&Status::Imminent), badge: Status::Imminent },
    BadgeRule { matches: |s| s.contains(&Status::Ended), badge: Status::Ended },
];

/// A painted piece of an interval
///
/// `past` marks the already-elapsed part of a running interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub begin: Timestamp,
    pub end: Timestamp,
    pub status: Status,
    pub past: bool,
}

/// Classifies intervals against the clock
#[derive(Debug, Clone, Copy)]
pub struct StatusEngine {
    imminent_window: Duration,
}

impl StatusEngine {
    /// Create an engine with an explicit imminent window
    pub fn new(imminent_window: Duration) -> Self {
        Self { imminent_window }
    }

    /// Create an engine from the schedule configuration
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.imminent_window())
    }

    /// Status of `interval` at `now`
    pub fn classify(&self, interval: &Interval, now: Timestamp) -> Status {
        INTERVAL_RULES
            .iter()
            .find(|rule| (rule.matches)(interval, now, self.imminent_window))
            .map(|rule| (rule.status)(interval.kind))
            .unwrap_or(Status::Idle)
    }

    /// Pieces to paint for `interval` at `now`
    ///
    /// A running interval is split at `now` into a past piece and a live
    /// piece. A reversed interval collapses to one empty piece at `begin`.
    pub fn render_segments(&self, interval: &Interval, now: Timestamp) -> Vec<Segment> {
        let status = self.classify(interval, now);

        if interval.is_degenerate() {
            return vec![Segment {
                begin: interval.begin,
                end: interval.begin,
                status,
                past: false,
            }];
        }

        if interval.begin < now && now < interval.end {
            return vec![
                Segment { begin: interval.begin, end: now, status, past: true },
                Segment { begin: now, end: interval.end, status, past: false },
            ];
        }

        vec![Segment { begin: interval.begin, end: interval.end, status, past: false }]
    }
}

impl Default for StatusEngine {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

/// Fold one location's interval statuses into its badge
///
/// Priority is Live, SettingUp, Imminent, Ended: the first status present
/// on any interval wins. Idle when none of them is present.
pub fn aggregate_badge(statuses: &[Status]) -> Status {
    BADGE_RULES
        .iter()
        .find(|rule| (rule.matches)(statuses))
        .map(|rule| rule.badge)
        .unwrap_or(Status::Idle)
}

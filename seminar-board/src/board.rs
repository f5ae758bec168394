//! Board evaluator
//!
//! The [`Board`] is the entry point of the library. It owns the current raw
//! text and the announcement ledger, and on every tick re-runs the whole
//! pipeline (parse, classify, trigger, lay out) against the given "now".
//! There is no incremental update: a tick is a full recomputation.

use crate::config::ScheduleConfig;
use crate::layout::{assign_lanes, ColorBucket, Lane};
use crate::record_builder::{schedule_text, Schedule};
use crate::status::{aggregate_badge, Segment, StatusEngine};
use crate::triggers::{Announcement, AnnouncementLedger, TriggerEngine};
use crate::types::{
    BroadcastKind, Interval, IntervalKind, Result, ScheduledEvent, Status, Timestamp,
};
use chrono::FixedOffset;
use serde::Serialize;

/// The long-lived evaluator
pub struct Board {
    config: ScheduleConfig,
    tz: FixedOffset,
    text: String,
    status: StatusEngine,
    triggers: TriggerEngine,
    ledger: AnnouncementLedger,
}

impl Board {
    /// Create an empty board
    ///
    /// Fails if the configuration is unusable (e.g. an invalid UTC offset).
    pub fn new(config: ScheduleConfig) -> Result<Self> {
        config.validate()?;
        let tz = config.timezone()?;

        Ok(Self {
            status: StatusEngine::from_config(&config),
            triggers: TriggerEngine::from_config(&config),
            config,
            tz,
            text: String::new(),
            ledger: AnnouncementLedger::new(),
        })
    }

    /// Replace the schedule text
    ///
    /// Loading different text re-arms every announcement. Loading the text
    /// that is already on the board is a no-op, so a periodic re-read of an
    /// unchanged source never repeats an announcement.
    ///
    /// # Returns
    /// * `true` if the text changed
    pub fn load(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }

        log::info!("Loading new schedule text ({} bytes)", text.len());
        self.text = text;
        self.ledger.reset();
        true
    }

    /// Current schedule text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Announced keys so far
    pub fn ledger(&self) -> &AnnouncementLedger {
        &self.ledger
    }

    /// The fixed civil timezone
    pub fn timezone(&self) -> FixedOffset {
        self.tz
    }

    /// Parse the current text with `now`'s date as the default day
    pub fn schedule(&self, now: Timestamp) -> Schedule {
        let today = now.with_timezone(&self.tz).date_naive();
        schedule_text(&self.text, today, self.tz, self.config.main_duration())
    }

    /// Status of every lane at `now`, without touching the ledger
    pub fn snapshot(&self, now: Timestamp) -> BoardSnapshot {
        let schedule = self.schedule(now);
        self.build_snapshot(&schedule, now)
    }

    /// One evaluation step: snapshot plus newly due announcements
    pub fn tick(&mut self, now: Timestamp) -> Tick {
        let schedule = self.schedule(now);
        let announcements = self.triggers.evaluate(&schedule.events, now, &mut self.ledger);
        let snapshot = self.build_snapshot(&schedule, now);

        log::trace!(
            "Tick at {}: {} lanes, {} announcements",
            now.format("%H:%M:%S"),
            snapshot.lanes.len(),
            announcements.len()
        );
        Tick { snapshot, announcements }
    }

    fn build_snapshot(&self, schedule: &Schedule, now: Timestamp) -> BoardSnapshot {
        let lanes = assign_lanes(schedule.events.iter().map(ScheduledEvent::location))
            .into_iter()
            .map(|lane| {
                let events: Vec<EventSnapshot> = schedule
                    .events
                    .iter()
                    .filter(|e| e.location() == lane.location)
                    .map(|e| self.event_snapshot(e, now))
                    .collect();
                let statuses: Vec<Status> = events
                    .iter()
                    .flat_map(|e| e.intervals.iter().map(|i| i.status))
                    .collect();

                LaneSnapshot { badge: aggregate_badge(&statuses), lane, events }
            })
            .collect();

        BoardSnapshot {
            taken_at: now,
            lanes,
            dropped_sections: schedule.incomplete.len(),
        }
    }

    fn event_snapshot(&self, event: &ScheduledEvent, now: Timestamp) -> EventSnapshot {
        let record = &event.record;
        EventSnapshot {
            title: record.title.clone(),
            office: record.office.clone(),
            aide: record.aide.clone(),
            staff: record.staff_members().into_iter().map(str::to_string).collect(),
            broadcast: record.broadcast,
            intervals: event
                .intervals()
                .into_iter()
                .map(|interval| self.interval_snapshot(interval, now))
                .collect(),
        }
    }

    fn interval_snapshot(&self, interval: &Interval, now: Timestamp) -> IntervalSnapshot {
        let status = self.status.classify(interval, now);
        IntervalSnapshot {
            kind: interval.kind,
            begin: interval.begin,
            end: interval.end,
            status,
            color: status.palette_color(interval.kind),
            shade: ColorBucket::classify(&interval.location).shade(interval.kind),
            segments: self.status.render_segments(interval, now),
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, Serialize)]
pub struct Tick {
    pub snapshot: BoardSnapshot,
    pub announcements: Vec<Announcement>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub taken_at: Timestamp,
    pub lanes: Vec<LaneSnapshot>,
    /// Sections left out because a time was missing
    pub dropped_sections: usize,
}

impl BoardSnapshot {
    /// Lane for `location`, if it has one
    pub fn lane(&self, location: &str) -> Option<&LaneSnapshot> {
        self.lanes.iter().find(|l| l.lane.location == location)
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// One location's row
#[derive(Debug, Clone, Serialize)]
pub struct LaneSnapshot {
    #[serde(flatten)]
    pub lane: Lane,
    pub badge: Status,
    pub events: Vec<EventSnapshot>,
}

/// Display fields of one event on a lane
#[derive(Debug, Clone, Serialize)]
pub struct EventSnapshot {
    pub title: String,
    pub office: String,
    pub aide: String,
    pub staff: Vec<String>,
    pub broadcast: BroadcastKind,
    /// Setup first, then main
    pub intervals: Vec<IntervalSnapshot>,
}

impl EventSnapshot {
    /// Interval of the given kind
    pub fn interval(&self, kind: IntervalKind) -> Option<&IntervalSnapshot> {
        self.intervals.iter().find(|i| i.kind == kind)
    }
}

/// One bar with its status and paint segments
#[derive(Debug, Clone, Serialize)]
pub struct IntervalSnapshot {
    pub kind: IntervalKind,
    pub begin: Timestamp,
    pub end: Timestamp,
    pub status: Status,
    /// Status palette color
    pub color: &'static str,
    /// Location palette shade, for renderers that color bars by venue
    pub shade: &'static str,
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoardError;
    use chrono::TimeZone;

    const TEXT: &str = "3.15(금) 14시/13시30분
제1세미나실 - 홍길동,김철수
국토위 / 박보좌관
반도체 산업 동향 세미나
생중계 예정
=====
3.15(금) 10시/9시
대회의실 - 이영희
환노위
노동 정책 토론회
";

    fn at(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 15, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Board::new(ScheduleConfig::new().with_utc_offset(-20));
        assert!(matches!(result, Err(BoardError::InvalidUtcOffset(-20))));
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new(ScheduleConfig::default()).unwrap();
        let snapshot = board.snapshot(at(12, 0));
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.dropped_sections, 0);
    }

    #[test]
    fn test_snapshot_lanes() {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        board.load(TEXT);

        let snapshot = board.snapshot(at(12, 0));
        assert_eq!(snapshot.lanes.len(), 2);
        assert_eq!(snapshot.lanes[0].lane.location, "제1세미나실");
        assert_eq!(snapshot.lanes[0].lane.label, "1세");
        assert_eq!(snapshot.lanes[0].badge, Status::Idle);
        assert_eq!(snapshot.lanes[1].badge, Status::Ended);

        let event = &snapshot.lanes[0].events[0];
        assert_eq!(event.staff, vec!["홍길동", "김철수"]);
        assert_eq!(event.broadcast, BroadcastKind::Live);
        assert_eq!(event.interval(IntervalKind::Main).unwrap().color, "#1BC0BA");
        assert_eq!(event.interval(IntervalKind::Setup).unwrap().shade, "#B3E5FC");
        assert_eq!(event.interval(IntervalKind::Main).unwrap().shade, "#0288D1");
    }

    #[test]
    fn test_reload_same_text_keeps_ledger() {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        assert!(board.load(TEXT));

        let tick = board.tick(at(13, 25));
        assert_eq!(tick.announcements.len(), 1);

        assert!(!board.load(TEXT));
        assert!(board.tick(at(13, 25)).announcements.is_empty());
        assert_eq!(board.ledger().len(), 1);
    }

    #[test]
    fn test_reload_new_text_rearms() {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        board.load(TEXT);
        assert_eq!(board.tick(at(13, 25)).announcements.len(), 1);

        assert!(board.load(format!("{TEXT}\n")));
        assert!(board.ledger().is_empty());
        assert_eq!(board.tick(at(13, 25)).announcements.len(), 1);
    }

    #[test]
    fn test_snapshot_does_not_consume_triggers() {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        board.load(TEXT);
        let _ = board.snapshot(at(13, 25));
        assert!(board.ledger().is_empty());
        assert_eq!(board.tick(at(13, 25)).announcements.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        board.load(TEXT);
        let json = serde_json::to_value(board.snapshot(at(15, 0))).unwrap();

        let lane = &json["lanes"][0];
        assert_eq!(lane["location"], "제1세미나실");
        assert_eq!(lane["badge"], "live");
        assert_eq!(lane["color"], "seminar");
        assert_eq!(lane["events"][0]["intervals"][1]["segments"][0]["past"], true);
    }
}

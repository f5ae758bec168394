//! Record builder
//!
//! Splits pasted schedule text into sections and extracts each section's
//! fields by fixed line position:
//!
//! ```text
//! M.D(요일) START/SETUP
//! LOCATION - STAFF[,STAFF2]
//! OFFICE / AIDE
//! TITLE
//! [free-form lines mentioning 생중계 / 녹화]
//! =====
//! ```
//!
//! Nothing in here fails. A section whose start or setup time does not parse
//! is kept as a [`RawEvent`] but never scheduled.

use crate::config::ScheduleConfig;
use crate::time_parser::parse_time_fragment;
use crate::types::{
    BroadcastKind, Interval, IntervalKind, RawEvent, Result, ScheduledEvent, Timestamp,
};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static RE_SECTION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"={5,}").expect("valid separator regex"));
static RE_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})").expect("valid month/day regex"));
static RE_TITLE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})\s*\(([월화수목금토일])\)")
        .expect("valid title date regex")
});

/// Output of one parse run
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    /// Sections with both times, in input order
    pub events: Vec<ScheduledEvent>,
    /// Sections dropped because a time was missing or unparseable
    pub incomplete: Vec<RawEvent>,
}

impl Schedule {
    /// Number of sections seen, scheduled or not
    pub fn section_count(&self) -> usize {
        self.events.len() + self.incomplete.len()
    }
}

/// Parse the whole text and schedule every complete section
///
/// `today` is the fallback date for sections without a valid `M.D` token.
pub fn build_schedule(text: &str, today: NaiveDate, config: &ScheduleConfig) -> Result<Schedule> {
    Ok(schedule_text(text, today, config.timezone()?, config.main_duration()))
}

/// Same as [`build_schedule`] with an already-resolved timezone
pub fn schedule_text(
    text: &str,
    today: NaiveDate,
    tz: FixedOffset,
    main_duration: Duration,
) -> Schedule {
    let mut schedule = Schedule::default();
    for record in parse_sections(text, today) {
        match schedule_record(record, tz, main_duration) {
            Ok(event) => schedule.events.push(event),
            Err(record) => {
                log::debug!(
                    "Dropping section for {:?}: start={:?} setup={:?}",
                    record.location,
                    record.start_time,
                    record.setup_time
                );
                schedule.incomplete.push(record);
            }
        }
    }

    log::debug!(
        "Parsed {} sections, {} scheduled",
        schedule.section_count(),
        schedule.events.len()
    );
    schedule
}

/// Split the text on `=====` separators and parse each non-blank section
pub fn parse_sections(text: &str, today: NaiveDate) -> Vec<RawEvent> {
    RE_SECTION_SEPARATOR
        .split(text)
        .filter(|section| !section.trim().is_empty())
        .map(|section| parse_section(section, today))
        .collect()
}

/// Extract one section's fields by line position
pub fn parse_section(section: &str, today: NaiveDate) -> RawEvent {
    let lines: Vec<&str> = section
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut record = RawEvent::empty(today);

    if let Some(header) = lines.first() {
        record.date = parse_month_day(header, today.year()).unwrap_or(today);
        let (start, setup) = parse_time_pair(header);
        record.start_time = start;
        record.setup_time = setup;
    }

    if let Some(line) = lines.get(1) {
        match line.split_once('-') {
            Some((location, staff)) => {
                record.location = location.trim().to_string();
                record.staff = staff.trim().to_string();
            }
            None => record.location = line.to_string(),
        }
    }

    if let Some(line) = lines.get(2) {
        match line.split_once('/') {
            Some((office, aide)) => {
                record.office = office.trim().to_string();
                record.aide = aide.trim().to_string();
            }
            None => record.office = line.to_string(),
        }
    }

    if let Some(line) = lines.get(3) {
        record.title = line.to_string();
    }

    if lines.len() > 4 {
        record.broadcast = BroadcastKind::detect(&lines[4..].join("\n"));
    }

    record
}

/// Find an `M.D` token and resolve it in `year`; invalid dates yield `None`
fn parse_month_day(line: &str, year: i32) -> Option<NaiveDate> {
    let caps = RE_MONTH_DAY.captures(line)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        log::warn!("Ignoring invalid date {}.{} in {:?}", month, day, line);
    }
    date
}

/// Read `START/SETUP` from the part of the header after the last `)`
fn parse_time_pair(header: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    if !header.contains('/') {
        return (None, None);
    }

    let times = match header.rfind(')') {
        Some(idx) => &header[idx + 1..],
        None => header,
    };
    let mut parts = times.split('/');

    let start = parts.next().and_then(|p| parse_time_fragment(p).ok());
    let setup = parts.next().and_then(|p| parse_time_fragment(p).ok());
    (start, setup)
}

/// Turn a complete record into its setup and main intervals
///
/// Hands the record back unchanged if either time is missing or the main
/// interval end cannot be represented.
pub fn schedule_record(
    record: RawEvent,
    tz: FixedOffset,
    main_duration: Duration,
) -> std::result::Result<ScheduledEvent, RawEvent> {
    let (Some(setup_time), Some(start_time)) = (record.setup_time, record.start_time) else {
        return Err(record);
    };
    let (Some(setup_at), Some(start_at)) = (
        localize(record.date, setup_time, tz),
        localize(record.date, start_time, tz),
    ) else {
        return Err(record);
    };

    let Some(end_at) = start_at.checked_add_signed(main_duration) else {
        log::warn!(
            "Main interval for {:?} overflows with duration {}; dropping event",
            record.location,
            main_duration
        );
        return Err(record);
    };

    if setup_at > start_at {
        log::warn!(
            "Setup {} is after start {} for {:?}; setup bar will be empty",
            setup_time,
            start_time,
            record.location
        );
    }

    let setup = Interval {
        location: record.location.clone(),
        kind: IntervalKind::Setup,
        begin: setup_at,
        end: start_at,
    };
    let main = Interval {
        location: record.location.clone(),
        kind: IntervalKind::Main,
        begin: start_at,
        end: end_at,
    };

    Ok(ScheduledEvent { record, setup, main })
}

fn localize(date: NaiveDate, time: NaiveTime, tz: FixedOffset) -> Option<Timestamp> {
    date.and_time(time).and_local_timezone(tz).single()
}

/// Derive the history key for a pasted text
///
/// `"{M}월 {D}일 {요일}요일"` when the first line carries `M.D(요일)`,
/// otherwise the first 20 characters of that line stamped with `now`.
pub fn history_title(text: &str, now: Timestamp) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();

    match RE_TITLE_DATE.captures(first_line) {
        Some(caps) => format!("{}월 {}일 {}요일", &caps[1], &caps[2], &caps[3]),
        None => {
            let head: String = first_line.chars().take(20).collect();
            format!("{}... ({})", head, now.format("%H:%M"))
        }
    }
}

//! Board rendering
//!
//! Text timeline for terminals and JSON for other front-ends.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveTime};
use seminar_board::{
    BoardSnapshot, IntervalKind, IntervalSnapshot, LaneSnapshot, ScheduleConfig, Status,
    Timestamp,
};
use std::fmt::Write;

/// Minutes per timeline cell
const CELL_MINUTES: i64 = 15;

const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Render `snapshot` in the requested format
pub fn render(
    snapshot: &BoardSnapshot,
    config: &ScheduleConfig,
    format: OutputFormat,
    details: bool,
) -> Result<String> {
    match format {
        OutputFormat::Txt => Ok(render_text(snapshot, config, details)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(snapshot).context("Failed to serialize board snapshot")
        }
    }
}

/// `"3월 15일 일요일 14:05:09"`
pub fn format_clock(now: Timestamp) -> String {
    let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
    format!(
        "{}월 {}일 {}요일 {}",
        now.month(),
        now.day(),
        weekday,
        now.format("%H:%M:%S")
    )
}

pub fn render_text(snapshot: &BoardSnapshot, config: &ScheduleConfig, details: bool) -> String {
    let mut out = String::new();
    let rule = "═".repeat(47);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "  SEMINAR SCHEDULE   🕒 {}", format_clock(snapshot.taken_at));
    let _ = writeln!(out, "{}", rule);

    if snapshot.is_empty() {
        let _ = writeln!(out, "\n(no scheduled events)");
        if snapshot.dropped_sections > 0 {
            let _ = writeln!(
                out,
                "{} section(s) skipped: start and setup times are both required",
                snapshot.dropped_sections
            );
        }
        return out;
    }

    let Some(view_start) = NaiveTime::from_hms_opt(config.view_start_hour, 0, 0) else {
        return out;
    };
    let view_start = snapshot
        .taken_at
        .date_naive()
        .and_time(view_start)
        .and_local_timezone(*snapshot.taken_at.offset())
        .single()
        .unwrap_or(snapshot.taken_at);
    let hours = config.view_end_hour.saturating_sub(config.view_start_hour) as i64;
    let cells = (hours * 60 / CELL_MINUTES) as usize;

    // Hour axis and now marker
    let mut axis = String::new();
    for hour in config.view_start_hour..config.view_end_hour {
        let _ = write!(axis, "{:<4}", format!("{:02}", hour));
    }
    let _ = writeln!(out, "\n{:<14}{}", "", axis);
    if let Some(col) = cell_index(view_start, snapshot.taken_at, cells) {
        let _ = writeln!(out, "{:<14}{}▼", "", " ".repeat(col));
    }

    for lane in &snapshot.lanes {
        let _ = writeln!(
            out,
            "{:<4}{:<10}{}",
            lane.lane.label,
            format!("[{}]", lane.badge),
            lane_row(lane, view_start, cells)
        );
    }

    let _ = writeln!(
        out,
        "\n░ 대기(셋팅)  ▒ 대기(행사)  ! 셋팅임박  S 셋팅중  █ ON AIR  · 종료  (소문자/▓ = 지난 구간)"
    );

    if details {
        for lane in &snapshot.lanes {
            write_lane_details(&mut out, lane);
        }
    }
    if snapshot.dropped_sections > 0 {
        let _ = writeln!(
            out,
            "\n{} section(s) skipped: start and setup times are both required",
            snapshot.dropped_sections
        );
    }

    out
}

/// Column of `t` on a timeline of `cells` cells starting at `view_start`
fn cell_index(view_start: Timestamp, t: Timestamp, cells: usize) -> Option<usize> {
    let minutes = (t - view_start).num_minutes();
    if minutes < 0 {
        return None;
    }
    let idx = (minutes / CELL_MINUTES) as usize;
    (idx < cells).then_some(idx)
}

fn lane_row(lane: &LaneSnapshot, view_start: Timestamp, cells: usize) -> String {
    (0..cells)
        .map(|i| {
            let t = view_start + Duration::minutes(i as i64 * CELL_MINUTES);
            lane.events
                .iter()
                .flat_map(|e| e.intervals.iter())
                .find_map(|interval| cell_glyph(interval, t))
                .unwrap_or(' ')
        })
        .collect()
}

fn cell_glyph(interval: &IntervalSnapshot, t: Timestamp) -> Option<char> {
    let segment = interval
        .segments
        .iter()
        .find(|s| s.begin <= t && t < s.end)?;

    let glyph = match (segment.status, interval.kind, segment.past) {
        (Status::Ended, _, _) => '·',
        (Status::Live, _, true) => '▓',
        (Status::Live, _, false) => '█',
        (Status::SettingUp, _, true) => 's',
        (Status::SettingUp, _, false) => 'S',
        (Status::Imminent, _, _) => '!',
        (Status::Idle, IntervalKind::Setup, _) => '░',
        (Status::Idle, IntervalKind::Main, _) => '▒',
    };
    Some(glyph)
}

fn write_lane_details(out: &mut String, lane: &LaneSnapshot) {
    let _ = writeln!(out, "\n[{}] {}  {}", lane.lane.label, lane.lane.location, lane.badge);

    for event in &lane.events {
        let setup = event.interval(IntervalKind::Setup);
        let main = event.interval(IntervalKind::Main);
        if let (Some(setup), Some(main)) = (setup, main) {
            let _ = writeln!(
                out,
                "  ⏰ {} (셋팅) ~ {} (시작) ~ {} (종료)",
                setup.begin.format("%H:%M"),
                main.begin.format("%H:%M"),
                main.end.format("%H:%M")
            );
        }
        let _ = writeln!(out, "  📝 {}", event.title);
        let office = if event.aide.is_empty() {
            event.office.clone()
        } else {
            format!("{} / {}", event.office, event.aide)
        };
        let _ = writeln!(out, "  ♥ {}", office);
        let _ = writeln!(out, "  👤 {}", event.staff.join(", "));
        let _ = writeln!(out, "  📺 {}", event.broadcast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use seminar_board::Board;

    const TEXT: &str = "3.15(일) 14시/13시30분
제1세미나실 - 홍길동,김철수
국토위 / 박보좌관
반도체 산업 동향 세미나
생중계 예정
";

    fn at(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 15, h, m, 0)
            .unwrap()
    }

    fn snapshot(now: Timestamp) -> BoardSnapshot {
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        board.load(TEXT);
        board.snapshot(now)
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(at(14, 5)), "3월 15일 일요일 14:05:00");
    }

    #[test]
    fn test_text_report_contents() {
        let text = render_text(&snapshot(at(15, 0)), &ScheduleConfig::default(), true);
        assert!(text.contains("1세"));
        assert!(text.contains("[ON AIR]"));
        assert!(text.contains("13:30 (셋팅) ~ 14:00 (시작) ~ 16:00 (종료)"));
        assert!(text.contains("홍길동, 김철수"));
        assert!(text.contains("국토위 / 박보좌관"));
        assert!(text.contains('▓'));
        assert!(text.contains('█'));
        assert!(text.contains('▼'));
    }

    #[test]
    fn test_lane_row_cells() {
        let snap = snapshot(at(12, 0));
        let view_start = at(5, 0);
        let row: Vec<char> = lane_row(&snap.lanes[0], view_start, 64).chars().collect();

        assert_eq!(row.len(), 64);
        // 13:30 is cell 34, 14:00 is cell 36, 16:00 is cell 44
        assert_eq!(row[33], ' ');
        assert_eq!(row[34], '░');
        assert_eq!(row[36], '▒');
        assert_eq!(row[43], '▒');
        assert_eq!(row[44], ' ');
    }

    #[test]
    fn test_cell_index_bounds() {
        assert_eq!(cell_index(at(5, 0), at(4, 59), 64), None);
        assert_eq!(cell_index(at(5, 0), at(5, 14), 64), Some(0));
        assert_eq!(cell_index(at(5, 0), at(20, 59), 64), Some(63));
        assert_eq!(cell_index(at(5, 0), at(21, 0), 64), None);
    }

    #[test]
    fn test_empty_report() {
        let board = Board::new(ScheduleConfig::default()).unwrap();
        let text = render_text(&board.snapshot(at(9, 0)), &ScheduleConfig::default(), true);
        assert!(text.contains("no scheduled events"));
    }

    #[test]
    fn test_json_report() {
        let json = render(
            &snapshot(at(13, 25)),
            &ScheduleConfig::default(),
            OutputFormat::Json,
            false,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lanes"][0]["badge"], "imminent");
    }
}

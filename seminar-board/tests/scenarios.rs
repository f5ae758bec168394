// End-to-end board scenarios: parse, classify, trigger and lay out together
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use seminar_board::{
    history_title, Board, BroadcastKind, IntervalKind, ScheduleConfig, Status, ThresholdKind,
};

const SEMINAR: &str = "3.15(금) 14시/13시30분
제1세미나실 - 홍길동,김철수
국토위 / 박보좌관
반도체 산업 동향 세미나
생중계 예정
";

fn kst(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 15, h, m, s)
        .unwrap()
}

fn board_with(text: &str) -> Board {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut board = Board::new(ScheduleConfig::default()).unwrap();
    board.load(text);
    board
}

#[test]
fn scenario_a_five_minutes_before_setup() {
    let mut board = board_with(SEMINAR);
    let now = kst(13, 25, 0);

    let tick = board.tick(now);
    assert_eq!(tick.announcements.len(), 1);
    assert_eq!(tick.announcements[0].threshold, ThresholdKind::TMinus5);
    assert_eq!(tick.snapshot.lane("제1세미나실").unwrap().badge, Status::Imminent);

    assert!(board.tick(now).announcements.is_empty());
}

#[test]
fn scenario_b_at_setup_time() {
    let mut board = board_with(SEMINAR);
    let tick = board.tick(kst(13, 30, 0));

    let lane = tick.snapshot.lane("제1세미나실").unwrap();
    let setup = lane.events[0].interval(IntervalKind::Setup).unwrap();
    assert_eq!(setup.status, Status::SettingUp);
    assert_eq!(lane.badge, Status::SettingUp);

    assert_eq!(tick.announcements.len(), 1);
    assert_eq!(tick.announcements[0].threshold, ThresholdKind::TZero);
    assert!(board.tick(kst(13, 30, 1)).announcements.is_empty());
}

#[test]
fn scenario_c_inside_main_interval() {
    let mut board = board_with(SEMINAR);
    let now = kst(15, 0, 0);
    let tick = board.tick(now);

    let lane = tick.snapshot.lane("제1세미나실").unwrap();
    assert_eq!(lane.badge, Status::Live);

    let main = lane.events[0].interval(IntervalKind::Main).unwrap();
    assert_eq!(main.status, Status::Live);
    assert_eq!(main.segments.len(), 2);
    assert!(main.segments[0].past);
    assert_eq!((main.segments[0].begin, main.segments[0].end), (kst(14, 0, 0), now));
    assert!(!main.segments[1].past);
    assert_eq!((main.segments[1].begin, main.segments[1].end), (now, kst(16, 0, 0)));

    let setup = lane.events[0].interval(IntervalKind::Setup).unwrap();
    assert_eq!(setup.status, Status::Ended);
}

#[test]
fn scenario_d_after_end() {
    let mut board = board_with(SEMINAR);
    let tick = board.tick(kst(16, 0, 1));
    assert_eq!(tick.snapshot.lane("제1세미나실").unwrap().badge, Status::Ended);

    let mut now = kst(16, 0, 1);
    while now < kst(23, 59, 0) {
        assert!(board.tick(now).announcements.is_empty());
        now += Duration::seconds(37);
    }
}

#[test]
fn scenario_e_start_time_only() {
    let text = "3.15(금) 14시\n제2세미나실 - 이영희\n환노위\n노동 세미나\n녹화";
    let board = board_with(text);

    let schedule = board.schedule(kst(12, 0, 0));
    assert!(schedule.events.is_empty());
    assert_eq!(schedule.incomplete.len(), 1);
    assert_eq!(schedule.incomplete[0].title, "노동 세미나");
    assert_eq!(schedule.incomplete[0].broadcast, BroadcastKind::Recorded);

    let snapshot = board.snapshot(kst(12, 0, 0));
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.dropped_sections, 1);
}

#[test]
fn scenario_f_shared_location() {
    let text = "3.15(금) 10시/9시30분
제1세미나실 - 박민수
정무위
오전 간담회
=====
3.15(금) 15시/14시
대회의실 - 최지우
교육위
정책 토론회
=====
3.15(금) 14시/13시30분
제1세미나실 - 홍길동
국토위
오후 세미나
";
    let board = board_with(text);

    let snapshot = board.snapshot(kst(11, 0, 0));
    assert_eq!(snapshot.lanes.len(), 2);
    assert_eq!(snapshot.lanes[0].lane.location, "제1세미나실");
    assert_eq!(snapshot.lanes[0].lane.index, 0);
    assert_eq!(snapshot.lanes[0].events.len(), 2);
    assert_eq!(snapshot.lanes[1].lane.location, "대회의실");
    assert_eq!(snapshot.lanes[0].badge, Status::Live);

    // morning event over, afternoon event not yet near
    assert_eq!(board.snapshot(kst(12, 30, 0)).lanes[0].badge, Status::Ended);
    assert_eq!(board.snapshot(kst(13, 10, 0)).lanes[0].badge, Status::Imminent);
    assert_eq!(board.snapshot(kst(17, 0, 0)).lanes[0].badge, Status::Ended);

    let again = board.snapshot(kst(13, 10, 0));
    let order: Vec<_> = again.lanes.iter().map(|l| l.lane.location.clone()).collect();
    assert_eq!(order, vec!["제1세미나실", "대회의실"]);
}

#[test]
fn badge_walks_through_every_phase_in_order() {
    let board = board_with(SEMINAR);
    let mut seen: Vec<Status> = Vec::new();

    let mut now = kst(12, 0, 0);
    while now <= kst(17, 0, 0) {
        let badge = board.snapshot(now).lanes[0].badge;
        if seen.last() != Some(&badge) {
            seen.push(badge);
        }
        now += Duration::minutes(1);
    }

    assert_eq!(
        seen,
        vec![
            Status::Idle,
            Status::Imminent,
            Status::SettingUp,
            Status::Live,
            Status::Ended
        ]
    );
}

#[test]
fn history_title_round_trip() {
    assert_eq!(history_title(SEMINAR, kst(9, 0, 0)), "3월 15일 금요일");
}

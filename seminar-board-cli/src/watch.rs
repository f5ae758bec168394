//! Live evaluation loop
//!
//! Every tick re-reads the schedule source, hands it to the board (which
//! re-arms announcements only if the text changed), recomputes the whole
//! board against the wall clock, redraws, and delivers due announcements.

use crate::announcer::Announcer;
use crate::config::OutputFormat;
use crate::report;
use anyhow::{Context, Result};
use seminar_board::Board;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Where the schedule text comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Re-read on every tick so edits show up live
    File(PathBuf),
    /// Fixed text (stdin, history entry)
    Text(String),
}

impl InputSource {
    /// `-` means stdin, read once
    pub fn open(path: PathBuf) -> Result<Self> {
        if path.as_os_str() == "-" {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read schedule from stdin")?;
            return Ok(InputSource::Text(text));
        }
        Ok(InputSource::File(path))
    }

    pub fn read(&self) -> Result<String> {
        match self {
            InputSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read schedule file: {:?}", path)),
            InputSource::Text(text) => Ok(text.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Stop after this many ticks (runs forever when `None`)
    pub ticks: Option<u64>,
    pub clear_screen: bool,
    pub format: OutputFormat,
    pub details: bool,
}

/// Tick period actually used for a requested one
///
/// A tick longer than the trigger window (twice the tolerance) can step over
/// it and lose an announcement, so such requests are capped with a warning.
pub fn effective_interval(requested_secs: u64, tolerance_minutes: f64) -> Duration {
    let window_secs = (2.0 * tolerance_minutes * 60.0).floor().max(1.0) as u64;
    let requested = requested_secs.max(1);
    if requested > window_secs {
        log::warn!(
            "Tick interval {}s exceeds the {}s announcement window; using {}s",
            requested,
            window_secs,
            window_secs
        );
        return Duration::from_secs(window_secs);
    }
    Duration::from_secs(requested)
}

pub fn run(
    board: &mut Board,
    source: &InputSource,
    announcer: &mut dyn Announcer,
    options: &WatchOptions,
) -> Result<()> {
    board.load(source.read()?);
    log::info!("Watching schedule, tick every {:?}", options.interval);

    let clear = options.clear_screen && io::stdout().is_terminal();
    let mut count = 0u64;

    loop {
        match source.read() {
            Ok(text) => {
                if board.load(text) {
                    log::info!("Schedule changed, announcements re-armed");
                }
            }
            Err(e) => log::warn!("Keeping previous schedule: {:#}", e),
        }

        let now = board.config().now()?;
        let tick = board.tick(now);

        let frame = report::render(&tick.snapshot, board.config(), options.format, options.details)?;
        let mut stdout = io::stdout().lock();
        if clear {
            write!(stdout, "\x1B[2J\x1B[H")?;
        }
        writeln!(stdout, "{}", frame)?;
        stdout.flush()?;
        drop(stdout);

        for announcement in &tick.announcements {
            if let Err(e) = announcer.announce(announcement) {
                log::warn!("Announcement failed: {:#}", e);
            }
        }
        announcer.poll();

        count += 1;
        if options.ticks.is_some_and(|limit| count >= limit) {
            log::debug!("Stopping after {} ticks", count);
            return Ok(());
        }
        thread::sleep(options.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::MutedAnnouncer;
    use seminar_board::ScheduleConfig;

    #[test]
    fn test_interval_capped_to_trigger_window() {
        assert_eq!(effective_interval(1, 0.1), Duration::from_secs(1));
        assert_eq!(effective_interval(0, 0.1), Duration::from_secs(1));
        assert_eq!(effective_interval(12, 0.1), Duration::from_secs(12));
        assert_eq!(effective_interval(30, 0.1), Duration::from_secs(12));
        assert_eq!(effective_interval(5, 0.0), Duration::from_secs(1));
    }

    #[test]
    fn test_file_source_rereads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        fs::write(&path, "first").unwrap();

        let source = InputSource::open(path.clone()).unwrap();
        assert_eq!(source.read().unwrap(), "first");
        fs::write(&path, "second").unwrap();
        assert_eq!(source.read().unwrap(), "second");
    }

    #[test]
    fn test_missing_file_fails_first_read() {
        let source = InputSource::File(PathBuf::from("/nonexistent/schedule.txt"));
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        let options = WatchOptions {
            interval: Duration::from_millis(1),
            ticks: Some(1),
            clear_screen: false,
            format: OutputFormat::Txt,
            details: false,
        };
        assert!(run(&mut board, &source, &mut MutedAnnouncer, &options).is_err());
    }

    #[test]
    fn test_bounded_run() {
        let source = InputSource::Text("10시/9시\n본관".to_string());
        let mut board = Board::new(ScheduleConfig::default()).unwrap();
        let options = WatchOptions {
            interval: Duration::from_millis(1),
            ticks: Some(3),
            clear_screen: false,
            format: OutputFormat::Json,
            details: false,
        };
        run(&mut board, &source, &mut MutedAnnouncer, &options).unwrap();
        assert_eq!(board.text(), "10시/9시\n본관");
    }
}

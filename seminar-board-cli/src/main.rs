//! Seminar Board CLI Application
//!
//! This is the command-line front-end for the seminar venue board.
//! It uses the seminar-board library and adds:
//! - TOML configuration
//! - Text and JSON rendering of the board
//! - A live watch loop with spoken setup announcements
//! - A history store for pasted schedules

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use seminar_board::{Board, Timestamp};
use std::path::PathBuf;

mod announcer;
mod config;
mod history;
mod report;
mod watch;

use config::{AppConfig, OutputFormat};
use history::HistoryStore;
use watch::{InputSource, WatchOptions};

/// Seminar Board - live status board for venue bookings
#[derive(Parser, Debug)]
#[command(name = "seminar-board")]
#[command(about = "Render a live seminar venue schedule from pasted text", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the board once
    Show {
        /// Schedule text file ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Evaluate at this local time instead of now ("YYYY-MM-DD HH:MM[:SS]")
        #[arg(long, value_name = "TIME")]
        at: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Re-evaluate the board on a timer and speak setup announcements
    Watch {
        /// Schedule text file ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Seconds between ticks
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Stop after this many ticks
        #[arg(long, value_name = "COUNT")]
        ticks: Option<u64>,

        /// Do not deliver announcements
        #[arg(long)]
        mute: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage saved schedules
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List saved titles, newest first
    List,
    /// Save a schedule file under its derived title
    Save {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Print (or write) a saved schedule
    Load {
        title: String,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete a saved schedule
    Delete { title: String },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Seminar Board CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using board library v{}", seminar_board::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let Some(command) = args.command else {
        println!("Seminar Board - No command specified");
        println!("\nQuick Start:");
        println!("  seminar-board show --input today.txt");
        println!("  seminar-board watch --input today.txt");
        println!("  seminar-board history list");
        println!("\nUse --help for more options");
        return Ok(());
    };

    match command {
        Command::Show { input, at, format } => show_mode(&config, input, at, format),
        Command::Watch { input, interval, ticks, mute, format } => {
            watch_mode(&config, input, interval, ticks, mute, format)
        }
        Command::History { action } => history_mode(&config, action),
    }
}

/// One-shot render
fn show_mode(
    config: &AppConfig,
    input: Option<PathBuf>,
    at: Option<String>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let source = resolve_input(config, input)?;
    let mut board = Board::new(config.schedule.clone())?;
    board.load(source.read()?);

    let now = match at {
        Some(text) => parse_local_time(&text, &board)?,
        None => board.config().now()?,
    };

    let snapshot = board.snapshot(now);
    let format = format.unwrap_or(config.output.format);
    println!(
        "{}",
        report::render(&snapshot, board.config(), format, config.output.details)?
    );
    Ok(())
}

/// Timer loop
fn watch_mode(
    config: &AppConfig,
    input: Option<PathBuf>,
    interval: Option<u64>,
    ticks: Option<u64>,
    mute: bool,
    format: Option<OutputFormat>,
) -> Result<()> {
    let source = resolve_input(config, input)?;
    let mut board = Board::new(config.schedule.clone())?;
    let mut announcer = announcer::from_config(&config.announcer, mute);

    let options = WatchOptions {
        interval: watch::effective_interval(
            interval.unwrap_or(config.watch.interval_secs),
            config.schedule.trigger_tolerance_minutes,
        ),
        ticks,
        clear_screen: config.watch.clear_screen,
        format: format.unwrap_or(config.output.format),
        details: config.output.details,
    };

    watch::run(&mut board, &source, announcer.as_mut(), &options)
}

fn history_mode(config: &AppConfig, action: HistoryAction) -> Result<()> {
    let store = HistoryStore::new(&config.history.file);

    match action {
        HistoryAction::List => {
            let titles = store.titles();
            if titles.is_empty() {
                println!("No saved schedules in {:?}", store.path());
            }
            for title in titles {
                println!("{}", title);
            }
        }
        HistoryAction::Save { input } => {
            let text = resolve_input(config, input)?.read()?;
            if text.trim().is_empty() {
                anyhow::bail!("Refusing to save an empty schedule");
            }
            let now = config.schedule.now()?;
            let title = store.save(&text, now)?;
            println!("✓ Saved: {}", title);
        }
        HistoryAction::Load { title, output } => {
            let text = store
                .get(&title)
                .with_context(|| format!("No saved schedule titled {:?}", title))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("✓ Wrote {:?}", path);
                }
                None => print!("{}", text),
            }
        }
        HistoryAction::Delete { title } => {
            if store.delete(&title)? {
                println!("✓ Deleted: {}", title);
            } else {
                println!("No saved schedule titled {:?}", title);
            }
        }
    }

    Ok(())
}

/// `--input` wins over `[input] file`
fn resolve_input(config: &AppConfig, input: Option<PathBuf>) -> Result<InputSource> {
    let path = input
        .or_else(|| config.input.file.clone())
        .context("No schedule input: pass --input <FILE> (or - for stdin) or set [input] file")?;
    InputSource::open(path)
}

/// Read `"YYYY-MM-DD HH:MM[:SS]"` as civil time in the board's timezone
fn parse_local_time(text: &str, board: &Board) -> Result<Timestamp> {
    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .with_context(|| format!("Invalid time {:?}, expected YYYY-MM-DD HH:MM[:SS]", text))?;

    naive
        .and_local_timezone(board.timezone())
        .single()
        .with_context(|| format!("Time {:?} does not exist in the board timezone", text))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use seminar_board::ScheduleConfig;

    #[test]
    fn test_parse_local_time() {
        let board = Board::new(ScheduleConfig::default()).unwrap();
        let t = parse_local_time("2026-03-15 13:25", &board).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-15T13:25:00+09:00");

        let t = parse_local_time("2026-03-15 13:25:30", &board).unwrap();
        assert_eq!(t.format("%S").to_string(), "30");

        assert!(parse_local_time("13:25", &board).is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "seminar-board",
            "-vv",
            "watch",
            "--input",
            "today.txt",
            "--ticks",
            "2",
            "--mute",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Some(Command::Watch { input, ticks, mute, .. }) => {
                assert_eq!(input, Some(PathBuf::from("today.txt")));
                assert_eq!(ticks, Some(2));
                assert!(mute);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_input_requires_a_source() {
        assert!(resolve_input(&AppConfig::default(), None).is_err());
    }
}

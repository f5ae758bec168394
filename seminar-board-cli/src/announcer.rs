//! Announcement back-ends
//!
//! The board decides when an announcement is due; an [`Announcer`] decides
//! how it is delivered. Delivery failures are the caller's to log; they never
//! stop the watch loop.

use crate::config::AnnouncerConfig;
use anyhow::{Context, Result};
use seminar_board::Announcement;
use std::process::{Child, Command};

pub trait Announcer {
    fn announce(&mut self, announcement: &Announcement) -> Result<()>;

    /// Housekeeping, called once per tick
    fn poll(&mut self) {}
}

/// Prints the message and logs it
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, announcement: &Announcement) -> Result<()> {
        log::info!(
            "[{}] {} (담당: {})",
            announcement.threshold,
            announcement.location,
            announcement.staff
        );
        println!("🔊 {}", announcement.message());
        Ok(())
    }
}

/// Consumes announcements without delivering them
pub struct MutedAnnouncer;

impl Announcer for MutedAnnouncer {
    fn announce(&mut self, announcement: &Announcement) -> Result<()> {
        log::debug!("Muted announcement: {}", announcement.message());
        Ok(())
    }
}

/// Runs an external TTS program with the message as its last argument
///
/// The program is spawned, not awaited, so a long utterance does not delay
/// the next tick. Finished children are reaped on every poll, and any still
/// speaking are waited for on drop.
pub struct CommandAnnouncer {
    program: String,
    args: Vec<String>,
    running: Vec<Child>,
}

impl CommandAnnouncer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            running: Vec::new(),
        }
    }

    /// Number of spawned processes not yet reaped
    pub fn pending(&self) -> usize {
        self.running.len()
    }

    fn reap(&mut self) {
        self.running.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    log::warn!("Announcer exited with {}", status);
                }
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::warn!("Failed to poll announcer process: {}", e);
                false
            }
        });
    }
}

impl Announcer for CommandAnnouncer {
    fn announce(&mut self, announcement: &Announcement) -> Result<()> {
        self.reap();

        let message = announcement.message();
        log::info!("Speaking via {}: {}", self.program, message);
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&message)
            .spawn()
            .with_context(|| format!("Failed to run announcer command: {}", self.program))?;
        self.running.push(child);
        Ok(())
    }

    fn poll(&mut self) {
        self.reap();
    }
}

impl Drop for CommandAnnouncer {
    fn drop(&mut self) {
        for mut child in self.running.drain(..) {
            if let Err(e) = child.wait() {
                log::warn!("Failed to wait for announcer process: {}", e);
            }
        }
    }
}

/// Pick the back-end for the configuration
pub fn from_config(config: &AnnouncerConfig, mute: bool) -> Box<dyn Announcer> {
    if mute || !config.enabled {
        return Box::new(MutedAnnouncer);
    }
    match &config.command {
        Some(program) => Box::new(CommandAnnouncer::new(program.clone(), config.args.clone())),
        None => Box::new(LogAnnouncer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seminar_board::ThresholdKind;

    fn announcement() -> Announcement {
        Announcement {
            location: "제1세미나실".to_string(),
            staff: "홍길동".to_string(),
            threshold: ThresholdKind::TMinus5,
        }
    }

    #[test]
    fn test_muted_and_log_announcers_succeed() {
        assert!(MutedAnnouncer.announce(&announcement()).is_ok());
        assert!(LogAnnouncer.announce(&announcement()).is_ok());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let mut announcer = CommandAnnouncer::new("definitely-not-a-tts-binary-xyz", Vec::new());
        assert!(announcer.announce(&announcement()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_children_reaped_on_poll() {
        let mut announcer = CommandAnnouncer::new("true", Vec::new());
        announcer.announce(&announcement()).unwrap();
        assert_eq!(announcer.pending(), 1);

        for _ in 0..200 {
            announcer.poll();
            if announcer.pending() == 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(announcer.pending(), 0);
    }

    #[test]
    fn test_disabled_config_mutes() {
        let config = AnnouncerConfig {
            enabled: false,
            command: Some("say".to_string()),
            args: Vec::new(),
        };
        let mut announcer = from_config(&config, false);
        assert!(announcer.announce(&announcement()).is_ok());
    }
}

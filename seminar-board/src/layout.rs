//! Lane and color assignment
//!
//! Each distinct location gets one lane, in first-seen order. Re-parsing the
//! same text reproduces the same lanes, so the timeline does not jitter
//! between ticks.

use crate::types::IntervalKind;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_ROOM_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*([가-힣])").expect("valid room number regex"));

/// Palette family of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBucket {
    Seminar,
    Conference,
    Auditorium,
    Default,
}

impl ColorBucket {
    /// Classify a location name by substring
    pub fn classify(location: &str) -> Self {
        const RULES: &[(&[&str], ColorBucket)] = &[
            (&["세미나"], ColorBucket::Seminar),
            (&["회의", "간담"], ColorBucket::Conference),
            (&["강당", "홀"], ColorBucket::Auditorium),
        ];

        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| location.contains(n)))
            .map(|(_, bucket)| *bucket)
            .unwrap_or(ColorBucket::Default)
    }

    /// Muted shade for setup bars
    pub fn setup_shade(&self) -> &'static str {
        match self {
            ColorBucket::Seminar => "#B3E5FC",
            ColorBucket::Conference => "#C8E6C9",
            ColorBucket::Auditorium => "#FFE0B2",
            ColorBucket::Default => "#E3F2FD",
        }
    }

    /// Saturated shade for main bars
    pub fn main_shade(&self) -> &'static str {
        match self {
            ColorBucket::Seminar => "#0288D1",
            ColorBucket::Conference => "#388E3C",
            ColorBucket::Auditorium => "#F57C00",
            ColorBucket::Default => "#90CAF9",
        }
    }

    /// Shade for a bar of the given kind
    pub fn shade(&self, kind: IntervalKind) -> &'static str {
        match kind {
            IntervalKind::Setup => self.setup_shade(),
            IntervalKind::Main => self.main_shade(),
        }
    }
}

/// One row of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lane {
    pub index: usize,
    pub location: String,
    pub label: String,
    pub color: ColorBucket,
}

/// Assign lanes to locations in first-seen order
pub fn assign_lanes<'a, I>(locations: I) -> Vec<Lane>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut lanes = Vec::new();

    for location in locations {
        if seen.insert(location) {
            lanes.push(Lane {
                index: lanes.len(),
                location: location.to_string(),
                label: short_label(location),
                color: ColorBucket::classify(location),
            });
        }
    }

    lanes
}

/// Compact lane label: room number plus the next syllable, else two characters
///
/// `제1세미나실` → `1세`, `대회의실` → `대회`.
pub fn short_label(location: &str) -> String {
    match RE_ROOM_NUMBER.captures(location) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => location.chars().take(2).collect(),
    }
}

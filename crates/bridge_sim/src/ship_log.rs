//! Per-ship log.
//!
//! Entries are stamped with the mission clock and colored by who caused
//! them. The log only grows, unless a cap is configured, in which case the
//! oldest entries fall off.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// RGBA log color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const ENEMY: Color = Color::rgb(255, 0, 0);
    pub const FRIENDLY: Color = Color::rgb(128, 128, 255);
    pub const NEUTRAL: Color = Color::rgb(192, 192, 192);
    pub const ALERT: Color = Color::rgb(255, 64, 64);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipLogEntry {
    pub prefix: String,
    pub text: String,
    pub color: Color,
}

/// Format mission seconds as `HH:MM:SS`.
#[must_use]
pub fn format_mission_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

#[derive(Debug, Clone, Default)]
pub struct ShipLog {
    entries: VecDeque<ShipLogEntry>,
    max_entries: usize,
}

impl ShipLog {
    /// A log keeping at most `max_entries`; 0 means unbounded.
    #[must_use]
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn push(&mut self, prefix: String, text: impl Into<String>, color: Color) {
        self.entries.push_back(ShipLogEntry {
            prefix,
            text: text.into(),
            color,
        });
        if self.max_entries > 0 {
            while self.entries.len() > self.max_entries {
                self.entries.pop_front();
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ShipLogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ShipLogEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

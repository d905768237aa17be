//! Simulation tunables.
//!
//! Every timing constant and limit the core uses lives in [`SimConfig`].
//! Missing JSON fields fall back to their defaults, so a config file only
//! needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Tunable constants for one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target ticks per second of the authoritative loop.
    pub tick_rate: f64,
    /// Seconds between hailing and the hail resolving.
    pub comms_channel_open_time: f32,
    /// Seconds an unanswered incoming hail waits before closing.
    pub hail_timeout: f32,
    /// Seconds a scan of a target without complexity takes.
    pub max_scanning_delay: f32,
    /// Seconds to restock one probe while docked.
    pub scan_probe_charge_time: f32,
    /// Seconds to load or unload a weapon tube.
    pub tube_load_time: f32,
    /// Docking range beyond the station's radius.
    pub docking_range: f32,
    /// Maximum number of waypoints per ship.
    pub max_waypoints: usize,
    /// Number of confirmation codes a self-destruct sequence requires.
    pub self_destruct_code_count: usize,
    /// Seconds between the last confirmed code and destruction.
    pub self_destruct_countdown: f32,
    /// Seconds of shield recalibration after a frequency change.
    pub shield_calibration_time: f32,
    /// Seconds between a jump command and the jump.
    pub jump_delay: f32,
    /// Ship log length cap; 0 keeps every entry.
    pub max_ship_log_entries: usize,
    /// Whether a completed scan step also informs the scanner's faction.
    pub share_scans_with_faction: bool,
    /// Upper bound of a system power request.
    pub max_power_request: f32,
    /// Total coolant a ship can distribute.
    pub max_coolant: f32,
    /// Coolant a single system can take.
    pub max_coolant_per_system: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            comms_channel_open_time: 2.0,
            hail_timeout: 30.0,
            max_scanning_delay: 6.0,
            scan_probe_charge_time: 10.0,
            tube_load_time: 8.0,
            docking_range: 1000.0,
            max_waypoints: 9,
            self_destruct_code_count: 3,
            self_destruct_countdown: 10.0,
            shield_calibration_time: 25.0,
            jump_delay: 10.0,
            max_ship_log_entries: 0,
            share_scans_with_faction: true,
            max_power_request: 3.0,
            max_coolant: 10.0,
            max_coolant_per_system: 10.0,
        }
    }
}

impl SimConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, [`SimError::Json`]
    /// if it does not parse, or [`SimError::InvalidConfig`] if a value is out
    /// of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] or [`SimError::InvalidConfig`].
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(SimError::InvalidConfig("tick_rate must be positive and finite".into()));
        }
        let durations = [
            ("comms_channel_open_time", self.comms_channel_open_time),
            ("hail_timeout", self.hail_timeout),
            ("max_scanning_delay", self.max_scanning_delay),
            ("scan_probe_charge_time", self.scan_probe_charge_time),
            ("tube_load_time", self.tube_load_time),
            ("self_destruct_countdown", self.self_destruct_countdown),
            ("shield_calibration_time", self.shield_calibration_time),
            ("jump_delay", self.jump_delay),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!("{name} must not be negative")));
            }
        }
        if self.max_coolant < 0.0 || self.max_coolant_per_system < 0.0 || self.max_power_request < 0.0 {
            return Err(SimError::InvalidConfig("power and coolant limits must not be negative".into()));
        }
        Ok(())
    }

    /// Override the tick rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Override the hail opening time.
    #[must_use]
    pub fn with_comms_channel_open_time(mut self, seconds: f32) -> Self {
        self.comms_channel_open_time = seconds;
        self
    }

    /// Override the incoming hail timeout.
    #[must_use]
    pub fn with_hail_timeout(mut self, seconds: f32) -> Self {
        self.hail_timeout = seconds;
        self
    }

    /// Override the weapon tube load time.
    #[must_use]
    pub fn with_tube_load_time(mut self, seconds: f32) -> Self {
        self.tube_load_time = seconds;
        self
    }

    /// Cap the ship log length.
    #[must_use]
    pub fn with_max_ship_log_entries(mut self, max: usize) -> Self {
        self.max_ship_log_entries = max;
        self
    }

    /// Toggle faction-wide scan sharing.
    #[must_use]
    pub fn with_share_scans_with_faction(mut self, share: bool) -> Self {
        self.share_scans_with_faction = share;
        self
    }
}

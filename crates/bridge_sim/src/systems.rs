//! Installed ship subsystems and their crew-set requests.

use bridge_component::ShipSystem;
use serde::{Deserialize, Serialize};

/// Crew requests and hacking state of one installed system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub power_request: f32,
    pub coolant_request: f32,
    /// 0 = clean, 1 = fully compromised.
    pub hacked_level: f32,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            power_request: 1.0,
            coolant_request: 0.0,
            hacked_level: 0.0,
        }
    }
}

/// Per-system status, indexed by [`ShipSystem`]. Absent systems are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipSystems {
    slots: [Option<SystemStatus>; ShipSystem::ALL.len()],
}

impl ShipSystems {
    /// No systems installed.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Every system installed.
    #[must_use]
    pub fn all() -> Self {
        Self {
            slots: [Some(SystemStatus::default()); ShipSystem::ALL.len()],
        }
    }

    #[must_use]
    pub fn with(mut self, system: ShipSystem) -> Self {
        self.slots[system.to_wire() as usize].get_or_insert_with(SystemStatus::default);
        self
    }

    #[must_use]
    pub fn without(mut self, system: ShipSystem) -> Self {
        self.slots[system.to_wire() as usize] = None;
        self
    }

    #[must_use]
    pub fn has(&self, system: ShipSystem) -> bool {
        self.slots[system.to_wire() as usize].is_some()
    }

    #[must_use]
    pub fn get(&self, system: ShipSystem) -> Option<&SystemStatus> {
        self.slots[system.to_wire() as usize].as_ref()
    }

    pub fn get_mut(&mut self, system: ShipSystem) -> Option<&mut SystemStatus> {
        self.slots[system.to_wire() as usize].as_mut()
    }

    /// Installed systems with their status, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (ShipSystem, &SystemStatus)> {
        ShipSystem::ALL
            .iter()
            .zip(&self.slots)
            .filter_map(|(&system, slot)| slot.as_ref().map(|s| (system, s)))
    }

    /// Set a power request clamped to `[0, max]`.
    pub fn set_power_request(&mut self, system: ShipSystem, level: f32, max: f32) -> bool {
        match self.get_mut(system) {
            Some(status) => {
                status.power_request = level.clamp(0.0, max);
                true
            }
            None => false,
        }
    }

    /// Set a coolant request clamped to `[0, min(max_per_system, max_total)]`,
    /// then scale the other systems down so the ship total stays within
    /// `max_total`.
    pub fn set_coolant_request(&mut self, system: ShipSystem, level: f32, max_per_system: f32, max_total: f32) -> bool {
        let level = level.clamp(0.0, max_per_system.min(max_total));
        let Some(status) = self.get_mut(system) else {
            return false;
        };
        status.coolant_request = level;

        let others: f32 = self
            .iter()
            .filter(|&(s, _)| s != system)
            .map(|(_, st)| st.coolant_request)
            .sum();
        if others > 0.0 && level + others > max_total {
            let scale = (max_total - level) / others;
            for (i, slot) in self.slots.iter_mut().enumerate() {
                if i != system.to_wire() as usize
                    && let Some(st) = slot
                {
                    st.coolant_request *= scale;
                }
            }
        }
        true
    }

    #[must_use]
    pub fn total_coolant_request(&self) -> f32 {
        self.iter().map(|(_, s)| s.coolant_request).sum()
    }

    /// Raise a system's hacked level by `amount`, capped at 1.
    pub fn hack(&mut self, system: ShipSystem, amount: f32) -> bool {
        match self.get_mut(system) {
            Some(status) => {
                status.hacked_level = (status.hacked_level + amount).min(1.0);
                true
            }
            None => false,
        }
    }
}

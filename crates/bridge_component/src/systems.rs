//! Ship control vocabulary: subsystems, alert levels and main screen modes.

wire_enum! {
    /// A powered ship subsystem.
    pub enum ShipSystem {
        Reactor = 0,
        BeamWeapons = 1,
        MissileSystem = 2,
        Maneuver = 3,
        Impulse = 4,
        Warp = 5,
        JumpDrive = 6,
        FrontShield = 7,
        RearShield = 8,
    }
}

impl ShipSystem {
    /// Wire byte meaning "no system" where a system is optional.
    pub const NONE_WIRE: u8 = 0xFF;

    /// Returns `true` for the two shield generators.
    #[must_use]
    pub const fn is_shield(self) -> bool {
        matches!(self, ShipSystem::FrontShield | ShipSystem::RearShield)
    }

    /// Display name used in logs and script exports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ShipSystem::Reactor => "reactor",
            ShipSystem::BeamWeapons => "beamweapons",
            ShipSystem::MissileSystem => "missilesystem",
            ShipSystem::Maneuver => "maneuver",
            ShipSystem::Impulse => "impulse",
            ShipSystem::Warp => "warp",
            ShipSystem::JumpDrive => "jumpdrive",
            ShipSystem::FrontShield => "frontshield",
            ShipSystem::RearShield => "rearshield",
        }
    }
}

wire_enum! {
    /// Ship-wide alert condition.
    #[derive(Default)]
    pub enum AlertLevel {
        #[default]
        Normal = 0,
        Yellow = 1,
        Red = 2,
    }
}

impl AlertLevel {
    /// Human readable label for the ship log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AlertLevel::Normal => "Normal",
            AlertLevel::Yellow => "YELLOW ALERT",
            AlertLevel::Red => "RED ALERT",
        }
    }
}

wire_enum! {
    /// What the main screen shows.
    #[derive(Default)]
    pub enum MainScreenSetting {
        #[default]
        Front = 0,
        Back = 1,
        Left = 2,
        Right = 3,
        Target = 4,
        Tactical = 5,
        LongRange = 6,
    }
}

wire_enum! {
    /// Overlay drawn on top of the main screen.
    #[derive(Default)]
    pub enum MainScreenOverlay {
        #[default]
        HideComms = 0,
        ShowComms = 1,
    }
}

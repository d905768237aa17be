//! Simulated space objects.
//!
//! Object kinds are a closed set. Per-kind behavior (targeting, scanning,
//! docking, export) is a `match` on [`ObjectKind`]; data common to every
//! object lives on [`SpaceObject`].

use bridge_component::{Entity, MissileType, ShipSystem};
use bridge_math::{Transform2D, Vec2};
use serde::{Deserialize, Serialize};

use crate::scan::ScanRecords;
use crate::script::CommsHandle;
use crate::ship::PlayerShip;
use crate::systems::ShipSystems;

/// Side length of one map sector.
pub const SECTOR_SIZE: f32 = 20_000.0;

/// A launched scan probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeState {
    pub owner: Entity,
    pub target_position: Vec2,
    /// Seconds until the probe burns out.
    pub lifetime: f32,
}

impl ProbeState {
    /// Travel speed in units per second.
    pub const SPEED: f32 = 1000.0;
    /// Seconds a probe survives after reaching its target.
    pub const LIFETIME: f32 = 600.0;
}

/// A fired missile. Flight is not simulated; the missile holds its launch
/// parameters until it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct MissileState {
    pub missile_type: MissileType,
    pub owner: Entity,
    pub target: Option<Entity>,
    /// Launch heading in degrees.
    pub target_angle: f32,
    pub lifetime: f32,
}

impl MissileState {
    pub const LIFETIME: f32 = 27.0;
}

/// What kind of object this is, with kind-specific state.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    PlayerShip(Box<PlayerShip>),
    CpuShip,
    Station,
    Asteroid,
    WormHole { target_position: Vec2 },
    Zone { label: String },
    ScanProbe(ProbeState),
    Missile(MissileState),
}

impl ObjectKind {
    /// Zones are map annotations and cannot be targeted.
    #[must_use]
    pub fn can_be_targeted(&self) -> bool {
        !matches!(self, ObjectKind::Zone { .. })
    }

    #[must_use]
    pub fn can_be_selected(&self) -> bool {
        !matches!(self, ObjectKind::Zone { .. })
    }

    /// Ships, stations and probes carry scannable detail.
    #[must_use]
    pub fn is_scannable(&self) -> bool {
        matches!(
            self,
            ObjectKind::PlayerShip(_) | ObjectKind::CpuShip | ObjectKind::Station | ObjectKind::ScanProbe(_)
        )
    }

    #[must_use]
    pub fn is_ship(&self) -> bool {
        matches!(self, ObjectKind::PlayerShip(_) | ObjectKind::CpuShip)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::PlayerShip(_) => "PlayerSpaceship",
            ObjectKind::CpuShip => "CpuShip",
            ObjectKind::Station => "SpaceStation",
            ObjectKind::Asteroid => "Asteroid",
            ObjectKind::WormHole { .. } => "WormHole",
            ObjectKind::Zone { .. } => "Zone",
            ObjectKind::ScanProbe(_) => "ScanProbe",
            ObjectKind::Missile(_) => "Missile",
        }
    }
}

/// Which ship classes a station accepts. An empty list accepts any class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingBay {
    #[serde(default)]
    pub accepted_classes: Vec<String>,
}

impl DockingBay {
    #[must_use]
    pub fn accepts(&self, class: &str) -> bool {
        self.accepted_classes.is_empty() || self.accepted_classes.iter().any(|c| c == class)
    }
}

/// One object in the world.
#[derive(Debug, Clone)]
pub struct SpaceObject {
    pub kind: ObjectKind,
    pub call_sign: String,
    /// Ship class or station type, matched against docking bays.
    pub type_name: String,
    pub transform: Transform2D,
    pub radius: f32,
    pub(crate) faction: Option<Entity>,
    pub systems: ShipSystems,
    pub docking_bay: Option<DockingBay>,
    pub comms_script: Option<CommsHandle>,
    pub scan: ScanRecords,
}

impl SpaceObject {
    /// A new object with defaults for its kind: ships carry every system,
    /// stations carry shields and an open docking bay.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        let (systems, docking_bay, radius) = match &kind {
            ObjectKind::PlayerShip(_) | ObjectKind::CpuShip => (ShipSystems::all(), None, 100.0),
            ObjectKind::Station => (
                ShipSystems::none()
                    .with(ShipSystem::FrontShield)
                    .with(ShipSystem::RearShield),
                Some(DockingBay::default()),
                300.0,
            ),
            ObjectKind::Asteroid => (ShipSystems::none(), None, 120.0),
            ObjectKind::WormHole { .. } => (ShipSystems::none(), None, 2500.0),
            ObjectKind::Zone { .. } => (ShipSystems::none(), None, 0.0),
            ObjectKind::ScanProbe(_) | ObjectKind::Missile(_) => (ShipSystems::none(), None, 10.0),
        };
        Self {
            type_name: kind.name().to_string(),
            kind,
            call_sign: String::new(),
            transform: Transform2D::IDENTITY,
            radius,
            faction: None,
            systems,
            docking_bay,
            comms_script: None,
            scan: ScanRecords::default(),
        }
    }

    #[must_use]
    pub fn with_call_sign(mut self, call_sign: impl Into<String>) -> Self {
        self.call_sign = call_sign.into();
        self
    }

    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.transform.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_systems(mut self, systems: ShipSystems) -> Self {
        self.systems = systems;
        self
    }

    #[must_use]
    pub fn with_docking_bay(mut self, bay: Option<DockingBay>) -> Self {
        self.docking_bay = bay;
        self
    }

    #[must_use]
    pub fn with_comms_script(mut self, script: CommsHandle) -> Self {
        self.comms_script = Some(script);
        self
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    #[must_use]
    pub fn faction(&self) -> Option<Entity> {
        self.faction
    }

    #[must_use]
    pub fn as_player(&self) -> Option<&PlayerShip> {
        match &self.kind {
            ObjectKind::PlayerShip(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerShip> {
        match &mut self.kind {
            ObjectKind::PlayerShip(ship) => Some(ship),
            _ => None,
        }
    }

    /// Whether a ship of `class` may dock here.
    #[must_use]
    pub fn accepts_docking(&self, class: &str) -> bool {
        self.docking_bay.as_ref().is_some_and(|bay| bay.accepts(class))
    }

    /// Map sector this object is in.
    #[must_use]
    pub fn sector_name(&self) -> String {
        sector_name(self.transform.position)
    }
}

/// Map sector label for a position: a row of letters and a column number.
///
/// The map origin sits at the corner of sector `F5`. Rows below `A` are
/// labeled with lowercase pairs counting down from `zz`.
#[must_use]
pub fn sector_name(position: Vec2) -> String {
    let column = (position.x / SECTOR_SIZE).floor() as i32 + 5;
    let row = (position.y / SECTOR_SIZE).floor() as i32 + 5;
    let letter = |base: char, offset: i32| char::from_u32((base as i32 + offset) as u32).unwrap_or('?');
    let row_label = if row < 0 {
        format!("{}{}", letter('z', (row + 1) / 26), letter('z', 1 + row % 26))
    } else if row < 26 {
        letter('A', row).to_string()
    } else {
        format!("{}{}", letter('A', row / 26 - 1), letter('A', row % 26))
    };
    format!("{row_label}{column}")
}

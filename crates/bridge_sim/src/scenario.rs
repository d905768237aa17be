//! Scenario files.
//!
//! A scenario is a JSON document listing factions (with relations and
//! starting reputation) and the objects to place. [`Scenario::populate`]
//! builds them into a fresh [`World`]. The same object format is used to
//! export live objects, one JSON line each.

use std::path::Path;

use bridge_component::Entity;
use bridge_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimError;
use crate::faction::FactionRelation;
use crate::object::{DockingBay, ObjectKind, SpaceObject};
use crate::script::{CommsHandle, StaticComms};
use crate::ship::PlayerShip;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionSpec {
    pub name: String,
    #[serde(default)]
    pub reputation: f32,
    #[serde(default)]
    pub enemies: Vec<String>,
    #[serde(default)]
    pub friends: Vec<String>,
}

/// Kind of a placed object. Probes and missiles only exist at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectSpecKind {
    PlayerShip,
    CpuShip,
    Station,
    Asteroid,
    WormHole { target_position: Vec2 },
    Zone { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanParameters {
    pub complexity: u32,
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(flatten)]
    pub kind: ObjectSpecKind,
    #[serde(default)]
    pub call_sign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanning: Option<ScanParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docking_bay: Option<DockingBay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comms: Option<StaticComms>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub factions: Vec<FactionSpec>,
    pub objects: Vec<ObjectSpec>,
    pub intercept_all_comms_to_gm: bool,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] or [`SimError::Json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// # Errors
    ///
    /// Returns [`SimError::Json`] if the text does not parse.
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Register the factions and spawn the objects. Returns the spawned
    /// handles in file order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DuplicateFaction`] or
    /// [`SimError::UnknownFaction`] for bad faction references.
    pub fn populate(&self, world: &mut World) -> Result<Vec<Entity>, SimError> {
        for spec in &self.factions {
            let faction = world.add_faction(spec.name.as_str())?;
            if let Some(info) = world.faction_mut(faction) {
                info.set_reputation_points(spec.reputation);
            }
        }
        for spec in &self.factions {
            let Some(faction) = world.faction_by_name(&spec.name) else {
                continue;
            };
            let relations = spec
                .enemies
                .iter()
                .map(|name| (name, FactionRelation::Enemy))
                .chain(spec.friends.iter().map(|name| (name, FactionRelation::Friendly)));
            for (name, relation) in relations {
                let other = world
                    .faction_by_name(name)
                    .ok_or_else(|| SimError::UnknownFaction(name.clone()))?;
                world.set_faction_relation(faction, other, relation);
            }
        }
        world.set_intercept_all_comms_to_gm(self.intercept_all_comms_to_gm);

        let mut spawned = Vec::with_capacity(self.objects.len());
        for spec in &self.objects {
            let entity = spec.spawn(world)?;
            spawned.push(entity);
        }
        info!(
            factions = self.factions.len(),
            objects = spawned.len(),
            "scenario loaded"
        );
        Ok(spawned)
    }
}

impl ObjectSpec {
    fn spawn(&self, world: &mut World) -> Result<Entity, SimError> {
        let faction = match &self.faction {
            Some(name) => Some(
                world
                    .faction_by_name(name)
                    .ok_or_else(|| SimError::UnknownFaction(name.clone()))?,
            ),
            None => None,
        };
        let kind = match &self.kind {
            ObjectSpecKind::PlayerShip => {
                ObjectKind::PlayerShip(Box::new(PlayerShip::new(world.config().max_ship_log_entries)))
            }
            ObjectSpecKind::CpuShip => ObjectKind::CpuShip,
            ObjectSpecKind::Station => ObjectKind::Station,
            ObjectSpecKind::Asteroid => ObjectKind::Asteroid,
            ObjectSpecKind::WormHole { target_position } => ObjectKind::WormHole {
                target_position: *target_position,
            },
            ObjectSpecKind::Zone { label } => ObjectKind::Zone { label: label.clone() },
        };
        let mut object = SpaceObject::new(kind)
            .with_call_sign(self.call_sign.as_str())
            .with_position(self.position)
            .with_rotation(self.rotation);
        if let Some(type_name) = &self.type_name {
            object.type_name.clone_from(type_name);
        }
        if let Some(radius) = self.radius {
            object.radius = radius;
        }
        if let Some(bay) = &self.docking_bay {
            object.docking_bay = Some(bay.clone());
        }
        if let Some(scan) = self.scanning {
            object.scan.set_parameters(scan.complexity, scan.depth);
        }
        if let Some(comms) = &self.comms {
            object.comms_script = Some(CommsHandle::new(comms.clone()));
        }
        object.faction = faction;
        Ok(world.spawn(object))
    }
}

impl World {
    /// Describe a live object in scenario format. Probes and missiles are
    /// not exported; nor are comms scripts.
    #[must_use]
    pub fn export_spec(&self, entity: Entity) -> Option<ObjectSpec> {
        let object = self.object(entity)?;
        let kind = match &object.kind {
            ObjectKind::PlayerShip(_) => ObjectSpecKind::PlayerShip,
            ObjectKind::CpuShip => ObjectSpecKind::CpuShip,
            ObjectKind::Station => ObjectSpecKind::Station,
            ObjectKind::Asteroid => ObjectSpecKind::Asteroid,
            ObjectKind::WormHole { target_position } => ObjectSpecKind::WormHole {
                target_position: *target_position,
            },
            ObjectKind::Zone { label } => ObjectSpecKind::Zone { label: label.clone() },
            ObjectKind::ScanProbe(_) | ObjectKind::Missile(_) => return None,
        };
        let faction = object.faction.and_then(|f| self.faction(f)).map(|info| info.name().to_string());
        let scanning = (object.scan.complexity() > 0 || object.scan.depth() > 0).then(|| ScanParameters {
            complexity: object.scan.complexity(),
            depth: object.scan.depth(),
        });
        Some(ObjectSpec {
            kind,
            call_sign: object.call_sign.clone(),
            type_name: Some(object.type_name.clone()),
            faction,
            position: object.position(),
            rotation: object.transform.rotation,
            radius: Some(object.radius),
            scanning,
            docking_bay: object.docking_bay.clone(),
            comms: None,
        })
    }

    /// One JSON line recreating the object, or `None` for runtime-only
    /// objects.
    #[must_use]
    pub fn export_line(&self, entity: Entity) -> Option<String> {
        serde_json::to_string(&self.export_spec(entity)?).ok()
    }
}

#[cfg(test)]
mod tests {
    use bridge_component::MissileType;
    use bridge_net::Command;

    use super::*;
    use crate::comms::CommsState;
    use crate::config::SimConfig;

    const SCENARIO: &str = r#"{
        "factions": [
            {"name": "Human Navy", "reputation": 100, "enemies": ["Kraylor"]},
            {"name": "Kraylor"}
        ],
        "objects": [
            {"kind": "player_ship", "call_sign": "Alpha", "faction": "Human Navy", "type_name": "Atlantis"},
            {"kind": "station", "call_sign": "DS-1", "faction": "Human Navy",
             "position": [2000, 0], "docking_bay": {"accepted_classes": ["Atlantis"]},
             "comms": {"greeting": "Welcome.", "replies": [{"text": "Hi", "response": "Hello"}]}},
            {"kind": "cpu_ship", "call_sign": "Raider", "faction": "Kraylor",
             "position": [5000, 0], "scanning": {"complexity": 2, "depth": 3}},
            {"kind": "zone", "label": "Nebula"}
        ]
    }"#;

    #[test]
    fn test_populate_world() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let mut world = World::new(SimConfig::default());
        let spawned = scenario.populate(&mut world).unwrap();
        let [alpha, station, raider, zone] = spawned[..] else {
            panic!("expected four objects");
        };
        assert!(world.player_ship(alpha).is_some());
        assert_eq!(world.object(alpha).unwrap().type_name, "Atlantis");
        assert_eq!(world.reputation_points(alpha), 100.0);
        assert!(world.is_enemy(alpha, raider));
        assert!(!world.is_enemy(alpha, station));
        assert_eq!(world.object(raider).unwrap().scan.depth(), 3);
        assert!(!world.can_be_targeted_by(zone, alpha));
    }

    #[test]
    fn test_scripted_station_from_file() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let mut world = World::new(SimConfig::default());
        let spawned = scenario.populate(&mut world).unwrap();
        let (alpha, station) = (spawned[0], spawned[1]);
        world.object_mut(alpha).unwrap().transform.position = Vec2::new(1500.0, 0.0);
        assert!(world.apply_command(alpha, Command::OpenTextComm(station)));
        world.update(2.0);
        let comms = world.comms(alpha).unwrap();
        assert_eq!(comms.state(), CommsState::ChannelOpen);
        assert_eq!(comms.incoming_message(), "Welcome.");
        assert!(world.apply_command(alpha, Command::Dock(station)));
        assert!(world.apply_command(alpha, Command::LoadTube { tube: 1, missile: MissileType::Nuke }));
    }

    #[test]
    fn test_unknown_faction_reference() {
        let text = r#"{"objects": [{"kind": "asteroid", "faction": "Nobody"}]}"#;
        let scenario = Scenario::from_json_str(text).unwrap();
        let mut world = World::new(SimConfig::default());
        assert!(matches!(
            scenario.populate(&mut world),
            Err(SimError::UnknownFaction(name)) if name == "Nobody"
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Scenario::from_json_str("{"), Err(SimError::Json(_))));
        assert!(matches!(
            Scenario::load("/nonexistent/scenario.json"),
            Err(SimError::Io { .. })
        ));
    }

    #[test]
    fn test_export_line_recreates_object() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let mut world = World::new(SimConfig::default());
        let spawned = scenario.populate(&mut world).unwrap();
        let raider = spawned[2];
        let line = world.export_line(raider).unwrap();
        let spec: ObjectSpec = serde_json::from_str(&line).unwrap();
        assert_eq!(spec.kind, ObjectSpecKind::CpuShip);
        assert_eq!(spec.faction.as_deref(), Some("Kraylor"));
        assert_eq!(spec.position, Vec2::new(5000.0, 0.0));
        assert_eq!(spec.scanning, Some(ScanParameters { complexity: 2, depth: 3 }));

        let copy = Scenario {
            objects: vec![spec],
            ..Scenario::default()
        };
        let mut fresh = World::new(SimConfig::default());
        fresh.add_faction("Kraylor").unwrap();
        let copied = copy.populate(&mut fresh).unwrap();
        assert_eq!(fresh.call_sign(copied[0]), "Raider");
    }

    #[test]
    fn test_runtime_objects_not_exported() {
        let mut world = World::new(SimConfig::default());
        let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
        world.apply_command(ship, Command::LaunchProbe(Vec2::new(100.0, 0.0)));
        let probe = world.objects().map(|(e, _)| e).find(|&e| e != ship).unwrap();
        assert!(world.export_line(probe).is_none());
        assert!(world.export_line(ship).is_some());
    }
}

//! Per-ship state published to crew clients after each tick.

use bridge_component::{AlertLevel, Entity, MainScreenOverlay, MainScreenSetting, MissileType, ShipSystem};
use bridge_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::comms::{CommsReply, CommsState};
use crate::ship::{DockingState, TubeState};
use crate::ship_log::ShipLogEntry;
use crate::systems::SystemStatus;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommsSnapshot {
    pub state: CommsState,
    pub target_name: String,
    pub opening_delay: f32,
    pub incoming_message: String,
    pub reply_options: Vec<CommsReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeSnapshot {
    pub state: TubeState,
    pub missile: Option<MissileType>,
    pub timer: f32,
    pub direction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDestructSnapshot {
    pub active: bool,
    pub codes: Vec<u32>,
    pub confirmed: Vec<bool>,
    pub countdown: Option<f32>,
}

/// Everything a crew station renders about its own ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub ship: Entity,
    pub call_sign: String,
    pub faction: String,
    pub position: Vec2,
    pub rotation: f32,
    pub sector: String,
    pub reputation_points: f32,

    pub target_rotation: f32,
    pub turn_speed: f32,
    pub impulse_request: f32,
    pub warp_request: i8,
    pub jump_drive_charge: f32,
    pub jump_delay: f32,
    pub combat_maneuver: (f32, f32),

    pub target: Option<Entity>,
    pub tubes: Vec<TubeSnapshot>,
    pub missile_stock: Vec<(MissileType, u32)>,
    pub shields_active: bool,
    pub shield_frequency: i32,
    pub shield_calibration_delay: f32,
    pub beam_frequency: i32,
    pub beam_system_target: Option<ShipSystem>,
    pub systems: Vec<(ShipSystem, SystemStatus)>,

    pub main_screen_setting: MainScreenSetting,
    pub main_screen_overlay: MainScreenOverlay,
    pub alert_level: AlertLevel,
    pub auto_repair_enabled: bool,

    pub scanning_target: Option<Entity>,
    pub scanning_delay: f32,
    pub scanning_complexity: u32,
    pub scanning_depth: u32,
    pub scan_probe_count: u32,
    pub linked_science_probe: Option<Entity>,

    pub docking_state: DockingState,
    pub docking_target: Option<Entity>,
    pub waypoints: Vec<Vec2>,
    pub self_destruct: SelfDestructSnapshot,
    pub energy_level: f32,

    pub comms: CommsSnapshot,
    pub ship_log: Vec<ShipLogEntry>,
    /// Changes whenever the custom function catalog does.
    pub custom_functions_revision: u64,
}

impl ShipSnapshot {
    /// Capture a player ship's state. `None` if `ship` is not a live player
    /// ship.
    #[must_use]
    pub fn capture(world: &World, ship: Entity) -> Option<Self> {
        let object = world.object(ship)?;
        let player = object.as_player()?;
        let comms = player.comms();
        let (complexity, depth) = player.scanning_parameters();
        let (setting, overlay) = player.main_screen();
        let destruct = player.self_destruct();
        Some(Self {
            ship,
            call_sign: object.call_sign.clone(),
            faction: world.faction_name_of(ship).to_string(),
            position: object.position(),
            rotation: object.transform.rotation,
            sector: object.sector_name(),
            reputation_points: world.reputation_points(ship),
            target_rotation: player.target_rotation(),
            turn_speed: player.turn_speed(),
            impulse_request: player.impulse_request(),
            warp_request: player.warp_request(),
            jump_drive_charge: player.jump_drive_charge(),
            jump_delay: player.jump_delay(),
            combat_maneuver: player.combat_maneuver_requests(),
            target: player.target(),
            tubes: player
                .tubes()
                .iter()
                .map(|tube| TubeSnapshot {
                    state: tube.state(),
                    missile: tube.missile(),
                    timer: tube.timer(),
                    direction: tube.direction,
                })
                .collect(),
            missile_stock: MissileType::ALL
                .iter()
                .map(|&missile| (missile, player.missile_stock(missile)))
                .collect(),
            shields_active: player.shields_active(),
            shield_frequency: player.shield_frequency(),
            shield_calibration_delay: player.shield_calibration_delay(),
            beam_frequency: player.beam_frequency(),
            beam_system_target: player.beam_system_target(),
            systems: object.systems.iter().map(|(system, status)| (system, *status)).collect(),
            main_screen_setting: setting,
            main_screen_overlay: overlay,
            alert_level: player.alert_level(),
            auto_repair_enabled: player.auto_repair_enabled,
            scanning_target: player.scanning_target(),
            scanning_delay: player.scanning_delay(),
            scanning_complexity: complexity,
            scanning_depth: depth,
            scan_probe_count: player.scan_probe_count(),
            linked_science_probe: player.linked_science_probe(),
            docking_state: player.docking_state(),
            docking_target: player.docking_target(),
            waypoints: player.waypoints().to_vec(),
            self_destruct: SelfDestructSnapshot {
                active: destruct.is_active(),
                codes: destruct.codes().to_vec(),
                confirmed: (0..destruct.codes().len()).map(|i| destruct.is_confirmed(i)).collect(),
                countdown: destruct.countdown(),
            },
            energy_level: player.energy_level(),
            comms: CommsSnapshot {
                state: comms.state(),
                target_name: comms.target_name().to_string(),
                opening_delay: comms.opening_delay(),
                incoming_message: comms.incoming_message().to_string(),
                reply_options: comms.reply_options().to_vec(),
            },
            ship_log: player.ship_log().entries().cloned().collect(),
            custom_functions_revision: player.custom_functions().revision(),
        })
    }
}

#[cfg(test)]
mod tests {
    use bridge_net::Command;

    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_capture_only_player_ships() {
        let mut world = World::new(SimConfig::default());
        let ship = world.spawn_player_ship("Alpha", Vec2::new(100.0, 0.0));
        let station = world.spawn_station("DS-1", Vec2::ZERO);
        assert!(ShipSnapshot::capture(&world, station).is_none());
        assert!(ShipSnapshot::capture(&world, Entity(999)).is_none());

        let snapshot = ShipSnapshot::capture(&world, ship).unwrap();
        assert_eq!(snapshot.call_sign, "Alpha");
        assert_eq!(snapshot.sector, "F5");
        assert_eq!(snapshot.tubes.len(), 2);
        assert_eq!(snapshot.comms.state, CommsState::Inactive);
        assert_eq!(snapshot.systems.len(), ShipSystem::ALL.len());
    }

    #[test]
    fn test_snapshot_reflects_commands() {
        let mut world = World::new(SimConfig::default());
        let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
        world.apply_command(ship, Command::SetAlertLevel(AlertLevel::Red));
        world.apply_command(ship, Command::AddWaypoint(Vec2::new(5.0, 6.0)));
        let snapshot = ShipSnapshot::capture(&world, ship).unwrap();
        assert_eq!(snapshot.alert_level, AlertLevel::Red);
        assert_eq!(snapshot.waypoints, vec![Vec2::new(5.0, 6.0)]);
        assert_eq!(snapshot.ship_log.last().unwrap().text, "RED ALERT declared");
    }

    #[test]
    fn test_snapshot_survives_msgpack() {
        let mut world = World::new(SimConfig::default());
        let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
        world.apply_command(ship, Command::ActivateSelfDestruct);
        let snapshot = ShipSnapshot::capture(&world, ship).unwrap();
        let bytes = rmp_serde::to_vec_named(&snapshot).unwrap();
        let decoded: ShipSnapshot = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
        assert!(decoded.self_destruct.active);
        assert_eq!(decoded.self_destruct.confirmed, vec![false; 3]);
    }
}

//! Applying crew commands to the world.
//!
//! [`World::apply_command`] is the single entry point. Each command is
//! checked against the ship's current state; a command whose preconditions
//! do not hold is dropped without a reply and leaves the world untouched.
//! Out-of-range numeric inputs are clamped rather than rejected.

use bridge_component::{AlertLevel, Entity, ScanState, ShipSystem};
use bridge_math::Vec2;
use bridge_net::Command;
use rand::Rng;
use tracing::{debug, info};

use crate::object::{MissileState, ObjectKind, ProbeState, SpaceObject};
use crate::ship::{DockingState, Outcome, PlayerShip};
use crate::ship_log::Color;
use crate::systems::ShipSystems;
use crate::world::World;

/// Amount one finished hack adds to the target system's hacked level.
pub const HACK_AMOUNT: f32 = 0.5;

impl World {
    /// Apply one command on behalf of `ship`.
    ///
    /// Returns `true` if the command took effect. Rejections are logged at
    /// debug level and otherwise invisible to the client.
    pub fn apply_command(&mut self, ship: Entity, command: Command) -> bool {
        let name = command.name();
        match self.try_apply(ship, command) {
            Ok(()) => true,
            Err(reason) => {
                debug!(%ship, command = name, reason, "command dropped");
                false
            }
        }
    }

    fn ship_parts(&mut self, ship: Entity) -> Result<(&mut PlayerShip, &mut ShipSystems), &'static str> {
        let object = self.object_mut(ship).ok_or("ship not found")?;
        match &mut object.kind {
            ObjectKind::PlayerShip(player) => Ok((player.as_mut(), &mut object.systems)),
            _ => Err("not a player ship"),
        }
    }

    fn player(&mut self, ship: Entity) -> Result<&mut PlayerShip, &'static str> {
        self.ship_parts(ship).map(|(player, _)| player)
    }

    fn try_apply(&mut self, ship: Entity, command: Command) -> Outcome {
        self.ship_parts(ship)?;
        require(command.is_finite(), "non-finite input")?;
        match command {
            Command::TargetRotation(rotation) => {
                self.player(ship)?.steer(rotation);
                Ok(())
            }
            Command::TurnSpeed(speed) => {
                self.player(ship)?.set_turn_speed(speed);
                Ok(())
            }
            Command::Impulse(request) => {
                let (player, systems) = self.ship_parts(ship)?;
                require(systems.has(ShipSystem::Impulse), "no impulse engines")?;
                player.set_impulse(request);
                Ok(())
            }
            Command::Warp(level) => {
                let (player, systems) = self.ship_parts(ship)?;
                require(systems.has(ShipSystem::Warp), "no warp drive")?;
                player.set_warp(level);
                Ok(())
            }
            Command::Jump(distance) => {
                let delay = self.config().jump_delay;
                let (player, systems) = self.ship_parts(ship)?;
                require(systems.has(ShipSystem::JumpDrive), "no jump drive")?;
                player.start_jump(distance, delay)
            }
            Command::SetTarget(target) => {
                if let Some(target) = target {
                    require(self.can_be_targeted_by(target, ship), "target not targetable")?;
                }
                self.player(ship)?.set_target(target);
                Ok(())
            }
            Command::LoadTube { tube, missile } => {
                let load_time = self.config().tube_load_time;
                self.player(ship)?.load_tube(tube, missile, load_time)
            }
            Command::UnloadTube { tube } => {
                let load_time = self.config().tube_load_time;
                self.player(ship)?.unload_tube(tube, load_time)
            }
            Command::FireTube { tube, angle } => self.fire_tube(ship, tube, angle, None),
            Command::FireTubeAtTarget { tube, target } => {
                let from = self.object(ship).ok_or("ship not found")?.transform;
                let to = self.object(target).ok_or("target not found")?.position();
                require(target != ship, "cannot target self")?;
                self.fire_tube(ship, tube, from.rotation_towards(to), Some(target))
            }
            Command::SetShields(active) => {
                let (player, systems) = self.ship_parts(ship)?;
                require(has_shields(systems), "no shields")?;
                player.set_shields(active)
            }
            Command::MainScreenSetting(setting) => {
                self.player(ship)?.set_main_screen_setting(setting);
                Ok(())
            }
            Command::MainScreenOverlay(overlay) => {
                self.player(ship)?.set_main_screen_overlay(overlay);
                Ok(())
            }
            Command::ScanObject(target) => self.start_scan(ship, target),
            Command::ScanDone => self.finish_scan_step(ship),
            Command::ScanCancel => {
                self.player(ship)?.clear_scan();
                Ok(())
            }
            Command::SetSystemPowerRequest { system, level } => {
                let max = self.config().max_power_request;
                let (_, systems) = self.ship_parts(ship)?;
                require(systems.set_power_request(system, level, max), "system not installed")
            }
            Command::SetSystemCoolantRequest { system, level } => {
                let (per_system, total) = (self.config().max_coolant_per_system, self.config().max_coolant);
                let (_, systems) = self.ship_parts(ship)?;
                require(
                    systems.set_coolant_request(system, level, per_system, total),
                    "system not installed",
                )
            }
            Command::Dock(station) => self.request_dock(ship, station),
            Command::Undock => {
                let player = self.player(ship)?;
                require(player.is_docked(), "not docked")?;
                player.docking_state = DockingState::NotDocking;
                player.docking_target = None;
                info!(%ship, "undocked");
                Ok(())
            }
            Command::AbortDock => {
                let player = self.player(ship)?;
                require(
                    player.docking_state == DockingState::Docking,
                    "not docking",
                )?;
                player.docking_state = DockingState::NotDocking;
                player.docking_target = None;
                Ok(())
            }
            Command::OpenTextComm(target) => require(self.hail_by_object(ship, target, ""), "cannot hail"),
            Command::CloseTextComm => require(self.close_comms(ship), "comms inactive"),
            Command::AnswerCommHail(accept) => require(self.answer_comm_hail(ship, accept), "not being hailed"),
            Command::SendComm(index) => require(
                self.select_comms_reply(ship, usize::from(index)),
                "no such reply",
            ),
            Command::SendCommPlayer(text) => require(self.send_comms_chat(ship, &text), "no chat channel"),
            Command::SetAutoRepair(enabled) => {
                self.player(ship)?.auto_repair_enabled = enabled;
                Ok(())
            }
            Command::SetBeamFrequency(frequency) => {
                let (player, systems) = self.ship_parts(ship)?;
                require(systems.has(ShipSystem::BeamWeapons), "no beam weapons")?;
                player.set_beam_frequency(frequency);
                Ok(())
            }
            Command::SetBeamSystemTarget(system) => {
                let (player, systems) = self.ship_parts(ship)?;
                require(systems.has(ShipSystem::BeamWeapons), "no beam weapons")?;
                player.set_beam_system_target(system);
                Ok(())
            }
            Command::SetShieldFrequency(frequency) => {
                let calibration = self.config().shield_calibration_time;
                let (player, systems) = self.ship_parts(ship)?;
                require(has_shields(systems), "no shields")?;
                player.set_shield_frequency(frequency, calibration)
            }
            Command::AddWaypoint(position) => {
                let max = self.config().max_waypoints;
                self.player(ship)?.add_waypoint(position, max)
            }
            Command::RemoveWaypoint(index) => self.player(ship)?.remove_waypoint(index),
            Command::MoveWaypoint { index, position } => self.player(ship)?.move_waypoint(index, position),
            Command::ActivateSelfDestruct => {
                let count = self.config().self_destruct_code_count;
                let codes: Vec<u32> = (0..count).map(|_| self.rng.gen_range(0..100_000)).collect();
                self.player(ship)?.activate_self_destruct(codes)?;
                info!(%ship, "self-destruct activated");
                self.add_to_ship_log(ship, "Self-destruct sequence activated", Color::ALERT);
                Ok(())
            }
            Command::CancelSelfDestruct => {
                self.player(ship)?.cancel_self_destruct()?;
                info!(%ship, "self-destruct cancelled");
                self.add_to_ship_log(ship, "Self-destruct sequence cancelled", Color::WHITE);
                Ok(())
            }
            Command::ConfirmDestructCode { index, code } => {
                let countdown = self.config().self_destruct_countdown;
                let player = self.player(ship)?;
                player.confirm_destruct_code(index, code, countdown)?;
                if player.self_destruct().countdown().is_some() {
                    info!(%ship, countdown, "self-destruct countdown started");
                }
                Ok(())
            }
            Command::CombatManeuverBoost(amount) => {
                let player = self.player(ship)?;
                require(player.can_combat_maneuver, "combat maneuver disabled")?;
                player.set_combat_boost(amount);
                Ok(())
            }
            Command::CombatManeuverStrafe(amount) => {
                let player = self.player(ship)?;
                require(player.can_combat_maneuver, "combat maneuver disabled")?;
                player.set_combat_strafe(amount);
                Ok(())
            }
            Command::LaunchProbe(target) => self.launch_probe(ship, target),
            Command::SetScienceLink(probe) => {
                let owned = matches!(
                    self.object(probe).map(|o| &o.kind),
                    Some(ObjectKind::ScanProbe(state)) if state.owner == ship
                );
                require(owned, "not an owned probe")?;
                let player = self.player(ship)?;
                player.linked_science_probe = Some(probe);
                if let Some(callback) = player.on_probe_link.clone() {
                    callback.invoke();
                }
                Ok(())
            }
            Command::ClearScienceLink => {
                let player = self.player(ship)?;
                player.linked_science_probe.take().ok_or("no probe linked")?;
                if let Some(callback) = player.on_probe_unlink.clone() {
                    callback.invoke();
                }
                Ok(())
            }
            Command::SetAlertLevel(level) => {
                if self.player(ship)?.set_alert_level(level) {
                    let text = match level {
                        AlertLevel::Normal => "Alert level normal".to_string(),
                        _ => format!("{} declared", level.label()),
                    };
                    self.add_to_ship_log(ship, &text, Color::ALERT);
                }
                Ok(())
            }
            Command::HackingFinished { target, system } => {
                require(self.player(ship)?.can_hack, "hacking disabled")?;
                require(target != ship, "cannot hack self")?;
                let object = self.object_mut(target).ok_or("target not found")?;
                require(object.systems.hack(system, HACK_AMOUNT), "target lacks system")?;
                info!(%ship, %target, system = system.name(), "system hacked");
                Ok(())
            }
            Command::CustomFunction(name) => {
                let player = self.player(ship)?;
                require(player.custom.get(&name).is_some(), "no such custom function")?;
                let callback = player.custom.activate(&name);
                if let Some(callback) = callback {
                    callback.invoke();
                }
                Ok(())
            }
        }
    }

    fn fire_tube(&mut self, ship: Entity, tube: i8, angle: f32, target: Option<Entity>) -> Outcome {
        let (position, faction) = {
            let object = self.object(ship).ok_or("ship not found")?;
            (object.position(), object.faction)
        };
        let player = self.player(ship)?;
        let target = target.or(player.target());
        let (missile_type, _direction) = player.fire_tube(tube)?;
        let mut missile = SpaceObject::new(ObjectKind::Missile(MissileState {
            missile_type,
            owner: ship,
            target,
            target_angle: angle,
            lifetime: MissileState::LIFETIME,
        }))
        .with_position(position)
        .with_rotation(angle);
        missile.faction = faction;
        let entity = self.spawn(missile);
        info!(%ship, missile = %entity, ?missile_type, angle, "tube fired");
        Ok(())
    }

    fn start_scan(&mut self, ship: Entity, target: Entity) -> Outcome {
        require(self.player(ship)?.can_scan, "cannot scan")?;
        require(self.can_be_scanned_by(target, ship), "target not scannable")?;
        let delay = self.config().max_scanning_delay;
        let (complexity, depth) = {
            let scan = &self.object(target).ok_or("target not found")?.scan;
            (scan.complexity(), scan.depth())
        };
        let player = self.player(ship)?;
        player.scanning_target = Some(target);
        player.scanning_delay = delay;
        player.scanning_complexity = complexity;
        player.scanning_depth = depth;
        debug!(%ship, %target, complexity, depth, "scan started");
        Ok(())
    }

    fn finish_scan_step(&mut self, ship: Entity) -> Outcome {
        let player = self.player(ship)?;
        let target = player.scanning_target.ok_or("not scanning")?;
        require(player.scanning_delay <= 0.0, "scan delay running")?;
        if !self.is_valid(target) {
            self.player(ship)?.clear_scan();
            return Err("scan target gone");
        }
        let state = self.register_scan_step(target, ship);
        if state == ScanState::FullyScanned {
            self.player(ship)?.clear_scan();
        }
        Ok(())
    }

    fn request_dock(&mut self, ship: Entity, station: Entity) -> Outcome {
        let range = self.config().docking_range;
        let (position, class) = {
            let object = self.object(ship).ok_or("ship not found")?;
            (object.position(), object.type_name.clone())
        };
        let player = self.player(ship)?;
        require(player.can_dock, "docking disabled")?;
        require(
            player.docking_state == DockingState::NotDocking,
            "already docking",
        )?;
        require(station != ship, "cannot dock with self")?;
        let target = self.object(station).ok_or("station not found")?;
        require(target.accepts_docking(&class), "incompatible docking bay")?;
        require(
            target.position().distance(position) <= range + target.radius,
            "out of docking range",
        )?;
        let player = self.player(ship)?;
        player.docking_state = DockingState::Docking;
        player.docking_target = Some(station);
        info!(%ship, %station, "docking requested");
        Ok(())
    }

    fn launch_probe(&mut self, ship: Entity, target: Vec2) -> Outcome {
        let (position, faction) = {
            let object = self.object(ship).ok_or("ship not found")?;
            (object.position(), object.faction)
        };
        let player = self.player(ship)?;
        player.take_probe()?;
        let callback = player.on_probe_launch.clone();
        let mut probe = SpaceObject::new(ObjectKind::ScanProbe(ProbeState {
            owner: ship,
            target_position: target,
            lifetime: ProbeState::LIFETIME,
        }))
        .with_position(position);
        probe.faction = faction;
        let entity = self.spawn(probe);
        debug!(%ship, probe = %entity, "probe launched");
        if let Some(callback) = callback {
            callback.invoke();
        }
        Ok(())
    }
}

fn require(condition: bool, reason: &'static str) -> Outcome {
    if condition { Ok(()) } else { Err(reason) }
}

fn has_shields(systems: &ShipSystems) -> bool {
    systems.has(ShipSystem::FrontShield) || systems.has(ShipSystem::RearShield)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bridge_component::{CrewPosition, MissileType};

    use super::*;
    use crate::comms::CommsState;
    use crate::config::SimConfig;
    use crate::object::DockingBay;
    use crate::script::Callback;
    use crate::ship::TubeState;

    fn setup() -> (World, Entity) {
        let mut world = World::with_seed(SimConfig::default(), 1);
        let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
        (world, ship)
    }

    fn counter() -> (Arc<AtomicUsize>, Callback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        (hits, Callback::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn player(world: &World, ship: Entity) -> &PlayerShip {
        world.player_ship(ship).unwrap()
    }

    #[test]
    fn test_commands_for_non_player_are_dropped() {
        let (mut world, _) = setup();
        let station = world.spawn_station("DS-1", Vec2::ZERO);
        assert!(!world.apply_command(station, Command::Impulse(1.0)));
        assert!(!world.apply_command(Entity(404), Command::Impulse(1.0)));
    }

    #[test]
    fn test_helm_inputs_are_clamped() {
        let (mut world, ship) = setup();
        assert!(world.apply_command(ship, Command::Impulse(5.0)));
        assert!(world.apply_command(ship, Command::Warp(100)));
        assert_eq!(player(&world, ship).impulse_request(), 1.0);
        assert_eq!(player(&world, ship).warp_request(), 4);
    }

    #[test]
    fn test_missing_system_drops_command() {
        let (mut world, ship) = setup();
        let object = world.object_mut(ship).unwrap();
        object.systems = ShipSystems::all().without(ShipSystem::Impulse).without(ShipSystem::JumpDrive);
        assert!(!world.apply_command(ship, Command::Impulse(0.5)));
        assert!(!world.apply_command(ship, Command::Jump(10_000.0)));
        assert_eq!(player(&world, ship).impulse_request(), 0.0);
        assert_eq!(player(&world, ship).jump_delay(), 0.0);
    }

    #[test]
    fn test_set_target_rules() {
        let (mut world, ship) = setup();
        let zone = world.spawn(SpaceObject::new(ObjectKind::Zone { label: "Nebula".into() }));
        let raider = world.spawn_cpu_ship("Raider", Vec2::ZERO);
        assert!(!world.apply_command(ship, Command::SetTarget(Some(zone))));
        assert!(!world.apply_command(ship, Command::SetTarget(Some(ship))));
        assert!(world.apply_command(ship, Command::SetTarget(Some(raider))));
        assert_eq!(player(&world, ship).target(), Some(raider));
        world.destroy(raider);
        world.update(0.1);
        assert_eq!(player(&world, ship).target(), None);
        assert!(world.apply_command(ship, Command::SetTarget(None)));
    }

    #[test]
    fn test_fire_spawns_missile_with_angle() {
        let (mut world, ship) = setup();
        world.apply_command(ship, Command::LoadTube { tube: 0, missile: MissileType::Homing });
        assert!(!world.apply_command(ship, Command::FireTube { tube: 0, angle: 90.0 }));
        world.update(8.0);
        assert!(world.apply_command(ship, Command::FireTube { tube: 0, angle: 90.0 }));
        assert_eq!(player(&world, ship).tubes()[0].state(), TubeState::Empty);
        let missile = world
            .objects()
            .find_map(|(_, o)| match &o.kind {
                ObjectKind::Missile(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(missile.missile_type, MissileType::Homing);
        assert_eq!(missile.owner, ship);
        assert_eq!(missile.target_angle, 90.0);
    }

    #[test]
    fn test_fire_at_target_derives_bearing() {
        let (mut world, ship) = setup();
        let raider = world.spawn_cpu_ship("Raider", Vec2::new(0.0, 1000.0));
        world.apply_command(ship, Command::LoadTube { tube: 1, missile: MissileType::Nuke });
        world.update(8.0);
        assert!(!world.apply_command(ship, Command::FireTubeAtTarget { tube: 1, target: Entity(404) }));
        assert_eq!(player(&world, ship).tubes()[1].state(), TubeState::Loaded);
        assert!(world.apply_command(ship, Command::FireTubeAtTarget { tube: 1, target: raider }));
        let missile = world
            .objects()
            .find_map(|(_, o)| match &o.kind {
                ObjectKind::Missile(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(missile.target, Some(raider));
        assert!((missile.target_angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_missiles_expire() {
        let (mut world, ship) = setup();
        world.apply_command(ship, Command::LoadTube { tube: 0, missile: MissileType::Hvli });
        world.update(8.0);
        world.apply_command(ship, Command::FireTube { tube: 0, angle: 0.0 });
        assert_eq!(world.object_count(), 2);
        world.update(MissileState::LIFETIME);
        assert_eq!(world.object_count(), 1);
    }

    #[test]
    fn test_shield_frequency_blocks_toggle_during_calibration() {
        let (mut world, ship) = setup();
        assert!(world.apply_command(ship, Command::SetShields(true)));
        assert!(world.apply_command(ship, Command::SetShieldFrequency(5)));
        assert!(!player(&world, ship).shields_active());
        assert!(!world.apply_command(ship, Command::SetShields(true)));
        world.update(25.0);
        assert!(world.apply_command(ship, Command::SetShields(true)));
        assert!(!world.apply_command(ship, Command::SetShieldFrequency(5)));
    }

    #[test]
    fn test_power_and_coolant_requests() {
        let (mut world, ship) = setup();
        assert!(world.apply_command(ship, Command::SetSystemPowerRequest { system: ShipSystem::Warp, level: 9.0 }));
        let systems = &world.object(ship).unwrap().systems;
        assert_eq!(systems.get(ShipSystem::Warp).unwrap().power_request, 3.0);
        world.object_mut(ship).unwrap().systems = ShipSystems::all().without(ShipSystem::Warp);
        assert!(!world.apply_command(ship, Command::SetSystemCoolantRequest { system: ShipSystem::Warp, level: 1.0 }));
        assert!(world.apply_command(ship, Command::SetSystemCoolantRequest { system: ShipSystem::Reactor, level: 4.0 }));
    }

    #[test]
    fn test_docking_preconditions() {
        let (mut world, ship) = setup();
        let far = world.spawn_station("Far", Vec2::new(5000.0, 0.0));
        let picky = world.spawn(
            SpaceObject::new(ObjectKind::Station)
                .with_call_sign("Picky")
                .with_docking_bay(Some(DockingBay {
                    accepted_classes: vec!["Hathcock".into()],
                })),
        );
        let near = world.spawn_station("Near", Vec2::new(500.0, 0.0));
        assert!(!world.apply_command(ship, Command::Dock(far)));
        assert!(!world.apply_command(ship, Command::Dock(picky)));
        assert!(!world.apply_command(ship, Command::Undock));
        assert!(world.apply_command(ship, Command::Dock(near)));
        assert!(!world.apply_command(ship, Command::Dock(near)));
        assert!(world.apply_command(ship, Command::AbortDock));
        assert!(world.apply_command(ship, Command::Dock(near)));
        world.update(0.1);
        assert!(!world.apply_command(ship, Command::AbortDock));
        assert!(world.apply_command(ship, Command::Undock));
        assert_eq!(player(&world, ship).docking_target(), None);
    }

    #[test]
    fn test_scan_needs_delay_then_steps() {
        let (mut world, ship) = setup();
        let raider = world.spawn_cpu_ship("Raider", Vec2::ZERO);
        world.set_scanning_parameters(raider, 2, 2);
        assert!(!world.apply_command(ship, Command::ScanDone));
        assert!(world.apply_command(ship, Command::ScanObject(raider)));
        assert!(!world.apply_command(ship, Command::ScanDone));
        world.update(6.0);
        assert!(world.apply_command(ship, Command::ScanDone));
        assert_eq!(world.scanned_state_for(raider, ship), ScanState::FriendOrFoeIdentified);
        assert_eq!(player(&world, ship).scanning_target(), Some(raider));
        assert!(world.apply_command(ship, Command::ScanDone));
        assert_eq!(world.scanned_state_for(raider, ship), ScanState::FullyScanned);
        assert_eq!(player(&world, ship).scanning_target(), None);
        assert!(!world.apply_command(ship, Command::ScanObject(raider)));
    }

    #[test]
    fn test_scan_cancel() {
        let (mut world, ship) = setup();
        let raider = world.spawn_cpu_ship("Raider", Vec2::ZERO);
        world.apply_command(ship, Command::ScanObject(raider));
        assert!(world.apply_command(ship, Command::ScanCancel));
        world.update(6.0);
        assert_eq!(world.scanned_state_for(raider, ship), ScanState::NotScanned);
    }

    #[test]
    fn test_comms_commands() {
        let (mut world, ship) = setup();
        let other = world.spawn_player_ship("Beta", Vec2::ZERO);
        assert!(!world.apply_command(ship, Command::CloseTextComm));
        assert!(!world.apply_command(ship, Command::AnswerCommHail(true)));
        assert!(world.apply_command(ship, Command::OpenTextComm(other)));
        assert!(!world.apply_command(ship, Command::OpenTextComm(other)));
        world.update(2.0);
        assert!(world.apply_command(other, Command::AnswerCommHail(true)));
        assert!(world.apply_command(other, Command::SendCommPlayer("Hello".into())));
        assert_eq!(world.comms(ship).unwrap().incoming_message(), "> Hello");
        assert!(!world.apply_command(other, Command::SendComm(0)));
        assert!(world.apply_command(ship, Command::CloseTextComm));
        assert_eq!(world.comms(other).unwrap().state(), CommsState::ChannelClosed);
    }

    #[test]
    fn test_waypoint_limit() {
        let (mut world, ship) = setup();
        for i in 0..9 {
            assert!(world.apply_command(ship, Command::AddWaypoint(Vec2::splat(i as f32))));
        }
        assert!(!world.apply_command(ship, Command::AddWaypoint(Vec2::ZERO)));
        assert!(world.apply_command(ship, Command::RemoveWaypoint(0)));
        assert!(!world.apply_command(ship, Command::MoveWaypoint { index: 8, position: Vec2::ZERO }));
        assert_eq!(player(&world, ship).waypoints().len(), 8);
    }

    #[test]
    fn test_self_destruct_commands() {
        let (mut world, ship) = setup();
        assert!(!world.apply_command(ship, Command::CancelSelfDestruct));
        assert!(world.apply_command(ship, Command::ActivateSelfDestruct));
        assert!(!world.apply_command(ship, Command::ActivateSelfDestruct));
        let code = player(&world, ship).self_destruct().codes()[0];
        assert!(!world.apply_command(ship, Command::ConfirmDestructCode { index: 0, code: code + 1 }));
        assert!(!world.apply_command(ship, Command::ConfirmDestructCode { index: 7, code }));
        assert!(world.apply_command(ship, Command::ConfirmDestructCode { index: 0, code }));
        assert!(world.apply_command(ship, Command::CancelSelfDestruct));
        let log = player(&world, ship).ship_log();
        assert_eq!(log.last().unwrap().text, "Self-destruct sequence cancelled");
    }

    #[test]
    fn test_probe_launch_and_link() {
        let (mut world, ship) = setup();
        let other = world.spawn_player_ship("Beta", Vec2::ZERO);
        let (launched, on_launch) = counter();
        let (linked, on_link) = counter();
        let (unlinked, on_unlink) = counter();
        {
            let player = world.player_ship_mut(ship).unwrap();
            player.on_probe_launch(on_launch);
            player.on_probe_link(on_link);
            player.on_probe_unlink(on_unlink);
            player.set_max_scan_probe_count(1);
        }
        assert!(world.apply_command(ship, Command::LaunchProbe(Vec2::new(10.0, 0.0))));
        assert!(!world.apply_command(ship, Command::LaunchProbe(Vec2::new(10.0, 0.0))));
        assert_eq!(launched.load(Ordering::SeqCst), 1);
        let probe = world
            .objects()
            .find(|(_, o)| matches!(o.kind, ObjectKind::ScanProbe(_)))
            .map(|(e, _)| e)
            .unwrap();
        assert!(!world.apply_command(other, Command::SetScienceLink(probe)));
        assert!(!world.apply_command(ship, Command::ClearScienceLink));
        assert!(world.apply_command(ship, Command::SetScienceLink(probe)));
        assert_eq!(player(&world, ship).linked_science_probe(), Some(probe));
        assert!(world.apply_command(ship, Command::ClearScienceLink));
        assert_eq!(linked.load(Ordering::SeqCst), 1);
        assert_eq!(unlinked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_alert_level_logged_on_change_only() {
        let (mut world, ship) = setup();
        assert!(world.apply_command(ship, Command::SetAlertLevel(AlertLevel::Yellow)));
        assert!(world.apply_command(ship, Command::SetAlertLevel(AlertLevel::Yellow)));
        assert!(world.apply_command(ship, Command::SetAlertLevel(AlertLevel::Normal)));
        let texts: Vec<_> = player(&world, ship).ship_log().entries().map(|e| e.text.clone()).collect();
        assert_eq!(texts, vec!["YELLOW ALERT declared", "Alert level normal"]);
    }

    #[test]
    fn test_hacking_finished() {
        let (mut world, ship) = setup();
        let raider = world.spawn_cpu_ship("Raider", Vec2::ZERO);
        let rock = world.spawn(SpaceObject::new(ObjectKind::Asteroid));
        assert!(world.apply_command(ship, Command::HackingFinished { target: raider, system: ShipSystem::Warp }));
        assert!(world.apply_command(ship, Command::HackingFinished { target: raider, system: ShipSystem::Warp }));
        assert!(world.apply_command(ship, Command::HackingFinished { target: raider, system: ShipSystem::Warp }));
        let level = world.object(raider).unwrap().systems.get(ShipSystem::Warp).unwrap().hacked_level;
        assert_eq!(level, 1.0);
        assert!(!world.apply_command(ship, Command::HackingFinished { target: rock, system: ShipSystem::Warp }));
        world.player_ship_mut(ship).unwrap().can_hack = false;
        assert!(!world.apply_command(ship, Command::HackingFinished { target: raider, system: ShipSystem::Reactor }));
    }

    #[test]
    fn test_custom_function_activation() {
        let (mut world, ship) = setup();
        let (pressed, on_press) = counter();
        let (read, on_read) = counter();
        {
            let registry = world.player_ship_mut(ship).unwrap().custom_functions_mut();
            registry.add_button(CrewPosition::Weapons, "arm", "Arm", on_press, None);
            registry.add_message_with_callback(CrewPosition::Science, "intel", "New intel", on_read);
            registry.add_info(CrewPosition::Helms, "eta", "ETA 5 min", None);
        }
        assert!(world.apply_command(ship, Command::CustomFunction("arm".into())));
        assert!(world.apply_command(ship, Command::CustomFunction("arm".into())));
        assert_eq!(pressed.load(Ordering::SeqCst), 2);

        assert!(world.apply_command(ship, Command::CustomFunction("intel".into())));
        assert_eq!(read.load(Ordering::SeqCst), 1);
        assert!(player(&world, ship).custom_functions().get("intel").is_none());
        assert!(!world.apply_command(ship, Command::CustomFunction("intel".into())));

        assert!(world.apply_command(ship, Command::CustomFunction("eta".into())));
        assert!(player(&world, ship).custom_functions().get("eta").is_some());
    }

    #[test]
    fn test_combat_maneuver_can_be_disabled() {
        let (mut world, ship) = setup();
        assert!(world.apply_command(ship, Command::CombatManeuverBoost(0.5)));
        world.player_ship_mut(ship).unwrap().can_combat_maneuver = false;
        assert!(!world.apply_command(ship, Command::CombatManeuverStrafe(0.5)));
        assert_eq!(player(&world, ship).combat_maneuver_requests(), (0.5, 0.0));
    }
}

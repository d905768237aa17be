//! Per-tick world update.
//!
//! Everything time-based advances here: the mission clock, comms delays,
//! tube loading, scan delays, shield calibration, docking, the jump drive,
//! the self-destruct countdown, probes and missiles. Stored handles are
//! re-validated every tick and cleared when their object is gone.

use bridge_component::Entity;
use tracing::{debug, info};

use crate::object::{ObjectKind, ProbeState};
use crate::ship::DockingState;
use crate::world::World;

impl World {
    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.advance_clock(dt);
        for ship in self.player_ships() {
            self.update_comms(ship, dt);
            self.update_player_ship(ship, dt);
        }
        self.update_transient_objects(dt);
    }

    fn update_player_ship(&mut self, ship: Entity, dt: f32) {
        let Some(player) = self.player_ship(ship) else {
            return;
        };
        let target = player.target();
        let scanning = player.scanning_target();
        let docking = player.docking_target();
        let probe = player.linked_science_probe();
        let target_gone = target.is_some_and(|t| !self.is_valid(t));
        let scan_gone = scanning.is_some_and(|t| !self.is_valid(t));
        let probe_gone = probe.is_some_and(|p| !self.is_valid(p));
        let station = docking.and_then(|d| self.object(d)).map(|o| (o.position(), o.radius));
        let position = self.object(ship).map(|o| o.position()).unwrap_or_default();
        let docking_range = self.config().docking_range;
        let probe_charge_time = self.config().scan_probe_charge_time;

        let Some(player) = self.player_ship_mut(ship) else {
            return;
        };
        player.update_tubes(dt);
        player.update_shields(dt);
        if target_gone {
            player.set_target(None);
        }
        if probe_gone {
            player.linked_science_probe = None;
            if let Some(callback) = player.on_probe_unlink.clone() {
                callback.invoke();
            }
        }

        let mut timed_scan_done = None;
        if scan_gone {
            player.clear_scan();
        } else if let Some(target) = scanning
            && player.scanning_delay > 0.0
        {
            player.scanning_delay = (player.scanning_delay - dt).max(0.0);
            if player.scanning_delay <= 0.0 && player.scanning_complexity == 0 {
                timed_scan_done = Some((target, player.scanning_depth.max(1)));
                player.clear_scan();
            }
        }

        match (player.docking_state, station) {
            (DockingState::NotDocking, _) => {}
            (_, None) => {
                player.docking_state = DockingState::NotDocking;
                player.docking_target = None;
                debug!(%ship, "docking target lost");
            }
            (DockingState::Docking, Some((at, radius))) => {
                if at.distance(position) <= docking_range + radius {
                    player.docking_state = DockingState::Docked;
                    info!(%ship, station = ?docking, "docked");
                }
            }
            (DockingState::Docked, Some(_)) => player.recharge_probes(dt, probe_charge_time),
        }

        let jump = player.update_jump(dt);
        let destruct = player.update_self_destruct(dt);

        if let Some(distance) = jump
            && let Some(object) = self.object_mut(ship)
        {
            let offset = object.transform.forward() * distance;
            object.transform.position += offset;
            info!(%ship, distance, "jumped");
        }
        if let Some((target, steps)) = timed_scan_done {
            for _ in 0..steps {
                self.register_scan_step(target, ship);
            }
        }
        if destruct {
            info!(%ship, "self-destructed");
            self.destroy(ship);
        }
    }

    fn update_transient_objects(&mut self, dt: f32) {
        let mut expired = Vec::new();
        for (entity, object) in self.objects_mut() {
            match &mut object.kind {
                ObjectKind::ScanProbe(probe) => {
                    let to_target = probe.target_position - object.transform.position;
                    let step = ProbeState::SPEED * dt;
                    if to_target.length() > step {
                        object.transform.position += to_target.normalize() * step;
                    } else {
                        object.transform.position = probe.target_position;
                        probe.lifetime -= dt;
                    }
                    if probe.lifetime <= 0.0 {
                        expired.push(entity);
                    }
                }
                ObjectKind::Missile(missile) => {
                    missile.lifetime -= dt;
                    if missile.lifetime <= 0.0 {
                        expired.push(entity);
                    }
                }
                _ => {}
            }
        }
        for entity in expired {
            self.destroy(entity);
        }
    }
}

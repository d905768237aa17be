//! Player ship state.
//!
//! [`PlayerShip`] holds everything a crew can command. Methods here check
//! the ship's own preconditions and return the reason a request was refused;
//! anything involving another object is handled by the world.

use bridge_component::{AlertLevel, Entity, MainScreenOverlay, MainScreenSetting, MissileType, ShipSystem};
use bridge_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::comms::CommsChannel;
use crate::custom::CustomFunctionRegistry;
use crate::script::Callback;
use crate::ship_log::ShipLog;

/// Result of a ship-local precondition check. The error names the failed
/// precondition for the drop log.
pub(crate) type Outcome = Result<(), &'static str>;

/// Highest beam and shield frequency index.
pub const MAX_FREQUENCY: i32 = 20;

/// Default number of probes a ship carries.
pub const DEFAULT_SCAN_PROBES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TubeState {
    #[default]
    Empty,
    Loading,
    Loaded,
    Unloading,
}

/// One missile tube.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponTube {
    state: TubeState,
    missile: Option<MissileType>,
    timer: f32,
    accepts: [bool; MissileType::COUNT],
    /// Firing direction relative to the ship's rotation, in degrees.
    pub direction: f32,
}

impl WeaponTube {
    #[must_use]
    pub fn new(direction: f32) -> Self {
        Self {
            state: TubeState::Empty,
            missile: None,
            timer: 0.0,
            accepts: [true; MissileType::COUNT],
            direction,
        }
    }

    #[must_use]
    pub fn state(&self) -> TubeState {
        self.state
    }

    #[must_use]
    pub fn missile(&self) -> Option<MissileType> {
        self.missile
    }

    /// Seconds left on the current load or unload.
    #[must_use]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    #[must_use]
    pub fn accepts(&self, missile: MissileType) -> bool {
        self.accepts[missile.index()]
    }

    pub fn set_accepts(&mut self, missile: MissileType, allowed: bool) {
        self.accepts[missile.index()] = allowed;
    }

    /// Advance a load or unload. Returns the missile type when an unload
    /// finishes, so the caller can return it to stock.
    fn update(&mut self, dt: f32) -> Option<MissileType> {
        if !matches!(self.state, TubeState::Loading | TubeState::Unloading) {
            return None;
        }
        self.timer = (self.timer - dt).max(0.0);
        if self.timer > 0.0 {
            return None;
        }
        if self.state == TubeState::Loading {
            self.state = TubeState::Loaded;
            None
        } else {
            self.state = TubeState::Empty;
            self.missile.take()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DockingState {
    #[default]
    NotDocking,
    Docking,
    Docked,
}

/// The self-destruct sequence: confirmation codes, then a countdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfDestruct {
    active: bool,
    codes: Vec<u32>,
    confirmed: Vec<bool>,
    countdown: Option<f32>,
}

impl SelfDestruct {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    #[must_use]
    pub fn is_confirmed(&self, index: usize) -> bool {
        self.confirmed.get(index).copied().unwrap_or(false)
    }

    /// Seconds to destruction, once every code is confirmed.
    #[must_use]
    pub fn countdown(&self) -> Option<f32> {
        self.countdown
    }
}

/// Crew-controllable state of a player ship.
#[derive(Debug, Clone)]
pub struct PlayerShip {
    pub(crate) comms: CommsChannel,
    pub(crate) log: ShipLog,
    pub(crate) custom: CustomFunctionRegistry,

    target_rotation: f32,
    turn_speed: f32,
    impulse_request: f32,
    warp_request: i8,
    /// Highest warp factor.
    pub max_warp: i8,
    combat_boost_request: f32,
    combat_strafe_request: f32,
    pub can_combat_maneuver: bool,

    pub jump_drive_min_distance: f32,
    pub jump_drive_max_distance: f32,
    /// Seconds to charge the drive from empty to full range.
    pub jump_drive_charge_time: f32,
    jump_drive_charge: f32,
    jump_delay: f32,
    jump_distance: f32,

    target: Option<Entity>,
    tubes: Vec<WeaponTube>,
    missile_stock: [u32; MissileType::COUNT],
    shields_active: bool,
    shield_frequency: i32,
    shield_calibration_delay: f32,
    beam_frequency: i32,
    beam_system_target: Option<ShipSystem>,

    main_screen_setting: MainScreenSetting,
    main_screen_overlay: MainScreenOverlay,
    alert_level: AlertLevel,
    pub auto_repair_enabled: bool,

    pub can_scan: bool,
    pub(crate) scanning_target: Option<Entity>,
    pub(crate) scanning_delay: f32,
    pub(crate) scanning_complexity: u32,
    pub(crate) scanning_depth: u32,
    pub can_hack: bool,

    pub can_launch_probe: bool,
    max_scan_probes: u32,
    scan_probe_stock: u32,
    pub(crate) scan_probe_recharge: f32,
    pub(crate) on_probe_launch: Option<Callback>,
    pub(crate) on_probe_link: Option<Callback>,
    pub(crate) on_probe_unlink: Option<Callback>,
    pub(crate) linked_science_probe: Option<Entity>,

    pub can_dock: bool,
    pub(crate) docking_state: DockingState,
    pub(crate) docking_target: Option<Entity>,

    waypoints: Vec<Vec2>,
    pub can_self_destruct: bool,
    pub(crate) self_destruct: SelfDestruct,

    energy_level: f32,
    max_energy: f32,
}

impl PlayerShip {
    /// A ship with the default loadout. `max_log_entries` of 0 keeps the
    /// whole log.
    #[must_use]
    pub fn new(max_log_entries: usize) -> Self {
        let mut missile_stock = [0; MissileType::COUNT];
        missile_stock[MissileType::Homing.index()] = 8;
        missile_stock[MissileType::Nuke.index()] = 2;
        missile_stock[MissileType::Mine.index()] = 4;
        missile_stock[MissileType::Emp.index()] = 2;
        missile_stock[MissileType::Hvli.index()] = 8;
        Self {
            comms: CommsChannel::default(),
            log: ShipLog::with_capacity_limit(max_log_entries),
            custom: CustomFunctionRegistry::new(),
            target_rotation: 0.0,
            turn_speed: 0.0,
            impulse_request: 0.0,
            warp_request: 0,
            max_warp: 4,
            combat_boost_request: 0.0,
            combat_strafe_request: 0.0,
            can_combat_maneuver: true,
            jump_drive_min_distance: 5_000.0,
            jump_drive_max_distance: 50_000.0,
            jump_drive_charge_time: 90.0,
            jump_drive_charge: 50_000.0,
            jump_delay: 0.0,
            jump_distance: 0.0,
            target: None,
            tubes: vec![WeaponTube::new(0.0), WeaponTube::new(0.0)],
            missile_stock,
            shields_active: false,
            shield_frequency: 0,
            shield_calibration_delay: 0.0,
            beam_frequency: 0,
            beam_system_target: None,
            main_screen_setting: MainScreenSetting::default(),
            main_screen_overlay: MainScreenOverlay::default(),
            alert_level: AlertLevel::default(),
            auto_repair_enabled: false,
            can_scan: true,
            scanning_target: None,
            scanning_delay: 0.0,
            scanning_complexity: 0,
            scanning_depth: 0,
            can_hack: true,
            can_launch_probe: true,
            max_scan_probes: DEFAULT_SCAN_PROBES,
            scan_probe_stock: DEFAULT_SCAN_PROBES,
            scan_probe_recharge: 0.0,
            on_probe_launch: None,
            on_probe_link: None,
            on_probe_unlink: None,
            linked_science_probe: None,
            can_dock: true,
            docking_state: DockingState::NotDocking,
            docking_target: None,
            waypoints: Vec::new(),
            can_self_destruct: true,
            self_destruct: SelfDestruct::default(),
            energy_level: 1000.0,
            max_energy: 1000.0,
        }
    }

    // -- Accessors --

    #[must_use]
    pub fn comms(&self) -> &CommsChannel {
        &self.comms
    }

    #[must_use]
    pub fn ship_log(&self) -> &ShipLog {
        &self.log
    }

    #[must_use]
    pub fn custom_functions(&self) -> &CustomFunctionRegistry {
        &self.custom
    }

    /// Scripts register crew-station affordances here.
    pub fn custom_functions_mut(&mut self) -> &mut CustomFunctionRegistry {
        &mut self.custom
    }

    #[must_use]
    pub fn target_rotation(&self) -> f32 {
        self.target_rotation
    }

    #[must_use]
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    #[must_use]
    pub fn impulse_request(&self) -> f32 {
        self.impulse_request
    }

    #[must_use]
    pub fn warp_request(&self) -> i8 {
        self.warp_request
    }

    #[must_use]
    pub fn combat_maneuver_requests(&self) -> (f32, f32) {
        (self.combat_boost_request, self.combat_strafe_request)
    }

    #[must_use]
    pub fn jump_drive_charge(&self) -> f32 {
        self.jump_drive_charge
    }

    /// Seconds until a pending jump, or 0.
    #[must_use]
    pub fn jump_delay(&self) -> f32 {
        self.jump_delay
    }

    #[must_use]
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    #[must_use]
    pub fn tubes(&self) -> &[WeaponTube] {
        &self.tubes
    }

    pub fn tube_mut(&mut self, index: usize) -> Option<&mut WeaponTube> {
        self.tubes.get_mut(index)
    }

    /// Resize the tube bank. New tubes face forward; removed tubes lose
    /// their load.
    pub fn set_weapon_tube_count(&mut self, count: usize) {
        self.tubes.resize_with(count, || WeaponTube::new(0.0));
    }

    #[must_use]
    pub fn missile_stock(&self, missile: MissileType) -> u32 {
        self.missile_stock[missile.index()]
    }

    pub fn set_missile_stock(&mut self, missile: MissileType, amount: u32) {
        self.missile_stock[missile.index()] = amount;
    }

    #[must_use]
    pub fn shields_active(&self) -> bool {
        self.shields_active
    }

    #[must_use]
    pub fn shield_frequency(&self) -> i32 {
        self.shield_frequency
    }

    #[must_use]
    pub fn shield_calibration_delay(&self) -> f32 {
        self.shield_calibration_delay
    }

    #[must_use]
    pub fn beam_frequency(&self) -> i32 {
        self.beam_frequency
    }

    #[must_use]
    pub fn beam_system_target(&self) -> Option<ShipSystem> {
        self.beam_system_target
    }

    /// Display name of the beam target system, `"Hull"` when untargeted.
    #[must_use]
    pub fn beam_system_target_name(&self) -> &'static str {
        self.beam_system_target.map_or("Hull", ShipSystem::name)
    }

    #[must_use]
    pub fn main_screen(&self) -> (MainScreenSetting, MainScreenOverlay) {
        (self.main_screen_setting, self.main_screen_overlay)
    }

    #[must_use]
    pub fn alert_level(&self) -> AlertLevel {
        self.alert_level
    }

    #[must_use]
    pub fn scanning_target(&self) -> Option<Entity> {
        self.scanning_target
    }

    /// Seconds left on a timed scan.
    #[must_use]
    pub fn scanning_delay(&self) -> f32 {
        self.scanning_delay
    }

    /// Minigame parameters of the current scan: `(complexity, depth)`.
    #[must_use]
    pub fn scanning_parameters(&self) -> (u32, u32) {
        (self.scanning_complexity, self.scanning_depth)
    }

    #[must_use]
    pub fn scan_probe_count(&self) -> u32 {
        self.scan_probe_stock
    }

    pub fn set_scan_probe_count(&mut self, amount: u32) {
        self.scan_probe_stock = amount.min(self.max_scan_probes);
    }

    #[must_use]
    pub fn max_scan_probe_count(&self) -> u32 {
        self.max_scan_probes
    }

    pub fn set_max_scan_probe_count(&mut self, amount: u32) {
        self.max_scan_probes = amount;
        self.scan_probe_stock = self.scan_probe_stock.min(amount);
    }

    pub fn on_probe_launch(&mut self, callback: Callback) {
        self.on_probe_launch = Some(callback);
    }

    pub fn on_probe_link(&mut self, callback: Callback) {
        self.on_probe_link = Some(callback);
    }

    pub fn on_probe_unlink(&mut self, callback: Callback) {
        self.on_probe_unlink = Some(callback);
    }

    #[must_use]
    pub fn linked_science_probe(&self) -> Option<Entity> {
        self.linked_science_probe
    }

    #[must_use]
    pub fn docking_state(&self) -> DockingState {
        self.docking_state
    }

    #[must_use]
    pub fn docking_target(&self) -> Option<Entity> {
        self.docking_target
    }

    #[must_use]
    pub fn is_docked(&self) -> bool {
        self.docking_state == DockingState::Docked
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    #[must_use]
    pub fn self_destruct(&self) -> &SelfDestruct {
        &self.self_destruct
    }

    #[must_use]
    pub fn energy_level(&self) -> f32 {
        self.energy_level
    }

    pub fn set_energy_level(&mut self, amount: f32) {
        self.energy_level = amount.clamp(0.0, self.max_energy);
    }

    #[must_use]
    pub fn max_energy(&self) -> f32 {
        self.max_energy
    }

    pub fn set_max_energy(&mut self, amount: f32) {
        self.max_energy = amount.max(0.0);
        self.energy_level = self.energy_level.min(self.max_energy);
    }

    // Capability setters that are accepted but have no effect yet. The
    // simulation does not model blast damage, per-system energy drain or
    // ship control codes.

    pub fn set_self_destruct_damage(&mut self, _amount: f32) {}

    #[must_use]
    pub fn self_destruct_damage(&self) -> f32 {
        0.0
    }

    pub fn set_self_destruct_size(&mut self, _size: f32) {}

    #[must_use]
    pub fn self_destruct_size(&self) -> f32 {
        0.0
    }

    pub fn set_energy_shield_use_per_second(&mut self, _rate: f32) {}

    pub fn set_energy_warp_per_second(&mut self, _rate: f32) {}

    pub fn set_control_code(&mut self, _code: &str) {}

    // -- Helm --

    pub(crate) fn steer(&mut self, rotation: f32) {
        self.target_rotation = rotation;
        self.turn_speed = 0.0;
    }

    pub(crate) fn set_turn_speed(&mut self, speed: f32) {
        self.turn_speed = speed.clamp(-1.0, 1.0);
    }

    pub(crate) fn set_impulse(&mut self, request: f32) {
        self.impulse_request = request.clamp(-1.0, 1.0);
    }

    pub(crate) fn set_warp(&mut self, level: i8) {
        self.warp_request = level.clamp(0, self.max_warp.max(0));
    }

    pub(crate) fn set_combat_boost(&mut self, amount: f32) {
        self.combat_boost_request = amount.clamp(0.0, 1.0);
    }

    pub(crate) fn set_combat_strafe(&mut self, amount: f32) {
        self.combat_strafe_request = amount.clamp(-1.0, 1.0);
    }

    /// Arm a jump of `distance`, clamped to the drive's range.
    pub(crate) fn start_jump(&mut self, distance: f32, delay: f32) -> Outcome {
        if self.jump_delay > 0.0 {
            return Err("jump already pending");
        }
        let max = self.jump_drive_max_distance;
        let distance = distance.clamp(self.jump_drive_min_distance.min(max), max);
        if self.jump_drive_charge < distance {
            return Err("jump drive not charged");
        }
        self.jump_distance = distance;
        self.jump_delay = delay.max(f32::EPSILON);
        Ok(())
    }

    /// Advance the jump countdown and recharge. Returns the distance to
    /// travel when the jump happens.
    pub(crate) fn update_jump(&mut self, dt: f32) -> Option<f32> {
        if self.jump_delay > 0.0 {
            self.jump_delay = (self.jump_delay - dt).max(0.0);
            if self.jump_delay <= 0.0 {
                self.jump_drive_charge -= self.jump_distance;
                return Some(std::mem::take(&mut self.jump_distance));
            }
            return None;
        }
        if self.jump_drive_charge_time > 0.0 {
            let rate = self.jump_drive_max_distance / self.jump_drive_charge_time;
            self.jump_drive_charge = (self.jump_drive_charge + rate * dt).min(self.jump_drive_max_distance);
        }
        None
    }

    // -- Weapons --

    pub(crate) fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    fn tube_index(&self, index: i8) -> Result<usize, &'static str> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.tubes.len())
            .ok_or("tube index out of range")
    }

    pub(crate) fn load_tube(&mut self, index: i8, missile: MissileType, load_time: f32) -> Outcome {
        let i = self.tube_index(index)?;
        if self.missile_stock[missile.index()] == 0 {
            return Err("no missiles of that type");
        }
        let tube = &mut self.tubes[i];
        if tube.state != TubeState::Empty {
            return Err("tube not empty");
        }
        if !tube.accepts(missile) {
            return Err("tube does not accept that type");
        }
        tube.state = TubeState::Loading;
        tube.missile = Some(missile);
        tube.timer = load_time;
        self.missile_stock[missile.index()] -= 1;
        Ok(())
    }

    pub(crate) fn unload_tube(&mut self, index: i8, load_time: f32) -> Outcome {
        let i = self.tube_index(index)?;
        let tube = &mut self.tubes[i];
        if tube.state != TubeState::Loaded {
            return Err("tube not loaded");
        }
        tube.state = TubeState::Unloading;
        tube.timer = load_time;
        Ok(())
    }

    /// Empty a loaded tube for firing. Returns the payload and the tube's
    /// direction.
    pub(crate) fn fire_tube(&mut self, index: i8) -> Result<(MissileType, f32), &'static str> {
        let i = self.tube_index(index)?;
        if self.docking_state == DockingState::Docked {
            return Err("docked");
        }
        let tube = &mut self.tubes[i];
        if tube.state != TubeState::Loaded {
            return Err("tube not loaded");
        }
        let missile = tube.missile.take().ok_or("tube not loaded")?;
        tube.state = TubeState::Empty;
        Ok((missile, tube.direction))
    }

    pub(crate) fn update_tubes(&mut self, dt: f32) {
        for tube in &mut self.tubes {
            if let Some(missile) = tube.update(dt) {
                self.missile_stock[missile.index()] += 1;
            }
        }
    }

    pub(crate) fn set_shields(&mut self, active: bool) -> Outcome {
        if self.shield_calibration_delay > 0.0 {
            return Err("shields calibrating");
        }
        self.shields_active = active;
        Ok(())
    }

    pub(crate) fn set_shield_frequency(&mut self, frequency: i32, calibration_time: f32) -> Outcome {
        if self.shield_calibration_delay > 0.0 {
            return Err("shields calibrating");
        }
        let frequency = frequency.clamp(0, MAX_FREQUENCY);
        if frequency == self.shield_frequency {
            return Err("frequency unchanged");
        }
        self.shield_frequency = frequency;
        self.shields_active = false;
        self.shield_calibration_delay = calibration_time;
        Ok(())
    }

    pub(crate) fn set_beam_frequency(&mut self, frequency: i32) {
        self.beam_frequency = frequency.clamp(0, MAX_FREQUENCY);
    }

    pub(crate) fn set_beam_system_target(&mut self, system: Option<ShipSystem>) {
        self.beam_system_target = system;
    }

    pub(crate) fn update_shields(&mut self, dt: f32) {
        self.shield_calibration_delay = (self.shield_calibration_delay - dt).max(0.0);
    }

    // -- Stations --

    pub(crate) fn set_main_screen_setting(&mut self, setting: MainScreenSetting) {
        self.main_screen_setting = setting;
    }

    pub(crate) fn set_main_screen_overlay(&mut self, overlay: MainScreenOverlay) {
        self.main_screen_overlay = overlay;
    }

    /// Returns `true` if the level changed.
    pub(crate) fn set_alert_level(&mut self, level: AlertLevel) -> bool {
        let changed = self.alert_level != level;
        self.alert_level = level;
        changed
    }

    // -- Probes --

    pub(crate) fn take_probe(&mut self) -> Outcome {
        if !self.can_launch_probe {
            return Err("cannot launch probes");
        }
        if self.scan_probe_stock == 0 {
            return Err("no probes left");
        }
        self.scan_probe_stock -= 1;
        Ok(())
    }

    /// Restock one probe every `charge_time` seconds.
    pub(crate) fn recharge_probes(&mut self, dt: f32, charge_time: f32) {
        if self.scan_probe_stock >= self.max_scan_probes {
            self.scan_probe_recharge = 0.0;
            return;
        }
        self.scan_probe_recharge += dt;
        if self.scan_probe_recharge >= charge_time {
            self.scan_probe_recharge = 0.0;
            self.scan_probe_stock += 1;
        }
    }

    // -- Waypoints --

    pub(crate) fn add_waypoint(&mut self, position: Vec2, max: usize) -> Outcome {
        if self.waypoints.len() >= max {
            return Err("waypoint limit reached");
        }
        self.waypoints.push(position);
        Ok(())
    }

    fn waypoint_index(&self, index: i32) -> Result<usize, &'static str> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.waypoints.len())
            .ok_or("waypoint index out of range")
    }

    pub(crate) fn remove_waypoint(&mut self, index: i32) -> Outcome {
        let i = self.waypoint_index(index)?;
        self.waypoints.remove(i);
        Ok(())
    }

    pub(crate) fn move_waypoint(&mut self, index: i32, position: Vec2) -> Outcome {
        let i = self.waypoint_index(index)?;
        self.waypoints[i] = position;
        Ok(())
    }

    // -- Self-destruct --

    pub(crate) fn activate_self_destruct(&mut self, codes: Vec<u32>) -> Outcome {
        if !self.can_self_destruct {
            return Err("self-destruct disabled");
        }
        if self.self_destruct.active {
            return Err("self-destruct already active");
        }
        self.self_destruct = SelfDestruct {
            active: true,
            confirmed: vec![false; codes.len()],
            codes,
            countdown: None,
        };
        Ok(())
    }

    pub(crate) fn cancel_self_destruct(&mut self) -> Outcome {
        if !self.self_destruct.active {
            return Err("self-destruct not active");
        }
        if self.self_destruct.countdown.is_some() {
            return Err("countdown already running");
        }
        self.self_destruct = SelfDestruct::default();
        Ok(())
    }

    /// Confirm one code. Starts the countdown once all are confirmed.
    pub(crate) fn confirm_destruct_code(&mut self, index: i8, code: u32, countdown: f32) -> Outcome {
        let sd = &mut self.self_destruct;
        if !sd.active {
            return Err("self-destruct not active");
        }
        let i = usize::try_from(index)
            .ok()
            .filter(|&i| i < sd.codes.len())
            .ok_or("code index out of range")?;
        if sd.codes[i] != code {
            return Err("wrong code");
        }
        sd.confirmed[i] = true;
        if sd.countdown.is_none() && sd.confirmed.iter().all(|&c| c) {
            sd.countdown = Some(countdown);
        }
        Ok(())
    }

    /// Returns `true` when the countdown runs out.
    pub(crate) fn update_self_destruct(&mut self, dt: f32) -> bool {
        match self.self_destruct.countdown.as_mut() {
            Some(left) => {
                *left = (*left - dt).max(0.0);
                *left <= 0.0
            }
            None => false,
        }
    }

    // -- Science --

    pub(crate) fn clear_scan(&mut self) {
        self.scanning_target = None;
        self.scanning_delay = 0.0;
        self.scanning_complexity = 0;
        self.scanning_depth = 0;
    }
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self::new(0)
    }
}

//! Client → server command catalog.
//!
//! Every command travels as `[tag: u8][payload]`, with the payload built from
//! the primitives in [`crate::buffer`]. The catalog is closed: an unknown tag
//! is a decode error, never a command.

use bridge_component::{AlertLevel, Entity, MainScreenOverlay, MainScreenSetting, MissileType, ShipSystem};
use glam::Vec2;

use crate::buffer::{DataReader, DataWriter};
use crate::error::WireError;

/// Command tags, one byte each.
pub mod tags {
    pub const TARGET_ROTATION: u8 = 0x01;
    pub const TURN_SPEED: u8 = 0x02;
    pub const IMPULSE: u8 = 0x03;
    pub const WARP: u8 = 0x04;
    pub const JUMP: u8 = 0x05;
    pub const SET_TARGET: u8 = 0x06;
    pub const LOAD_TUBE: u8 = 0x07;
    pub const UNLOAD_TUBE: u8 = 0x08;
    pub const FIRE_TUBE: u8 = 0x09;
    pub const FIRE_TUBE_AT_TARGET: u8 = 0x0A;
    pub const SET_SHIELDS: u8 = 0x0B;
    pub const MAIN_SCREEN_SETTING: u8 = 0x0C;
    pub const MAIN_SCREEN_OVERLAY: u8 = 0x0D;
    pub const SCAN_OBJECT: u8 = 0x0E;
    pub const SCAN_DONE: u8 = 0x0F;
    pub const SCAN_CANCEL: u8 = 0x10;
    pub const SET_SYSTEM_POWER_REQUEST: u8 = 0x11;
    pub const SET_SYSTEM_COOLANT_REQUEST: u8 = 0x12;
    pub const DOCK: u8 = 0x13;
    pub const UNDOCK: u8 = 0x14;
    pub const ABORT_DOCK: u8 = 0x15;
    pub const OPEN_TEXT_COMM: u8 = 0x16;
    pub const CLOSE_TEXT_COMM: u8 = 0x17;
    pub const ANSWER_COMM_HAIL: u8 = 0x18;
    pub const SEND_COMM: u8 = 0x19;
    pub const SEND_COMM_PLAYER: u8 = 0x1A;
    pub const SET_AUTO_REPAIR: u8 = 0x1B;
    pub const SET_BEAM_FREQUENCY: u8 = 0x1C;
    pub const SET_BEAM_SYSTEM_TARGET: u8 = 0x1D;
    pub const SET_SHIELD_FREQUENCY: u8 = 0x1E;
    pub const ADD_WAYPOINT: u8 = 0x1F;
    pub const REMOVE_WAYPOINT: u8 = 0x20;
    pub const MOVE_WAYPOINT: u8 = 0x21;
    pub const ACTIVATE_SELF_DESTRUCT: u8 = 0x22;
    pub const CANCEL_SELF_DESTRUCT: u8 = 0x23;
    pub const CONFIRM_DESTRUCT_CODE: u8 = 0x24;
    pub const COMBAT_MANEUVER_BOOST: u8 = 0x25;
    pub const COMBAT_MANEUVER_STRAFE: u8 = 0x26;
    pub const LAUNCH_PROBE: u8 = 0x27;
    pub const SET_SCIENCE_LINK: u8 = 0x28;
    pub const CLEAR_SCIENCE_LINK: u8 = 0x29;
    pub const SET_ALERT_LEVEL: u8 = 0x2A;
    pub const HACKING_FINISHED: u8 = 0x2B;
    pub const CUSTOM_FUNCTION: u8 = 0x2C;
}

/// A request from a crew station to act on its ship.
///
/// Commands carry intent only. The server validates each one against its
/// own state when applying it and silently drops it if the preconditions do
/// not hold; the client learns the outcome from the next snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TargetRotation(f32),
    TurnSpeed(f32),
    Impulse(f32),
    Warp(i8),
    Jump(f32),
    SetTarget(Option<Entity>),
    LoadTube { tube: i8, missile: MissileType },
    UnloadTube { tube: i8 },
    FireTube { tube: i8, angle: f32 },
    FireTubeAtTarget { tube: i8, target: Entity },
    SetShields(bool),
    MainScreenSetting(MainScreenSetting),
    MainScreenOverlay(MainScreenOverlay),
    ScanObject(Entity),
    ScanDone,
    ScanCancel,
    SetSystemPowerRequest { system: ShipSystem, level: f32 },
    SetSystemCoolantRequest { system: ShipSystem, level: f32 },
    Dock(Entity),
    Undock,
    AbortDock,
    OpenTextComm(Entity),
    CloseTextComm,
    AnswerCommHail(bool),
    /// Select a scripted reply by its index in the reply list.
    SendComm(u8),
    /// Free-text line to another player or the game master.
    SendCommPlayer(String),
    SetAutoRepair(bool),
    SetBeamFrequency(i32),
    SetBeamSystemTarget(Option<ShipSystem>),
    SetShieldFrequency(i32),
    AddWaypoint(Vec2),
    RemoveWaypoint(i32),
    MoveWaypoint { index: i32, position: Vec2 },
    ActivateSelfDestruct,
    CancelSelfDestruct,
    ConfirmDestructCode { index: i8, code: u32 },
    CombatManeuverBoost(f32),
    CombatManeuverStrafe(f32),
    LaunchProbe(Vec2),
    SetScienceLink(Entity),
    ClearScienceLink,
    SetAlertLevel(AlertLevel),
    HackingFinished { target: Entity, system: ShipSystem },
    /// Invoke a scripted crew-station function by name.
    CustomFunction(String),
}

impl Command {
    /// The wire tag of this command.
    #[must_use]
    pub fn tag(&self) -> u8 {
        use tags::*;
        match self {
            Command::TargetRotation(_) => TARGET_ROTATION,
            Command::TurnSpeed(_) => TURN_SPEED,
            Command::Impulse(_) => IMPULSE,
            Command::Warp(_) => WARP,
            Command::Jump(_) => JUMP,
            Command::SetTarget(_) => SET_TARGET,
            Command::LoadTube { .. } => LOAD_TUBE,
            Command::UnloadTube { .. } => UNLOAD_TUBE,
            Command::FireTube { .. } => FIRE_TUBE,
            Command::FireTubeAtTarget { .. } => FIRE_TUBE_AT_TARGET,
            Command::SetShields(_) => SET_SHIELDS,
            Command::MainScreenSetting(_) => MAIN_SCREEN_SETTING,
            Command::MainScreenOverlay(_) => MAIN_SCREEN_OVERLAY,
            Command::ScanObject(_) => SCAN_OBJECT,
            Command::ScanDone => SCAN_DONE,
            Command::ScanCancel => SCAN_CANCEL,
            Command::SetSystemPowerRequest { .. } => SET_SYSTEM_POWER_REQUEST,
            Command::SetSystemCoolantRequest { .. } => SET_SYSTEM_COOLANT_REQUEST,
            Command::Dock(_) => DOCK,
            Command::Undock => UNDOCK,
            Command::AbortDock => ABORT_DOCK,
            Command::OpenTextComm(_) => OPEN_TEXT_COMM,
            Command::CloseTextComm => CLOSE_TEXT_COMM,
            Command::AnswerCommHail(_) => ANSWER_COMM_HAIL,
            Command::SendComm(_) => SEND_COMM,
            Command::SendCommPlayer(_) => SEND_COMM_PLAYER,
            Command::SetAutoRepair(_) => SET_AUTO_REPAIR,
            Command::SetBeamFrequency(_) => SET_BEAM_FREQUENCY,
            Command::SetBeamSystemTarget(_) => SET_BEAM_SYSTEM_TARGET,
            Command::SetShieldFrequency(_) => SET_SHIELD_FREQUENCY,
            Command::AddWaypoint(_) => ADD_WAYPOINT,
            Command::RemoveWaypoint(_) => REMOVE_WAYPOINT,
            Command::MoveWaypoint { .. } => MOVE_WAYPOINT,
            Command::ActivateSelfDestruct => ACTIVATE_SELF_DESTRUCT,
            Command::CancelSelfDestruct => CANCEL_SELF_DESTRUCT,
            Command::ConfirmDestructCode { .. } => CONFIRM_DESTRUCT_CODE,
            Command::CombatManeuverBoost(_) => COMBAT_MANEUVER_BOOST,
            Command::CombatManeuverStrafe(_) => COMBAT_MANEUVER_STRAFE,
            Command::LaunchProbe(_) => LAUNCH_PROBE,
            Command::SetScienceLink(_) => SET_SCIENCE_LINK,
            Command::ClearScienceLink => CLEAR_SCIENCE_LINK,
            Command::SetAlertLevel(_) => SET_ALERT_LEVEL,
            Command::HackingFinished { .. } => HACKING_FINISHED,
            Command::CustomFunction(_) => CUSTOM_FUNCTION,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::TargetRotation(_) => "target_rotation",
            Command::TurnSpeed(_) => "turn_speed",
            Command::Impulse(_) => "impulse",
            Command::Warp(_) => "warp",
            Command::Jump(_) => "jump",
            Command::SetTarget(_) => "set_target",
            Command::LoadTube { .. } => "load_tube",
            Command::UnloadTube { .. } => "unload_tube",
            Command::FireTube { .. } => "fire_tube",
            Command::FireTubeAtTarget { .. } => "fire_tube_at_target",
            Command::SetShields(_) => "set_shields",
            Command::MainScreenSetting(_) => "main_screen_setting",
            Command::MainScreenOverlay(_) => "main_screen_overlay",
            Command::ScanObject(_) => "scan_object",
            Command::ScanDone => "scan_done",
            Command::ScanCancel => "scan_cancel",
            Command::SetSystemPowerRequest { .. } => "set_system_power_request",
            Command::SetSystemCoolantRequest { .. } => "set_system_coolant_request",
            Command::Dock(_) => "dock",
            Command::Undock => "undock",
            Command::AbortDock => "abort_dock",
            Command::OpenTextComm(_) => "open_text_comm",
            Command::CloseTextComm => "close_text_comm",
            Command::AnswerCommHail(_) => "answer_comm_hail",
            Command::SendComm(_) => "send_comm",
            Command::SendCommPlayer(_) => "send_comm_player",
            Command::SetAutoRepair(_) => "set_auto_repair",
            Command::SetBeamFrequency(_) => "set_beam_frequency",
            Command::SetBeamSystemTarget(_) => "set_beam_system_target",
            Command::SetShieldFrequency(_) => "set_shield_frequency",
            Command::AddWaypoint(_) => "add_waypoint",
            Command::RemoveWaypoint(_) => "remove_waypoint",
            Command::MoveWaypoint { .. } => "move_waypoint",
            Command::ActivateSelfDestruct => "activate_self_destruct",
            Command::CancelSelfDestruct => "cancel_self_destruct",
            Command::ConfirmDestructCode { .. } => "confirm_destruct_code",
            Command::CombatManeuverBoost(_) => "combat_maneuver_boost",
            Command::CombatManeuverStrafe(_) => "combat_maneuver_strafe",
            Command::LaunchProbe(_) => "launch_probe",
            Command::SetScienceLink(_) => "set_science_link",
            Command::ClearScienceLink => "clear_science_link",
            Command::SetAlertLevel(_) => "set_alert_level",
            Command::HackingFinished { .. } => "hacking_finished",
            Command::CustomFunction(_) => "custom_function",
        }
    }

    /// Whether every float in the payload is finite. Decoded commands
    /// always are; commands built in-process may not be.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Command::TargetRotation(v)
            | Command::TurnSpeed(v)
            | Command::Impulse(v)
            | Command::Jump(v)
            | Command::CombatManeuverBoost(v)
            | Command::CombatManeuverStrafe(v)
            | Command::FireTube { angle: v, .. }
            | Command::SetSystemPowerRequest { level: v, .. }
            | Command::SetSystemCoolantRequest { level: v, .. } => v.is_finite(),
            Command::AddWaypoint(p) | Command::LaunchProbe(p) | Command::MoveWaypoint { position: p, .. } => {
                p.is_finite()
            }
            _ => true,
        }
    }

    /// Encode to `[tag][payload]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = DataWriter::with_capacity(16);
        w.write_u8(self.tag());
        match self {
            Command::TargetRotation(v)
            | Command::TurnSpeed(v)
            | Command::Impulse(v)
            | Command::Jump(v)
            | Command::CombatManeuverBoost(v)
            | Command::CombatManeuverStrafe(v) => {
                w.write_f32(*v);
            }
            Command::Warp(level) => {
                w.write_i8(*level);
            }
            Command::SetTarget(target) => {
                w.write_opt_entity(*target);
            }
            Command::LoadTube { tube, missile } => {
                w.write_i8(*tube).write_u8(missile.to_wire());
            }
            Command::UnloadTube { tube } => {
                w.write_i8(*tube);
            }
            Command::FireTube { tube, angle } => {
                w.write_i8(*tube).write_f32(*angle);
            }
            Command::FireTubeAtTarget { tube, target } => {
                w.write_i8(*tube).write_entity(*target);
            }
            Command::SetShields(on) | Command::SetAutoRepair(on) | Command::AnswerCommHail(on) => {
                w.write_bool(*on);
            }
            Command::MainScreenSetting(setting) => {
                w.write_u8(setting.to_wire());
            }
            Command::MainScreenOverlay(overlay) => {
                w.write_u8(overlay.to_wire());
            }
            Command::ScanObject(target)
            | Command::Dock(target)
            | Command::OpenTextComm(target)
            | Command::SetScienceLink(target) => {
                w.write_entity(*target);
            }
            Command::SetSystemPowerRequest { system, level }
            | Command::SetSystemCoolantRequest { system, level } => {
                w.write_u8(system.to_wire()).write_f32(*level);
            }
            Command::SendComm(index) => {
                w.write_u8(*index);
            }
            Command::SendCommPlayer(text) | Command::CustomFunction(text) => {
                w.write_str(text);
            }
            Command::SetBeamFrequency(v) | Command::SetShieldFrequency(v) | Command::RemoveWaypoint(v) => {
                w.write_i32(*v);
            }
            Command::SetBeamSystemTarget(system) => {
                w.write_u8(system.map_or(ShipSystem::NONE_WIRE, ShipSystem::to_wire));
            }
            Command::AddWaypoint(position) | Command::LaunchProbe(position) => {
                w.write_vec2(*position);
            }
            Command::MoveWaypoint { index, position } => {
                w.write_i32(*index).write_vec2(*position);
            }
            Command::ConfirmDestructCode { index, code } => {
                w.write_i8(*index).write_u32(*code);
            }
            Command::SetAlertLevel(level) => {
                w.write_u8(level.to_wire());
            }
            Command::HackingFinished { target, system } => {
                w.write_entity(*target).write_u8(system.to_wire());
            }
            Command::ScanDone
            | Command::ScanCancel
            | Command::Undock
            | Command::AbortDock
            | Command::CloseTextComm
            | Command::ActivateSelfDestruct
            | Command::CancelSelfDestruct
            | Command::ClearScienceLink => {}
        }
        w.into_bytes()
    }

    /// Decode one command occupying the whole of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the tag is unknown, the payload is truncated,
    /// an enum byte is out of range, or bytes remain after the payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        use tags::*;
        let mut r = DataReader::new(bytes);
        let tag = r.read_u8()?;
        let command = match tag {
            TARGET_ROTATION => Command::TargetRotation(r.read_f32()?),
            TURN_SPEED => Command::TurnSpeed(r.read_f32()?),
            IMPULSE => Command::Impulse(r.read_f32()?),
            WARP => Command::Warp(r.read_i8()?),
            JUMP => Command::Jump(r.read_f32()?),
            SET_TARGET => Command::SetTarget(r.read_opt_entity()?),
            LOAD_TUBE => Command::LoadTube {
                tube: r.read_i8()?,
                missile: MissileType::try_from(r.read_u8()?)?,
            },
            UNLOAD_TUBE => Command::UnloadTube { tube: r.read_i8()? },
            FIRE_TUBE => Command::FireTube {
                tube: r.read_i8()?,
                angle: r.read_f32()?,
            },
            FIRE_TUBE_AT_TARGET => Command::FireTubeAtTarget {
                tube: r.read_i8()?,
                target: r.read_entity()?,
            },
            SET_SHIELDS => Command::SetShields(r.read_bool()?),
            MAIN_SCREEN_SETTING => Command::MainScreenSetting(MainScreenSetting::try_from(r.read_u8()?)?),
            MAIN_SCREEN_OVERLAY => Command::MainScreenOverlay(MainScreenOverlay::try_from(r.read_u8()?)?),
            SCAN_OBJECT => Command::ScanObject(r.read_entity()?),
            SCAN_DONE => Command::ScanDone,
            SCAN_CANCEL => Command::ScanCancel,
            SET_SYSTEM_POWER_REQUEST => Command::SetSystemPowerRequest {
                system: ShipSystem::try_from(r.read_u8()?)?,
                level: r.read_f32()?,
            },
            SET_SYSTEM_COOLANT_REQUEST => Command::SetSystemCoolantRequest {
                system: ShipSystem::try_from(r.read_u8()?)?,
                level: r.read_f32()?,
            },
            DOCK => Command::Dock(r.read_entity()?),
            UNDOCK => Command::Undock,
            ABORT_DOCK => Command::AbortDock,
            OPEN_TEXT_COMM => Command::OpenTextComm(r.read_entity()?),
            CLOSE_TEXT_COMM => Command::CloseTextComm,
            ANSWER_COMM_HAIL => Command::AnswerCommHail(r.read_bool()?),
            SEND_COMM => Command::SendComm(r.read_u8()?),
            SEND_COMM_PLAYER => Command::SendCommPlayer(r.read_string()?),
            SET_AUTO_REPAIR => Command::SetAutoRepair(r.read_bool()?),
            SET_BEAM_FREQUENCY => Command::SetBeamFrequency(r.read_i32()?),
            SET_BEAM_SYSTEM_TARGET => {
                let raw = r.read_u8()?;
                let system = if raw == ShipSystem::NONE_WIRE {
                    None
                } else {
                    Some(ShipSystem::try_from(raw)?)
                };
                Command::SetBeamSystemTarget(system)
            }
            SET_SHIELD_FREQUENCY => Command::SetShieldFrequency(r.read_i32()?),
            ADD_WAYPOINT => Command::AddWaypoint(r.read_vec2()?),
            REMOVE_WAYPOINT => Command::RemoveWaypoint(r.read_i32()?),
            MOVE_WAYPOINT => Command::MoveWaypoint {
                index: r.read_i32()?,
                position: r.read_vec2()?,
            },
            ACTIVATE_SELF_DESTRUCT => Command::ActivateSelfDestruct,
            CANCEL_SELF_DESTRUCT => Command::CancelSelfDestruct,
            CONFIRM_DESTRUCT_CODE => Command::ConfirmDestructCode {
                index: r.read_i8()?,
                code: r.read_u32()?,
            },
            COMBAT_MANEUVER_BOOST => Command::CombatManeuverBoost(r.read_f32()?),
            COMBAT_MANEUVER_STRAFE => Command::CombatManeuverStrafe(r.read_f32()?),
            LAUNCH_PROBE => Command::LaunchProbe(r.read_vec2()?),
            SET_SCIENCE_LINK => Command::SetScienceLink(r.read_entity()?),
            CLEAR_SCIENCE_LINK => Command::ClearScienceLink,
            SET_ALERT_LEVEL => Command::SetAlertLevel(AlertLevel::try_from(r.read_u8()?)?),
            HACKING_FINISHED => Command::HackingFinished {
                target: r.read_entity()?,
                system: ShipSystem::try_from(r.read_u8()?)?,
            },
            CUSTOM_FUNCTION => Command::CustomFunction(r.read_string()?),
            other => return Err(WireError::UnknownCommand(other)),
        };
        r.finish()?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_layout() {
        let bytes = Command::TargetRotation(1.5).encode();
        assert_eq!(bytes[0], tags::TARGET_ROTATION);
        assert_eq!(&bytes[1..], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_fire_tube_layout() {
        let bytes = Command::FireTube {
            tube: 2,
            angle: 1.57,
        }
        .encode();
        assert_eq!(bytes.len(), 1 + 1 + 4);
        assert_eq!(bytes[1], 2);
        assert_eq!(Command::decode(&bytes).unwrap(), Command::FireTube { tube: 2, angle: 1.57 });
    }

    #[test]
    fn test_non_finite_payload_rejected() {
        let bytes = Command::Jump(f32::NAN).encode();
        assert_eq!(Command::decode(&bytes), Err(WireError::NonFinite));
        let bytes = Command::LaunchProbe(Vec2::new(f32::INFINITY, 0.0)).encode();
        assert_eq!(Command::decode(&bytes), Err(WireError::NonFinite));
        assert!(!Command::Impulse(f32::NAN).is_finite());
        assert!(!Command::MoveWaypoint { index: 0, position: Vec2::new(0.0, f32::NAN) }.is_finite());
        assert!(Command::Impulse(0.5).is_finite());
        assert!(Command::CloseTextComm.is_finite());
    }

    #[test]
    fn test_load_tube_layout() {
        let bytes = Command::LoadTube {
            tube: 0,
            missile: MissileType::Homing,
        }
        .encode();
        assert_eq!(bytes, vec![tags::LOAD_TUBE, 0, MissileType::Homing.to_wire()]);
    }

    #[test]
    fn test_answer_hail_is_single_byte_bool() {
        assert_eq!(Command::AnswerCommHail(true).encode(), vec![tags::ANSWER_COMM_HAIL, 1]);
        assert_eq!(
            Command::decode(&[tags::ANSWER_COMM_HAIL, 7]).unwrap(),
            Command::AnswerCommHail(true)
        );
    }

    #[test]
    fn test_custom_function_carries_name() {
        let cmd = Command::CustomFunction("reroute".to_string());
        let bytes = cmd.encode();
        assert_eq!(&bytes[1..5], &7u32.to_le_bytes());
        assert_eq!(Command::decode(&bytes).unwrap(), cmd);
    }

    #[test]
    fn test_every_tag_decodes_its_own_encoding() {
        let catalog = vec![
            Command::Warp(-1),
            Command::SetTarget(None),
            Command::SetTarget(Some(Entity(4))),
            Command::SetBeamSystemTarget(None),
            Command::SetBeamSystemTarget(Some(ShipSystem::Impulse)),
            Command::MoveWaypoint {
                index: 3,
                position: Vec2::new(1.0, -2.0),
            },
            Command::ConfirmDestructCode { index: 1, code: 42_317 },
            Command::HackingFinished {
                target: Entity(8),
                system: ShipSystem::Warp,
            },
            Command::SendCommPlayer("we come in peace".to_string()),
            Command::ClearScienceLink,
        ];
        for cmd in catalog {
            assert_eq!(Command::decode(&cmd.encode()).unwrap(), cmd, "{}", cmd.name());
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(Command::decode(&[0xEE]), Err(WireError::UnknownCommand(0xEE)));
        assert!(Command::decode(&[]).is_err());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let mut bytes = Command::FireTube { tube: 0, angle: 0.5 }.encode();
        bytes.pop();
        assert!(matches!(Command::decode(&bytes), Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = Command::ScanDone.encode();
        bytes.push(0);
        assert_eq!(Command::decode(&bytes), Err(WireError::TrailingBytes(1)));
    }

    #[test]
    fn test_bad_enum_byte_rejected() {
        let bytes = [tags::LOAD_TUBE, 0, 99];
        assert!(matches!(Command::decode(&bytes), Err(WireError::UnknownVariant(_))));
    }
}

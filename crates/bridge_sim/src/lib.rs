//! # bridge_sim
//!
//! The authoritative core of a multiplayer bridge simulator. One [`World`]
//! holds every simulated object; crew stations act on their ship only
//! through [`bridge_net::Command`]s, which the world validates and applies.
//!
//! This crate provides:
//!
//! - [`World`]: objects, factions, the game master's inbox and the mission
//!   clock.
//! - [`faction`] and [`scan`]: relations, shared reputation, and escalating
//!   scan knowledge.
//! - [`comms`]: the per-ship hail and dialogue state machine.
//! - [`custom`]: script-defined crew-station buttons and messages.
//! - [`dispatch`]: command validation and application.
//! - [`TickLoop`]: the fixed-rate loop that applies queued commands and
//!   advances the world.
//! - [`SimConfig`] and [`Scenario`]: JSON configuration and world setup.

pub mod comms;
pub mod config;
pub mod custom;
pub mod dispatch;
pub mod error;
pub mod faction;
pub mod object;
pub mod scan;
pub mod scenario;
pub mod script;
pub mod ship;
pub mod ship_log;
pub mod snapshot;
pub mod systems;
pub mod tick;
mod update;
pub mod world;

pub use comms::{CommsChannel, CommsReply, CommsState};
pub use config::SimConfig;
pub use custom::{CustomFunction, CustomFunctionRegistry};
pub use error::SimError;
pub use faction::{FactionInfo, FactionRelation};
pub use object::{ObjectKind, SpaceObject};
pub use scan::ScanRecords;
pub use scenario::Scenario;
pub use script::{Callback, CommsDialogue, CommsHandle, CommsScript, ScriptCallback, StaticComms};
pub use ship::PlayerShip;
pub use ship_log::{Color, ShipLog, ShipLogEntry};
pub use snapshot::ShipSnapshot;
pub use tick::{TickConfig, TickLoop, TickOutput};
pub use world::{GmMessage, World};

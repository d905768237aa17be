//! Authoritative tick loop.
//!
//! Each tick:
//!
//! 1. Apply every queued command, in receipt order.
//! 2. Advance the world by the tick duration.
//! 3. Collect queued client directives and custom-function catalogs that
//!    changed since they were last sent.
//! 4. Advance the tick counter.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use bridge_component::Entity;
use bridge_net::{Command, CustomFunctionEntry, ServerDirective, WireError};
use tracing::debug;

use crate::config::SimConfig;
use crate::snapshot::ShipSnapshot;
use crate::world::World;

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Unlimited ticks at the world's configured rate.
    #[must_use]
    pub fn from_sim(config: &SimConfig) -> Self {
        Self {
            tick_rate: config.tick_rate,
            max_ticks: 0,
        }
    }

    /// Seconds per tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }
}

/// What one tick produced for clients.
#[derive(Debug, Default)]
pub struct TickOutput {
    pub tick_id: u64,
    pub applied: usize,
    pub dropped: usize,
    /// Directives queued during the tick, in order.
    pub directives: Vec<(Entity, ServerDirective)>,
    /// Full catalogs of ships whose custom functions changed.
    pub custom_updates: Vec<(Entity, Vec<CustomFunctionEntry>)>,
}

/// The tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    config: TickConfig,
    world: World,
    pending: VecDeque<(Entity, Command)>,
    /// Last custom-function revision sent per ship.
    sent_revisions: HashMap<Entity, u64>,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, world: World) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
            pending: VecDeque::new(),
            sent_revisions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Queue a command for the next tick.
    pub fn submit(&mut self, ship: Entity, command: Command) {
        self.pending.push_back((ship, command));
    }

    /// Decode and queue a command received as bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`WireError`] if the bytes are not a valid command;
    /// nothing is queued in that case.
    pub fn submit_bytes(&mut self, ship: Entity, bytes: &[u8]) -> Result<(), WireError> {
        let command = Command::decode(bytes)?;
        self.submit(ship, command);
        Ok(())
    }

    /// Number of commands waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> TickOutput {
        self.tick_id += 1;
        let mut output = TickOutput {
            tick_id: self.tick_id,
            ..TickOutput::default()
        };

        while let Some((ship, command)) = self.pending.pop_front() {
            if self.world.apply_command(ship, command) {
                output.applied += 1;
            } else {
                output.dropped += 1;
            }
        }

        self.world.update(dt as f32);

        output.directives = self.world.take_directives();
        output.custom_updates = self.collect_custom_updates();

        debug!(
            tick_id = self.tick_id,
            dt,
            applied = output.applied,
            dropped = output.dropped,
            "tick complete"
        );
        output
    }

    fn collect_custom_updates(&mut self) -> Vec<(Entity, Vec<CustomFunctionEntry>)> {
        let ships = self.world.player_ships();
        self.sent_revisions.retain(|ship, _| ships.contains(ship));
        let mut updates = Vec::new();
        for ship in ships {
            let Some(registry) = self.world.player_ship(ship).map(|p| p.custom_functions()) else {
                continue;
            };
            let revision = registry.revision();
            if self.sent_revisions.insert(ship, revision) != Some(revision) {
                updates.push((ship, registry.catalog()));
            }
        }
        updates
    }

    /// Snapshots of every player ship.
    #[must_use]
    pub fn snapshots(&self) -> Vec<ShipSnapshot> {
        self.world
            .player_ships()
            .into_iter()
            .filter_map(|ship| ShipSnapshot::capture(&self.world, ship))
            .collect()
    }
}

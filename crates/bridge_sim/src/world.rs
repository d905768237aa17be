//! The authoritative world context.
//!
//! [`World`] owns every simulated object and the registries that span them:
//! factions, the game master's inbox and intercept flag, queued client
//! directives and the mission clock. Objects are addressed by [`Entity`]
//! handles that may outlive the object; every lookup returns an `Option`.

use std::collections::BTreeMap;

use bridge_component::{Entity, EntityAllocator};
use bridge_math::Vec2;
use bridge_net::ServerDirective;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::faction::{FactionInfo, FactionRelation};
use crate::object::{ObjectKind, SpaceObject};
use crate::ship::PlayerShip;
use crate::ship_log::{Color, format_mission_time};

/// A chat line a player ship sent on a channel held by the game master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmMessage {
    pub ship: Entity,
    /// Call sign of the ship when the line was sent.
    pub call_sign: String,
    pub text: String,
}

/// The world: objects, factions and world-wide state.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    allocator: EntityAllocator,
    objects: BTreeMap<Entity, SpaceObject>,
    pub(crate) factions: BTreeMap<Entity, FactionInfo>,
    mission_time: f64,
    intercept_all_comms_to_gm: bool,
    gm_inbox: Vec<GmMessage>,
    directives: Vec<(Entity, ServerDirective)>,
    pub(crate) rng: StdRng,
}

impl World {
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// A world with a reproducible random stream.
    #[must_use]
    pub fn with_seed(config: SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimConfig, rng: StdRng) -> Self {
        Self {
            config,
            allocator: EntityAllocator::new(),
            objects: BTreeMap::new(),
            factions: BTreeMap::new(),
            mission_time: 0.0,
            intercept_all_comms_to_gm: false,
            gm_inbox: Vec::new(),
            directives: Vec::new(),
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seconds since the mission started.
    #[must_use]
    pub fn mission_time(&self) -> f64 {
        self.mission_time
    }

    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.mission_time += f64::from(dt);
    }

    pub(crate) fn allocate(&mut self) -> Entity {
        self.allocator.allocate()
    }

    // -- Object lifecycle --

    /// Add an object and return its handle.
    pub fn spawn(&mut self, object: SpaceObject) -> Entity {
        let entity = self.allocate();
        debug!(%entity, kind = object.kind.name(), call_sign = %object.call_sign, "spawned");
        self.objects.insert(entity, object);
        entity
    }

    pub fn spawn_player_ship(&mut self, call_sign: &str, position: Vec2) -> Entity {
        let ship = PlayerShip::new(self.config.max_ship_log_entries);
        self.spawn(
            SpaceObject::new(ObjectKind::PlayerShip(Box::new(ship)))
                .with_call_sign(call_sign)
                .with_position(position),
        )
    }

    pub fn spawn_cpu_ship(&mut self, call_sign: &str, position: Vec2) -> Entity {
        self.spawn(
            SpaceObject::new(ObjectKind::CpuShip)
                .with_call_sign(call_sign)
                .with_position(position),
        )
    }

    pub fn spawn_station(&mut self, call_sign: &str, position: Vec2) -> Entity {
        self.spawn(
            SpaceObject::new(ObjectKind::Station)
                .with_call_sign(call_sign)
                .with_position(position),
        )
    }

    /// Remove an object. Handles to it become invalid. Returns `false` if it
    /// was already gone.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        match self.objects.remove(&entity) {
            Some(object) => {
                for other in self.objects.values_mut() {
                    other.scan.forget_observer(entity);
                }
                info!(%entity, kind = object.kind.name(), call_sign = %object.call_sign, "destroyed");
                true
            }
            None => false,
        }
    }

    /// Whether the handle names a live object.
    #[must_use]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.objects.contains_key(&entity)
    }

    #[must_use]
    pub fn object(&self, entity: Entity) -> Option<&SpaceObject> {
        self.objects.get(&entity)
    }

    pub fn object_mut(&mut self, entity: Entity) -> Option<&mut SpaceObject> {
        self.objects.get_mut(&entity)
    }

    /// All live objects, in handle order.
    pub fn objects(&self) -> impl Iterator<Item = (Entity, &SpaceObject)> {
        self.objects.iter().map(|(&entity, object)| (entity, object))
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = (Entity, &mut SpaceObject)> {
        self.objects.iter_mut().map(|(&entity, object)| (entity, object))
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn player_ship(&self, entity: Entity) -> Option<&PlayerShip> {
        self.object(entity)?.as_player()
    }

    pub fn player_ship_mut(&mut self, entity: Entity) -> Option<&mut PlayerShip> {
        self.object_mut(entity)?.as_player_mut()
    }

    /// Handles of every player ship.
    #[must_use]
    pub fn player_ships(&self) -> Vec<Entity> {
        self.objects
            .iter()
            .filter(|(_, object)| object.as_player().is_some())
            .map(|(&entity, _)| entity)
            .collect()
    }

    /// Call sign of an object, or `""` if it is gone.
    #[must_use]
    pub fn call_sign(&self, entity: Entity) -> &str {
        self.object(entity).map_or("", |object| object.call_sign.as_str())
    }

    /// Objects whose position lies within `radius` of `center`.
    #[must_use]
    pub fn objects_in_range(&self, center: Vec2, radius: f32) -> Vec<Entity> {
        self.objects
            .iter()
            .filter(|(_, object)| object.position().distance(center) <= radius)
            .map(|(&entity, _)| entity)
            .collect()
    }

    /// Whether any object hostile to `entity` is within `radius` of it.
    #[must_use]
    pub fn are_enemies_in_range(&self, entity: Entity, radius: f32) -> bool {
        let Some(center) = self.object(entity).map(SpaceObject::position) else {
            return false;
        };
        self.objects_in_range(center, radius)
            .into_iter()
            .any(|other| self.is_enemy(entity, other))
    }

    // -- Game master --

    #[must_use]
    pub fn intercept_all_comms_to_gm(&self) -> bool {
        self.intercept_all_comms_to_gm
    }

    /// Route every new scripted hail to the game master instead.
    pub fn set_intercept_all_comms_to_gm(&mut self, intercept: bool) {
        self.intercept_all_comms_to_gm = intercept;
    }

    pub(crate) fn push_gm_message(&mut self, message: GmMessage) {
        info!(ship = %message.ship, call_sign = %message.call_sign, "message for GM");
        self.gm_inbox.push(message);
    }

    /// Drain the game master's inbox.
    pub fn take_gm_messages(&mut self) -> Vec<GmMessage> {
        std::mem::take(&mut self.gm_inbox)
    }

    // -- Client directives --

    /// Ask the ship's main screen client to play a sound.
    pub fn play_sound_on_main_screen(&mut self, ship: Entity, sound: &str) {
        if self.player_ship(ship).is_some() {
            self.directives.push((ship, ServerDirective::PlaySound(sound.to_string())));
        }
    }

    /// Drain directives queued since the last call, in order.
    pub fn take_directives(&mut self) -> Vec<(Entity, ServerDirective)> {
        std::mem::take(&mut self.directives)
    }

    // -- Ship log --

    /// Append a log line stamped with the mission clock.
    pub fn add_to_ship_log(&mut self, ship: Entity, text: &str, color: Color) {
        let prefix = format_mission_time(self.mission_time);
        if let Some(player) = self.player_ship_mut(ship) {
            player.log.push(prefix, text, color);
        }
    }

    /// Append a log line colored by how the ship regards `source`.
    pub fn add_to_ship_log_by(&mut self, ship: Entity, text: &str, source: Entity) {
        let color = match self.object_relation(ship, source) {
            FactionRelation::Enemy => Color::ENEMY,
            FactionRelation::Friendly => Color::FRIENDLY,
            FactionRelation::Neutral => Color::NEUTRAL,
        };
        self.add_to_ship_log(ship, text, color);
    }
}

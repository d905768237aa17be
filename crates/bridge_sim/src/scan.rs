//! What observers know about a target.
//!
//! Each object carries [`ScanRecords`]: per-observer and per-faction
//! [`ScanState`], plus the difficulty parameters the scanning minigame reads.
//! Knowledge only ever escalates.

use std::collections::HashMap;

use bridge_component::{Entity, ScanState};
use tracing::debug;

use crate::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ObserverScan {
    state: ScanState,
    steps: u32,
}

/// Scan knowledge held about one target.
///
/// Missing records read as [`ScanState::NotScanned`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRecords {
    complexity: u32,
    depth: u32,
    by_entity: HashMap<Entity, ObserverScan>,
    by_faction: HashMap<Entity, ScanState>,
}

impl ScanRecords {
    /// Number of minigame steps per scan; 0 means a timed scan.
    #[must_use]
    pub fn complexity(&self) -> u32 {
        self.complexity
    }

    /// Successful scans needed to reach [`ScanState::FullyScanned`].
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn set_parameters(&mut self, complexity: u32, depth: u32) {
        self.complexity = complexity;
        self.depth = depth;
    }

    #[must_use]
    pub fn entity_state(&self, observer: Entity) -> ScanState {
        self.by_entity.get(&observer).map(|s| s.state).unwrap_or_default()
    }

    #[must_use]
    pub fn faction_state(&self, faction: Entity) -> ScanState {
        self.by_faction.get(&faction).copied().unwrap_or_default()
    }

    /// The higher of the observer's own knowledge and its faction's.
    #[must_use]
    pub fn effective_state(&self, observer: Entity, faction: Option<Entity>) -> ScanState {
        let shared = faction.map(|f| self.faction_state(f)).unwrap_or_default();
        self.entity_state(observer).escalate(shared)
    }

    /// Raise the observer's state; lower values are ignored.
    pub fn escalate_entity(&mut self, observer: Entity, state: ScanState) {
        let record = self.by_entity.entry(observer).or_default();
        record.state = record.state.escalate(state);
    }

    /// Raise a faction's state; lower values are ignored.
    pub fn escalate_faction(&mut self, faction: Entity, state: ScanState) {
        let record = self.by_faction.entry(faction).or_default();
        *record = record.escalate(state);
    }

    /// Record one successful scan by `observer` and return its new state.
    ///
    /// The first step identifies friend or foe; the observer is fully
    /// scanned once it has completed `max(depth, 1)` steps.
    pub fn register_step(&mut self, observer: Entity) -> ScanState {
        let needed = self.depth.max(1);
        let record = self.by_entity.entry(observer).or_default();
        record.steps = record.steps.saturating_add(1);
        let reached = if record.steps >= needed {
            ScanState::FullyScanned
        } else {
            ScanState::FriendOrFoeIdentified
        };
        record.state = record.state.escalate(reached);
        record.state
    }

    /// Drop what a destroyed observer knew.
    pub(crate) fn forget_observer(&mut self, observer: Entity) {
        self.by_entity.remove(&observer);
    }

    /// Scans completed by `observer` so far.
    #[must_use]
    pub fn steps(&self, observer: Entity) -> u32 {
        self.by_entity.get(&observer).map_or(0, |s| s.steps)
    }
}

impl World {
    /// Whether `other` may put `target` into its target slot.
    #[must_use]
    pub fn can_be_targeted_by(&self, target: Entity, other: Entity) -> bool {
        target != other && self.object(target).is_some_and(|obj| obj.kind.can_be_targeted())
    }

    /// Whether `other` may select `target` on its screens.
    #[must_use]
    pub fn can_be_selected_by(&self, target: Entity, other: Entity) -> bool {
        target != other && self.object(target).is_some_and(|obj| obj.kind.can_be_selected())
    }

    /// Whether `other` may start a scan of `target`.
    #[must_use]
    pub fn can_be_scanned_by(&self, target: Entity, other: Entity) -> bool {
        target != other
            && self.object(target).is_some_and(|obj| obj.kind.is_scannable())
            && self.scanned_state_for(target, other) != ScanState::FullyScanned
    }

    /// What `observer` knows about `target`, including its faction's share.
    #[must_use]
    pub fn scanned_state_for(&self, target: Entity, observer: Entity) -> ScanState {
        let faction = self.faction_of(observer);
        self.object(target)
            .map(|obj| obj.scan.effective_state(observer, faction))
            .unwrap_or_default()
    }

    pub fn set_scanned_state_for(&mut self, target: Entity, observer: Entity, state: ScanState) {
        if !self.is_valid(observer) {
            return;
        }
        if let Some(obj) = self.object_mut(target) {
            obj.scan.escalate_entity(observer, state);
        }
    }

    #[must_use]
    pub fn scanned_state_for_faction(&self, target: Entity, faction: Entity) -> ScanState {
        self.object(target)
            .map(|obj| obj.scan.faction_state(faction))
            .unwrap_or_default()
    }

    pub fn set_scanned_state_for_faction(&mut self, target: Entity, faction: Entity, state: ScanState) {
        if self.faction(faction).is_none() {
            return;
        }
        if let Some(obj) = self.object_mut(target) {
            obj.scan.escalate_faction(faction, state);
        }
    }

    pub fn set_scanning_parameters(&mut self, target: Entity, complexity: u32, depth: u32) {
        if let Some(obj) = self.object_mut(target) {
            obj.scan.set_parameters(complexity, depth);
        }
    }

    /// Whether `observer` has fully scanned `target`.
    #[must_use]
    pub fn is_scanned_by(&self, target: Entity, observer: Entity) -> bool {
        self.scanned_state_for(target, observer) == ScanState::FullyScanned
    }

    /// Whether the named faction has fully scanned `target`.
    #[must_use]
    pub fn is_scanned_by_faction(&self, target: Entity, faction_name: &str) -> bool {
        self.faction_by_name(faction_name)
            .is_some_and(|f| self.scanned_state_for_faction(target, f) == ScanState::FullyScanned)
    }

    /// Mark `target` fully scanned by every known faction.
    pub fn set_scanned(&mut self, target: Entity) {
        let factions: Vec<Entity> = self.factions().map(|(f, _)| f).collect();
        for faction in factions {
            self.set_scanned_state_for_faction(target, faction, ScanState::FullyScanned);
        }
    }

    /// Record one completed scan of `target` by `observer`.
    ///
    /// With faction sharing enabled, the observer's faction learns the same.
    pub fn register_scan_step(&mut self, target: Entity, observer: Entity) -> ScanState {
        let share = self.config().share_scans_with_faction;
        let faction = self.faction_of(observer);
        let Some(obj) = self.object_mut(target) else {
            return ScanState::NotScanned;
        };
        let state = obj.scan.register_step(observer);
        if share && let Some(faction) = faction {
            obj.scan.escalate_faction(faction, state);
        }
        debug!(%target, %observer, ?state, "scan step registered");
        state
    }
}

#[cfg(test)]
mod tests {
    use bridge_math::Vec2;

    use super::*;
    use crate::config::SimConfig;
    use crate::object::{ObjectKind, SpaceObject};

    #[test]
    fn test_missing_record_reads_not_scanned() {
        let records = ScanRecords::default();
        assert_eq!(records.entity_state(Entity(4)), ScanState::NotScanned);
        assert_eq!(records.faction_state(Entity(9)), ScanState::NotScanned);
    }

    #[test]
    fn test_entity_state_never_regresses() {
        let mut records = ScanRecords::default();
        let observer = Entity(1);
        let sequence = [
            ScanState::FriendOrFoeIdentified,
            ScanState::NotScanned,
            ScanState::FullyScanned,
            ScanState::FriendOrFoeIdentified,
        ];
        let mut last = ScanState::NotScanned;
        for state in sequence {
            records.escalate_entity(observer, state);
            let now = records.entity_state(observer);
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, ScanState::FullyScanned);
    }

    #[test]
    fn test_effective_state_is_max_of_axes() {
        let mut records = ScanRecords::default();
        let (observer, faction) = (Entity(1), Entity(2));
        records.escalate_faction(faction, ScanState::FullyScanned);
        assert_eq!(records.effective_state(observer, Some(faction)), ScanState::FullyScanned);
        assert_eq!(records.effective_state(observer, None), ScanState::NotScanned);

        records.escalate_entity(observer, ScanState::FriendOrFoeIdentified);
        assert_eq!(
            records.effective_state(observer, Some(Entity(3))),
            ScanState::FriendOrFoeIdentified
        );
    }

    #[test]
    fn test_depth_controls_steps_to_full_scan() {
        let mut records = ScanRecords::default();
        records.set_parameters(2, 3);
        let observer = Entity(1);
        assert_eq!(records.register_step(observer), ScanState::FriendOrFoeIdentified);
        assert_eq!(records.register_step(observer), ScanState::FriendOrFoeIdentified);
        assert_eq!(records.register_step(observer), ScanState::FullyScanned);
        assert_eq!(records.steps(observer), 3);
    }

    #[test]
    fn test_zero_depth_scans_fully_in_one_step() {
        let mut records = ScanRecords::default();
        assert_eq!(records.register_step(Entity(1)), ScanState::FullyScanned);
    }

    #[test]
    fn test_world_capabilities() {
        let mut world = World::new(SimConfig::default());
        let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
        let zone = world.spawn(SpaceObject::new(ObjectKind::Zone {
            label: "Nebula".into(),
        }));
        let rock = world.spawn(SpaceObject::new(ObjectKind::Asteroid));
        let station = world.spawn_station("DS-1", Vec2::new(500.0, 0.0));

        assert!(!world.can_be_targeted_by(zone, ship));
        assert!(!world.can_be_selected_by(zone, ship));
        assert!(!world.can_be_targeted_by(ship, ship));
        assert!(world.can_be_targeted_by(rock, ship));
        assert!(!world.can_be_scanned_by(rock, ship));
        assert!(world.can_be_scanned_by(station, ship));

        world.set_scanned_state_for(station, ship, ScanState::FullyScanned);
        assert!(!world.can_be_scanned_by(station, ship));
        assert!(world.is_scanned_by(station, ship));
    }

    #[test]
    fn test_faction_member_sees_faction_scan() {
        let mut world = World::new(SimConfig::default());
        let navy = world.add_faction("Human Navy").unwrap();
        let a = world.spawn_player_ship("Alpha", Vec2::ZERO);
        let b = world.spawn_player_ship("Beta", Vec2::ZERO);
        world.set_faction_id(a, Some(navy)).unwrap();
        world.set_faction_id(b, Some(navy)).unwrap();
        let target = world.spawn_cpu_ship("Raider", Vec2::new(10.0, 0.0));

        world.register_scan_step(target, a);
        assert_eq!(world.scanned_state_for(target, b), ScanState::FullyScanned);
        assert!(world.is_scanned_by_faction(target, "Human Navy"));
        assert_eq!(
            world.object(target).unwrap().scan.entity_state(b),
            ScanState::NotScanned
        );
    }

    #[test]
    fn test_sharing_disabled_keeps_scan_private() {
        let mut world = World::new(SimConfig::default().with_share_scans_with_faction(false));
        let navy = world.add_faction("Human Navy").unwrap();
        let a = world.spawn_player_ship("Alpha", Vec2::ZERO);
        let b = world.spawn_player_ship("Beta", Vec2::ZERO);
        world.set_faction_id(a, Some(navy)).unwrap();
        world.set_faction_id(b, Some(navy)).unwrap();
        let target = world.spawn_cpu_ship("Raider", Vec2::ZERO);

        world.register_scan_step(target, a);
        assert_eq!(world.scanned_state_for(target, a), ScanState::FullyScanned);
        assert_eq!(world.scanned_state_for(target, b), ScanState::NotScanned);
    }

    #[test]
    fn test_set_scanned_reaches_every_faction() {
        let mut world = World::new(SimConfig::default());
        let navy = world.add_faction("Human Navy").unwrap();
        let a = world.spawn_player_ship("Alpha", Vec2::ZERO);
        world.set_faction_id(a, Some(navy)).unwrap();
        let target = world.spawn_cpu_ship("Raider", Vec2::ZERO);
        world.set_scanned(target);
        assert!(world.is_scanned_by(target, a));
    }
}

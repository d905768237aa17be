//! Factions, relations and reputation.
//!
//! Factions are world-owned records addressed by [`Entity`] handles from the
//! same allocator as objects. An object belongs to at most one faction and
//! reads and spends its faction's reputation pool.

use std::collections::HashMap;

use bridge_component::Entity;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::world::World;

/// How one faction regards another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionRelation {
    Friendly,
    #[default]
    Neutral,
    Enemy,
}

/// A faction record.
#[derive(Debug, Clone, PartialEq)]
pub struct FactionInfo {
    name: String,
    relations: HashMap<Entity, FactionRelation>,
    reputation_points: f32,
}

impl FactionInfo {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relations: HashMap::new(),
            reputation_points: 0.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relation towards `other`; unlisted factions are neutral.
    #[must_use]
    pub fn relation_to(&self, other: Entity) -> FactionRelation {
        self.relations.get(&other).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn reputation_points(&self) -> f32 {
        self.reputation_points
    }

    pub fn set_reputation_points(&mut self, amount: f32) {
        self.reputation_points = amount.max(0.0);
    }

    pub fn add_reputation_points(&mut self, amount: f32) {
        self.set_reputation_points(self.reputation_points + amount);
    }

    /// Subtract, flooring at zero.
    pub fn remove_reputation_points(&mut self, amount: f32) {
        self.set_reputation_points(self.reputation_points - amount);
    }

    /// Spend `amount` if the pool covers it. Leaves the pool untouched and
    /// returns `false` otherwise.
    pub fn take_reputation_points(&mut self, amount: f32) -> bool {
        if self.reputation_points < amount {
            return false;
        }
        self.reputation_points -= amount;
        true
    }
}

impl World {
    /// Register a new faction.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DuplicateFaction`] if the name is taken.
    pub fn add_faction(&mut self, name: impl Into<String>) -> Result<Entity, SimError> {
        let name = name.into();
        if self.faction_by_name(&name).is_some() {
            return Err(SimError::DuplicateFaction(name));
        }
        let entity = self.allocate();
        self.factions.insert(entity, FactionInfo::new(name));
        Ok(entity)
    }

    #[must_use]
    pub fn faction(&self, faction: Entity) -> Option<&FactionInfo> {
        self.factions.get(&faction)
    }

    pub fn faction_mut(&mut self, faction: Entity) -> Option<&mut FactionInfo> {
        self.factions.get_mut(&faction)
    }

    #[must_use]
    pub fn faction_by_name(&self, name: &str) -> Option<Entity> {
        self.factions
            .iter()
            .find(|(_, info)| info.name == name)
            .map(|(&entity, _)| entity)
    }

    /// All registered factions.
    pub fn factions(&self) -> impl Iterator<Item = (Entity, &FactionInfo)> {
        self.factions.iter().map(|(&entity, info)| (entity, info))
    }

    /// Set the relation between two factions, both ways.
    ///
    /// A faction's relation to itself is fixed and cannot be set.
    pub fn set_faction_relation(&mut self, a: Entity, b: Entity, relation: FactionRelation) {
        if a == b || !self.factions.contains_key(&a) || !self.factions.contains_key(&b) {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(info) = self.factions.get_mut(&from) {
                info.relations.insert(to, relation);
            }
        }
    }

    /// Relation between two factions; neutral if either is unknown.
    #[must_use]
    pub fn faction_relation(&self, a: Entity, b: Entity) -> FactionRelation {
        if a == b {
            return FactionRelation::Neutral;
        }
        self.factions.get(&a).map(|info| info.relation_to(b)).unwrap_or_default()
    }

    /// Faction of an object, if it has one.
    #[must_use]
    pub fn faction_of(&self, object: Entity) -> Option<Entity> {
        self.object(object).and_then(|obj| obj.faction)
    }

    /// Display name of an object's faction, or `""`.
    #[must_use]
    pub fn faction_name_of(&self, object: Entity) -> &str {
        self.faction_of(object)
            .and_then(|f| self.factions.get(&f))
            .map_or("", |info| info.name.as_str())
    }

    /// Assign an object to a faction by name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownFaction`] or [`SimError::NoSuchObject`].
    pub fn set_faction(&mut self, object: Entity, name: &str) -> Result<(), SimError> {
        let faction = self
            .faction_by_name(name)
            .ok_or_else(|| SimError::UnknownFaction(name.to_string()))?;
        self.set_faction_id(object, Some(faction))
    }

    /// Assign an object to a faction handle, or clear it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NoSuchObject`] for a dead object, or
    /// [`SimError::UnknownFaction`] for an unregistered handle.
    pub fn set_faction_id(&mut self, object: Entity, faction: Option<Entity>) -> Result<(), SimError> {
        if let Some(f) = faction
            && !self.factions.contains_key(&f)
        {
            return Err(SimError::UnknownFaction(f.to_string()));
        }
        let obj = self.object_mut(object).ok_or(SimError::NoSuchObject(object))?;
        obj.faction = faction;
        Ok(())
    }

    pub(crate) fn object_relation(&self, a: Entity, b: Entity) -> FactionRelation {
        match (self.faction_of(a), self.faction_of(b)) {
            (Some(fa), Some(fb)) => self.faction_relation(fa, fb),
            _ => FactionRelation::Neutral,
        }
    }

    /// Whether `a`'s faction is hostile to `b`'s.
    ///
    /// Objects without a faction, or sharing one, are never enemies.
    #[must_use]
    pub fn is_enemy(&self, a: Entity, b: Entity) -> bool {
        self.object_relation(a, b) == FactionRelation::Enemy
    }

    /// Whether `a`'s faction is allied with `b`'s.
    #[must_use]
    pub fn is_friendly(&self, a: Entity, b: Entity) -> bool {
        self.object_relation(a, b) == FactionRelation::Friendly
    }

    fn object_faction_mut(&mut self, object: Entity) -> Option<&mut FactionInfo> {
        let faction = self.faction_of(object)?;
        self.factions.get_mut(&faction)
    }

    /// Reputation available to an object; 0 without a faction.
    #[must_use]
    pub fn reputation_points(&self, object: Entity) -> f32 {
        self.faction_of(object)
            .and_then(|f| self.factions.get(&f))
            .map_or(0.0, FactionInfo::reputation_points)
    }

    pub fn set_reputation_points(&mut self, object: Entity, amount: f32) {
        if let Some(info) = self.object_faction_mut(object) {
            info.set_reputation_points(amount);
        }
    }

    pub fn add_reputation_points(&mut self, object: Entity, amount: f32) {
        if let Some(info) = self.object_faction_mut(object) {
            info.add_reputation_points(amount);
        }
    }

    pub fn remove_reputation_points(&mut self, object: Entity, amount: f32) {
        if let Some(info) = self.object_faction_mut(object) {
            info.remove_reputation_points(amount);
        }
    }

    /// Spend reputation from the object's faction, all or nothing.
    pub fn take_reputation_points(&mut self, object: Entity, amount: f32) -> bool {
        self.object_faction_mut(object)
            .is_some_and(|info| info.take_reputation_points(amount))
    }
}

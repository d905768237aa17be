//! Object handles and allocation.
//!
//! An [`Entity`] is a lightweight `u64` handle to a simulated object. A handle
//! may outlive the object it names: every holder must re-validate it against
//! the world before dereferencing.

use serde::{Deserialize, Serialize};

/// A handle to a simulated object (ship, station, probe, faction, ...).
///
/// Handles are allocated by the authoritative world and are never reused
/// within one session, so a stale handle can only ever resolve to "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null handle. Never refers to a live object.
    pub const INVALID: Entity = Entity(0);

    /// Create a handle from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is [`Entity::INVALID`].
    ///
    /// This only checks the handle itself; use the world to check that the
    /// object is still alive.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Interpret a raw wire value, mapping `0` to `None`.
    #[must_use]
    pub const fn from_wire(id: u64) -> Option<Self> {
        if id == 0 { None } else { Some(Self(id)) }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing handles.
///
/// Lives in the world context. IDs are not recycled, which keeps stale
/// handles held by clients or scripts from aliasing a newer object.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh handle.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns the number of handles allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle() {
        assert!(!Entity::INVALID.is_valid());
        assert!(Entity::from_raw(7).is_valid());
    }

    #[test]
    fn test_from_wire_maps_zero_to_none() {
        assert_eq!(Entity::from_wire(0), None);
        assert_eq!(Entity::from_wire(12), Some(Entity(12)));
    }

    #[test]
    fn test_allocator_never_hands_out_invalid() {
        let mut alloc = EntityAllocator::new();
        let first = alloc.allocate();
        let second = alloc.allocate();
        assert!(first.is_valid());
        assert_ne!(first, second);
        assert_eq!(alloc.count(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity(3).to_string(), "Entity(3)");
    }
}

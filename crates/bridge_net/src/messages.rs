//! Structured server → client messages.

use bridge_component::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wraps a per-ship state body with the routing metadata clients need to
/// discard stale or foreign snapshots.
///
/// `session` changes whenever the server restarts, so clients can drop any
/// projection built from a previous run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateEnvelope<T> {
    /// Identifier of the server run that produced this snapshot.
    pub session: Uuid,
    /// Tick at which the snapshot was taken.
    pub tick_id: u64,
    /// The ship the body describes.
    pub ship: Entity,
    /// The snapshot itself.
    pub body: T,
}

impl<T> StateEnvelope<T> {
    /// Returns `true` if this envelope is newer than `tick_id` from the same
    /// session.
    #[must_use]
    pub fn supersedes(&self, session: Uuid, tick_id: u64) -> bool {
        self.session != session || self.tick_id > tick_id
    }
}

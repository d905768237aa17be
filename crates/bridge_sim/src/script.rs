//! Scripting seams.
//!
//! The core never runs scripts itself. It holds opaque handles and calls them
//! at well-defined points: [`Callback`] for fire-and-forget hooks (custom
//! buttons, probe events) and [`CommsHandle`] for the dialogue an object
//! offers when a ship hails it.

use std::fmt;
use std::sync::Arc;

use bridge_component::Entity;
use serde::{Deserialize, Serialize};

use crate::world::World;

/// A scripted hook with no arguments and no observed result.
pub trait ScriptCallback: Send + Sync {
    fn invoke(&self);
}

impl<F> ScriptCallback for F
where
    F: Fn() + Send + Sync,
{
    fn invoke(&self) {
        self();
    }
}

/// Shared handle to a [`ScriptCallback`].
#[derive(Clone)]
pub struct Callback(Arc<dyn ScriptCallback>);

impl Callback {
    /// Wrap a callback.
    pub fn new(callback: impl ScriptCallback + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Run the callback.
    pub fn invoke(&self) {
        self.0.invoke();
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// The message and reply options a comms script offers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommsDialogue {
    message: String,
    replies: Vec<(i32, String)>,
}

impl CommsDialogue {
    /// Set the text shown to the crew.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Offer a reply. `id` is handed back to [`CommsScript::reply`].
    pub fn add_reply(&mut self, id: i32, text: impl Into<String>) {
        self.replies.push((id, text.into()));
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn replies(&self) -> &[(i32, String)] {
        &self.replies
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(i32, String)>) {
        (self.message, self.replies)
    }
}

/// Dialogue logic attached to a non-player object.
///
/// Both methods get the world mutably so a script can charge reputation,
/// restock the ship or log, exactly like any other server-side actor.
pub trait CommsScript: Send + Sync {
    /// A player ship's hail reached this object. Return `false` to refuse.
    fn open(&self, world: &mut World, ship: Entity, target: Entity, dialogue: &mut CommsDialogue) -> bool;

    /// The crew picked the reply with `reply_id`.
    fn reply(&self, world: &mut World, ship: Entity, target: Entity, reply_id: i32, dialogue: &mut CommsDialogue);
}

/// Shared handle to a [`CommsScript`].
#[derive(Clone)]
pub struct CommsHandle(Arc<dyn CommsScript>);

impl CommsHandle {
    pub fn new(script: impl CommsScript + 'static) -> Self {
        Self(Arc::new(script))
    }

    pub(crate) fn open(&self, world: &mut World, ship: Entity, target: Entity, dialogue: &mut CommsDialogue) -> bool {
        self.0.open(world, ship, target, dialogue)
    }

    pub(crate) fn reply(&self, world: &mut World, ship: Entity, target: Entity, reply_id: i32, dialogue: &mut CommsDialogue) {
        self.0.reply(world, ship, target, reply_id, dialogue);
    }
}

impl fmt::Debug for CommsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CommsHandle")
    }
}

/// One reply of a [`StaticComms`] dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticReply {
    /// Caption on the reply button.
    pub text: String,
    /// What the object answers when picked.
    pub response: String,
}

/// A data-driven dialogue: one greeting and a fixed menu of replies.
///
/// Refuses hails from ships its object considers enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticComms {
    pub greeting: String,
    #[serde(default)]
    pub replies: Vec<StaticReply>,
}

impl StaticComms {
    fn offer_replies(&self, dialogue: &mut CommsDialogue) {
        for (id, reply) in self.replies.iter().enumerate() {
            dialogue.add_reply(id as i32, reply.text.clone());
        }
    }
}

impl CommsScript for StaticComms {
    fn open(&self, world: &mut World, ship: Entity, target: Entity, dialogue: &mut CommsDialogue) -> bool {
        if world.is_enemy(target, ship) {
            return false;
        }
        dialogue.set_message(self.greeting.clone());
        self.offer_replies(dialogue);
        true
    }

    fn reply(&self, _world: &mut World, _ship: Entity, _target: Entity, reply_id: i32, dialogue: &mut CommsDialogue) {
        if let Some(reply) = usize::try_from(reply_id).ok().and_then(|i| self.replies.get(i)) {
            dialogue.set_message(reply.response.clone());
        }
        self.offer_replies(dialogue);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_closure_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let callback = Callback::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        callback.invoke();
        callback.clone().invoke();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dialogue_collects_replies_in_order() {
        let mut dialogue = CommsDialogue::default();
        dialogue.set_message("Hello");
        dialogue.add_reply(7, "Dock");
        dialogue.add_reply(2, "Leave");
        assert_eq!(dialogue.message(), "Hello");
        assert_eq!(dialogue.replies()[0], (7, "Dock".to_string()));
        assert_eq!(dialogue.replies().len(), 2);
    }

    #[test]
    fn test_static_comms_parses_from_json() {
        let comms: StaticComms = serde_json::from_str(
            r#"{ "greeting": "Hi", "replies": [{ "text": "Status?", "response": "Fine." }] }"#,
        )
        .unwrap();
        assert_eq!(comms.replies.len(), 1);
        assert_eq!(comms.replies[0].response, "Fine.");
    }
}

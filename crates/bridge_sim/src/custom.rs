//! Scripted crew-station affordances.
//!
//! Scripts attach buttons, captions and pop-up messages to a ship's crew
//! stations by name. A name identifies at most one entry per ship: adding a
//! name again replaces the entry where it stands.

use bridge_component::{CrewPosition, CustomFunctionType};
use bridge_net::CustomFunctionEntry;

use crate::script::Callback;

/// One registered affordance.
#[derive(Debug, Clone)]
pub struct CustomFunction {
    pub kind: CustomFunctionType,
    pub name: String,
    pub caption: String,
    pub crew_position: CrewPosition,
    pub callback: Option<Callback>,
    /// Display sort key, ascending.
    pub order: i32,
}

impl CustomFunction {
    /// The client-visible part of this entry.
    #[must_use]
    pub fn to_entry(&self) -> CustomFunctionEntry {
        CustomFunctionEntry {
            kind: self.kind,
            crew_position: self.crew_position,
            name: self.name.clone(),
            caption: self.caption.clone(),
        }
    }
}

/// A ship's custom functions, in insertion order.
///
/// [`CustomFunctionRegistry::revision`] changes on every mutation so the
/// server knows when to resend the catalog.
#[derive(Debug, Clone, Default)]
pub struct CustomFunctionRegistry {
    entries: Vec<CustomFunction>,
    revision: u64,
}

impl CustomFunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name. `order` of `None` keeps an existing entry's
    /// order, and gives a new entry order 0.
    fn upsert(
        &mut self,
        kind: CustomFunctionType,
        crew_position: CrewPosition,
        name: &str,
        caption: &str,
        callback: Option<Callback>,
        order: Option<i32>,
    ) {
        let existing = self.entries.iter().position(|e| e.name == name);
        let order = order
            .or_else(|| existing.map(|i| self.entries[i].order))
            .unwrap_or(0);
        let entry = CustomFunction {
            kind,
            name: name.to_string(),
            caption: caption.to_string(),
            crew_position,
            callback,
            order,
        };
        match existing {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
        self.revision += 1;
    }

    pub fn add_button(
        &mut self,
        position: CrewPosition,
        name: &str,
        caption: &str,
        callback: Callback,
        order: Option<i32>,
    ) {
        self.upsert(CustomFunctionType::Button, position, name, caption, Some(callback), order);
    }

    pub fn add_info(&mut self, position: CrewPosition, name: &str, caption: &str, order: Option<i32>) {
        self.upsert(CustomFunctionType::Info, position, name, caption, None, order);
    }

    pub fn add_message(&mut self, position: CrewPosition, name: &str, caption: &str) {
        self.upsert(CustomFunctionType::Message, position, name, caption, None, None);
    }

    /// A message whose callback runs when the crew dismisses it.
    pub fn add_message_with_callback(
        &mut self,
        position: CrewPosition,
        name: &str,
        caption: &str,
        callback: Callback,
    ) {
        self.upsert(CustomFunctionType::Message, position, name, caption, Some(callback), None);
    }

    /// Remove by name. Returns `false` if there was no such entry.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        let removed = self.entries.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomFunction> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Entries sorted by `order`; equal orders keep insertion order.
    #[must_use]
    pub fn display_order(&self) -> Vec<&CustomFunction> {
        let mut sorted: Vec<&CustomFunction> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.order);
        sorted
    }

    /// The full client catalog, in display order.
    #[must_use]
    pub fn catalog(&self) -> Vec<CustomFunctionEntry> {
        self.display_order().into_iter().map(CustomFunction::to_entry).collect()
    }

    /// Handle a crew activation of `name`.
    ///
    /// Buttons run their callback. Messages run theirs, if any, and are
    /// dismissed. Info entries and unknown names do nothing. Returns the
    /// callback to run so the caller can release its borrow first.
    pub fn activate(&mut self, name: &str) -> Option<Callback> {
        let entry = self.get(name)?;
        let (kind, callback) = (entry.kind, entry.callback.clone());
        match kind {
            CustomFunctionType::Button => callback,
            CustomFunctionType::Message => {
                self.remove(name);
                callback
            }
            CustomFunctionType::Info => None,
        }
    }
}

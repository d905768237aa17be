//! Per-ship communications channel.
//!
//! [`CommsChannel`] holds one ship's side of a hail or dialogue. The world
//! drives transitions that involve a second party (another player ship, a
//! scripted object, or the game master) so both sides change within the same
//! call.
//!
//! The channel's state alone tells a client which widget to show: reply
//! buttons for [`CommsState::ChannelOpen`], free text for the player and GM
//! chat states.

use bridge_component::Entity;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::script::CommsDialogue;
use crate::world::{GmMessage, World};

/// State of a ship's comms channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommsState {
    #[default]
    Inactive,
    OpeningChannel,
    BeingHailed,
    BeingHailedByGM,
    ChannelOpen,
    ChannelOpenPlayer,
    ChannelOpenGM,
    ChannelFailed,
    ChannelBroken,
    ChannelClosed,
}

impl CommsState {
    /// Ended states that stay visible until the next hail.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            CommsState::ChannelFailed | CommsState::ChannelBroken | CommsState::ChannelClosed
        )
    }

    /// Whether a new hail may start from this state.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, CommsState::Inactive) || self.is_terminal()
    }
}

/// A reply option offered by a comms script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommsReply {
    pub id: i32,
    pub text: String,
}

/// One ship's comms channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommsChannel {
    state: CommsState,
    target: Option<Entity>,
    target_name: String,
    opening_delay: f32,
    incoming_message: String,
    reply_options: Vec<CommsReply>,
}

impl CommsChannel {
    #[must_use]
    pub fn state(&self) -> CommsState {
        self.state
    }

    /// The other party; `None` when it is the game master.
    #[must_use]
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// The other party's name as it was when the hail started.
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Seconds until the current hail resolves or times out.
    #[must_use]
    pub fn opening_delay(&self) -> f32 {
        self.opening_delay
    }

    /// Running transcript: `> ` lines were received, `< ` lines were sent.
    #[must_use]
    pub fn incoming_message(&self) -> &str {
        &self.incoming_message
    }

    #[must_use]
    pub fn reply_options(&self) -> &[CommsReply] {
        &self.reply_options
    }

    pub fn is_inactive(&self) -> bool {
        self.state == CommsState::Inactive
    }

    pub fn is_opening(&self) -> bool {
        self.state == CommsState::OpeningChannel
    }

    /// Being hailed by anyone, the game master included.
    pub fn is_being_hailed(&self) -> bool {
        matches!(self.state, CommsState::BeingHailed | CommsState::BeingHailedByGM)
    }

    pub fn is_being_hailed_by_gm(&self) -> bool {
        self.state == CommsState::BeingHailedByGM
    }

    pub fn is_failed(&self) -> bool {
        self.state == CommsState::ChannelFailed
    }

    pub fn is_broken(&self) -> bool {
        self.state == CommsState::ChannelBroken
    }

    pub fn is_closed(&self) -> bool {
        self.state == CommsState::ChannelClosed
    }

    /// Free-text chat with a player or the game master.
    pub fn is_chat_open(&self) -> bool {
        matches!(self.state, CommsState::ChannelOpenPlayer | CommsState::ChannelOpenGM)
    }

    pub fn is_chat_open_to_gm(&self) -> bool {
        self.state == CommsState::ChannelOpenGM
    }

    pub fn is_chat_open_to_player(&self) -> bool {
        self.state == CommsState::ChannelOpenPlayer
    }

    pub fn is_script_open(&self) -> bool {
        self.state == CommsState::ChannelOpen
    }

    /// Replace the transcript and drop the reply options.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.incoming_message = message.into();
        self.reply_options.clear();
    }

    pub fn add_incoming_message(&mut self, message: &str) {
        self.push_line("> ", message);
    }

    pub fn add_outgoing_message(&mut self, message: &str) {
        self.push_line("< ", message);
    }

    fn push_line(&mut self, marker: &str, message: &str) {
        if !self.incoming_message.is_empty() {
            self.incoming_message.push('\n');
        }
        self.incoming_message.push_str(marker);
        self.incoming_message.push_str(message);
    }

    /// Offer a reply. Ignored unless a scripted dialogue is open.
    pub fn add_reply(&mut self, id: i32, text: impl Into<String>) -> bool {
        if self.state != CommsState::ChannelOpen {
            return false;
        }
        self.reply_options.push(CommsReply { id, text: text.into() });
        true
    }

    /// Begin a new exchange, discarding whatever the last one left behind.
    fn start(&mut self, state: CommsState, target: Option<Entity>, target_name: String, delay: f32) {
        self.state = state;
        self.target = target;
        self.target_name = target_name;
        self.opening_delay = delay;
        self.incoming_message.clear();
        self.reply_options.clear();
    }

    fn enter(&mut self, state: CommsState) {
        self.state = state;
        self.opening_delay = 0.0;
        if state != CommsState::ChannelOpen {
            self.reply_options.clear();
        }
    }

    fn open_dialogue(&mut self, dialogue: CommsDialogue) {
        let (message, replies) = dialogue.into_parts();
        self.enter(CommsState::ChannelOpen);
        self.set_message(message);
        self.reply_options = replies
            .into_iter()
            .map(|(id, text)| CommsReply { id, text })
            .collect();
    }

    /// Advance the delay; `true` once it has run out.
    fn count_down(&mut self, dt: f32) -> bool {
        self.opening_delay = (self.opening_delay - dt).max(0.0);
        self.opening_delay <= 0.0
    }
}

impl World {
    #[must_use]
    pub fn comms(&self, ship: Entity) -> Option<&CommsChannel> {
        self.player_ship(ship).map(|s| &s.comms)
    }

    /// Direct access for scripts: set messages and offer replies.
    pub fn comms_mut(&mut self, ship: Entity) -> Option<&mut CommsChannel> {
        self.player_ship_mut(ship).map(|s| &mut s.comms)
    }

    fn comms_transition(&mut self, ship: Entity, to: CommsState) {
        if let Some(comms) = self.comms_mut(ship) {
            let from = comms.state;
            comms.enter(to);
            debug!(%ship, ?from, ?to, "comms transition");
        }
    }

    /// If `counterpart` is a player ship whose channel points at `ship`.
    fn linked_player(&self, ship: Entity, counterpart: Option<Entity>) -> Option<(Entity, CommsState)> {
        let other = counterpart?;
        let comms = self.comms(other)?;
        (comms.target == Some(ship)).then_some((other, comms.state))
    }

    /// `ship` hails `object`. The hail resolves after
    /// `comms_channel_open_time`.
    ///
    /// Fails without touching the channel if an exchange is in progress or
    /// the object is gone. The opening message becomes the first sent line.
    pub fn hail_by_object(&mut self, ship: Entity, object: Entity, opening_message: &str) -> bool {
        if ship == object || !self.is_valid(object) {
            return false;
        }
        let delay = self.config().comms_channel_open_time;
        let name = self.call_sign(object).to_string();
        let Some(comms) = self.comms_mut(ship) else {
            return false;
        };
        if !comms.state.is_idle() {
            return false;
        }
        comms.start(CommsState::OpeningChannel, Some(object), name, delay);
        if !opening_message.is_empty() {
            comms.add_outgoing_message(opening_message);
        }
        info!(%ship, target = %object, "hailing");
        true
    }

    /// `from` hails the player ship `ship`, which has `hail_timeout` seconds
    /// to answer.
    pub fn receive_hail(&mut self, ship: Entity, from: Entity, message: &str) -> bool {
        if ship == from || !self.is_valid(from) {
            return false;
        }
        let timeout = self.config().hail_timeout;
        let name = self.call_sign(from).to_string();
        let Some(comms) = self.comms_mut(ship) else {
            return false;
        };
        if !comms.state.is_idle() {
            return false;
        }
        comms.start(CommsState::BeingHailed, Some(from), name, timeout);
        comms.set_message(message);
        info!(%ship, from = %from, "being hailed");
        true
    }

    /// The game master hails `ship` under the display name `name`.
    pub fn hail_comms_by_gm(&mut self, ship: Entity, name: &str) -> bool {
        let timeout = self.config().hail_timeout;
        let Some(comms) = self.comms_mut(ship) else {
            return false;
        };
        if !comms.state.is_idle() {
            return false;
        }
        comms.start(CommsState::BeingHailedByGM, None, name.to_string(), timeout);
        info!(%ship, name, "being hailed by GM");
        true
    }

    /// `from` opens a channel to `player` without a message.
    pub fn open_comms_to(&mut self, from: Entity, player: Entity) -> bool {
        self.receive_hail(player, from, "")
    }

    /// `from` sends `message` to `player`, hailing it if its comms are idle.
    /// The message is also written to the player's ship log.
    pub fn send_comms_message(&mut self, from: Entity, player: Entity, message: &str) -> bool {
        let delivered = self.send_comms_message_no_log(from, player, message);
        if delivered {
            self.add_to_ship_log_by(player, message, from);
        }
        delivered
    }

    /// [`World::send_comms_message`] without the ship log entry.
    pub fn send_comms_message_no_log(&mut self, from: Entity, player: Entity, message: &str) -> bool {
        if self.receive_hail(player, from, message) {
            return true;
        }
        let Some(comms) = self.comms_mut(player) else {
            return false;
        };
        let talking_to_sender = comms.target == Some(from)
            && matches!(comms.state, CommsState::BeingHailed | CommsState::ChannelOpen);
        if talking_to_sender {
            comms.add_incoming_message(message);
        }
        talking_to_sender
    }

    /// Run the target's comms script. `None` if it has none or refuses.
    fn open_scripted_dialogue(&mut self, ship: Entity, target: Entity) -> Option<CommsDialogue> {
        let script = self.object(target)?.comms_script.clone()?;
        let mut dialogue = CommsDialogue::default();
        script
            .open(self, ship, target, &mut dialogue)
            .then_some(dialogue)
    }

    /// Open a dialogue with a non-player object, or land on `refused`.
    fn open_object_channel(&mut self, ship: Entity, target: Entity, refused: CommsState) {
        if self.intercept_all_comms_to_gm() {
            self.comms_transition(ship, CommsState::ChannelOpenGM);
            return;
        }
        match self.open_scripted_dialogue(ship, target) {
            Some(dialogue) => {
                if let Some(comms) = self.comms_mut(ship) {
                    comms.open_dialogue(dialogue);
                }
                debug!(%ship, target = %target, "scripted comms open");
            }
            None => self.comms_transition(ship, refused),
        }
    }

    /// Answer an incoming hail. Returns `false` if nothing was being hailed.
    pub fn answer_comm_hail(&mut self, ship: Entity, accept: bool) -> bool {
        let Some(comms) = self.comms(ship) else {
            return false;
        };
        let target = comms.target;
        match (comms.state, accept) {
            (CommsState::BeingHailedByGM, true) => self.comms_transition(ship, CommsState::ChannelOpenGM),
            (CommsState::BeingHailedByGM, false) => self.comms_transition(ship, CommsState::ChannelClosed),
            (CommsState::BeingHailed, true) => self.accept_hail(ship, target),
            (CommsState::BeingHailed, false) => self.decline_hail(ship),
            _ => return false,
        }
        true
    }

    fn accept_hail(&mut self, ship: Entity, target: Option<Entity>) {
        let Some(target) = target.filter(|&t| self.is_valid(t)) else {
            self.comms_transition(ship, CommsState::ChannelClosed);
            return;
        };
        if self.player_ship(target).is_some() {
            if self.linked_player(ship, Some(target)) == Some((target, CommsState::OpeningChannel)) {
                self.comms_transition(ship, CommsState::ChannelOpenPlayer);
                self.comms_transition(target, CommsState::ChannelOpenPlayer);
                info!(%ship, other = %target, "player chat open");
            } else {
                self.comms_transition(ship, CommsState::ChannelClosed);
            }
            return;
        }
        self.open_object_channel(ship, target, CommsState::ChannelClosed);
    }

    fn decline_hail(&mut self, ship: Entity) {
        let target = self.comms(ship).and_then(CommsChannel::target);
        self.comms_transition(ship, CommsState::ChannelClosed);
        if let Some((other, CommsState::OpeningChannel)) = self.linked_player(ship, target) {
            self.comms_transition(other, CommsState::ChannelFailed);
        }
    }

    /// End the current exchange from this side.
    ///
    /// A player on the other end is closed too.
    pub fn close_comms(&mut self, ship: Entity) -> bool {
        let Some(comms) = self.comms(ship) else {
            return false;
        };
        if comms.state == CommsState::Inactive {
            return false;
        }
        let target = comms.target;
        self.comms_transition(ship, CommsState::ChannelClosed);
        if let Some((other, state)) = self.linked_player(ship, target)
            && !state.is_idle()
        {
            self.comms_transition(other, CommsState::ChannelClosed);
        }
        true
    }

    /// Hand the exchange over to the game master, keeping the displayed name.
    pub fn switch_comms_to_gm(&mut self, ship: Entity) -> bool {
        let Some(comms) = self.comms(ship) else {
            return false;
        };
        let to = match comms.state {
            CommsState::BeingHailed => CommsState::BeingHailedByGM,
            CommsState::ChannelOpen | CommsState::ChannelOpenPlayer | CommsState::ChannelOpenGM => {
                CommsState::ChannelOpenGM
            }
            _ => return false,
        };
        let target = comms.target;
        if let Some((other, state)) = self.linked_player(ship, target)
            && !state.is_idle()
        {
            self.comms_transition(other, CommsState::ChannelClosed);
        }
        if let Some(comms) = self.comms_mut(ship) {
            let delay = comms.opening_delay;
            comms.enter(to);
            comms.target = None;
            if to == CommsState::BeingHailedByGM {
                comms.opening_delay = delay;
            }
        }
        debug!(%ship, ?to, "comms switched to GM");
        true
    }

    /// Pick the reply at `index` of the scripted dialogue.
    pub fn select_comms_reply(&mut self, ship: Entity, index: usize) -> bool {
        let Some(comms) = self.comms_mut(ship) else {
            return false;
        };
        if comms.state != CommsState::ChannelOpen {
            return false;
        }
        let Some(reply) = comms.reply_options.get(index).cloned() else {
            return false;
        };
        let target = comms.target;
        comms.add_outgoing_message(&reply.text);
        comms.reply_options.clear();
        debug!(%ship, reply_id = reply.id, "comms reply selected");

        let Some(target) = target else {
            return true;
        };
        let Some(script) = self.object(target).and_then(|obj| obj.comms_script.clone()) else {
            return true;
        };
        let mut dialogue = CommsDialogue::default();
        script.reply(self, ship, target, reply.id, &mut dialogue);
        let (message, replies) = dialogue.into_parts();
        if let Some(comms) = self.comms_mut(ship)
            && comms.state == CommsState::ChannelOpen
        {
            if !message.is_empty() {
                comms.add_incoming_message(&message);
            }
            for (id, text) in replies {
                comms.add_reply(id, text);
            }
        }
        true
    }

    /// Send a free-text line on a player or GM chat.
    pub fn send_comms_chat(&mut self, ship: Entity, text: &str) -> bool {
        let Some(comms) = self.comms_mut(ship) else {
            return false;
        };
        let state = comms.state;
        let target = comms.target;
        match state {
            CommsState::ChannelOpenPlayer => {
                comms.add_outgoing_message(text);
                if let Some((other, CommsState::ChannelOpenPlayer)) = self.linked_player(ship, target)
                    && let Some(their) = self.comms_mut(other)
                {
                    their.add_incoming_message(text);
                }
                true
            }
            CommsState::ChannelOpenGM => {
                comms.add_outgoing_message(text);
                let call_sign = self.call_sign(ship).to_string();
                self.push_gm_message(GmMessage {
                    ship,
                    call_sign,
                    text: text.to_string(),
                });
                true
            }
            _ => false,
        }
    }

    /// The game master writes into an open GM chat.
    pub fn gm_send_message(&mut self, ship: Entity, text: &str) -> bool {
        match self.comms_mut(ship) {
            Some(comms) if comms.is_chat_open_to_gm() => {
                comms.add_incoming_message(text);
                true
            }
            _ => false,
        }
    }

    /// Advance hail timers and re-validate the other party.
    pub(crate) fn update_comms(&mut self, ship: Entity, dt: f32) {
        let Some(comms) = self.comms(ship) else {
            return;
        };
        let state = comms.state;
        let target = comms.target;
        let target_alive = target.is_some_and(|t| self.is_valid(t));
        match state {
            CommsState::OpeningChannel => {
                if self.comms_mut(ship).is_some_and(|c| c.count_down(dt)) {
                    self.resolve_opening(ship, target);
                }
            }
            CommsState::BeingHailed => {
                if !target_alive {
                    self.comms_transition(ship, CommsState::ChannelClosed);
                } else if self.comms_mut(ship).is_some_and(|c| c.count_down(dt)) {
                    debug!(%ship, "hail timed out");
                    self.decline_hail(ship);
                }
            }
            CommsState::BeingHailedByGM => {
                if self.comms_mut(ship).is_some_and(|c| c.count_down(dt)) {
                    self.comms_transition(ship, CommsState::ChannelClosed);
                }
            }
            CommsState::ChannelOpen | CommsState::ChannelOpenPlayer if !target_alive => {
                info!(%ship, "comms channel broken");
                self.comms_transition(ship, CommsState::ChannelBroken);
            }
            _ => {}
        }
    }

    fn resolve_opening(&mut self, ship: Entity, target: Option<Entity>) {
        let Some(target) = target.filter(|&t| self.is_valid(t)) else {
            self.comms_transition(ship, CommsState::ChannelFailed);
            return;
        };
        if let Some(theirs) = self.comms(target) {
            let (state, their_target) = (theirs.state, theirs.target);
            if state == CommsState::BeingHailed && their_target == Some(ship) {
                return;
            }
            if state.is_idle() {
                let timeout = self.config().hail_timeout;
                let name = self.call_sign(ship).to_string();
                if let Some(theirs) = self.comms_mut(target) {
                    theirs.start(CommsState::BeingHailed, Some(ship), name, timeout);
                }
                info!(%ship, target = %target, "hail reached player ship");
            } else {
                self.comms_transition(ship, CommsState::ChannelFailed);
            }
            return;
        }
        self.open_object_channel(ship, target, CommsState::ChannelFailed);
    }
}

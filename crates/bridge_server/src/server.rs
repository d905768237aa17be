//! NATS front end of the tick loop.
//!
//! A relay task decodes command payloads as they arrive and forwards them
//! over a channel; the tick task drains that channel at the start of every
//! tick, so commands apply in receipt order. After each tick the server
//! publishes, per player ship:
//!
//! - a [`StateEnvelope`] with the ship's snapshot on `.state`;
//! - the full custom-function catalog on `.custom` when it changed;
//! - any queued directives on `.directive`.

use bridge_component::Entity;
use bridge_net::subjects;
use bridge_net::sync::encode_custom_functions;
use bridge_net::{Command, NatsConnection, StateEnvelope};
use bridge_sim::{TickLoop, TickOutput};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Commands buffered between the relay and the tick task.
const COMMAND_QUEUE: usize = 4096;

pub struct Server {
    conn: NatsConnection,
    prefix: String,
    /// Changes on every start so clients drop stale projections.
    session: Uuid,
    tick_loop: TickLoop,
}

impl Server {
    pub fn new(conn: NatsConnection, prefix: String, tick_loop: TickLoop) -> Self {
        Self {
            conn,
            prefix,
            session: Uuid::new_v4(),
            tick_loop,
        }
    }

    /// Serve until Ctrl-C or the configured tick limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the command subscription cannot be set up.
    /// Publish failures are logged and do not stop the loop.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let subject = subjects::all_ship_commands(&self.prefix);
        let subscriber = self.conn.subscribe(subject.clone()).await?;
        info!(%subject, session = %self.session, "listening for ship commands");

        let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE);
        let relay = tokio::spawn(relay_commands(subscriber, self.prefix.clone(), tx));

        let config = self.tick_loop.config().clone();
        let tick_duration = config.tick_duration();
        let dt = tick_duration.as_secs_f64();
        let mut interval = time::interval(tick_duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!(
            tick_rate = config.tick_rate,
            max_ticks = config.max_ticks,
            "starting tick loop"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }

            while let Ok((ship, command)) = rx.try_recv() {
                self.tick_loop.submit(ship, command);
            }

            let output = self.tick_loop.tick(dt);
            let tick_id = output.tick_id;
            self.publish(output).await;

            if config.max_ticks > 0 && tick_id >= config.max_ticks {
                info!(ticks = tick_id, "tick loop complete");
                break;
            }
        }

        relay.abort();
        Ok(())
    }

    async fn publish(&mut self, output: TickOutput) {
        for message in self.tick_loop.world_mut().take_gm_messages() {
            info!(ship = %message.ship, call_sign = %message.call_sign, text = %message.text, "message for GM");
        }

        for snapshot in self.tick_loop.snapshots() {
            let ship = snapshot.ship;
            let envelope = StateEnvelope {
                session: self.session,
                tick_id: output.tick_id,
                ship,
                body: snapshot,
            };
            if let Err(e) = self.conn.publish(subjects::ship_state(&self.prefix, ship), &envelope).await {
                warn!(%ship, error = %e, "failed to publish state");
            }
        }

        for (ship, entries) in output.custom_updates {
            debug!(%ship, entries = entries.len(), "custom functions changed");
            let payload = encode_custom_functions(&entries);
            if let Err(e) = self.conn.publish_bytes(subjects::ship_custom(&self.prefix, ship), payload).await {
                warn!(%ship, error = %e, "failed to publish custom functions");
            }
        }

        for (ship, directive) in output.directives {
            if let Err(e) = self
                .conn
                .publish_bytes(subjects::ship_directive(&self.prefix, ship), directive.encode())
                .await
            {
                warn!(%ship, error = %e, "failed to publish directive");
            }
        }
    }
}

/// Forward decoded commands to the tick task until either side closes.
async fn relay_commands(
    mut subscriber: async_nats::Subscriber,
    prefix: String,
    tx: mpsc::Sender<(Entity, Command)>,
) {
    while let Some(message) = subscriber.next().await {
        let Some(routed) = route_command(&prefix, message.subject.as_str(), &message.payload) else {
            continue;
        };
        if tx.send(routed).await.is_err() {
            break;
        }
    }
    debug!("command relay stopped");
}

/// Resolve the ship from the subject and decode the payload.
///
/// Malformed commands are logged and dropped; the sender gets no reply.
fn route_command(prefix: &str, subject: &str, payload: &[u8]) -> Option<(Entity, Command)> {
    let Some(ship) = subjects::parse_command_subject(prefix, subject) else {
        warn!(subject, "command on unexpected subject");
        return None;
    };
    match Command::decode(payload) {
        Ok(command) => Some((ship, command)),
        Err(e) => {
            warn!(%ship, error = %e, bytes = payload.len(), "malformed command");
            None
        }
    }
}

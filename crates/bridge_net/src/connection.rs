//! NATS connection management.
//!
//! Provides a thin wrapper around `async-nats` with the publish and subscribe
//! helpers the server uses.

use tracing::info;

use crate::error::NetError;

/// Default NATS server URL.
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// A wrapper around an `async-nats` client.
#[derive(Debug, Clone)]
pub struct NatsConnection {
    client: async_nats::Client,
}

impl NatsConnection {
    /// Connect to NATS at the specified URL.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Connect`] if the connection cannot be established.
    pub async fn connect_to(url: &str) -> Result<Self, NetError> {
        info!(url, "connecting to NATS");
        let client = async_nats::connect(url).await?;
        info!("NATS connection established");
        Ok(Self { client })
    }

    /// Publish raw bytes to a subject.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Publish`] if publishing fails.
    pub async fn publish_bytes(&self, subject: String, payload: Vec<u8>) -> Result<(), NetError> {
        self.client.publish(subject, payload.into()).await?;
        Ok(())
    }

    /// Publish a MessagePack-encoded message to a subject.
    ///
    /// # Errors
    ///
    /// Returns [`NetError`] if encoding or publishing fails.
    pub async fn publish<T: serde::Serialize>(&self, subject: String, message: &T) -> Result<(), NetError> {
        let payload = crate::codec::encode(message)?;
        self.publish_bytes(subject, payload).await
    }

    /// Subscribe to a subject.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Subscribe`] if the subscription fails.
    pub async fn subscribe(&self, subject: String) -> Result<async_nats::Subscriber, NetError> {
        let sub = self.client.subscribe(subject).await?;
        Ok(sub)
    }
}

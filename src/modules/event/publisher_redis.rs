use deadpool_redis::redis::AsyncCommands;

use crate::{
    api::error,
    modules::event::{publisher::EventPublisher, schema::DomainEvent},
};

/// Publishes domain events as JSON on a Redis pub/sub channel consumed by the
/// notification service.
#[derive(Clone)]
pub struct RedisEventPublisher {
    pool: deadpool_redis::Pool,
    channel: String,
}

impl RedisEventPublisher {
    pub fn new(pool: deadpool_redis::Pool, channel: impl Into<String>) -> Self {
        Self { pool, channel: channel.into() }
    }
}

#[async_trait::async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), error::SystemError> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.pool.get().await?;

        let receivers: i64 = conn.publish(&self.channel, payload).await?;
        log::debug!(
            "Event {} ({:?}) delivered to {} subscriber(s) on {}",
            event.event_id,
            event.kind,
            receivers,
            self.channel
        );

        Ok(())
    }
}

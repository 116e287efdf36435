use crate::{api::error, modules::event::schema::DomainEvent};

#[async_trait::async_trait]
pub trait EventPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), error::SystemError>;
}

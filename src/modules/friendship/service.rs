use log::{error, info};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    api::error,
    modules::{
        event::{publisher::EventPublisher, schema::DomainEvent},
        friendship::{
            model::{FriendshipDto, FriendshipKey, FriendshipResponse},
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::{model::UserDetails, repository::UserRepository, schema::UserEntity},
    },
};

/// Compare-and-set attempts before a contended status update gives up.
const MAX_UPDATE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct FriendshipService<R, U, P>
where
    R: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    friendship_repo: Arc<R>,
    user_repo: Arc<U>,
    publisher: Arc<P>,
}

impl<R, U, P> FriendshipService<R, U, P>
where
    R: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    pub fn with_dependencies(
        friendship_repo: Arc<R>,
        user_repo: Arc<U>,
        publisher: Arc<P>,
    ) -> Self {
        info!("FriendshipService initialized with dependencies");
        FriendshipService { friendship_repo, user_repo, publisher }
    }

    async fn find_user(&self, id: i64) -> Result<UserEntity, error::SystemError> {
        self.user_repo.find_by_id(id).await?.ok_or_else(|| error::SystemError::user_not_found(id))
    }

    async fn find_friendship(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<FriendshipEntity, error::SystemError> {
        self.friendship_repo
            .find_by_ordered_pair(requester_id, addressee_id)
            .await?
            .ok_or_else(|| error::SystemError::friendship_not_found(requester_id, addressee_id))
    }

    pub async fn friendship_exists(
        &self,
        user_id_a: i64,
        user_id_b: i64,
    ) -> Result<bool, error::SystemError> {
        self.friendship_repo.exists_by_pair(user_id_a, user_id_b).await
    }

    pub async fn register_friendship(
        &self,
        key: FriendshipKey,
    ) -> Result<FriendshipResponse, error::SystemError> {
        let FriendshipKey { requester_id, addressee_id } = key;

        let (requester, _addressee) =
            tokio::try_join!(self.find_user(requester_id), self.find_user(addressee_id))?;

        if requester_id == addressee_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if self.friendship_exists(requester_id, addressee_id).await? {
            return Err(error::SystemError::duplicate_friendship(requester_id, addressee_id));
        }

        // The unique pair index decides races between opposite-direction requests.
        let friendship = self
            .friendship_repo
            .create(requester_id, addressee_id, FriendshipStatus::Requested)
            .await
            .map_err(|e| match e {
                error::SystemError::Conflict(_) => {
                    error::SystemError::duplicate_friendship(requester_id, addressee_id)
                }
                other => other,
            })?;
        info!("Registered friendship: {} -> {}", requester_id, addressee_id);

        self.publish(DomainEvent::friend_requested(UserDetails::from(requester), addressee_id))
            .await;

        Ok(FriendshipResponse::from(friendship))
    }

    pub async fn remove_friendship(&self, key: FriendshipKey) -> Result<(), error::SystemError> {
        let FriendshipKey { requester_id, addressee_id } = key;

        self.find_friendship(requester_id, addressee_id).await?;

        if !self.friendship_repo.delete(requester_id, addressee_id).await? {
            return Err(error::SystemError::friendship_not_found(requester_id, addressee_id));
        }
        info!("Removed friendship: {} -> {}", requester_id, addressee_id);

        Ok(())
    }

    pub async fn update_friendship(
        &self,
        dto: FriendshipDto,
    ) -> Result<FriendshipResponse, error::SystemError> {
        let FriendshipDto { requester_id, addressee_id, status } = dto;

        let mut current = self.find_friendship(requester_id, addressee_id).await?;

        let addressee = if status == FriendshipStatus::Accepted {
            Some(self.find_user(addressee_id).await?)
        } else {
            None
        };

        let mut updated = None;
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            if !current.status.can_transition_to(status) {
                return Err(error::SystemError::invalid_status_change(requester_id, addressee_id));
            }

            match self
                .friendship_repo
                .update_status(requester_id, addressee_id, current.status, status)
                .await?
            {
                Some(friendship) => {
                    updated = Some(friendship);
                    break;
                }
                // Changed or removed since it was read; validate against the stored row again.
                None => current = self.find_friendship(requester_id, addressee_id).await?,
            }
        }

        let updated = updated
            .ok_or_else(|| error::SystemError::invalid_status_change(requester_id, addressee_id))?;
        info!(
            "Friendship was updated to {:?}: {} -> {}",
            updated.status, requester_id, addressee_id
        );

        if let Some(addressee) = addressee {
            self.publish(DomainEvent::friend_request_accepted(
                requester_id,
                UserDetails::from(addressee),
            ))
            .await;
        }

        Ok(FriendshipResponse::from(updated))
    }

    pub async fn find_friends_of(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserDetails>, error::SystemError> {
        self.find_all_friendships_with_status(user_id, FriendshipStatus::Accepted).await
    }

    /// Counterparts of every friendship of `user_id` in the given status,
    /// whichever side initiated it.
    pub async fn find_all_friendships_with_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<UserDetails>, error::SystemError> {
        self.find_user(user_id).await?;

        let friendships =
            self.friendship_repo.find_all_by_user_and_status(user_id, status).await?;

        let ids: Vec<i64> = friendships
            .iter()
            .map(|f| f.other_participant(user_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(UserDetails::from).collect())
    }

    pub async fn get_friends_count(&self, user_id: i64) -> Result<i64, error::SystemError> {
        self.find_user(user_id).await?;
        self.friendship_repo.count_by_user_and_status(user_id, FriendshipStatus::Accepted).await
    }

    async fn publish(&self, event: DomainEvent) {
        info!("Publishing {:?} for friendship {}", event.kind, event.aggregate_id);
        if let Err(e) = self.publisher.publish(&event).await {
            error!("Failed to publish {:?} event {}: {}", event.kind, event.event_id, e);
        }
    }
}

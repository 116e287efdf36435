use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    api::error,
    modules::{
        event::{publisher::EventPublisher, schema::DomainEvent},
        friendship::{
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus, canonical_pair},
        },
        user::{repository::UserRepository, schema::UserEntity},
    },
};

pub fn user(id: i64, nickname: &str) -> UserEntity {
    let now = chrono::Utc::now();
    UserEntity {
        id,
        nickname: nickname.to_string(),
        email: format!("{nickname}@cwm.test"),
        name: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i64, UserEntity>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: Vec<UserEntity>) -> Self {
        Self { users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()) }
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = self.users.lock().unwrap();
        let mut found: Vec<UserEntity> =
            ids.iter().filter_map(|id| users.get(id).cloned()).collect();
        found.sort_by_key(|u| u.id);
        Ok(found)
    }
}

/// Rows are keyed by the canonical pair, mirroring the unique pair index.
#[derive(Default)]
pub struct InMemoryFriendshipRepository {
    rows: Mutex<HashMap<(i64, i64), FriendshipEntity>>,
    blind_existence_check: bool,
}

impl InMemoryFriendshipRepository {
    /// `exists_by_pair` always answers false, so only the write-time
    /// constraint can catch duplicates.
    pub fn racing() -> Self {
        Self { blind_existence_check: true, ..Default::default() }
    }

    pub fn insert(&self, requester_id: i64, addressee_id: i64, status: FriendshipStatus) {
        let now = chrono::Utc::now();
        self.rows.lock().unwrap().insert(
            canonical_pair(requester_id, addressee_id),
            FriendshipEntity {
                requester_id,
                addressee_id,
                status,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn status_of(&self, requester_id: i64, addressee_id: i64) -> Option<FriendshipStatus> {
        self.rows
            .lock()
            .unwrap()
            .get(&canonical_pair(requester_id, addressee_id))
            .filter(|f| f.requester_id == requester_id && f.addressee_id == addressee_id)
            .map(|f| f.status)
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn exists_by_pair(
        &self,
        user_id_a: i64,
        user_id_b: i64,
    ) -> Result<bool, error::SystemError> {
        if self.blind_existence_check {
            return Ok(false);
        }
        Ok(self.rows.lock().unwrap().contains_key(&canonical_pair(user_id_a, user_id_b)))
    }

    async fn find_by_ordered_pair(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&canonical_pair(requester_id, addressee_id))
            .filter(|f| f.requester_id == requester_id && f.addressee_id == addressee_id)
            .cloned())
    }

    async fn find_all_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.status == status)
            .filter(|f| f.requester_id == user_id || f.addressee_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<i64, error::SystemError> {
        let found = self.find_all_by_user_and_status(user_id, status).await?;
        Ok(found.len() as i64)
    }

    async fn create(
        &self,
        requester_id: i64,
        addressee_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let key = canonical_pair(requester_id, addressee_id);
        if rows.contains_key(&key) {
            return Err(error::SystemError::Conflict(None));
        }

        let now = chrono::Utc::now();
        let friendship = FriendshipEntity {
            requester_id,
            addressee_id,
            status,
            created_at: now,
            updated_at: now,
        };
        rows.insert(key, friendship.clone());
        Ok(friendship)
    }

    async fn update_status(
        &self,
        requester_id: i64,
        addressee_id: i64,
        from: FriendshipStatus,
        to: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(friendship) = rows
            .get_mut(&canonical_pair(requester_id, addressee_id))
            .filter(|f| f.requester_id == requester_id && f.addressee_id == addressee_id)
            .filter(|f| f.status == from)
        else {
            return Ok(None);
        };

        friendship.status = to;
        friendship.updated_at = chrono::Utc::now();
        Ok(Some(friendship.clone()))
    }

    async fn delete(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let key = canonical_pair(requester_id, addressee_id);
        let matches = rows
            .get(&key)
            .is_some_and(|f| f.requester_id == requester_id && f.addressee_id == addressee_id);
        if matches {
            rows.remove(&key);
        }
        Ok(matches)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Interference {
    /// Another writer moves the row to this status ahead of the first write.
    MoveTo(FriendshipStatus),
    /// Another writer deletes the row ahead of the first write.
    Delete,
    /// Every write loses to another writer.
    Always,
}

/// Store whose status compare-and-set loses to a concurrent writer.
pub struct ContendedFriendshipRepository {
    inner: InMemoryFriendshipRepository,
    interference: Interference,
    attempts: AtomicUsize,
}

impl ContendedFriendshipRepository {
    pub fn new(inner: InMemoryFriendshipRepository, interference: Interference) -> Self {
        Self { inner, interference, attempts: AtomicUsize::new(0) }
    }

    pub fn inner(&self) -> &InMemoryFriendshipRepository {
        &self.inner
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for ContendedFriendshipRepository {
    async fn exists_by_pair(
        &self,
        user_id_a: i64,
        user_id_b: i64,
    ) -> Result<bool, error::SystemError> {
        self.inner.exists_by_pair(user_id_a, user_id_b).await
    }

    async fn find_by_ordered_pair(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        self.inner.find_by_ordered_pair(requester_id, addressee_id).await
    }

    async fn find_all_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        self.inner.find_all_by_user_and_status(user_id, status).await
    }

    async fn count_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<i64, error::SystemError> {
        self.inner.count_by_user_and_status(user_id, status).await
    }

    async fn create(
        &self,
        requester_id: i64,
        addressee_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipEntity, error::SystemError> {
        self.inner.create(requester_id, addressee_id, status).await
    }

    async fn update_status(
        &self,
        requester_id: i64,
        addressee_id: i64,
        from: FriendshipStatus,
        to: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        match self.interference {
            Interference::Always => Ok(None),
            _ if attempt > 0 => {
                self.inner.update_status(requester_id, addressee_id, from, to).await
            }
            Interference::MoveTo(status) => {
                self.inner.insert(requester_id, addressee_id, status);
                Ok(None)
            }
            Interference::Delete => {
                self.inner.delete(requester_id, addressee_id).await?;
                Ok(None)
            }
        }
    }

    async fn delete(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<bool, error::SystemError> {
        self.inner.delete(requester_id, addressee_id).await
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), error::SystemError> {
        if self.fail {
            return Err(error::SystemError::InternalError("event bus unavailable".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_all_by_user_and_status_matches_either_side() {
        let repo = InMemoryFriendshipRepository::default();
        repo.insert(1, 2, FriendshipStatus::Accepted);
        repo.insert(2, 3, FriendshipStatus::Accepted);
        repo.insert(4, 1, FriendshipStatus::Accepted);

        let found = repo.find_all_by_user_and_status(1, FriendshipStatus::Accepted).await.unwrap();
        assert_eq!(found.len(), 2);

        let none = repo.find_all_by_user_and_status(1, FriendshipStatus::Requested).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn find_by_ordered_pair_respects_direction() {
        let repo = InMemoryFriendshipRepository::default();
        repo.insert(1, 2, FriendshipStatus::Accepted);

        assert!(repo.find_by_ordered_pair(1, 2).await.unwrap().is_some());
        assert!(repo.find_by_ordered_pair(2, 1).await.unwrap().is_none());
        assert!(repo.exists_by_pair(2, 1).await.unwrap());
        assert!(repo.find_by_ordered_pair(1, 100).await.unwrap().is_none());
    }
}

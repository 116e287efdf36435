use crate::api::error;
use crate::modules::friendship::schema::{FriendshipEntity, FriendshipStatus};

#[async_trait::async_trait]
pub trait FriendshipRepository {
    /// True if a friendship exists between the two users in either direction.
    async fn exists_by_pair(
        &self,
        user_id_a: i64,
        user_id_b: i64,
    ) -> Result<bool, error::SystemError>;

    async fn find_by_ordered_pair(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_all_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn count_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<i64, error::SystemError>;

    /// Fails with `SystemError::Conflict` if the unordered pair is already taken.
    async fn create(
        &self,
        requester_id: i64,
        addressee_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipEntity, error::SystemError>;

    /// Sets `to` only while the stored status is still `from`; `None` otherwise.
    async fn update_status(
        &self,
        requester_id: i64,
        addressee_id: i64,
        from: FriendshipStatus,
        to: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn delete(&self, requester_id: i64, addressee_id: i64)
    -> Result<bool, error::SystemError>;
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::friendship::schema::{FriendshipEntity, FriendshipStatus};

/// Identifies a friendship by its exact (requester, addressee) ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipKey {
    #[validate(range(min = 1, message = "Requester id must be positive"))]
    pub requester_id: i64,
    #[validate(range(min = 1, message = "Addressee id must be positive"))]
    pub addressee_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipDto {
    #[validate(range(min = 1, message = "Requester id must be positive"))]
    pub requester_id: i64,
    #[validate(range(min = 1, message = "Addressee id must be positive"))]
    pub addressee_id: i64,
    pub status: FriendshipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendshipEntity> for FriendshipResponse {
    fn from(entity: FriendshipEntity) -> Self {
        FriendshipResponse {
            requester_id: entity.requester_id,
            addressee_id: entity.addressee_id,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

fn default_status() -> FriendshipStatus {
    FriendshipStatus::Accepted
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusQuery {
    #[serde(default = "default_status")]
    pub status: FriendshipStatus,
}

#[derive(Debug, Serialize)]
pub struct FriendsCountResponse {
    pub count: i64,
}

use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FriendshipStatus {
    Requested,
    Accepted,
    Declined,
    Blocked,
}

impl FriendshipStatus {
    /// A pending request may move anywhere, an accepted friendship may only be
    /// blocked, and declined or blocked friendships are final.
    pub fn can_transition_to(self, next: FriendshipStatus) -> bool {
        match self {
            FriendshipStatus::Requested => true,
            FriendshipStatus::Accepted => next == FriendshipStatus::Blocked,
            FriendshipStatus::Declined | FriendshipStatus::Blocked => false,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FriendshipEntity {
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipEntity {
    pub fn other_participant(&self, user_id: i64) -> i64 {
        if self.requester_id == user_id { self.addressee_id } else { self.requester_id }
    }
}

/// Orders two user ids so that `{a, b}` and `{b, a}` share one key.
pub fn canonical_pair(user_id_a: i64, user_id_b: i64) -> (i64, i64) {
    if user_id_a <= user_id_b { (user_id_a, user_id_b) } else { (user_id_b, user_id_a) }
}

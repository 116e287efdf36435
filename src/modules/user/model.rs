use serde::{Deserialize, Serialize};

use crate::modules::user::schema::UserEntity;

/// Public details of a user, as carried in friend listings and domain events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<UserEntity> for UserDetails {
    fn from(user: UserEntity) -> Self {
        UserDetails { id: user.id, nickname: user.nickname, email: user.email, name: user.name }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            nickname: entity.nickname,
            email: entity.email,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}

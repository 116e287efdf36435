use log::{info, warn};
use std::sync::Arc;

use crate::api::error;
use crate::configs::RedisCache;
use crate::constants::USER_CACHE_TTL;
use crate::modules::user::{model::UserResponse, repository::UserRepository};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    /// Cache failures are not fatal: the repository stays the source of truth.
    pub async fn get_by_id(&self, id: i64) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        match self.cache.get::<UserResponse>(&key).await {
            Ok(Some(cached_user)) => {
                info!("User {} found in cache", id);
                return Ok(cached_user);
            }
            Ok(None) => {}
            Err(e) => warn!("User cache read failed for {}: {}", key, e),
        }

        let entity =
            self.repo.find_by_id(id).await?.ok_or_else(|| error::SystemError::user_not_found(id))?;
        let user = UserResponse::from(entity);

        match self.cache.set(&key, &user, USER_CACHE_TTL).await {
            Ok(()) => info!("User {} cached", id),
            Err(e) => warn!("User cache write failed for {}: {}", key, e),
        }

        Ok(user)
    }
}

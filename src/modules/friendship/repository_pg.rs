use crate::{
    api::error,
    modules::friendship::{
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus, canonical_pair},
    },
};

#[derive(Clone)]
pub struct FriendshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryPg {
    async fn exists_by_pair(
        &self,
        user_id_a: i64,
        user_id_b: i64,
    ) -> Result<bool, error::SystemError> {
        let (low, high) = canonical_pair(user_id_a, user_id_b);

        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM friendships
                WHERE LEAST(requester_id, addressee_id) = $1
                  AND GREATEST(requester_id, addressee_id) = $2
            )
            "#,
        )
        .bind(low)
        .bind(high)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_ordered_pair(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            "SELECT * FROM friendships WHERE requester_id = $1 AND addressee_id = $2",
        )
        .bind(requester_id)
        .bind(addressee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_all_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let friendships = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE (requester_id = $1 OR addressee_id = $1)
              AND status = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    async fn count_by_user_and_status(
        &self,
        user_id: i64,
        status: FriendshipStatus,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM friendships
            WHERE (requester_id = $1 OR addressee_id = $1)
              AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(
        &self,
        requester_id: i64,
        addressee_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (requester_id, addressee_id, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(addressee_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn update_status(
        &self,
        requester_id: i64,
        addressee_id: i64,
        from: FriendshipStatus,
        to: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $4, updated_at = NOW()
            WHERE requester_id = $1
              AND addressee_id = $2
              AND status = $3
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(addressee_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<bool, error::SystemError> {
        let rows =
            sqlx::query("DELETE FROM friendships WHERE requester_id = $1 AND addressee_id = $2")
                .bind(requester_id)
                .bind(addressee_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows > 0)
    }
}

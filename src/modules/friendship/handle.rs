use actix_web::{delete, get, post, put, web};

use crate::{
    api::{error, success},
    modules::{
        event::publisher_redis::RedisEventPublisher,
        friendship::{
            model::{
                FriendsCountResponse, FriendshipDto, FriendshipKey, FriendshipResponse, StatusQuery,
            },
            repository_pg::FriendshipRepositoryPg,
            schema::FriendshipStatus,
            service::FriendshipService,
        },
        user::{model::UserDetails, repository_pg::UserRepositoryPg},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendshipSvc =
    FriendshipService<FriendshipRepositoryPg, UserRepositoryPg, RedisEventPublisher>;

#[post("")]
pub async fn register_friendship(
    friendship_service: web::Data<FriendshipSvc>,
    body: ValidatedJson<FriendshipKey>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let friendship = friendship_service.register_friendship(body.0).await?;
    Ok(success::Success::created(Some(friendship)).message("Friend request sent successfully"))
}

#[put("")]
pub async fn update_friendship(
    friendship_service: web::Data<FriendshipSvc>,
    body: ValidatedJson<FriendshipDto>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let friendship = friendship_service.update_friendship(body.0).await?;
    Ok(success::Success::ok(Some(friendship)).message("Friendship updated successfully"))
}

#[delete("")]
pub async fn remove_friendship(
    friendship_service: web::Data<FriendshipSvc>,
    body: ValidatedJson<FriendshipKey>,
) -> Result<success::Success<()>, error::Error> {
    friendship_service.remove_friendship(body.0).await?;
    Ok(success::Success::no_content())
}

#[get("/{user_id}")]
pub async fn list_friendships(
    friendship_service: web::Data<FriendshipSvc>,
    user_id: web::Path<i64>,
    query: ValidatedQuery<StatusQuery>,
) -> Result<success::Success<Vec<UserDetails>>, error::Error> {
    let user_id = user_id.into_inner();
    let users = match query.0.status {
        FriendshipStatus::Accepted => friendship_service.find_friends_of(user_id).await?,
        status => friendship_service.find_all_friendships_with_status(user_id, status).await?,
    };
    Ok(success::Success::ok(Some(users)).message("Friends retrieved successfully"))
}

#[get("/{user_id}/count")]
pub async fn count_friends(
    friendship_service: web::Data<FriendshipSvc>,
    user_id: web::Path<i64>,
) -> Result<success::Success<FriendsCountResponse>, error::Error> {
    let count = friendship_service.get_friends_count(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(FriendsCountResponse { count })))
}

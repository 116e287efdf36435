use actix_web::{self, App, HttpServer, middleware::Logger, web};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database, redis_pool, run_migrations},
    modules::{
        event::publisher_redis::RedisEventPublisher,
        friendship::{repository_pg::FriendshipRepositoryPg, service::FriendshipService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    run_migrations(&db_pool).await.map_err(|_| std::io::Error::other("Database migration error"))?;

    let redis_pool = redis_pool().map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = UserRepositoryPg::new(db_pool.clone());
    let friendship_repo = FriendshipRepositoryPg::new(db_pool.clone());
    let publisher = RedisEventPublisher::new(redis_pool.clone(), ENV.events_channel.as_str());

    let user_service = UserService::with_dependencies(
        Arc::new(user_repo.clone()),
        Arc::new(RedisCache::new(redis_pool)),
    );
    let friendship_service = FriendshipService::with_dependencies(
        Arc::new(friendship_repo),
        Arc::new(user_repo),
        Arc::new(publisher),
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friendship_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::configure)
                    .configure(modules::friendship::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}

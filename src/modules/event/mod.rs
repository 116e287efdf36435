pub mod publisher;
pub mod publisher_redis;
pub mod schema;

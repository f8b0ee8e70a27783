//! Redis connection pool management.

use redis::aio::ConnectionManager;
use thiserror::Error;

/// Fallback used when neither configuration nor `REDIS_URL` name a server.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Redis error types.
#[derive(Error, Debug)]
pub enum RedisError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for Redis operations.
pub type RedisResult<T> = Result<T, RedisError>;

/// Redis connection pool. `ConnectionManager` multiplexes internally and is
/// cheap to clone, so every query clones it for a mutable handle.
pub type RedisPool = ConnectionManager;

/// Initialize a Redis connection pool from a URL.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn init_pool(redis_url: &str) -> RedisResult<RedisPool> {
    tracing::debug!(url = %redis_url, "Connecting to Redis");
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}

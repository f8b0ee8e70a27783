//! Questionnaire response queries.
//!
//! The aggregate itself is opaque to this layer: it arrives as a JSON
//! document and is stored next to a separately addressable `status` field so
//! that status can be updated without rewriting the document.

use std::collections::HashMap;

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

const ALL_RESPONSES_KEY: &str = "intake:responses:all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub client_id: String,
    pub status: String,
    pub data: String,
    pub updated_at: String,
}

pub fn response_key(client_id: &str) -> String {
    format!("intake:response:{}", client_id)
}

/// Build a row from the hash fields of a response key. Returns `None` when
/// the document itself is missing.
pub fn row_from_fields(client_id: &str, mut fields: HashMap<String, String>) -> Option<ResponseRow> {
    let data = fields.remove("data")?;
    Some(ResponseRow {
        client_id: client_id.to_string(),
        status: fields.remove("status").unwrap_or_else(|| "not_started".to_string()),
        data,
        updated_at: fields.remove("updated_at").unwrap_or_default(),
    })
}

/// Overwrite the stored response for a client.
pub async fn save_response(pool: &RedisPool, row: &ResponseRow) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = response_key(&row.client_id);
    conn.hset_multiple::<_, _, _, ()>(
        &key,
        &[
            ("data", row.data.as_str()),
            ("status", row.status.as_str()),
            ("updated_at", row.updated_at.as_str()),
        ],
    )
    .await?;

    let score = chrono::Utc::now().timestamp();
    conn.zadd::<_, _, _, ()>(ALL_RESPONSES_KEY, &row.client_id, score).await?;
    Ok(())
}

pub async fn get_response(pool: &RedisPool, client_id: &str) -> RedisResult<Option<ResponseRow>> {
    let mut conn = pool.clone();
    let fields: HashMap<String, String> = conn.hgetall(response_key(client_id)).await?;
    Ok(row_from_fields(client_id, fields))
}

/// Update only the status field of an existing response.
pub async fn set_response_status(pool: &RedisPool, client_id: &str, status: &str) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = response_key(client_id);
    let exists: bool = conn.hexists(&key, "data").await?;
    if !exists {
        return Err(RedisError::NotFound(format!("Response not found: {}", client_id)));
    }
    let now = chrono::Utc::now().to_rfc3339();
    conn.hset_multiple::<_, _, _, ()>(&key, &[("status", status), ("updated_at", now.as_str())])
        .await?;
    Ok(())
}

/// List all stored responses, least recently updated first.
pub async fn list_responses(pool: &RedisPool) -> RedisResult<Vec<ResponseRow>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(ALL_RESPONSES_KEY, 0, -1).await?;
    let mut rows = Vec::new();
    for id in ids {
        if let Some(row) = get_response(pool, &id).await? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Delete a client's response. Returns whether anything was removed.
pub async fn delete_response(pool: &RedisPool, client_id: &str) -> RedisResult<bool> {
    let mut conn = pool.clone();
    let removed: i64 = conn.del(response_key(client_id)).await?;
    conn.zrem::<_, _, ()>(ALL_RESPONSES_KEY, client_id).await?;
    Ok(removed > 0)
}

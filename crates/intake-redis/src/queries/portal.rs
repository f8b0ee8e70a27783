//! Client portal access queries.

use crate::client::{RedisError, RedisPool, RedisResult};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

const ALL_PORTALS_KEY: &str = "intake:portals:all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalRow {
    pub id: String,
    pub lead_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub image_url: Option<String>,
    pub case_type: String,
    pub status: String,
    pub questionnaire_status: String,
    #[serde(default)]
    pub birth_info: Option<BirthInfoRow>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfoRow {
    pub date_of_birth: Option<String>,
    pub country_of_birth: Option<String>,
    pub citizenship: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub preferred_language: Option<String>,
}

pub fn portal_key(id: &str) -> String {
    format!("intake:portal:{}", id)
}

/// Insert or overwrite a portal access record.
pub async fn save_portal(pool: &RedisPool, row: &PortalRow) -> RedisResult<()> {
    let mut conn = pool.clone();
    let key = portal_key(&row.id);
    let json = serde_json::to_string(row)?;
    conn.hset::<_, _, _, ()>(&key, "data", &json).await?;
    conn.hset::<_, _, _, ()>(&key, "questionnaire_status", &row.questionnaire_status).await?;

    let score = chrono::DateTime::parse_from_rfc3339(&row.created_at)
        .map(|t| t.timestamp())
        .unwrap_or_else(|_| chrono::Utc::now().timestamp());
    conn.zadd::<_, _, _, ()>(ALL_PORTALS_KEY, &row.id, score).await?;
    Ok(())
}

pub async fn find_portal(pool: &RedisPool, id: &str) -> RedisResult<Option<PortalRow>> {
    let mut conn = pool.clone();
    let json: Option<String> = conn.hget(portal_key(id), "data").await?;
    match json {
        Some(j) => Ok(Some(serde_json::from_str(&j)?)),
        None => Ok(None),
    }
}

pub async fn get_portal(pool: &RedisPool, id: &str) -> RedisResult<PortalRow> {
    find_portal(pool, id)
        .await?
        .ok_or_else(|| RedisError::NotFound(format!("Portal access not found: {}", id)))
}

/// List all portal records in creation order. Undecodable records are skipped.
pub async fn list_portals(pool: &RedisPool) -> RedisResult<Vec<PortalRow>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(ALL_PORTALS_KEY, 0, -1).await?;
    let mut rows = Vec::new();
    for id in ids {
        let mut c = pool.clone();
        let json: Option<String> = c.hget(portal_key(&id), "data").await?;
        if let Some(j) = json {
            match serde_json::from_str::<PortalRow>(&j) {
                Ok(row) => rows.push(row),
                Err(e) => tracing::warn!(portal_id = %id, error = %e, "Skipping undecodable portal record"),
            }
        }
    }
    Ok(rows)
}

pub async fn find_portal_by_lead(pool: &RedisPool, lead_id: &str) -> RedisResult<Option<PortalRow>> {
    let rows = list_portals(pool).await?;
    Ok(rows.into_iter().find(|r| r.lead_id.as_deref() == Some(lead_id)))
}

pub async fn find_portal_by_email(pool: &RedisPool, email: &str) -> RedisResult<Option<PortalRow>> {
    let rows = list_portals(pool).await?;
    Ok(rows
        .into_iter()
        .find(|r| !r.email.is_empty() && r.email.eq_ignore_ascii_case(email)))
}

/// Update the questionnaire status of a portal record.
///
/// Returns `false` when no record exists for the id.
pub async fn set_questionnaire_status(pool: &RedisPool, id: &str, status: &str) -> RedisResult<bool> {
    let Some(mut row) = find_portal(pool, id).await? else {
        return Ok(false);
    };
    row.questionnaire_status = status.to_string();
    row.updated_at = chrono::Utc::now().to_rfc3339();
    save_portal(pool, &row).await?;
    Ok(true)
}

pub async fn set_portal_status(pool: &RedisPool, id: &str, status: &str) -> RedisResult<()> {
    let mut row = get_portal(pool, id).await?;
    row.status = status.to_string();
    row.updated_at = chrono::Utc::now().to_rfc3339();
    save_portal(pool, &row).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_key() {
        assert_eq!(portal_key("p-1"), "intake:portal:p-1");
    }

    #[test]
    fn test_row_without_birth_info_deserializes() {
        let json = r#"{
            "id": "p-1",
            "lead_id": null,
            "first_name": "Ana",
            "last_name": "Lopez",
            "email": "",
            "phone": "",
            "image_url": null,
            "case_type": "asylum",
            "status": "pending",
            "questionnaire_status": "not_started",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }"#;
        let row: PortalRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.first_name, "Ana");
        assert!(row.birth_info.is_none());
    }
}

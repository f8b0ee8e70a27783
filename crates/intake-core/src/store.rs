//! Persistence gateway for questionnaire responses.
//!
//! The controller only sees [`ResponseStore`]; production code injects a
//! [`RedisStore`], tests inject a [`MemoryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use intake_redis::queries::{portal as portal_queries, responses as queries};
use intake_redis::{RedisError, RedisPool};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::IntakeResult;
use crate::questionnaire::model::{QuestionnaireStatus, ResponseAggregate};

/// Keyed storage of one response aggregate per client.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Insert or overwrite the aggregate stored for a client.
    async fn save(&self, client_id: &str, aggregate: &ResponseAggregate) -> IntakeResult<()>;

    /// Load the aggregate stored for a client, if any.
    async fn load(&self, client_id: &str) -> IntakeResult<Option<ResponseAggregate>>;

    /// Record the questionnaire status for a client.
    async fn set_status(&self, client_id: &str, status: QuestionnaireStatus) -> IntakeResult<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    responses: RwLock<HashMap<String, ResponseAggregate>>,
    statuses: RwLock<HashMap<String, QuestionnaireStatus>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status last recorded through `set_status`.
    pub async fn status_of(&self, client_id: &str) -> Option<QuestionnaireStatus> {
        self.statuses.read().await.get(client_id).copied()
    }

    pub async fn len(&self) -> usize {
        self.responses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.responses.read().await.is_empty()
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn save(&self, client_id: &str, aggregate: &ResponseAggregate) -> IntakeResult<()> {
        self.responses
            .write()
            .await
            .insert(client_id.to_string(), aggregate.clone());
        Ok(())
    }

    async fn load(&self, client_id: &str) -> IntakeResult<Option<ResponseAggregate>> {
        Ok(self.responses.read().await.get(client_id).cloned())
    }

    async fn set_status(&self, client_id: &str, status: QuestionnaireStatus) -> IntakeResult<()> {
        self.statuses
            .write()
            .await
            .insert(client_id.to_string(), status);
        if let Some(aggregate) = self.responses.write().await.get_mut(client_id) {
            aggregate.status = status;
        }
        Ok(())
    }
}

/// Redis-backed store. The response document and its status field live
/// under `intake:response:{client_id}`.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }

    /// Every stored aggregate, least recently saved first.
    pub async fn list(&self) -> IntakeResult<Vec<ResponseAggregate>> {
        queries::list_responses(&self.pool)
            .await?
            .into_iter()
            .map(aggregate_from_row)
            .collect()
    }

    /// Drop a client's stored responses so the next session starts fresh.
    /// Returns whether anything was stored.
    pub async fn reset(&self, client_id: &str) -> IntakeResult<bool> {
        let removed = queries::delete_response(&self.pool, client_id).await?;
        portal_queries::set_questionnaire_status(&self.pool, client_id, QuestionnaireStatus::NotStarted.as_str())
            .await?;
        debug!(client_id = %client_id, removed, "Reset questionnaire responses");
        Ok(removed)
    }
}

fn aggregate_from_row(row: queries::ResponseRow) -> IntakeResult<ResponseAggregate> {
    let mut aggregate: ResponseAggregate = serde_json::from_str(&row.data)?;
    // The status field can be updated without rewriting the document.
    aggregate.status = QuestionnaireStatus::from_str(&row.status);
    Ok(aggregate)
}

#[async_trait]
impl ResponseStore for RedisStore {
    async fn save(&self, client_id: &str, aggregate: &ResponseAggregate) -> IntakeResult<()> {
        let row = queries::ResponseRow {
            client_id: client_id.to_string(),
            status: aggregate.status.as_str().to_string(),
            data: serde_json::to_string(aggregate)?,
            updated_at: aggregate.last_updated.to_rfc3339(),
        };
        queries::save_response(&self.pool, &row).await?;
        debug!(client_id = %client_id, status = %aggregate.status, "Saved questionnaire response");
        Ok(())
    }

    async fn load(&self, client_id: &str) -> IntakeResult<Option<ResponseAggregate>> {
        queries::get_response(&self.pool, client_id)
            .await?
            .map(aggregate_from_row)
            .transpose()
    }

    async fn set_status(&self, client_id: &str, status: QuestionnaireStatus) -> IntakeResult<()> {
        match queries::set_response_status(&self.pool, client_id, status.as_str()).await {
            Ok(()) => {}
            Err(RedisError::NotFound(_)) => {
                debug!(client_id = %client_id, "No stored response yet, only updating portal status");
            }
            Err(e) => return Err(e.into()),
        }

        let updated = portal_queries::set_questionnaire_status(&self.pool, client_id, status.as_str()).await?;
        if !updated {
            debug!(client_id = %client_id, "No portal access record to update");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load("c1").await.unwrap().is_none());

        let aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        store.save("c1", &aggregate).await.unwrap();
        assert_eq!(store.load("c1").await.unwrap(), Some(aggregate));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_set_status_updates_stored_aggregate() {
        let store = MemoryStore::new();
        store
            .save("c1", &ResponseAggregate::empty(Catalog::intake(), "c1"))
            .await
            .unwrap();
        store.set_status("c1", QuestionnaireStatus::Completed).await.unwrap();

        assert_eq!(store.status_of("c1").await, Some(QuestionnaireStatus::Completed));
        let loaded = store.load("c1").await.unwrap().unwrap();
        assert_eq!(loaded.status, QuestionnaireStatus::Completed);
    }

    #[test]
    fn test_aggregate_from_row_prefers_status_field() {
        let mut aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        aggregate.status = QuestionnaireStatus::InProgress;
        let row = queries::ResponseRow {
            client_id: "c1".to_string(),
            status: "completed".to_string(),
            data: serde_json::to_string(&aggregate).unwrap(),
            updated_at: aggregate.last_updated.to_rfc3339(),
        };

        let loaded = aggregate_from_row(row).unwrap();
        assert_eq!(loaded.status, QuestionnaireStatus::Completed);
        assert_eq!(loaded.sections, aggregate.sections);
    }

    #[test]
    fn test_aggregate_from_row_rejects_bad_json() {
        let row = queries::ResponseRow {
            client_id: "c1".to_string(),
            status: "in_progress".to_string(),
            data: "{not json".to_string(),
            updated_at: String::new(),
        };
        assert!(aggregate_from_row(row).is_err());
    }

    #[tokio::test]
    async fn test_memory_store_status_without_response() {
        let store = MemoryStore::new();
        store.set_status("ghost", QuestionnaireStatus::InProgress).await.unwrap();
        assert_eq!(store.status_of("ghost").await, Some(QuestionnaireStatus::InProgress));
        assert!(store.is_empty().await);
    }
}

//! Client portal access: the client records the questionnaire reads its
//! pre-population fields from.

pub mod model;

use crate::error::{IntakeError, IntakeResult};
use crate::questionnaire::model::QuestionnaireStatus;
use intake_redis::queries::portal as queries;
use intake_redis::RedisPool;
use model::{NewPortalAccess, PortalAccess, PortalStatus};
use tracing::info;
use uuid::Uuid;

/// Create portal access for a client.
///
/// Idempotent: an existing record for the same lead, or for the same email
/// when no lead is given, is returned instead of creating a duplicate.
pub async fn create_portal_access(pool: &RedisPool, new: NewPortalAccess) -> IntakeResult<PortalAccess> {
    let existing = match new.lead_id.as_deref() {
        Some(lead_id) => queries::find_portal_by_lead(pool, lead_id).await?,
        None if !new.client_info.email.trim().is_empty() => {
            queries::find_portal_by_email(pool, &new.client_info.email).await?
        }
        None => None,
    };
    if let Some(row) = existing {
        return Ok(PortalAccess::from_row(row));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let access = PortalAccess {
        id: Uuid::new_v4().to_string(),
        lead_id: new.lead_id,
        client_info: new.client_info,
        birth_info: new.birth_info,
        image_url: new.image_url,
        case_type: new.case_type,
        status: PortalStatus::Pending,
        questionnaire_status: QuestionnaireStatus::NotStarted,
        created_at: now.clone(),
        updated_at: now,
    };
    queries::save_portal(pool, &access.to_row()).await?;
    info!(portal_id = %access.id, "Created portal access");
    Ok(access)
}

/// Get portal access by ID.
pub async fn get_portal_access(pool: &RedisPool, id: &str) -> IntakeResult<PortalAccess> {
    let row = queries::find_portal(pool, id)
        .await?
        .ok_or_else(|| IntakeError::PortalNotFound(id.to_string()))?;
    Ok(PortalAccess::from_row(row))
}

/// List all portal access records in creation order.
pub async fn list_portal_access(pool: &RedisPool) -> IntakeResult<Vec<PortalAccess>> {
    let rows = queries::list_portals(pool).await?;
    Ok(rows.into_iter().map(PortalAccess::from_row).collect())
}

/// Record the questionnaire status on a portal record.
pub async fn update_questionnaire_status(
    pool: &RedisPool,
    id: &str,
    status: QuestionnaireStatus,
) -> IntakeResult<()> {
    if !queries::set_questionnaire_status(pool, id, status.as_str()).await? {
        return Err(IntakeError::PortalNotFound(id.to_string()));
    }
    Ok(())
}

/// Move a portal record to a new lifecycle status.
pub async fn update_portal_status(pool: &RedisPool, id: &str, status: PortalStatus) -> IntakeResult<()> {
    get_portal_access(pool, id).await?;
    queries::set_portal_status(pool, id, status.as_str()).await?;
    Ok(())
}

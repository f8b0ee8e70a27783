//! Portal access domain models.

use intake_redis::queries::portal::{BirthInfoRow, PortalRow};
use serde::{Deserialize, Serialize};

use crate::questionnaire::model::QuestionnaireStatus;
use crate::questionnaire::prefill::ClientReference;

/// A client's access to the intake portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalAccess {
    pub id: String,
    pub lead_id: Option<String>,
    pub client_info: ClientInfo,
    pub birth_info: Option<BirthInfo>,
    pub image_url: Option<String>,
    pub case_type: String,
    pub status: PortalStatus,
    pub questionnaire_status: QuestionnaireStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub date_of_birth: Option<String>,
    pub country_of_birth: Option<String>,
    pub citizenship: Option<String>,
    pub gender: Option<String>,
    pub languages: Vec<String>,
    pub preferred_language: Option<String>,
}

impl PortalAccess {
    /// Create a PortalAccess from a database row.
    pub fn from_row(row: PortalRow) -> Self {
        Self {
            id: row.id,
            lead_id: row.lead_id,
            client_info: ClientInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
            },
            birth_info: row.birth_info.map(|b| BirthInfo {
                date_of_birth: b.date_of_birth,
                country_of_birth: b.country_of_birth,
                citizenship: b.citizenship,
                gender: b.gender,
                languages: b.languages,
                preferred_language: b.preferred_language,
            }),
            image_url: row.image_url,
            case_type: row.case_type,
            status: PortalStatus::from_str(&row.status),
            questionnaire_status: QuestionnaireStatus::from_str(&row.questionnaire_status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// Convert back into a database row.
    pub fn to_row(&self) -> PortalRow {
        PortalRow {
            id: self.id.clone(),
            lead_id: self.lead_id.clone(),
            first_name: self.client_info.first_name.clone(),
            last_name: self.client_info.last_name.clone(),
            email: self.client_info.email.clone(),
            phone: self.client_info.phone.clone(),
            image_url: self.image_url.clone(),
            case_type: self.case_type.clone(),
            status: self.status.as_str().to_string(),
            questionnaire_status: self.questionnaire_status.as_str().to_string(),
            birth_info: self.birth_info.as_ref().map(|b| BirthInfoRow {
                date_of_birth: b.date_of_birth.clone(),
                country_of_birth: b.country_of_birth.clone(),
                citizenship: b.citizenship.clone(),
                gender: b.gender.clone(),
                languages: b.languages.clone(),
                preferred_language: b.preferred_language.clone(),
            }),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.client_info.first_name, self.client_info.last_name)
            .trim()
            .to_string()
    }

    /// The reference record the questionnaire pre-populates from. Empty
    /// strings and missing birth details become absent fields.
    pub fn client_reference(&self) -> ClientReference {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        let birth = self.birth_info.clone().unwrap_or_default();
        ClientReference {
            first_name: non_empty(&self.client_info.first_name),
            last_name: non_empty(&self.client_info.last_name),
            date_of_birth: birth.date_of_birth,
            country_of_birth: birth.country_of_birth,
            preferred_language: birth.preferred_language,
            email: non_empty(&self.client_info.email),
            phone: non_empty(&self.client_info.phone),
        }
    }
}

/// Portal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalStatus {
    Pending,
    Active,
    Completed,
}

impl PortalStatus {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Input for creating portal access.
#[derive(Debug, Clone, Default)]
pub struct NewPortalAccess {
    pub lead_id: Option<String>,
    pub client_info: ClientInfo,
    pub birth_info: Option<BirthInfo>,
    pub image_url: Option<String>,
    pub case_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PortalRow {
        PortalRow {
            id: "p-1".to_string(),
            lead_id: Some("lead-7".to_string()),
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            phone: "".to_string(),
            image_url: None,
            case_type: "Asylum".to_string(),
            status: "active".to_string(),
            questionnaire_status: "in_progress".to_string(),
            birth_info: Some(BirthInfoRow {
                country_of_birth: Some("Guatemala".to_string()),
                ..BirthInfoRow::default()
            }),
            created_at: "2024-03-01T10:00:00Z".to_string(),
            updated_at: "2024-03-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_from_row_and_back() {
        let access = PortalAccess::from_row(row());
        assert_eq!(access.status, PortalStatus::Active);
        assert_eq!(access.questionnaire_status, QuestionnaireStatus::InProgress);
        assert_eq!(access.full_name(), "Ana Lopez");
        assert_eq!(access.to_row(), row());
    }

    #[test]
    fn test_client_reference_degrades_missing_fields() {
        let reference = PortalAccess::from_row(row()).client_reference();
        assert_eq!(reference.first_name.as_deref(), Some("Ana"));
        assert_eq!(reference.phone, None);
        assert_eq!(reference.country_of_birth.as_deref(), Some("Guatemala"));
        assert_eq!(reference.date_of_birth, None);

        let mut bare = row();
        bare.birth_info = None;
        let reference = PortalAccess::from_row(bare).client_reference();
        assert_eq!(reference.preferred_language, None);
    }

    #[test]
    fn test_unknown_portal_status_is_pending() {
        assert_eq!(PortalStatus::from_str("archived"), PortalStatus::Pending);
    }
}

//! Pre-population of questionnaire answers from a client's record.
//!
//! A saved answer always wins. Without one, questions listed in the
//! [`PrefillMap`] fall back to a copy of the mapped client field, so the
//! personal information section works as a confirm-or-correct step.

use serde::{Deserialize, Serialize};

use super::model::{Answer, AnswerValue};
use crate::catalog::model::Question;
use crate::catalog::sections::PERSONAL_CONFIRMATION;

/// Read-only reference fields of a client, owned by client management.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReference {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub country_of_birth: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ClientReference {
    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }
}

/// A client reference field that can seed an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientField {
    FirstName,
    LastName,
    DateOfBirth,
    CountryOfBirth,
    PreferredLanguage,
    Email,
    Phone,
}

impl ClientField {
    /// Copy the field out of a client record; absent fields read as "".
    pub fn read(&self, client: &ClientReference) -> String {
        let field = match self {
            Self::FirstName => &client.first_name,
            Self::LastName => &client.last_name,
            Self::DateOfBirth => &client.date_of_birth,
            Self::CountryOfBirth => &client.country_of_birth,
            Self::PreferredLanguage => &client.preferred_language,
            Self::Email => &client.email,
            Self::Phone => &client.phone,
        };
        field.clone().unwrap_or_default()
    }
}

/// Lookup table from question IDs of one section to client fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefillMap {
    section_id: String,
    entries: Vec<(String, ClientField)>,
}

impl PrefillMap {
    pub fn new(section_id: impl Into<String>, entries: Vec<(String, ClientField)>) -> Self {
        Self {
            section_id: section_id.into(),
            entries,
        }
    }

    /// A table that pre-populates nothing.
    pub fn none() -> Self {
        Self::new(String::new(), Vec::new())
    }

    /// The mapping used by the built-in personal information section.
    pub fn personal_confirmation() -> Self {
        let entries = [
            ("name_first", ClientField::FirstName),
            ("name_last", ClientField::LastName),
            ("dob", ClientField::DateOfBirth),
            ("birth_country", ClientField::CountryOfBirth),
            ("preferred_language", ClientField::PreferredLanguage),
            ("email", ClientField::Email),
            ("phone", ClientField::Phone),
        ];
        Self::new(
            PERSONAL_CONFIRMATION,
            entries.iter().map(|(q, f)| (q.to_string(), *f)).collect(),
        )
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn entries(&self) -> &[(String, ClientField)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The client field mapped to a question of a given section, if any.
    pub fn field_for(&self, section_id: &str, question_id: &str) -> Option<ClientField> {
        if section_id != self.section_id {
            return None;
        }
        self.entries
            .iter()
            .find(|(q, _)| q == question_id)
            .map(|(_, f)| *f)
    }
}

/// Value to display for a question: the saved answer, else the mapped
/// client field, else the kind's empty value.
pub fn resolve(
    prefill: &PrefillMap,
    question: &Question,
    section_id: &str,
    existing: &[Answer],
    client: &ClientReference,
) -> AnswerValue {
    if let Some(answer) = existing.iter().find(|a| a.question_id == question.id) {
        return answer.value.clone();
    }

    match prefill.field_for(section_id, &question.id) {
        Some(field) => AnswerValue::Text(field.read(client)),
        None => AnswerValue::empty_for(question.kind),
    }
}

/// Answers written into a brand-new aggregate for one section, in question
/// order.
///
/// Only mapped questions are seeded. Unmapped ones such as `name_middle`
/// stay absent and read as empty until answered.
pub fn initial_answers(
    prefill: &PrefillMap,
    questions: &[Question],
    section_id: &str,
    client: &ClientReference,
) -> Vec<Answer> {
    questions
        .iter()
        .filter_map(|q| {
            prefill
                .field_for(section_id, &q.id)
                .map(|field| Answer::new(q.id.clone(), field.read(client)))
        })
        .collect()
}

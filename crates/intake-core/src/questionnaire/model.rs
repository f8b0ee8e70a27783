//! Questionnaire response models.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::model::QuestionKind;
use crate::catalog::Catalog;

/// The value of an answer: free text or a single choice, or the selected
/// options of a multi-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// The empty value for a question kind.
    pub fn empty_for(kind: QuestionKind) -> Self {
        if kind.is_multi() {
            Self::Choices(Vec::new())
        } else {
            Self::Text(String::new())
        }
    }

    /// Whitespace-only text and empty selections count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(v) => v.is_empty(),
        }
    }

    /// Whether this value satisfies a display condition's required value.
    pub fn matches(&self, required: &str) -> bool {
        match self {
            Self::Text(s) => s == required,
            Self::Choices(v) => v.iter().any(|c| c == required),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::Choices(v) => Some(v),
        }
    }

    /// Human-readable rendering, choices joined with ", ".
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Choices(v) => v.join(", "),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(v: Vec<String>) -> Self {
        Self::Choices(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// The answers given for one section. Holds at most one answer per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResponse {
    pub section_id: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl SectionResponse {
    pub fn new(section_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            answers: Vec::new(),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn value(&self, question_id: &str) -> Option<&AnswerValue> {
        self.get(question_id).map(|a| &a.value)
    }

    /// Overwrite the answer for a question in place, or append it.
    pub fn upsert(&mut self, question_id: &str, value: AnswerValue) {
        match self.answers.iter_mut().find(|a| a.question_id == question_id) {
            Some(existing) => existing.value = value,
            None => self.answers.push(Answer::new(question_id, value)),
        }
    }
}

/// Questionnaire lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl QuestionnaireStatus {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::NotStarted,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for QuestionnaireStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All of one client's answers across sections plus status and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAggregate {
    pub client_id: String,
    pub sections: Vec<SectionResponse>,
    pub status: QuestionnaireStatus,
    pub last_updated: DateTime<Utc>,
}

impl ResponseAggregate {
    /// One empty section response per catalog section, not started.
    pub fn empty(catalog: &Catalog, client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            sections: catalog
                .sections()
                .iter()
                .map(|s| SectionResponse::new(s.id.clone()))
                .collect(),
            status: QuestionnaireStatus::NotStarted,
            last_updated: Utc::now(),
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&SectionResponse> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }

    /// Mutable access to a section's answers, inserting an empty response
    /// when the aggregate predates the section.
    pub fn section_mut(&mut self, section_id: &str) -> &mut SectionResponse {
        let index = match self.sections.iter().position(|s| s.section_id == section_id) {
            Some(i) => i,
            None => {
                self.sections.push(SectionResponse::new(section_id));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Refresh the last-modified marker.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Structural validation of a stored or received aggregate.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.client_id.trim().is_empty() {
            return Err("missing client id".to_string());
        }
        for section in &self.sections {
            if section.section_id.trim().is_empty() {
                return Err("section response without section id".to_string());
            }
            let mut seen = HashSet::new();
            for answer in &section.answers {
                if answer.question_id.trim().is_empty() {
                    return Err(format!("answer without question id in '{}'", section.section_id));
                }
                if !seen.insert(answer.question_id.as_str()) {
                    return Err(format!(
                        "duplicate answer for '{}' in '{}'",
                        answer.question_id, section.section_id
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values() {
        assert!(AnswerValue::from("   ").is_blank());
        assert!(AnswerValue::Choices(vec![]).is_blank());
        assert!(!AnswerValue::from("x").is_blank());
        assert!(!AnswerValue::Choices(vec!["a".to_string()]).is_blank());
    }

    #[test]
    fn test_empty_for_kind() {
        assert_eq!(AnswerValue::empty_for(QuestionKind::Checkbox), AnswerValue::Choices(vec![]));
        assert_eq!(AnswerValue::empty_for(QuestionKind::Date), AnswerValue::from(""));
    }

    #[test]
    fn test_matches() {
        assert!(AnswerValue::from("Yes").matches("Yes"));
        assert!(!AnswerValue::from("yes").matches("Yes"));
        assert!(AnswerValue::Choices(vec!["A".into(), "B".into()]).matches("B"));
    }

    #[test]
    fn test_upsert_keeps_one_answer_per_question() {
        let mut response = SectionResponse::new("s");
        response.upsert("q1", "first".into());
        response.upsert("q2", "other".into());
        response.upsert("q1", "second".into());

        assert_eq!(response.answers.len(), 2);
        assert_eq!(response.answers[0].question_id, "q1");
        assert_eq!(response.value("q1"), Some(&AnswerValue::from("second")));
    }

    #[test]
    fn test_empty_aggregate_has_section_per_catalog_section() {
        let catalog = Catalog::intake();
        let aggregate = ResponseAggregate::empty(catalog, "c1");
        assert_eq!(aggregate.sections.len(), catalog.len());
        assert_eq!(aggregate.status, QuestionnaireStatus::NotStarted);
        assert!(aggregate.sections.iter().all(|s| s.answers.is_empty()));
    }

    #[test]
    fn test_section_mut_inserts_missing() {
        let mut aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        aggregate.sections.clear();
        aggregate.section_mut("goals_assistance").upsert("x", "y".into());
        assert_eq!(aggregate.sections.len(), 1);
        assert!(aggregate.section("goals_assistance").is_some());
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(QuestionnaireStatus::from_str("completed"), QuestionnaireStatus::Completed);
        assert_eq!(QuestionnaireStatus::from_str("garbage"), QuestionnaireStatus::NotStarted);
        assert_eq!(QuestionnaireStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn test_check_shape_rejects_duplicates() {
        let mut aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        assert!(aggregate.check_shape().is_ok());

        aggregate.sections[0].answers.push(Answer::new("q", "a"));
        aggregate.sections[0].answers.push(Answer::new("q", "b"));
        assert!(aggregate.check_shape().is_err());

        let empty_client = ResponseAggregate::empty(Catalog::intake(), " ");
        assert!(empty_client.check_shape().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        aggregate.sections[1].upsert("assistance_purpose", vec!["Apply for Asylum".to_string()].into());
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["sections"][1]["answers"][0]["value"][0], "Apply for Asylum");

        let back: ResponseAggregate = serde_json::from_value(json).unwrap();
        assert_eq!(back, aggregate);
    }
}

//! Staff-facing rendering of a saved questionnaire response.

use serde::{Deserialize, Serialize};

use super::model::{AnswerValue, ResponseAggregate};
use crate::catalog::Catalog;

const UNKNOWN_QUESTION: &str = "Unknown Question";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedAnswer {
    pub question_id: String,
    pub question: String,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSection {
    pub section_id: String,
    pub title: String,
    pub answers: Vec<FormattedAnswer>,
}

/// Pair every saved answer with its question text, in aggregate order.
/// Sections the catalog no longer knows are dropped.
pub fn summarize(catalog: &Catalog, aggregate: &ResponseAggregate) -> Vec<FormattedSection> {
    aggregate
        .sections
        .iter()
        .filter_map(|response| {
            let section = catalog.section(&response.section_id)?;
            let answers = response
                .answers
                .iter()
                .map(|answer| FormattedAnswer {
                    question_id: answer.question_id.clone(),
                    question: section
                        .question(&answer.question_id)
                        .map(|q| q.text.clone())
                        .unwrap_or_else(|| UNKNOWN_QUESTION.to_string()),
                    value: answer.value.clone(),
                })
                .collect();
            Some(FormattedSection {
                section_id: response.section_id.clone(),
                title: section.title.clone(),
                answers,
            })
        })
        .collect()
}

/// Whether an aggregate is structurally sound.
pub fn validate_response(aggregate: &ResponseAggregate) -> bool {
    aggregate.check_shape().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::model::{Answer, SectionResponse};

    #[test]
    fn test_summarize_uses_question_text() {
        let catalog = Catalog::intake();
        let mut aggregate = ResponseAggregate::empty(catalog, "c1");
        aggregate.section_mut("personal_confirmation").upsert("name_first", "Ana".into());
        aggregate
            .section_mut("personal_confirmation")
            .answers
            .push(Answer::new("legacy_field", "old"));

        let summary = summarize(catalog, &aggregate);
        assert_eq!(summary.len(), catalog.len());
        assert_eq!(summary[0].title, "Personal Information");
        assert_eq!(summary[0].answers[0].question, "First Name");
        assert_eq!(summary[0].answers[1].question, "Unknown Question");
    }

    #[test]
    fn test_summarize_skips_unknown_sections() {
        let catalog = Catalog::intake();
        let mut aggregate = ResponseAggregate::empty(catalog, "c1");
        aggregate.sections.push(SectionResponse::new("retired_section"));
        let summary = summarize(catalog, &aggregate);
        assert!(summary.iter().all(|s| s.section_id != "retired_section"));
    }

    #[test]
    fn test_validate_response() {
        let aggregate = ResponseAggregate::empty(Catalog::intake(), "c1");
        assert!(validate_response(&aggregate));

        let mut broken = aggregate.clone();
        broken.sections[0].section_id.clear();
        assert!(!validate_response(&broken));
    }
}

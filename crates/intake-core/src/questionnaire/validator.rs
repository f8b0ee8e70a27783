//! Section completeness checks gating forward navigation and submission.

use super::model::{ResponseAggregate, SectionResponse};
use crate::catalog::model::{Question, Section};
use crate::catalog::Catalog;

/// Whether a question is currently displayed. Questions without a display
/// condition are always visible; conditional ones are visible only while the
/// dependency's answer matches the required value.
pub fn is_visible(question: &Question, response: &SectionResponse) -> bool {
    match &question.conditional {
        None => true,
        Some(rule) => response
            .value(&rule.depends_on)
            .is_some_and(|v| v.matches(&rule.required_value)),
    }
}

/// Required, visible questions without a non-blank answer.
pub fn missing_required<'a>(section: &'a Section, response: &SectionResponse) -> Vec<&'a Question> {
    section
        .required_questions()
        .filter(|q| is_visible(q, response))
        .filter(|q| response.value(&q.id).is_none_or(|v| v.is_blank()))
        .collect()
}

/// True when every required, visible question has a non-blank answer.
pub fn is_section_complete(section: &Section, response: &SectionResponse) -> bool {
    missing_required(section, response).is_empty()
}

/// Index of the first catalog section the aggregate does not complete.
pub fn first_incomplete_section(catalog: &Catalog, aggregate: &ResponseAggregate) -> Option<usize> {
    catalog.sections().iter().position(|section| {
        let empty = SectionResponse::new(section.id.clone());
        let response = aggregate.section(&section.id).unwrap_or(&empty);
        !is_section_complete(section, response)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::prefill::PrefillMap;

    fn section() -> Section {
        Section::new("s", "S").with_questions(vec![
            Question::select("visa", "Visa type", &["H1B", "F1"]).required(),
            Question::radio("has_a_number", "A-Number?", &["Yes", "No"]),
            Question::text("a_number", "A-Number")
                .required()
                .shown_when("has_a_number", "Yes"),
            Question::long_text("notes", "Notes"),
        ])
    }

    #[test]
    fn test_required_select_gates_completion() {
        let section = section();
        let mut response = SectionResponse::new("s");
        assert!(!is_section_complete(&section, &response));

        response.upsert("visa", "H1B".into());
        assert!(is_section_complete(&section, &response));
    }

    #[test]
    fn test_whitespace_answer_is_missing() {
        let section = section();
        let mut response = SectionResponse::new("s");
        response.upsert("visa", "   ".into());
        let missing: Vec<&str> = missing_required(&section, &response)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(missing, vec!["visa"]);
    }

    #[test]
    fn test_hidden_required_question_is_exempt() {
        let section = section();
        let mut response = SectionResponse::new("s");
        response.upsert("visa", "F1".into());
        response.upsert("has_a_number", "No".into());
        assert!(is_section_complete(&section, &response));

        response.upsert("has_a_number", "Yes".into());
        assert!(!is_section_complete(&section, &response));

        response.upsert("a_number", "A123456789".into());
        assert!(is_section_complete(&section, &response));
    }

    #[test]
    fn test_unanswered_dependency_hides_question() {
        let section = section();
        let response = SectionResponse::new("s");
        assert!(!is_visible(section.question("a_number").unwrap(), &response));
        assert!(is_visible(section.question("notes").unwrap(), &response));
    }

    #[test]
    fn test_section_without_required_questions_is_complete() {
        let section = Section::new("s", "S").with_questions(vec![Question::text("q", "Q")]);
        assert!(is_section_complete(&section, &SectionResponse::new("s")));
    }

    #[test]
    fn test_first_incomplete_section() {
        let catalog = Catalog::new(
            vec![
                Section::new("a", "A").with_questions(vec![Question::text("q1", "One")]),
                Section::new("b", "B").with_questions(vec![Question::text("q2", "Two").required()]),
            ],
            PrefillMap::none(),
        )
        .unwrap();

        let mut aggregate = ResponseAggregate::empty(&catalog, "c1");
        assert_eq!(first_incomplete_section(&catalog, &aggregate), Some(1));

        aggregate.section_mut("b").upsert("q2", "done".into());
        assert_eq!(first_incomplete_section(&catalog, &aggregate), None);

        aggregate.sections.clear();
        assert_eq!(first_incomplete_section(&catalog, &aggregate), Some(1));
    }
}

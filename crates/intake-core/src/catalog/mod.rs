//! Question catalog: the static, ordered definition of the questionnaire.
//!
//! The catalog is the schema every other component reads from. It is built
//! once and never mutated; navigation order and progress display follow the
//! order of [`Catalog::sections`].

pub mod model;
pub mod sections;

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::{IntakeError, IntakeResult};
use crate::questionnaire::prefill::PrefillMap;
use model::{Question, Section};

static INTAKE_CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    sections: sections::intake_sections(),
    prefill: PrefillMap::personal_confirmation(),
});

/// Ordered sections plus the table that maps questions to client fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    sections: Vec<Section>,
    prefill: PrefillMap,
}

impl Catalog {
    /// Build a catalog, rejecting any inconsistency between the sections and
    /// the pre-population table.
    pub fn new(sections: Vec<Section>, prefill: PrefillMap) -> IntakeResult<Self> {
        let catalog = Self { sections, prefill };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in client intake questionnaire.
    pub fn intake() -> &'static Catalog {
        &INTAKE_CATALOG
    }

    /// Check the structural invariants of the catalog.
    pub fn validate(&self) -> IntakeResult<()> {
        if self.sections.is_empty() {
            return Err(IntakeError::Catalog("catalog has no sections".to_string()));
        }

        let mut section_ids = HashSet::new();
        let mut question_ids = HashSet::new();

        for section in &self.sections {
            if section.id.is_empty() {
                return Err(IntakeError::Catalog("section with empty id".to_string()));
            }
            if !section_ids.insert(section.id.as_str()) {
                return Err(IntakeError::Catalog(format!("duplicate section '{}'", section.id)));
            }

            for question in &section.questions {
                validate_question(section, question)?;
                if !question_ids.insert(question.id.as_str()) {
                    return Err(IntakeError::Catalog(format!(
                        "duplicate question '{}'",
                        question.id
                    )));
                }
            }
        }

        if self.prefill.is_empty() {
            return Ok(());
        }
        let section = self.section(self.prefill.section_id()).ok_or_else(|| {
            IntakeError::Catalog(format!(
                "pre-population section '{}' is not in the catalog",
                self.prefill.section_id()
            ))
        })?;
        for (question_id, _) in self.prefill.entries() {
            if !section.contains(question_id) {
                return Err(IntakeError::Catalog(format!(
                    "pre-population entry '{}' has no question in section '{}'",
                    question_id, section.id
                )));
            }
        }

        Ok(())
    }

    /// All sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn prefill(&self) -> &PrefillMap {
        &self.prefill
    }

    /// Find a section by ID.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Position of a section in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Find a question anywhere in the catalog.
    pub fn question(&self, id: &str) -> Option<(&Section, &Question)> {
        self.sections
            .iter()
            .find_map(|s| s.question(id).map(|q| (s, q)))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn validate_question(section: &Section, question: &Question) -> IntakeResult<()> {
    if question.id.is_empty() {
        return Err(IntakeError::Catalog(format!(
            "question with empty id in section '{}'",
            section.id
        )));
    }

    if question.kind.is_choice() && question.options.is_empty() {
        return Err(IntakeError::Catalog(format!(
            "question '{}' is a {} question without options",
            question.id,
            question.kind.as_str()
        )));
    }

    if let Some(rule) = &question.conditional {
        if rule.depends_on == question.id || !section.contains(&rule.depends_on) {
            return Err(IntakeError::Catalog(format!(
                "question '{}' depends on '{}', which is not another question in section '{}'",
                question.id, rule.depends_on, section.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::prefill::ClientField;

    #[test]
    fn test_intake_catalog_is_valid() {
        let catalog = Catalog::intake();
        catalog.validate().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.sections()[0].id, sections::PERSONAL_CONFIRMATION);
        assert_eq!(catalog.sections()[8].id, sections::ADDITIONAL_INFORMATION);
    }

    #[test]
    fn test_a_number_is_conditional() {
        let (section, question) = Catalog::intake().question("a_number").unwrap();
        assert_eq!(section.id, sections::PERSONAL_CONFIRMATION);
        let rule = question.conditional.as_ref().unwrap();
        assert_eq!(rule.depends_on, "has_a_number");
        assert_eq!(rule.required_value, "Yes");
    }

    #[test]
    fn test_position_and_lookup() {
        let catalog = Catalog::intake();
        assert_eq!(catalog.position(sections::CRIMINAL_HISTORY), Some(5));
        assert!(catalog.section("nope").is_none());
        assert!(catalog.section_at(42).is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(Catalog::new(Vec::new(), PrefillMap::none()).is_err());
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let sections = vec![
            Section::new("a", "A").with_questions(vec![Question::text("q1", "One")]),
            Section::new("b", "B").with_questions(vec![Question::text("q1", "Again")]),
        ];
        let err = Catalog::new(sections, PrefillMap::none()).unwrap_err();
        assert!(err.to_string().contains("duplicate question 'q1'"));
    }

    #[test]
    fn test_choice_without_options_rejected() {
        let sections = vec![Section::new("a", "A")
            .with_questions(vec![Question::radio("q1", "Pick", &[])])];
        assert!(Catalog::new(sections, PrefillMap::none()).is_err());
    }

    #[test]
    fn test_conditional_must_reference_same_section() {
        let sections = vec![
            Section::new("a", "A").with_questions(vec![Question::radio("q1", "Pick", &["Yes"])]),
            Section::new("b", "B")
                .with_questions(vec![Question::text("q2", "Then").shown_when("q1", "Yes")]),
        ];
        assert!(Catalog::new(sections, PrefillMap::none()).is_err());
    }

    #[test]
    fn test_prefill_entry_without_question_fails_loudly() {
        let sections = vec![Section::new("a", "A").with_questions(vec![Question::text("q1", "One")])];
        let prefill = PrefillMap::new("a", vec![("renamed".to_string(), ClientField::FirstName)]);
        let err = Catalog::new(sections, prefill).unwrap_err();
        assert!(matches!(err, IntakeError::Catalog(_)));
    }

    #[test]
    fn test_prefill_section_must_exist() {
        let sections = vec![Section::new("a", "A").with_questions(vec![Question::text("q1", "One")])];
        let prefill = PrefillMap::new("missing", vec![("q1".to_string(), ClientField::FirstName)]);
        assert!(Catalog::new(sections, prefill).is_err());
    }
}

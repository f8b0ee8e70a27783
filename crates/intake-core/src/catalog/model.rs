//! Catalog domain models.

use serde::{Deserialize, Serialize};

/// Input kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    ShortText,
    LongText,
    Date,
    Select,
    Radio,
    Checkbox,
    Phone,
    Email,
}

impl QuestionKind {
    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::Date => "date",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    /// Kinds that pick from a fixed option list.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Kinds whose answer is a sequence of options.
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

/// Show a question only while another question's answer equals a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCondition {
    pub depends_on: String,
    pub required_value: String,
}

/// A single catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<DisplayCondition>,
}

impl Question {
    /// Create an optional question without options.
    pub fn new(id: impl Into<String>, kind: QuestionKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            required: false,
            options: Vec::new(),
            help_text: None,
            conditional: None,
        }
    }

    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, QuestionKind::ShortText, text)
    }

    pub fn long_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, QuestionKind::LongText, text)
    }

    pub fn date(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, QuestionKind::Date, text)
    }

    pub fn email(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, QuestionKind::Email, text)
    }

    pub fn phone(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, QuestionKind::Phone, text)
    }

    pub fn select(id: impl Into<String>, text: impl Into<String>, options: &[&str]) -> Self {
        Self::new(id, QuestionKind::Select, text).with_options(options)
    }

    pub fn radio(id: impl Into<String>, text: impl Into<String>, options: &[&str]) -> Self {
        Self::new(id, QuestionKind::Radio, text).with_options(options)
    }

    pub fn checkbox(id: impl Into<String>, text: impl Into<String>, options: &[&str]) -> Self {
        Self::new(id, QuestionKind::Checkbox, text).with_options(options)
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    /// Only display this question while `depends_on` is answered with `value`.
    pub fn shown_when(mut self, depends_on: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditional = Some(DisplayCondition {
            depends_on: depends_on.into(),
            required_value: value.into(),
        });
        self
    }
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Find a question by ID.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Whether the section contains a question with this ID.
    pub fn contains(&self, id: &str) -> bool {
        self.question(id).is_some()
    }

    /// Required questions in catalog order.
    pub fn required_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.required)
    }
}

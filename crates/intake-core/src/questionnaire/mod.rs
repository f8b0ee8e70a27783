//! Intake questionnaire: response aggregate, pre-population, validation and
//! the session controller.

pub mod controller;
pub mod model;
pub mod prefill;
pub mod summary;
pub mod validator;

pub use controller::{ControllerBuilder, Progress, QuestionnaireController, ReopenPolicy, SubmitOutcome};
pub use model::{Answer, AnswerValue, QuestionnaireStatus, ResponseAggregate, SectionResponse};
pub use prefill::{ClientField, ClientReference, PrefillMap};

//! Questionnaire controller: section navigation, answer entry with
//! autosave, and final submission.
//!
//! One controller serves one editing session for one client. All operations
//! take `&self`; the session state sits behind a mutex that is never held
//! across an await point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::model::{AnswerValue, QuestionnaireStatus, ResponseAggregate, SectionResponse};
use super::prefill::{self, ClientReference};
use super::validator;
use crate::catalog::model::{Question, Section};
use crate::catalog::Catalog;
use crate::error::{IntakeError, IntakeResult};
use crate::events::{EventSender, QuestionnaireEvent};
use crate::store::ResponseStore;

/// What an answer does to an aggregate that was already submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenPolicy {
    /// Post-submission edits are saved and the aggregate stays completed.
    #[default]
    KeepCompleted,
    /// Any edit demotes a completed aggregate back to in progress.
    RevertToInProgress,
}

impl ReopenPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepCompleted => "keep_completed",
            Self::RevertToInProgress => "revert_to_in_progress",
        }
    }

    /// Status of an aggregate after an answer changes.
    pub fn status_after_edit(&self, current: QuestionnaireStatus) -> QuestionnaireStatus {
        match (self, current) {
            (Self::KeepCompleted, QuestionnaireStatus::Completed) => QuestionnaireStatus::Completed,
            _ => QuestionnaireStatus::InProgress,
        }
    }
}

/// Result of a submission attempt that did not fail on persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Persisted as completed; the completion event has been sent.
    Submitted,
    /// A section still has required questions without answers.
    Incomplete {
        section_index: usize,
        section_id: String,
        missing: Vec<String>,
    },
    /// Another submission is in flight; this call was ignored.
    AlreadySubmitting,
}

/// Navigation progress for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub titles: Vec<String>,
    pub percent: u8,
}

struct Session {
    current: usize,
    aggregate: ResponseAggregate,
    /// Bumped on every answer.
    revision: u64,
    last_error: Option<String>,
}

/// Resets the in-flight flag even if the submit future is dropped.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Collects the collaborators of a controller before a session starts.
pub struct ControllerBuilder {
    catalog: Arc<Catalog>,
    store: Arc<dyn ResponseStore>,
    policy: ReopenPolicy,
    events: Option<EventSender>,
}

impl ControllerBuilder {
    pub fn reopen_policy(mut self, policy: ReopenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Broadcast a [`QuestionnaireEvent::Submitted`] on successful submit.
    pub fn events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    /// Start a session. A saved aggregate is used as-is; otherwise a fresh
    /// one is built with the pre-populated section already filled in.
    pub fn initialize(
        self,
        client_id: impl Into<String>,
        client: ClientReference,
        saved: Option<ResponseAggregate>,
    ) -> QuestionnaireController {
        let client_id = client_id.into();
        let aggregate = match saved {
            Some(aggregate) => {
                debug!(client_id = %client_id, status = %aggregate.status, "Resuming saved questionnaire");
                aggregate
            }
            None => {
                debug!(client_id = %client_id, "Starting new questionnaire");
                fresh_aggregate(&self.catalog, &client_id, &client)
            }
        };

        QuestionnaireController {
            catalog: self.catalog,
            store: self.store,
            client,
            client_id,
            policy: self.policy,
            events: self.events,
            session: Mutex::new(Session {
                current: 0,
                aggregate,
                revision: 0,
                last_error: None,
            }),
            submitting: AtomicBool::new(false),
            pending_save: Mutex::new(None),
        }
    }

    /// Load the client's saved aggregate through the store, then initialize.
    /// A failed load is logged and treated as no saved aggregate.
    pub async fn open(self, client_id: impl Into<String>, client: ClientReference) -> QuestionnaireController {
        let client_id = client_id.into();
        let saved = match self.store.load(&client_id).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "Failed to load saved responses, starting fresh");
                None
            }
        };
        self.initialize(client_id, client, saved)
    }
}

fn fresh_aggregate(catalog: &Catalog, client_id: &str, client: &ClientReference) -> ResponseAggregate {
    let mut aggregate = ResponseAggregate::empty(catalog, client_id);
    let prefill = catalog.prefill();
    if let Some(section) = catalog.section(prefill.section_id()) {
        aggregate.section_mut(&section.id).answers =
            prefill::initial_answers(prefill, &section.questions, &section.id, client);
    }
    aggregate
}

pub struct QuestionnaireController {
    catalog: Arc<Catalog>,
    store: Arc<dyn ResponseStore>,
    client: ClientReference,
    client_id: String,
    policy: ReopenPolicy,
    events: Option<EventSender>,
    session: Mutex<Session>,
    submitting: AtomicBool,
    pending_save: Mutex<Option<JoinHandle<()>>>,
}

impl QuestionnaireController {
    pub fn builder(catalog: Arc<Catalog>, store: Arc<dyn ResponseStore>) -> ControllerBuilder {
        ControllerBuilder {
            catalog,
            store,
            policy: ReopenPolicy::default(),
            events: None,
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending_save(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending_save.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot of the working aggregate.
    pub fn aggregate(&self) -> ResponseAggregate {
        self.session().aggregate.clone()
    }

    pub fn status(&self) -> QuestionnaireStatus {
        self.session().aggregate.status
    }

    pub fn current_index(&self) -> usize {
        self.session().current
    }

    pub fn current_section(&self) -> &Section {
        let index = self.current_index();
        &self.catalog.sections()[index]
    }

    pub fn is_first(&self) -> bool {
        self.current_index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index() + 1 == self.catalog.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// User-facing message of the last failed submission.
    pub fn last_error(&self) -> Option<String> {
        self.session().last_error.clone()
    }

    /// Answers of the current section.
    pub fn current_response(&self) -> SectionResponse {
        let section = self.current_section();
        self.session()
            .aggregate
            .section(&section.id)
            .cloned()
            .unwrap_or_else(|| SectionResponse::new(section.id.clone()))
    }

    /// Value to show for a question of the current section.
    pub fn display_value(&self, question_id: &str) -> Option<AnswerValue> {
        let section = self.current_section();
        let question = section.question(question_id)?;
        let response = self.current_response();
        Some(prefill::resolve(
            self.catalog.prefill(),
            question,
            &section.id,
            &response.answers,
            &self.client,
        ))
    }

    /// Questions of the current section whose display condition holds.
    pub fn visible_questions(&self) -> Vec<&Question> {
        let section = self.current_section();
        let response = self.current_response();
        section
            .questions
            .iter()
            .filter(|q| validator::is_visible(q, &response))
            .collect()
    }

    /// Set the answer to a question of the current section and autosave.
    ///
    /// Only an unknown question is an error; storage failures are logged by
    /// the autosave task and never reach the caller.
    pub fn answer(&self, question_id: &str, value: impl Into<AnswerValue>) -> IntakeResult<()> {
        let section = self.current_section();
        if !section.contains(question_id) {
            return Err(IntakeError::UnknownQuestion {
                section: section.id.clone(),
                question: question_id.to_string(),
            });
        }

        let snapshot = {
            let mut session = self.session();
            let aggregate = &mut session.aggregate;
            aggregate.section_mut(&section.id).upsert(question_id, value.into());
            aggregate.status = self.policy.status_after_edit(aggregate.status);
            aggregate.touch();
            let snapshot = aggregate.clone();
            session.revision += 1;
            snapshot
        };

        self.schedule_save(snapshot);
        Ok(())
    }

    /// Add an option to a multi-choice answer, or remove it if present.
    pub fn toggle_option(&self, question_id: &str, option: &str) -> IntakeResult<()> {
        let section = self.current_section();
        let question = section.question(question_id).ok_or_else(|| IntakeError::UnknownQuestion {
            section: section.id.clone(),
            question: question_id.to_string(),
        })?;
        if !question.options.iter().any(|o| o == option) {
            return Err(IntakeError::validation(format!(
                "'{}' is not an option of '{}'",
                option, question_id
            )));
        }

        let mut choices = match self.display_value(question_id) {
            Some(AnswerValue::Choices(v)) => v,
            Some(AnswerValue::Text(s)) if !s.is_empty() => vec![s],
            _ => Vec::new(),
        };
        match choices.iter().position(|c| c == option) {
            Some(i) => {
                choices.remove(i);
            }
            None => choices.push(option.to_string()),
        }
        self.answer(question_id, AnswerValue::Choices(choices))
    }

    /// Whether the current section has every required, visible answer.
    pub fn can_advance(&self) -> bool {
        let section = self.current_section();
        validator::is_section_complete(section, &self.current_response())
    }

    /// IDs of required, visible questions of the current section that still
    /// lack an answer.
    pub fn missing_required(&self) -> Vec<String> {
        let section = self.current_section();
        validator::missing_required(section, &self.current_response())
            .into_iter()
            .map(|q| q.id.clone())
            .collect()
    }

    /// Move to the next section. No-op returning `false` when the current
    /// section is incomplete or already the last one.
    pub fn advance(&self) -> bool {
        if self.is_last() || !self.can_advance() {
            return false;
        }
        let mut session = self.session();
        session.current += 1;
        true
    }

    /// Move to the previous section. No-op returning `false` on the first.
    pub fn retreat(&self) -> bool {
        let mut session = self.session();
        if session.current == 0 {
            return false;
        }
        session.current -= 1;
        true
    }

    /// Jump to a section. Backwards jumps are always allowed; forward jumps
    /// require every section before the target to be complete.
    pub fn go_to(&self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }
        let mut session = self.session();
        if index > session.current {
            let blocked = validator::first_incomplete_section(&self.catalog, &session.aggregate)
                .is_some_and(|i| i < index);
            if blocked {
                return false;
            }
        }
        session.current = index;
        true
    }

    pub fn progress(&self) -> Progress {
        let current = self.current_index();
        let total = self.catalog.len();
        Progress {
            current,
            total,
            titles: self.catalog.sections().iter().map(|s| s.title.clone()).collect(),
            percent: (((current + 1) * 100) / total.max(1)) as u8,
        }
    }

    /// Validate, persist as completed, and signal completion.
    ///
    /// On a storage failure the working aggregate keeps its previous status,
    /// the error is recorded for display, and the call may be retried.
    pub async fn submit(&self) -> IntakeResult<SubmitOutcome> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            debug!(client_id = %self.client_id, "Submission already in flight, ignoring");
            return Ok(SubmitOutcome::AlreadySubmitting);
        }
        let _guard = SubmitGuard(&self.submitting);

        if let Some(incomplete) = self.incomplete_outcome() {
            debug!(client_id = %self.client_id, outcome = ?incomplete, "Submission blocked");
            return Ok(incomplete);
        }

        // An autosave landing after the final save would overwrite it.
        self.flush().await;

        let (previous, completed, revision) = {
            let session = self.session();
            let previous = session.aggregate.clone();
            let mut completed = previous.clone();
            completed.status = QuestionnaireStatus::Completed;
            completed.touch();
            (previous, completed, session.revision)
        };

        match self.persist_completed(&previous, &completed).await {
            Ok(()) => {
                let resave = {
                    let mut session = self.session();
                    session.last_error = None;
                    if session.revision == revision {
                        session.aggregate.status = QuestionnaireStatus::Completed;
                        session.aggregate.last_updated = completed.last_updated;
                        None
                    } else {
                        // Answers given while the final save was in flight
                        // were autosaved with the old status.
                        session.aggregate.status = self.policy.status_after_edit(QuestionnaireStatus::Completed);
                        session.aggregate.touch();
                        Some(session.aggregate.clone())
                    }
                };
                if let Some(snapshot) = resave {
                    debug!(client_id = %self.client_id, "Saving answers given during submission");
                    self.schedule_save(snapshot);
                }
                info!(client_id = %self.client_id, "Questionnaire submitted");
                if let Some(events) = &self.events {
                    // No subscribers is fine.
                    let _ = events.send(QuestionnaireEvent::Submitted {
                        client_id: self.client_id.clone(),
                    });
                }
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) => {
                error!(client_id = %self.client_id, error = %e, "Failed to submit questionnaire");
                self.session().last_error =
                    Some("Failed to submit questionnaire. Please try again.".to_string());
                Err(e)
            }
        }
    }

    /// Wait until every autosave dispatched so far has finished.
    pub async fn flush(&self) {
        let pending = self.pending_save().take();
        if let Some(handle) = pending {
            if let Err(e) = handle.await {
                warn!(client_id = %self.client_id, error = %e, "Autosave task aborted");
            }
        }
    }

    fn incomplete_outcome(&self) -> Option<SubmitOutcome> {
        let current = self.current_index();
        let index = if self.can_advance() {
            let session = self.session();
            validator::first_incomplete_section(&self.catalog, &session.aggregate)?
        } else {
            current
        };

        let section = &self.catalog.sections()[index];
        let empty = SectionResponse::new(section.id.clone());
        let session = self.session();
        let response = session.aggregate.section(&section.id).unwrap_or(&empty);
        Some(SubmitOutcome::Incomplete {
            section_index: index,
            section_id: section.id.clone(),
            missing: validator::missing_required(section, response)
                .into_iter()
                .map(|q| q.id.clone())
                .collect(),
        })
    }

    /// Save the completed aggregate and record its status. When the status
    /// update fails the pre-submission aggregate is written back so the store
    /// never shows a submission the caller was told had failed.
    async fn persist_completed(&self, previous: &ResponseAggregate, completed: &ResponseAggregate) -> IntakeResult<()> {
        self.store.save(&self.client_id, completed).await?;
        if let Err(e) = self.store.set_status(&self.client_id, completed.status).await {
            if let Err(restore) = self.store.save(&self.client_id, previous).await {
                warn!(client_id = %self.client_id, error = %restore, "Failed to restore aggregate after status update failure");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Dispatch a save without waiting for it. Saves are chained so they
    /// reach the store in the order they were dispatched.
    fn schedule_save(&self, snapshot: ResponseAggregate) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(client_id = %self.client_id, "No async runtime available, autosave skipped");
            return;
        };

        let store = Arc::clone(&self.store);
        let client_id = self.client_id.clone();
        let mut pending = self.pending_save();
        let previous = pending.take();
        *pending = Some(runtime.spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            autosave(store.as_ref(), &client_id, &snapshot).await;
        }));
    }
}

async fn autosave(store: &dyn ResponseStore, client_id: &str, snapshot: &ResponseAggregate) {
    if let Err(e) = store.save(client_id, snapshot).await {
        warn!(client_id = %client_id, error = %e, "Autosave failed");
        return;
    }
    if let Err(e) = store.set_status(client_id, snapshot.status).await {
        warn!(client_id = %client_id, error = %e, "Autosave status update failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::prefill::PrefillMap;
    use crate::store::MemoryStore;

    fn catalog() -> Arc<Catalog> {
        let sections = vec![
            Section::new("visa", "Visa").with_questions(vec![
                Question::select("visa_type", "Visa type", &["H1B", "F1", "Other"]).required(),
                Question::radio("has_a_number", "A-Number?", &["Yes", "No"]),
                Question::text("a_number", "A-Number")
                    .required()
                    .shown_when("has_a_number", "Yes"),
            ]),
            Section::new("goals", "Goals").with_questions(vec![Question::checkbox(
                "purpose",
                "Purpose",
                &["Asylum", "Green Card", "Citizenship"],
            )]),
        ];
        Arc::new(Catalog::new(sections, PrefillMap::none()).unwrap())
    }

    fn controller(store: Arc<MemoryStore>) -> QuestionnaireController {
        QuestionnaireController::builder(catalog(), store).initialize("c1", ClientReference::default(), None)
    }

    #[tokio::test]
    async fn test_required_field_gates_advance() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert!(!ctl.can_advance());
        assert!(!ctl.advance());
        assert_eq!(ctl.current_index(), 0);

        ctl.answer("visa_type", "H1B").unwrap();
        assert!(ctl.can_advance());
        assert!(ctl.advance());
        assert_eq!(ctl.current_index(), 1);
    }

    #[tokio::test]
    async fn test_conditional_required_question() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.answer("visa_type", "F1").unwrap();
        assert!(ctl.can_advance());

        ctl.answer("has_a_number", "Yes").unwrap();
        assert!(!ctl.can_advance());
        assert_eq!(ctl.missing_required(), vec!["a_number".to_string()]);
        assert!(ctl.visible_questions().iter().any(|q| q.id == "a_number"));

        ctl.answer("has_a_number", "No").unwrap();
        assert!(ctl.can_advance());
        assert!(ctl.visible_questions().iter().all(|q| q.id != "a_number"));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let store = Arc::new(MemoryStore::new());
        let ctl = controller(Arc::clone(&store));
        assert_eq!(ctl.status(), QuestionnaireStatus::NotStarted);

        ctl.answer("visa_type", "Other").unwrap();
        assert_eq!(ctl.status(), QuestionnaireStatus::InProgress);

        assert_eq!(ctl.submit().await.unwrap(), SubmitOutcome::Submitted);
        assert_eq!(ctl.status(), QuestionnaireStatus::Completed);
        assert_eq!(store.status_of("c1").await, Some(QuestionnaireStatus::Completed));
    }

    #[tokio::test]
    async fn test_autosave_persists_latest_answer() {
        let store = Arc::new(MemoryStore::new());
        let ctl = controller(Arc::clone(&store));
        ctl.answer("visa_type", "H1B").unwrap();
        ctl.answer("visa_type", "F1").unwrap();
        ctl.flush().await;

        let saved = store.load("c1").await.unwrap().unwrap();
        assert_eq!(saved.status, QuestionnaireStatus::InProgress);
        assert_eq!(
            saved.section("visa").unwrap().value("visa_type"),
            Some(&AnswerValue::from("F1"))
        );
        assert_eq!(store.status_of("c1").await, Some(QuestionnaireStatus::InProgress));
    }

    #[tokio::test]
    async fn test_unknown_question_rejected() {
        let store = Arc::new(MemoryStore::new());
        let ctl = controller(Arc::clone(&store));
        let err = ctl.answer("purpose", "Asylum").unwrap_err();
        assert!(matches!(err, IntakeError::UnknownQuestion { .. }));
        ctl.flush().await;
        assert!(store.is_empty().await);
        assert_eq!(ctl.status(), QuestionnaireStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_toggle_is_its_own_inverse() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.answer("visa_type", "H1B").unwrap();
        ctl.advance();

        ctl.toggle_option("purpose", "Asylum").unwrap();
        let before = ctl.display_value("purpose").unwrap();
        assert_eq!(before, AnswerValue::Choices(vec!["Asylum".to_string()]));

        ctl.toggle_option("purpose", "Citizenship").unwrap();
        ctl.toggle_option("purpose", "Citizenship").unwrap();
        assert_eq!(ctl.display_value("purpose").unwrap(), before);

        assert!(ctl.toggle_option("purpose", "Not an option").is_err());
    }

    #[tokio::test]
    async fn test_retreat_and_bounds() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert!(!ctl.retreat());
        assert!(ctl.is_first());

        ctl.answer("visa_type", "H1B").unwrap();
        assert!(ctl.advance());
        assert!(ctl.is_last());
        assert!(!ctl.advance());
        assert!(ctl.retreat());
        assert_eq!(ctl.current_index(), 0);
    }

    #[tokio::test]
    async fn test_go_to_requires_earlier_sections_complete() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert!(!ctl.go_to(1));
        assert!(!ctl.go_to(7));
        ctl.answer("visa_type", "F1").unwrap();
        assert!(ctl.go_to(1));
        assert!(ctl.go_to(0));
    }

    #[tokio::test]
    async fn test_submit_validates_every_section() {
        let catalog = Arc::new(
            Catalog::new(
                vec![
                    Section::new("a", "A").with_questions(vec![Question::text("q1", "One").required()]),
                    Section::new("b", "B")
                        .with_questions(vec![Question::radio("q2", "Two", &["Yes", "No"]).required()]),
                ],
                PrefillMap::none(),
            )
            .unwrap(),
        );
        let store = Arc::new(MemoryStore::new());
        let ctl = QuestionnaireController::builder(catalog, Arc::clone(&store) as Arc<dyn ResponseStore>)
            .initialize("c1", ClientReference::default(), None);

        let outcome = ctl.submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Incomplete {
                section_index: 0,
                section_id: "a".to_string(),
                missing: vec!["q1".to_string()],
            }
        );

        ctl.answer("q1", "filled").unwrap();
        let outcome = ctl.submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Incomplete {
                section_index: 1,
                section_id: "b".to_string(),
                missing: vec!["q2".to_string()],
            }
        );
        assert_eq!(ctl.status(), QuestionnaireStatus::InProgress);
        assert!(!ctl.is_submitting());

        ctl.flush().await;
        assert_eq!(store.status_of("c1").await, Some(QuestionnaireStatus::InProgress));
    }

    #[tokio::test]
    async fn test_keep_completed_policy() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.answer("visa_type", "H1B").unwrap();
        ctl.submit().await.unwrap();

        ctl.answer("visa_type", "F1").unwrap();
        assert_eq!(ctl.status(), QuestionnaireStatus::Completed);
    }

    #[tokio::test]
    async fn test_revert_policy() {
        let ctl = QuestionnaireController::builder(catalog(), Arc::new(MemoryStore::new()))
            .reopen_policy(ReopenPolicy::RevertToInProgress)
            .initialize("c1", ClientReference::default(), None);
        ctl.answer("visa_type", "H1B").unwrap();
        ctl.submit().await.unwrap();

        ctl.answer("visa_type", "F1").unwrap();
        assert_eq!(ctl.status(), QuestionnaireStatus::InProgress);
    }

    #[tokio::test]
    async fn test_saved_aggregate_used_as_is() {
        let store = Arc::new(MemoryStore::new());
        let mut saved = ResponseAggregate::empty(&catalog(), "c1");
        saved.section_mut("visa").upsert("visa_type", "F1".into());
        saved.status = QuestionnaireStatus::InProgress;
        store.save("c1", &saved).await.unwrap();

        let ctl = QuestionnaireController::builder(catalog(), store)
            .open("c1", ClientReference::default())
            .await;
        assert_eq!(ctl.aggregate(), saved);
        assert!(ctl.can_advance());
    }

    #[tokio::test]
    async fn test_progress() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        let progress = ctl.progress();
        assert_eq!(progress.current, 0);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.percent, 50);
        assert_eq!(progress.titles, vec!["Visa".to_string(), "Goals".to_string()]);
    }

    #[test]
    fn test_answer_without_runtime_still_updates_session() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.answer("visa_type", "H1B").unwrap();
        assert_eq!(ctl.status(), QuestionnaireStatus::InProgress);
        assert!(ctl.can_advance());
    }

    #[test]
    fn test_reopen_policy_table() {
        use QuestionnaireStatus::*;
        assert_eq!(ReopenPolicy::KeepCompleted.status_after_edit(NotStarted), InProgress);
        assert_eq!(ReopenPolicy::KeepCompleted.status_after_edit(Completed), Completed);
        assert_eq!(ReopenPolicy::RevertToInProgress.status_after_edit(Completed), InProgress);
    }
}

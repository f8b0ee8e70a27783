//! Broadcast channel for questionnaire lifecycle events.
//!
//! Views subscribe to learn when a submission has completed, typically to
//! navigate away from the questionnaire.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the questionnaire controller.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum QuestionnaireEvent {
    /// A questionnaire was submitted and persisted as completed.
    Submitted { client_id: String },
}

/// Type alias for the broadcast sender.
pub type EventSender = broadcast::Sender<QuestionnaireEvent>;

/// Type alias for the broadcast receiver.
pub type EventReceiver = broadcast::Receiver<QuestionnaireEvent>;

/// Create a new event channel with default capacity.
pub fn create_event_channel() -> EventSender {
    let (tx, _rx) = broadcast::channel(16);
    tx
}

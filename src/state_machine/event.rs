//! Events that drive a session forward

use crate::llm::LlmErrorKind;
use chrono::{DateTime, Utc};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Raw visitor text, exactly as received
    UserMessage { text: String, at: DateTime<Utc> },

    /// Result of a generative call requested by `Effect::RequestGeneration`
    GenerationFinished {
        /// Trimmed question, recorded in the transcript
        question: String,
        outcome: GenerationOutcome,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage {
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Outcome of one call to the text generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The service answered (possibly with empty text)
    Generated(String),
    /// The service failed or timed out
    Degraded { kind: LlmErrorKind, message: String },
}

impl GenerationOutcome {
    /// Trimmed text of a non-empty successful generation
    pub fn usable_text(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Generated(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            GenerationOutcome::Degraded { .. } => None,
        }
    }
}

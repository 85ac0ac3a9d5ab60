//! Effects produced by state transitions

use crate::notifier::TranscriptNotice;

/// Effects to be executed by the runtime after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the text generation service; the runtime feeds the result back
    /// as `Event::GenerationFinished`
    RequestGeneration { prompt: String, question: String },

    /// Hand the transcript to the notifier (background task)
    SendTranscript(TranscriptNotice),
}

impl Effect {
    pub fn request_generation(prompt: String, question: impl Into<String>) -> Self {
        Effect::RequestGeneration {
            prompt,
            question: question.into(),
        }
    }
}

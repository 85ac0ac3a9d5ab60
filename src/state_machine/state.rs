//! Session record and onboarding steps

use crate::resume::ResumeProfile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Position in the onboarding sequence.
///
/// Variants are declared in conversation order, so the derived `Ord` is the
/// progress order: a session's step never compares lower after a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greeting,
    AwaitingName,
    AwaitingEmail,
    AwaitingPhoneOptIn,
    AwaitingPhone,
    OpenQuestions,
}

impl Step {
    /// Numeric progress marker (0 = greet .. 5 = open Q&A)
    pub fn index(self) -> u8 {
        match self {
            Step::Greeting => 0,
            Step::AwaitingName => 1,
            Step::AwaitingEmail => 2,
            Step::AwaitingPhoneOptIn => 3,
            Step::AwaitingPhone => 4,
            Step::OpenQuestions => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::AwaitingName => "awaiting_name",
            Step::AwaitingEmail => "awaiting_email",
            Step::AwaitingPhoneOptIn => "awaiting_phone_opt_in",
            Step::AwaitingPhone => "awaiting_phone",
            Step::OpenQuestions => "open_questions",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who said a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Speaker {
    User,
    Agent,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => f.write_str("User"),
            Speaker::Agent => f.write_str("Agent"),
        }
    }
}

/// One line of the open Q&A transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Everything remembered about one visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub step: Step,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub wants_phone: bool,
    /// Accepted generative calls; gates the per-session quota
    pub model_call_count: u32,
    /// Append-only, filled from open Q&A onward
    pub transcript: Vec<TranscriptEntry>,
    /// Set once the transcript has been handed to the notifier
    pub notified: bool,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user turn followed by the agent's reply
    pub fn append_exchange(&mut self, question: &str, reply: &str, at: DateTime<Utc>) {
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::User,
            text: question.to_string(),
            at,
        });
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Agent,
            text: reply.to_string(),
            at,
        });
    }

    /// Transcript as newline-delimited `Speaker: text` lines
    pub fn render_transcript(&self) -> String {
        self.transcript
            .iter()
            .map(|entry| format!("{}: {}", entry.speaker, entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read-only inputs shared by every session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub profile: Arc<ResumeProfile>,
    /// Maximum generative calls per session
    pub model_call_cap: u32,
}

impl SessionContext {
    pub fn new(profile: Arc<ResumeProfile>, model_call_cap: u32) -> Self {
        Self {
            profile,
            model_call_cap,
        }
    }
}

//! Transcript notification
//!
//! Once a visitor has had a couple of exchanges, the conversation is sent to
//! the resume owner. Delivery is best-effort: failures are logged by the
//! runtime and never reach the visitor.

mod emailjs;

pub use emailjs::{EmailJsConfig, EmailJsNotifier};

use crate::state_machine::SessionRecord;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Placeholder for a visitor who skipped the phone step
pub const PHONE_NOT_PROVIDED: &str = "Not Provided";

/// Payload delivered to the resume owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptNotice {
    pub profile_name: String,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: String,
    /// Newline-delimited `Speaker: text` lines
    pub transcript: String,
}

impl TranscriptNotice {
    pub fn from_session(session: &SessionRecord, profile_name: &str) -> Self {
        let visitor_phone = if session.phone.is_empty() {
            PHONE_NOT_PROVIDED.to_string()
        } else {
            session.phone.clone()
        };
        Self {
            profile_name: profile_name.to_string(),
            visitor_name: session.name.clone(),
            visitor_email: session.email.clone(),
            visitor_phone,
            transcript: session.render_transcript(),
        }
    }
}

/// Notification delivery failure
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Transport(String),
    #[error("Notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Notification timed out after {0}s")]
    Timeout(u64),
}

/// Delivers transcripts to the resume owner
#[async_trait]
pub trait TranscriptNotifier: Send + Sync {
    async fn send(&self, notice: &TranscriptNotice) -> Result<(), NotifyError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TranscriptNotifier + ?Sized> TranscriptNotifier for Arc<T> {
    async fn send(&self, notice: &TranscriptNotice) -> Result<(), NotifyError> {
        (**self).send(notice).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Notifier used when no delivery service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl TranscriptNotifier for LogNotifier {
    async fn send(&self, notice: &TranscriptNotice) -> Result<(), NotifyError> {
        tracing::info!(
            visitor = %notice.visitor_name,
            email = %notice.visitor_email,
            phone = %notice.visitor_phone,
            lines = notice.transcript.lines().count(),
            "Transcript ready (no email delivery configured)"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

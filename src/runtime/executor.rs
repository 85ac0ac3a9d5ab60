//! Conversation engine

use super::traits::TextGenerator;
use crate::notifier::{NotifyError, TranscriptNotice, TranscriptNotifier};
use crate::session::SessionStore;
use crate::state_machine::transition::{generation_finished, DIDNT_UNDERSTAND_REPLY};
use crate::state_machine::{transition, Effect, Event, GenerationOutcome, SessionContext};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;

/// Drives every visitor session through the state machine
pub struct ConversationEngine<G, N>
where
    G: TextGenerator + 'static,
    N: TranscriptNotifier + 'static,
{
    context: SessionContext,
    sessions: SessionStore,
    generator: Arc<G>,
    notifier: Arc<N>,
    notify_timeout: Duration,
    /// Outstanding transcript notifications
    notifications: TaskTracker,
}

impl<G, N> ConversationEngine<G, N>
where
    G: TextGenerator + 'static,
    N: TranscriptNotifier + 'static,
{
    pub fn new(context: SessionContext, generator: G, notifier: N, notify_timeout: Duration) -> Self {
        Self {
            context,
            sessions: SessionStore::new(),
            generator: Arc::new(generator),
            notifier: Arc::new(notifier),
            notify_timeout,
            notifications: TaskTracker::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one visitor message and produce the reply.
    ///
    /// Never fails: validation problems, quota exhaustion and collaborator
    /// failures all come back as ordinary reply text.
    pub async fn handle_message(&self, session_id: &str, text: String) -> String {
        let handle = self.sessions.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        let mut events = vec![Event::user_message(text)];
        let mut reply = None;

        while let Some(event) = events.pop() {
            let result = match transition(&session, &self.context, event) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(session_id = %session_id, step = %session.step, error = %e, "Transition rejected");
                    return DIDNT_UNDERSTAND_REPLY.to_string();
                }
            };

            debug_assert!(result.session.step >= session.step, "step went backwards");
            if result.session.step != session.step {
                tracing::info!(
                    session_id = %session_id,
                    from = %session.step,
                    to = %result.session.step,
                    step_index = result.session.step.index(),
                    "Session advanced"
                );
            }

            *session = result.session;
            if result.reply.is_some() {
                reply = result.reply;
            }

            for effect in result.effects {
                if let Some(next) = self.execute_effect(session_id, effect).await {
                    events.push(next);
                }
            }
        }

        reply.unwrap_or_else(|| {
            tracing::error!(session_id = %session_id, step = %session.step, "Transition produced no reply");
            DIDNT_UNDERSTAND_REPLY.to_string()
        })
    }

    async fn execute_effect(&self, session_id: &str, effect: Effect) -> Option<Event> {
        match effect {
            Effect::RequestGeneration { prompt, question } => {
                let outcome = match self.generator.generate(&prompt).await {
                    Ok(text) => {
                        if text.trim().is_empty() {
                            tracing::warn!(session_id = %session_id, "Generation succeeded with empty text");
                        }
                        GenerationOutcome::Generated(text)
                    }
                    Err(e) => GenerationOutcome::Degraded {
                        kind: e.kind,
                        message: e.message,
                    },
                };
                Some(generation_finished(question, outcome))
            }
            Effect::SendTranscript(notice) => {
                self.spawn_notification(session_id, notice);
                None
            }
        }
    }

    /// Deliver a transcript in the background; the reply never waits on it
    fn spawn_notification(&self, session_id: &str, notice: TranscriptNotice) {
        let notifier = self.notifier.clone();
        let timeout = self.notify_timeout;
        let session_id = session_id.to_string();

        self.notifications.spawn(async move {
            let result = match tokio::time::timeout(timeout, notifier.send(&notice)).await {
                Ok(result) => result,
                Err(_) => Err(NotifyError::Timeout(timeout.as_secs())),
            };
            match result {
                Ok(()) => tracing::info!(
                    session_id = %session_id,
                    notifier = notifier.name(),
                    "Transcript sent"
                ),
                Err(e) => tracing::error!(
                    session_id = %session_id,
                    notifier = notifier.name(),
                    error = %e,
                    "Transcript delivery failed"
                ),
            }
        });
    }

    /// Wait for every notification spawned so far to finish
    pub async fn flush_notifications(&self) {
        self.notifications.close();
        self.notifications.wait().await;
        self.notifications.reopen();
    }
}

//! Mock implementations for testing
//!
//! These mocks enable engine tests without real I/O.

use super::traits::TextGenerator;
use super::ConversationEngine;
use crate::llm::LlmError;
use crate::notifier::{NotifyError, TranscriptNotice, TranscriptNotifier};
use crate::resume::ResumeProfile;
use crate::state_machine::SessionContext;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Generator
// ============================================================================

/// Mock generator that returns queued responses
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Record of all prompts received
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

// ============================================================================
// Mock Notifier
// ============================================================================

/// Mock notifier that records every notice
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<TranscriptNotice>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails after recording the notice
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<TranscriptNotice> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptNotifier for MockNotifier {
    async fn send(&self, notice: &TranscriptNotice) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(notice.clone());
        if self.fail {
            Err(NotifyError::Rejected {
                status: 500,
                body: "mock failure".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Test Engine Builder
// ============================================================================

pub type TestEngine = ConversationEngine<Arc<MockGenerator>, Arc<MockNotifier>>;

/// Builder wiring an engine to shared mocks the test can inspect
pub struct TestEngineBuilder {
    generator: Arc<MockGenerator>,
    notifier: Arc<MockNotifier>,
    profile: ResumeProfile,
    model_call_cap: u32,
    notify_timeout: Duration,
}

impl TestEngineBuilder {
    pub fn new() -> Self {
        Self {
            generator: Arc::new(MockGenerator::new()),
            notifier: Arc::new(MockNotifier::new()),
            profile: ResumeProfile::default(),
            model_call_cap: 2,
            notify_timeout: Duration::from_secs(5),
        }
    }

    pub fn generator(mut self, generator: MockGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn model_call_cap(mut self, cap: u32) -> Self {
        self.model_call_cap = cap;
        self
    }

    pub fn notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    pub fn build(self) -> (TestEngine, Arc<MockGenerator>, Arc<MockNotifier>) {
        let engine = ConversationEngine::new(
            SessionContext::new(Arc::new(self.profile), self.model_call_cap),
            self.generator.clone(),
            self.notifier.clone(),
            self.notify_timeout,
        );
        (engine, self.generator, self.notifier)
    }
}

/// Run the onboarding messages that take a fresh session to open Q&A
pub async fn onboard(engine: &TestEngine, session_id: &str) {
    for text in ["hi", "Jane", "jane@x.com", "no"] {
        engine.handle_message(session_id, text.to_string()).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use crate::state_machine::routing::BANNED_TOPIC_REPLY;
    use crate::state_machine::transition::{
        ASK_PHONE_OPT_IN_REPLY, GENERATION_FAILED_REPLY, INVALID_EMAIL_REPLY,
        OPEN_QUESTIONS_REPLY,
    };
    use crate::state_machine::state::Step;

    #[tokio::test]
    async fn test_onboarding_scenario() {
        let (engine, generator, _) = TestEngineBuilder::new().build();

        let mut replies = vec![];
        for text in ["hi", "Jane", "jane@x.com", "no"] {
            replies.push(engine.handle_message("s1", text.to_string()).await);
        }

        assert_eq!(
            replies,
            vec![
                ResumeProfile::default().greeting(),
                "Thanks Jane! Could you please share your email?".to_string(),
                ASK_PHONE_OPT_IN_REPLY.to_string(),
                OPEN_QUESTIONS_REPLY.to_string(),
            ]
        );
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.step, Step::OpenQuestions);
        assert!(!session.wants_phone);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_validation() {
        let (engine, _, _) = TestEngineBuilder::new().build();
        engine.handle_message("s1", "hi".to_string()).await;
        engine.handle_message("s1", "Jane".to_string()).await;

        let reply = engine.handle_message("s1", "  jane@x.com \n".to_string()).await;
        assert_eq!(reply, ASK_PHONE_OPT_IN_REPLY);
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.email, "jane@x.com");
    }

    #[tokio::test]
    async fn test_invalid_email_is_reasked() {
        let (engine, _, _) = TestEngineBuilder::new().build();
        engine.handle_message("s1", "hi".to_string()).await;
        engine.handle_message("s1", "Jane".to_string()).await;

        let reply = engine.handle_message("s1", "not an email".to_string()).await;
        assert_eq!(reply, INVALID_EMAIL_REPLY);
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.step, Step::AwaitingEmail);
    }

    #[tokio::test]
    async fn test_skills_question() {
        let (engine, generator, _) = TestEngineBuilder::new().build();
        onboard(&engine, "s1").await;

        let reply = engine.handle_message("s1", "what are your skills".to_string()).await;
        assert_eq!(
            reply,
            "Here are my skills: Python, Flask, Machine Learning, Langchain, Excel"
        );
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generative_fallback() {
        let (engine, generator, _) = TestEngineBuilder::new().build();
        onboard(&engine, "s1").await;
        generator.queue_text("  I enjoy hiking.  ");

        let reply = engine.handle_message("s1", " what do you do for fun? ".to_string()).await;
        assert_eq!(reply, "I enjoy hiking.");

        let prompts = generator.recorded_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("Q:  what do you do for fun? "));

        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.model_call_count, 1);
        assert_eq!(
            session.render_transcript(),
            "User: what do you do for fun?\nAgent: I enjoy hiking."
        );
    }

    #[tokio::test]
    async fn test_generation_failure_is_absorbed() {
        let (engine, generator, _) = TestEngineBuilder::new().build();
        onboard(&engine, "s1").await;
        generator.queue_error(LlmError::server_error("boom"));

        let reply = engine.handle_message("s1", "tell me a joke".to_string()).await;
        assert_eq!(reply, GENERATION_FAILED_REPLY);
        assert_eq!(generator.call_count(), 1);

        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.model_call_count, 1);
    }

    #[tokio::test]
    async fn test_quota_stops_generation() {
        let (engine, generator, _) = TestEngineBuilder::new().model_call_cap(2).build();
        onboard(&engine, "s1").await;
        generator.queue_text("one");
        generator.queue_error(LlmError::new(LlmErrorKind::Network, "down"));

        engine.handle_message("s1", "question one".to_string()).await;
        engine.handle_message("s1", "question two".to_string()).await;

        let expected = ResumeProfile::default().quota_exhausted_reply();
        for _ in 0..3 {
            let reply = engine.handle_message("s1", "question three".to_string()).await;
            assert_eq!(reply, expected);
        }

        assert_eq!(generator.call_count(), 2);
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.model_call_count, 2);
    }

    #[tokio::test]
    async fn test_banned_topic_skips_generator() {
        let (engine, generator, _) = TestEngineBuilder::new().build();
        onboard(&engine, "s1").await;

        let reply = engine.handle_message("s1", "I love you".to_string()).await;
        assert_eq!(reply, BANNED_TOPIC_REPLY);
        assert_eq!(generator.call_count(), 0);
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.model_call_count, 0);
    }

    #[tokio::test]
    async fn test_transcript_notified_exactly_once() {
        let (engine, generator, notifier) = TestEngineBuilder::new().model_call_cap(5).build();
        onboard(&engine, "s1").await;
        for answer in ["a1", "a2", "a3", "a4"] {
            generator.queue_text(answer);
        }

        engine.handle_message("s1", "first question".to_string()).await;
        engine.flush_notifications().await;
        assert!(notifier.sent().is_empty(), "one exchange is not enough");

        engine.handle_message("s1", "second question".to_string()).await;
        engine.flush_notifications().await;
        assert_eq!(notifier.sent().len(), 1);

        engine.handle_message("s1", "third question".to_string()).await;
        engine.handle_message("s1", "fourth question".to_string()).await;
        engine.flush_notifications().await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].visitor_name, "Jane");
        assert_eq!(sent[0].visitor_phone, "Not Provided");
        assert_eq!(
            sent[0].transcript,
            "User: first question\nAgent: a1\nUser: second question\nAgent: a2"
        );
        assert!(engine.sessions().snapshot("s1").await.unwrap().notified);
    }

    #[tokio::test]
    async fn test_empty_generation_does_not_notify() {
        let (engine, generator, notifier) = TestEngineBuilder::new().build();
        onboard(&engine, "s1").await;
        generator.queue_text("a1");
        generator.queue_text("   ");

        engine.handle_message("s1", "first question".to_string()).await;
        let reply = engine.handle_message("s1", "second question".to_string()).await;
        engine.flush_notifications().await;

        assert_eq!(reply, GENERATION_FAILED_REPLY);
        assert!(notifier.sent().is_empty());
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert!(!session.notified);
        assert_eq!(session.model_call_count, 2);
    }

    #[tokio::test]
    async fn test_failed_notification_is_not_retried() {
        let (engine, generator, notifier) = TestEngineBuilder::new()
            .notifier(MockNotifier::failing())
            .model_call_cap(5)
            .build();
        onboard(&engine, "s1").await;
        for answer in ["a1", "a2", "a3"] {
            generator.queue_text(answer);
        }

        for question in ["q1", "q2", "q3"] {
            let reply = engine.handle_message("s1", question.to_string()).await;
            assert!(reply.starts_with('a'));
        }
        engine.flush_notifications().await;

        assert_eq!(notifier.sent().len(), 1);
        assert!(engine.sessions().snapshot("s1").await.unwrap().notified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_notifier_does_not_delay_reply() {
        let (engine, generator, notifier) = TestEngineBuilder::new()
            .notifier(MockNotifier::new().with_delay(Duration::from_secs(3600)))
            .notify_timeout(Duration::from_secs(10))
            .build();
        onboard(&engine, "s1").await;
        generator.queue_text("a1");
        generator.queue_text("a2");

        engine.handle_message("s1", "what are your projects".to_string()).await;
        let reply = engine.handle_message("s1", "q2".to_string()).await;
        assert_eq!(reply, "a1");

        // The notification times out rather than completing
        engine.flush_notifications().await;
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_messages_are_serialized_per_session() {
        let (engine, generator, _) = TestEngineBuilder::new()
            .generator(MockGenerator::new().with_delay(Duration::from_millis(50)))
            .model_call_cap(1)
            .build();
        let engine = Arc::new(engine);
        onboard(&engine, "s1").await;
        generator.queue_text("only answer");
        generator.queue_text("should never be used");

        let a = tokio::spawn({
            let engine = engine.clone();
            async move { engine.handle_message("s1", "question a".to_string()).await }
        });
        let b = tokio::spawn({
            let engine = engine.clone();
            async move { engine.handle_message("s1", "question b".to_string()).await }
        });
        let mut replies = vec![a.await.unwrap(), b.await.unwrap()];
        replies.sort();

        let mut expected = vec![
            "only answer".to_string(),
            ResumeProfile::default().quota_exhausted_reply(),
        ];
        expected.sort();
        assert_eq!(replies, expected);
        assert_eq!(generator.call_count(), 1);
        let session = engine.sessions().snapshot("s1").await.unwrap();
        assert_eq!(session.model_call_count, 1);
        assert_eq!(session.transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_quota() {
        let (engine, generator, _) = TestEngineBuilder::new().model_call_cap(1).build();
        onboard(&engine, "a").await;
        onboard(&engine, "b").await;
        generator.queue_text("for a");
        generator.queue_text("for b");

        assert_eq!(engine.handle_message("a", "q".to_string()).await, "for a");
        assert_eq!(engine.handle_message("b", "q".to_string()).await, "for b");
        assert_eq!(engine.sessions().session_count().await, 2);
    }
}

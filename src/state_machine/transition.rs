//! Pure state transition function
//!
//! Given the same session, context, and event this always produces the same
//! result. The generative call and the transcript notification leave as
//! effects; the runtime executes them and feeds generation results back in.

use super::event::{Event, GenerationOutcome};
use super::routing::{route_question, Route, BANNED_TOPIC_REPLY};
use super::state::{SessionContext, SessionRecord, Step};
use super::validation::{asks_for_contact, is_affirmative, is_valid_email, is_valid_phone};
use super::Effect;
use crate::notifier::TranscriptNotice;
use crate::system_prompt::build_persona_prompt;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Transcript length (two full exchanges) before a notification is sent
const MIN_TRANSCRIPT_ENTRIES_FOR_NOTICE: usize = 4;

pub const ASK_NAME_AGAIN_REPLY: &str = "Sorry, I didn't catch that. May I know your name?";
pub const ASK_PHONE_OPT_IN_REPLY: &str = "Would you like to provide your phone number? (yes/no)";
pub const INVALID_EMAIL_REPLY: &str =
    "Invalid email format. Please enter a valid email like name@example.com.";
pub const OPEN_QUESTIONS_REPLY: &str =
    "Awesome! You can now ask me anything about my resume or other queries.";
pub const ASK_PHONE_REPLY: &str = "Please enter your phone number:";
pub const PHONE_SAVED_REPLY: &str =
    "Got it! Now feel free to ask anything about my resume or general questions.";
pub const INVALID_PHONE_REPLY: &str = "Invalid phone number. Please enter a valid one.";
pub const GENERATION_FAILED_REPLY: &str =
    "⚠️ Sorry, I couldn't come up with an answer right now. Please try again later.";
pub const DIDNT_UNDERSTAND_REPLY: &str = "I didn't understand that. Can you please repeat?";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: SessionRecord,
    /// Reply for the visitor; `None` while a generation is pending
    pub reply: Option<String>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: SessionRecord) -> Self {
        Self {
            session,
            reply: None,
            effects: vec![],
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Generation result received while session is at step {0}")]
    UnexpectedGeneration(Step),
}

/// Pure transition function
pub fn transition(
    session: &SessionRecord,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let mut next = session.clone();

    match (session.step, event) {
        // Greeting ignores whatever the visitor said
        (Step::Greeting, Event::UserMessage { .. }) => {
            next.step = Step::AwaitingName;
            Ok(TransitionResult::new(next).with_reply(context.profile.greeting()))
        }

        (Step::AwaitingName, Event::UserMessage { text, .. }) => {
            let name = text.trim();
            if name.is_empty() {
                return Ok(TransitionResult::new(next).with_reply(ASK_NAME_AGAIN_REPLY));
            }
            next.name = name.to_string();
            next.step = Step::AwaitingEmail;
            let reply = format!("Thanks {name}! Could you please share your email?");
            Ok(TransitionResult::new(next).with_reply(reply))
        }

        (Step::AwaitingEmail, Event::UserMessage { text, .. }) => {
            let email = text.trim();
            if !is_valid_email(email) {
                tracing::debug!("Rejected email address, asking again");
                return Ok(TransitionResult::new(next).with_reply(INVALID_EMAIL_REPLY));
            }
            next.email = email.to_string();
            next.step = Step::AwaitingPhoneOptIn;
            Ok(TransitionResult::new(next).with_reply(ASK_PHONE_OPT_IN_REPLY))
        }

        (Step::AwaitingPhoneOptIn, Event::UserMessage { text, .. }) => {
            if is_affirmative(text.trim()) {
                next.wants_phone = true;
                next.step = Step::AwaitingPhone;
                Ok(TransitionResult::new(next).with_reply(ASK_PHONE_REPLY))
            } else {
                next.wants_phone = false;
                next.step = Step::OpenQuestions;
                Ok(TransitionResult::new(next).with_reply(OPEN_QUESTIONS_REPLY))
            }
        }

        (Step::AwaitingPhone, Event::UserMessage { text, .. }) => {
            let phone = text.trim();
            if asks_for_contact(phone) {
                next.step = Step::OpenQuestions;
                return Ok(TransitionResult::new(next).with_reply(context.profile.contact_reply()));
            }
            if !is_valid_phone(phone) {
                tracing::debug!("Rejected phone number, asking again");
                return Ok(TransitionResult::new(next).with_reply(INVALID_PHONE_REPLY));
            }
            next.phone = phone.to_string();
            next.step = Step::OpenQuestions;
            Ok(TransitionResult::new(next).with_reply(PHONE_SAVED_REPLY))
        }

        (Step::OpenQuestions, Event::UserMessage { text, at }) => {
            let question = text.trim();
            let reply = match route_question(question, session, context) {
                Route::Resume(reply) => reply,
                Route::BannedTopic => BANNED_TOPIC_REPLY.to_string(),
                Route::QuotaExhausted => context.profile.quota_exhausted_reply(),
                Route::Generate => {
                    next.model_call_count += 1;
                    let prompt = build_persona_prompt(&context.profile, &text);
                    return Ok(TransitionResult::new(next)
                        .with_effect(Effect::request_generation(prompt, question)));
                }
            };
            next.append_exchange(question, &reply, at);
            Ok(TransitionResult::new(next).with_reply(reply))
        }

        (
            Step::OpenQuestions,
            Event::GenerationFinished {
                question,
                outcome,
                at,
            },
        ) => {
            if let GenerationOutcome::Degraded { kind, message } = &outcome {
                tracing::warn!(kind = ?kind, error = %message, "Generation degraded, replying with apology");
            }
            let generated = outcome.usable_text().map(str::to_string);
            let reply = generated
                .clone()
                .unwrap_or_else(|| GENERATION_FAILED_REPLY.to_string());
            next.append_exchange(&question, &reply, at);

            let mut result = TransitionResult::new(next);
            if generated.is_some() && should_notify(&result.session) {
                result.session.notified = true;
                let notice = TranscriptNotice::from_session(&result.session, &context.profile.name);
                result = result.with_effect(Effect::SendTranscript(notice));
            }
            Ok(result.with_reply(reply))
        }

        (step, Event::GenerationFinished { .. }) => Err(TransitionError::UnexpectedGeneration(step)),
    }
}

/// Contact details known, not yet sent, and at least two full exchanges
fn should_notify(session: &SessionRecord) -> bool {
    !session.notified
        && !session.name.is_empty()
        && !session.email.is_empty()
        && session.transcript.len() >= MIN_TRANSCRIPT_ENTRIES_FOR_NOTICE
}

/// Build a generation-finished event stamped now
pub fn generation_finished(question: String, outcome: GenerationOutcome) -> Event {
    generation_finished_at(question, outcome, Utc::now())
}

pub fn generation_finished_at(
    question: String,
    outcome: GenerationOutcome,
    at: DateTime<Utc>,
) -> Event {
    Event::GenerationFinished {
        question,
        outcome,
        at,
    }
}

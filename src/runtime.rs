//! Runtime for executing visitor conversations
//!
//! Owns the session store and the outbound collaborators. For each inbound
//! message it locks the visitor's session, runs the pure state machine, and
//! executes the resulting effects: generation inline, transcript
//! notifications as tracked background tasks.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationEngine;
pub use traits::*;

use crate::notifier::TranscriptNotifier;
use std::sync::Arc;

/// Engine with the production generator and whichever notifier is configured
pub type ProductionEngine = ConversationEngine<LlmTextGenerator, Arc<dyn TranscriptNotifier>>;

//! Visitor conversation state machine
//!
//! Pure transitions over a per-session record: the onboarding steps collect
//! the visitor's contact details, then open Q&A routes each question to a
//! canned resume answer, a guard reply, or the generative fallback. All I/O
//! is expressed as [`Effect`]s executed by the runtime.

mod effect;
pub mod event;
pub mod routing;
pub mod state;
pub(crate) mod transition;
pub mod validation;


pub use effect::Effect;
pub use event::{Event, GenerationOutcome};
pub use state::{SessionContext, SessionRecord};
pub use transition::transition;

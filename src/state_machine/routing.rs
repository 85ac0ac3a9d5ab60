//! Open Q&A routing
//!
//! Each question is checked in a fixed order: resume keywords, then the
//! banned-topic guard, then the generative quota. Matching is
//! case-insensitive throughout: both the trigger check and the category
//! dispatch look at the lowercased text.

use super::state::{SessionContext, SessionRecord};

/// Any of these makes a question a resume question
const RESUME_KEYWORDS: &[&str] = &[
    "resume",
    "skill",
    "experience",
    "project",
    "email",
    "phone",
    "contact",
];

/// Topics the agent refuses to discuss
const BANNED_TOPICS: &[&str] = &["love", "sex", "marry", "date", "go out", "relationship"];

pub const CLARIFY_REPLY: &str = "Please clarify what you'd like to know about my resume.";
pub const BANNED_TOPIC_REPLY: &str =
    "Let's keep things professional 🙂 Feel free to ask about my skills, experience, or projects.";

/// Where a question goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Answered from the resume profile
    Resume(String),
    /// Matched a banned topic
    BannedTopic,
    /// Quota already spent
    QuotaExhausted,
    /// Needs the generative fallback
    Generate,
}

pub fn route_question(text: &str, session: &SessionRecord, context: &SessionContext) -> Route {
    let lowered = text.to_lowercase();

    if RESUME_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return Route::Resume(resume_answer(&lowered, context));
    }

    if BANNED_TOPICS.iter().any(|topic| lowered.contains(topic)) {
        return Route::BannedTopic;
    }

    if session.model_call_count >= context.model_call_cap {
        return Route::QuotaExhausted;
    }

    Route::Generate
}

/// First matching category wins: skill, experience, project, email/contact,
/// phone/call, then a clarification request.
fn resume_answer(lowered: &str, context: &SessionContext) -> String {
    let profile = &context.profile;
    if lowered.contains("skill") {
        profile.skills_reply()
    } else if lowered.contains("experience") {
        profile.experience_reply()
    } else if lowered.contains("project") {
        profile.projects_reply()
    } else if lowered.contains("email") || lowered.contains("contact") {
        profile.email_reply()
    } else if lowered.contains("phone") || lowered.contains("call") {
        profile.phone_reply()
    } else {
        CLARIFY_REPLY.to_string()
    }
}

//! Persona prompt for the generative fallback
//!
//! The model answers as the resume owner. The visitor's text is embedded
//! verbatim (untrimmed) after the persona instructions.

use crate::resume::ResumeProfile;
use std::fmt::Write;

/// Base instructions establishing the persona and guardrails
const PERSONA_PROMPT: &str = r"Respond politely and professionally, in the first person. Do not flirt or use abusive language. Keep answers brief.";

/// Build the prompt sent to the text generation service
pub fn build_persona_prompt(profile: &ResumeProfile, question: &str) -> String {
    let mut prompt = format!(
        "You are {}, answering questions from a visitor to your portfolio site. {PERSONA_PROMPT}",
        profile.name
    );

    if !profile.skills.is_empty() {
        let _ = write!(prompt, "\nYour skills: {}.", profile.skills.join(", "));
    }
    if !profile.experience.is_empty() {
        let _ = write!(prompt, "\nYour experience: {}", profile.experience);
    }

    let _ = write!(prompt, "\nQ: {question}");
    prompt
}

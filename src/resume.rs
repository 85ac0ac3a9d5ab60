//! Resume profile served by the agent
//!
//! The profile is either the built-in default or loaded once at startup from
//! a JSON file (`RESUME_PROFILE_PATH`). Reply wording that depends on profile
//! fields lives here so the state machine only decides *which* reply to give.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a profile file
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read resume profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid resume profile {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The resume the agent answers questions about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub projects: Vec<String>,
    pub email: String,
    pub phone: String,
}

impl Default for ResumeProfile {
    fn default() -> Self {
        Self {
            name: "Cletus".to_string(),
            skills: ["Python", "Flask", "Machine Learning", "Langchain", "Excel"]
                .into_iter()
                .map(String::from)
                .collect(),
            experience: "3+ years of experience in data science and full-stack development."
                .to_string(),
            projects: vec![
                "AI Chatbot using Gemini and EmailJS".to_string(),
                "React Portfolio with Three.js 3D Scenes".to_string(),
            ],
            email: "cletusbobola@gmail.com".to_string(),
            phone: "6381174925".to_string(),
        }
    }
}

impl ResumeProfile {
    /// Load a profile from a JSON file with the same shape as this struct
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn greeting(&self) -> String {
        format!("👋 Hi there! I'm {}. May I know your name?", self.name)
    }

    pub fn skills_reply(&self) -> String {
        format!("Here are my skills: {}", self.skills.join(", "))
    }

    pub fn experience_reply(&self) -> String {
        format!("Experience: {}", self.experience)
    }

    pub fn projects_reply(&self) -> String {
        format!("Projects: {}", self.projects.join(", "))
    }

    pub fn email_reply(&self) -> String {
        format!("You can contact me at {}", self.email)
    }

    pub fn phone_reply(&self) -> String {
        format!("📞 {}", self.phone)
    }

    /// Direct contact details, used when the visitor asks how to reach out
    pub fn contact_reply(&self) -> String {
        format!(
            "You can reach me at {} or on WhatsApp at {}.",
            self.email, self.phone
        )
    }

    pub fn quota_exhausted_reply(&self) -> String {
        format!(
            "I've answered your questions! 😊 For anything more, feel free to contact me at:\n{}\n WhatsApp: {}",
            self.email, self.phone
        )
    }
}

//! EmailJS delivery of transcripts

use super::{NotifyError, TranscriptNotice, TranscriptNotifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Credentials for an EmailJS template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Private key, required when the account enforces strict mode
    pub private_key: Option<String>,
}

/// Sends transcripts through the EmailJS REST API
pub struct EmailJsNotifier {
    client: Client,
    config: EmailJsConfig,
    url: String,
}

impl EmailJsNotifier {
    pub fn new(config: EmailJsConfig, timeout: Duration) -> Result<Self, NotifyError> {
        Self::with_url(config, timeout, EMAILJS_SEND_URL)
    }

    pub fn with_url(
        config: EmailJsConfig,
        timeout: Duration,
        url: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            url: url.into(),
        })
    }

    fn build_request<'a>(&'a self, notice: &'a TranscriptNotice) -> EmailJsRequest<'a> {
        EmailJsRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: TemplateParams {
                to_name: &notice.profile_name,
                name: &notice.visitor_name,
                email: &notice.visitor_email,
                phone: &notice.visitor_phone,
                transcript: &notice.transcript,
            },
        }
    }
}

#[async_trait]
impl TranscriptNotifier for EmailJsNotifier {
    async fn send(&self, notice: &TranscriptNotice) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.build_request(notice))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &str {
        "emailjs"
    }
}

// EmailJS API types

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_name: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    transcript: &'a str,
}

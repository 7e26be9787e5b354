use std::time::Duration;

use async_trait::async_trait;

use super::domain::LeadSubmission;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("lead webhook unreachable: {0}")]
    Transport(String),
    #[error("lead webhook responded with status {0}")]
    Rejected(u16),
}

/// Outbound hook receiving captured leads.
#[async_trait]
pub trait LeadWebhook: Send + Sync {
    async fn deliver(&self, lead: &LeadSubmission) -> Result<(), WebhookError>;
}

/// Posts each lead as a single-element JSON array.
#[derive(Debug, Clone)]
pub struct HttpLeadWebhook {
    client: reqwest::Client,
    url: String,
}

impl HttpLeadWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LeadWebhook for HttpLeadWebhook {
    async fn deliver(&self, lead: &LeadSubmission) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(std::slice::from_ref(lead))
            .send()
            .await
            .map_err(|err| WebhookError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

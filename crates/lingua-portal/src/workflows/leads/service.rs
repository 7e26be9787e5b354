use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LeadReceipt, LeadSubmission};
use super::webhook::{LeadWebhook, WebhookError};
use crate::workflows::consultations::{
    ConsultationError, ConsultationRepository, ConsultationService,
};

/// Forwards captured leads to the webhook and records them in the CRM.
pub struct LeadCaptureService<W, R> {
    webhook: Option<Arc<W>>,
    consultations: Arc<ConsultationService<R>>,
}

impl<W, R> LeadCaptureService<W, R>
where
    W: LeadWebhook + 'static,
    R: ConsultationRepository + 'static,
{
    pub fn new(webhook: Option<Arc<W>>, consultations: Arc<ConsultationService<R>>) -> Self {
        Self {
            webhook,
            consultations,
        }
    }

    /// The webhook is called first; a failed delivery records nothing.
    pub async fn capture(&self, lead: LeadSubmission) -> Result<LeadReceipt, LeadError> {
        lead.validate().map_err(LeadError::Validation)?;

        let forwarded = match &self.webhook {
            Some(webhook) => {
                webhook.deliver(&lead).await.map_err(|err| {
                    warn!(email = %lead.email, error = %err, "lead webhook delivery failed");
                    err
                })?;
                true
            }
            None => {
                warn!(email = %lead.email, "no lead webhook configured; recording lead locally");
                false
            }
        };

        let consultation = self.consultations.create(lead.to_consultation())?;
        info!(consultation = %consultation.id, forwarded, "lead captured");

        Ok(LeadReceipt {
            consultation_id: consultation.id.0,
            forwarded,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("invalid lead: {0}")]
    Validation(String),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error(transparent)]
    Consultation(#[from] ConsultationError),
}

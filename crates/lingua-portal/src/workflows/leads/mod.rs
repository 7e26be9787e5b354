pub mod domain;
pub mod router;
pub mod service;
pub mod webhook;

pub use domain::{LeadReceipt, LeadSubmission};
pub use router::lead_router;
pub use service::{LeadCaptureService, LeadError};
pub use webhook::{HttpLeadWebhook, LeadWebhook, WebhookError};

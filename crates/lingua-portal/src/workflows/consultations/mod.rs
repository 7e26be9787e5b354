//! Consultation CRM: sales leads moving through new → contacted → scheduled → converted,
//! with closing allowed from any open stage.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Consultation, ConsultationId, ConsultationKind, ConsultationQuery, ConsultationSort,
    ConsultationStatus, ConsultationUpdate, NewConsultation, StatusCount,
};
pub use export::{render_csv, ExportError};
pub use repository::{ConsultationRepository, InMemoryConsultationRepository};
pub use router::consultation_router;
pub use service::{ConsultationError, ConsultationService};

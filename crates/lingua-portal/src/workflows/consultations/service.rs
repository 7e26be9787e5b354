use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Consultation, ConsultationId, ConsultationQuery, ConsultationSort, ConsultationStatus,
    ConsultationUpdate, NewConsultation, StatusCount,
};
use super::export::{self, ExportError};
use super::repository::ConsultationRepository;
use crate::workflows::store::RepositoryError;

/// CRM operations over consultation records.
pub struct ConsultationService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> ConsultationService<R>
where
    R: ConsultationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn create(&self, input: NewConsultation) -> Result<Consultation, ConsultationError> {
        validate(&input)?;

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let record = Consultation {
            id: ConsultationId(format!("cons-{id:06}")),
            kind: input.kind,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            company: non_empty(input.company),
            job_title: non_empty(input.job_title),
            training_needs: input
                .training_needs
                .into_iter()
                .map(|need| need.trim().to_string())
                .filter(|need| !need.is_empty())
                .collect(),
            participants: input.participants,
            requirements: non_empty(input.requirements),
            preferred_language: non_empty(input.preferred_language),
            status: ConsultationStatus::New,
            notes: None,
            assignee: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(consultation = %stored.id, kind = stored.kind.label(), "consultation recorded");
        Ok(stored)
    }

    pub fn list(&self, query: &ConsultationQuery) -> Result<Vec<Consultation>, ConsultationError> {
        let mut records: Vec<Consultation> = self
            .repository
            .all()?
            .into_iter()
            .filter(|record| query.status.map_or(true, |status| record.status == status))
            .filter(|record| query.kind.map_or(true, |kind| record.kind == kind))
            .filter(|record| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |needle| record.matches_search(needle))
            })
            .collect();

        match query.sort {
            ConsultationSort::Newest => records.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            ConsultationSort::Oldest => records.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            ConsultationSort::Name => records.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }

        Ok(records)
    }

    pub fn get(&self, id: &ConsultationId) -> Result<Consultation, ConsultationError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ConsultationError::NotFound(id.clone()))
    }

    pub fn update(
        &self,
        id: &ConsultationId,
        update: ConsultationUpdate,
    ) -> Result<Consultation, ConsultationError> {
        let mut record = self.get(id)?;

        if let Some(next) = update.status {
            if !record.status.can_move_to(next) {
                return Err(ConsultationError::InvalidStatus {
                    from: record.status,
                    to: next,
                });
            }
            record.status = next;
        }
        if let Some(notes) = update.notes {
            record.notes = non_empty(Some(notes));
        }
        if let Some(assignee) = update.assignee {
            record.assignee = non_empty(Some(assignee));
        }
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        info!(consultation = %record.id, status = %record.status, "consultation updated");
        Ok(record)
    }

    pub fn delete(&self, id: &ConsultationId) -> Result<Consultation, ConsultationError> {
        match self.repository.delete(id) {
            Ok(record) => {
                info!(consultation = %record.id, "consultation deleted");
                Ok(record)
            }
            Err(RepositoryError::NotFound) => Err(ConsultationError::NotFound(id.clone())),
            Err(other) => Err(other.into()),
        }
    }

    /// Filtered list rendered as CSV, one data row per record.
    pub fn export_csv(&self, query: &ConsultationQuery) -> Result<String, ConsultationError> {
        let records = self.list(query)?;
        Ok(export::render_csv(&records)?)
    }

    pub fn summary(&self) -> Result<Vec<StatusCount>, ConsultationError> {
        let records = self.repository.all()?;
        Ok(ConsultationStatus::ordered()
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: records
                    .iter()
                    .filter(|record| record.status == status)
                    .count(),
            })
            .collect())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate(input: &NewConsultation) -> Result<(), ConsultationError> {
    if input.name.trim().is_empty() {
        return Err(ConsultationError::Validation("name is required".to_string()));
    }
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ConsultationError::Validation(
            "a valid email is required".to_string(),
        ));
    }
    if input.participants == Some(0) {
        return Err(ConsultationError::Validation(
            "participants must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConsultationError {
    #[error("invalid consultation: {0}")]
    Validation(String),
    #[error("consultation {0} not found")]
    NotFound(ConsultationId),
    #[error("consultation cannot move from {from} to {to}")]
    InvalidStatus {
        from: ConsultationStatus,
        to: ConsultationStatus,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

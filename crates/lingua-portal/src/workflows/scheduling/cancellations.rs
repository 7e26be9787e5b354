use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{
    CancellationId, CancellationStatus, NewStudentCancellation, StudentCancellation,
};
use super::repository::CancellationRepository;
use crate::workflows::store::RepositoryError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancellationQuery {
    pub status: Option<CancellationStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessCancellation {
    #[serde(default)]
    pub note: Option<String>,
}

/// Student course cancellations: pending until an admin processes them.
pub struct CancellationService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> CancellationService<R>
where
    R: CancellationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn submit(
        &self,
        input: NewStudentCancellation,
    ) -> Result<StudentCancellation, CancellationError> {
        self.submit_on(input, Utc::now().date_naive())
    }

    pub fn submit_on(
        &self,
        input: NewStudentCancellation,
        request_date: NaiveDate,
    ) -> Result<StudentCancellation, CancellationError> {
        if input.student_name.trim().is_empty() || input.course_name.trim().is_empty() {
            return Err(CancellationError::Validation(
                "studentName and courseName are required".to_string(),
            ));
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let record = StudentCancellation {
            id: CancellationId(format!("cancel-{id:06}")),
            student_name: input.student_name.trim().to_string(),
            course_name: input.course_name.trim().to_string(),
            instructor_name: input.instructor_name.trim().to_string(),
            cancel_reason: input.cancel_reason.trim().to_string(),
            status: CancellationStatus::Pending,
            request_date,
            processed_at: None,
            note: None,
        };

        Ok(self.repository.insert(record)?)
    }

    /// Pending requests first, then newest first within each status.
    pub fn list(
        &self,
        query: &CancellationQuery,
    ) -> Result<Vec<StudentCancellation>, CancellationError> {
        let mut records: Vec<StudentCancellation> = self
            .repository
            .all()?
            .into_iter()
            .filter(|record| query.status.map_or(true, |status| record.status == status))
            .collect();
        records.sort_by(|a, b| {
            let rank = |record: &StudentCancellation| match record.status {
                CancellationStatus::Pending => 0,
                CancellationStatus::Processed => 1,
            };
            rank(a)
                .cmp(&rank(b))
                .then_with(|| b.request_date.cmp(&a.request_date))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    pub fn process(
        &self,
        id: &CancellationId,
        input: ProcessCancellation,
    ) -> Result<StudentCancellation, CancellationError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or_else(|| CancellationError::NotFound(id.clone()))?;

        if record.status == CancellationStatus::Processed {
            return Err(CancellationError::AlreadyProcessed(id.clone()));
        }

        record.status = CancellationStatus::Processed;
        record.processed_at = Some(Utc::now());
        record.note = input.note.filter(|note| !note.trim().is_empty());
        self.repository.update(record.clone())?;

        info!(cancellation = %record.id, student = %record.student_name, "student cancellation processed");
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CancellationError {
    #[error("invalid cancellation: {0}")]
    Validation(String),
    #[error("cancellation {0} not found")]
    NotFound(CancellationId),
    #[error("cancellation {0} was already processed")]
    AlreadyProcessed(CancellationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

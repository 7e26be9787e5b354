use super::domain::{Consultation, ConsultationId};
use crate::workflows::store::{MemoryStore, RepositoryError};

/// Storage abstraction for consultations. Unlike leave requests these can be deleted.
pub trait ConsultationRepository: Send + Sync {
    fn insert(&self, record: Consultation) -> Result<Consultation, RepositoryError>;
    fn update(&self, record: Consultation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ConsultationId) -> Result<Option<Consultation>, RepositoryError>;
    fn delete(&self, id: &ConsultationId) -> Result<Consultation, RepositoryError>;
    fn all(&self) -> Result<Vec<Consultation>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryConsultationRepository {
    records: MemoryStore<ConsultationId, Consultation>,
}

impl ConsultationRepository for InMemoryConsultationRepository {
    fn insert(&self, record: Consultation) -> Result<Consultation, RepositoryError> {
        self.records.insert_new(record.id.clone(), record)
    }

    fn update(&self, record: Consultation) -> Result<(), RepositoryError> {
        self.records.replace(record.id.clone(), record)
    }

    fn fetch(&self, id: &ConsultationId) -> Result<Option<Consultation>, RepositoryError> {
        self.records.get(id)
    }

    fn delete(&self, id: &ConsultationId) -> Result<Consultation, RepositoryError> {
        self.records.remove(id)
    }

    fn all(&self) -> Result<Vec<Consultation>, RepositoryError> {
        self.records.values()
    }
}

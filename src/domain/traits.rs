//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{CreateDoctorRequest, Doctor, DoctorId};

/// Relational store holding the authoritative doctor rows.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Insert a new row and return it with its generated id
    async fn insert_doctor(&self, data: &CreateDoctorRequest) -> Result<Doctor, AppError>;

    /// Get a single doctor by id
    async fn get_doctor(&self, id: DoctorId) -> Result<Option<Doctor>, AppError>;
}

/// Search index holding a derived, searchable copy of each doctor.
#[async_trait]
pub trait DoctorIndex: Send + Sync {
    /// Check search engine connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Upsert the doctor under its document id
    async fn index_doctor(&self, doctor: &Doctor) -> Result<(), AppError>;

    /// Full-text match on the `specialty` field, in engine relevance order.
    ///
    /// `None` is forwarded as a match clause without a field.
    async fn search_by_specialty(&self, specialty: Option<&str>) -> Result<Vec<Doctor>, AppError>;
}

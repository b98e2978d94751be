//! Application service layer.
//!
//! This module composes the relational store and the search index
//! behind the three doctor use cases.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{
    AppError, CreateDoctorRequest, Doctor, DoctorId, DoctorIndex, DoctorRepository,
    HealthResponse, HealthStatus,
};
use crate::infra::observability::{DOCTOR_INDEX_FAILURES, DOCTOR_SEARCHES, DOCTORS_CREATED};

/// Application service for doctor records.
///
/// PostgreSQL is the source of truth; the search index is written after it
/// and read only by the specialty search. Both clients are held behind
/// trait objects so tests can inject in-memory mocks.
///
/// # Example
///
/// ```ignore
/// let repository = Arc::new(PostgresClient::with_defaults(&database_url).await?);
/// let index = Arc::new(OpenSearchClient::with_defaults(&endpoint)?);
/// let service = DoctorService::new(repository, index);
///
/// let doctor = service.create_doctor(&request).await?;
/// ```
pub struct DoctorService {
    repository: Arc<dyn DoctorRepository>,
    index: Arc<dyn DoctorIndex>,
}

impl DoctorService {
    /// Creates a new `DoctorService` instance.
    ///
    /// # Arguments
    ///
    /// * `repository` - Relational store for authoritative rows.
    /// * `index` - Search index receiving a copy of every created doctor.
    #[must_use]
    pub fn new(repository: Arc<dyn DoctorRepository>, index: Arc<dyn DoctorIndex>) -> Self {
        Self { repository, index }
    }

    /// Stores a new doctor and mirrors it into the search index.
    ///
    /// The workflow is:
    /// 1. Validates the input data
    /// 2. Inserts the row, obtaining the generated id
    /// 3. Indexes the same record under the id's string form
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - Validation fails (nothing is written)
    /// - The insert fails (the index is not touched)
    /// - The index write fails (the row is kept; the stores have diverged)
    #[instrument(skip(self, request), fields(specialty = %request.specialty))]
    pub async fn create_doctor(&self, request: &CreateDoctorRequest) -> Result<Doctor, AppError> {
        request
            .validate()
            .inspect_err(|e| warn!(error = %e, "Validation failed for create doctor request"))?;

        let doctor = self.repository.insert_doctor(request).await?;
        info!(doctor_id = doctor.id, "Doctor stored in database");

        if let Err(e) = self.index.index_doctor(&doctor).await {
            // No rollback and no retry: the row stays without a document
            warn!(
                doctor_id = doctor.id,
                error = %e,
                "Doctor stored but not indexed; search index is missing this record"
            );
            metrics::counter!(DOCTOR_INDEX_FAILURES).increment(1);
            return Err(e);
        }

        info!(doctor_id = doctor.id, "Doctor indexed");
        metrics::counter!(DOCTORS_CREATED).increment(1);
        Ok(doctor)
    }

    /// Gets a doctor from the relational store.
    #[instrument(skip(self))]
    pub async fn get_doctor(&self, id: DoctorId) -> Result<Option<Doctor>, AppError> {
        info!(doctor_id = id, "Fetching doctor");
        self.repository.get_doctor(id).await
    }

    /// Searches the index by specialty.
    #[instrument(skip(self))]
    pub async fn search_doctors(&self, specialty: Option<&str>) -> Result<Vec<Doctor>, AppError> {
        metrics::counter!(DOCTOR_SEARCHES).increment(1);
        let doctors = self.index.search_by_specialty(specialty).await?;
        info!(hits = doctors.len(), "Specialty search completed");
        Ok(doctors)
    }

    /// Performs a health check on both stores.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let db_health = match self.repository.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };

        let search_health = match self.index.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Search health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(db_health, search_health)
    }
}

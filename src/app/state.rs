//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::{DoctorIndex, DoctorRepository};
use crate::infra::observability::PrometheusHandle;

use super::service::DoctorService;

/// Shared application state for the Axum web server.
///
/// Holds the doctor service plus the two store clients it was built from.
/// Every field is behind an `Arc`, so cloning the state is cheap and
/// handlers never learn which concrete clients are in use.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let repository = Arc::new(PostgresClient::with_defaults(&database_url).await?);
/// let index = Arc::new(OpenSearchClient::with_defaults(&endpoint)?);
/// let state = AppState::new(repository, index);
///
/// let router = create_router(Arc::new(state));
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The doctor service composing both stores.
    pub service: Arc<DoctorService>,

    /// Relational store client.
    pub repository: Arc<dyn DoctorRepository>,

    /// Search index client.
    pub index: Arc<dyn DoctorIndex>,

    /// Prometheus handle rendered by `GET /metrics`, when a recorder is installed.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new `AppState`, wiring a `DoctorService` to the given clients.
    ///
    /// # Arguments
    ///
    /// * `repository` - A thread-safe reference to the relational store client.
    /// * `index` - A thread-safe reference to the search index client.
    #[must_use]
    pub fn new(repository: Arc<dyn DoctorRepository>, index: Arc<dyn DoctorIndex>) -> Self {
        let service = Arc::new(DoctorService::new(
            Arc::clone(&repository),
            Arc::clone(&index),
        ));

        Self {
            service,
            repository,
            index,
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle used by the metrics endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: Arc<PrometheusHandle>) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDoctorIndex, MockDoctorRepository};

    #[test]
    fn test_app_state_creation() {
        let repository = Arc::new(MockDoctorRepository::new());
        let index = Arc::new(MockDoctorIndex::new());

        let state = AppState::new(repository, index);

        assert!(Arc::strong_count(&state.service) >= 1);
        assert!(state.metrics.is_none());
    }

    #[test]
    fn test_app_state_is_clone() {
        let repository = Arc::new(MockDoctorRepository::new());
        let index = Arc::new(MockDoctorIndex::new());

        let state = AppState::new(repository, index);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.service, &cloned.service));
    }
}

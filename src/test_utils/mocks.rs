//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{
    AppError, CreateDoctorRequest, DatabaseError, Doctor, DoctorId, DoctorIndex,
    DoctorRepository, SearchError,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(ms) = self.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

/// Mock relational store for testing.
///
/// Rows live in an ordered in-memory map and ids are handed out
/// sequentially from 1, like a `BIGSERIAL` column.
///
/// # Example
///
/// ```
/// use doctor_directory::test_utils::{MockDoctorRepository, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockDoctorRepository::new();
///
/// // Create a mock that fails
/// let failing_mock = MockDoctorRepository::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockDoctorRepository {
    storage: Arc<Mutex<BTreeMap<DoctorId, Doctor>>>,
    next_id: AtomicI64,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockDoctorRepository {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets all stored rows in id order.
    pub fn get_all_doctors(&self) -> Vec<Doctor> {
        self.storage.lock().unwrap().values().cloned().collect()
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDoctorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorRepository for MockDoctorRepository {
    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn insert_doctor(&self, data: &CreateDoctorRequest) -> Result<Doctor, AppError> {
        self.increment_call_count();
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let doctor = Doctor::from_request(id, data);

        self.storage.lock().unwrap().insert(id, doctor.clone());
        Ok(doctor)
    }

    async fn get_doctor(&self, id: DoctorId) -> Result<Option<Doctor>, AppError> {
        self.increment_call_count();
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        Ok(self.storage.lock().unwrap().get(&id).cloned())
    }
}

/// Mock search index for testing.
///
/// Documents are kept by document id. Search approximates a `match`
/// query: a document hits when any whitespace-separated term of the
/// query equals a term of its specialty, ignoring case. Hits come back
/// in document-id order.
///
/// # Example
///
/// ```
/// use doctor_directory::test_utils::{MockDoctorIndex, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockDoctorIndex::new();
///
/// // Create a mock that fails
/// let failing_mock = MockDoctorIndex::with_config(MockConfig::failure("index closed"));
/// ```
pub struct MockDoctorIndex {
    documents: Arc<Mutex<BTreeMap<String, Doctor>>>,
    searches: Mutex<Vec<Option<String>>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockDoctorIndex {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            documents: Arc::new(Mutex::new(BTreeMap::new())),
            searches: Mutex::new(Vec::new()),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets the specialty argument of every search, in call order.
    pub fn get_searches(&self) -> Vec<Option<String>> {
        self.searches.lock().unwrap().clone()
    }

    /// Gets all indexed `(document id, body)` pairs.
    pub fn get_documents(&self) -> Vec<(String, Doctor)> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .map(|(id, doctor)| (id.clone(), doctor.clone()))
            .collect()
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock search error".to_string());
            return Err(AppError::Search(SearchError::Status {
                status: 503,
                body: msg,
            }));
        }
        Ok(())
    }

    fn matches(specialty: &str, query: &str) -> bool {
        let terms: Vec<String> = specialty
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        query
            .split_whitespace()
            .any(|q| terms.contains(&q.to_lowercase()))
    }
}

impl Default for MockDoctorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorIndex for MockDoctorIndex {
    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Search(SearchError::Connection(
                "Mock search unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn index_doctor(&self, doctor: &Doctor) -> Result<(), AppError> {
        self.increment_call_count();
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        self.documents
            .lock()
            .unwrap()
            .insert(doctor.document_id(), doctor.clone());
        Ok(())
    }

    async fn search_by_specialty(&self, specialty: Option<&str>) -> Result<Vec<Doctor>, AppError> {
        self.increment_call_count();
        self.searches
            .lock()
            .unwrap()
            .push(specialty.map(str::to_string));
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        let Some(query) = specialty else {
            return Ok(Vec::new());
        };

        let documents = self.documents.lock().unwrap();
        Ok(documents
            .values()
            .filter(|doctor| Self::matches(&doctor.specialty, query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_repository_insert_and_get() {
        let mock = MockDoctorRepository::new();
        let request = CreateDoctorRequest::new("Asha Rao", "Cardiology", "Mumbai");

        let first = mock.insert_doctor(&request).await.unwrap();
        let second = mock.insert_doctor(&request).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let fetched = mock.get_doctor(first.id).await.unwrap();
        assert_eq!(fetched, Some(first));
    }

    #[tokio::test]
    async fn test_mock_repository_failure() {
        let mock = MockDoctorRepository::failing("Connection timeout");
        let request = CreateDoctorRequest::new("Asha Rao", "Cardiology", "Mumbai");

        let result = mock.insert_doctor(&request).await;
        assert!(result.is_err());
        assert!(mock.get_all_doctors().is_empty());
    }

    #[tokio::test]
    async fn test_mock_repository_call_count() {
        let mock = MockDoctorRepository::new();
        assert_eq!(mock.call_count(), 0);

        let _ = mock.health_check().await;
        assert_eq!(mock.call_count(), 1);

        let _ = mock.get_doctor(1).await;
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_index_match_semantics() {
        let mock = MockDoctorIndex::new();
        mock.index_doctor(&Doctor::new(1, "Asha Rao", "Cardiology", "Mumbai"))
            .await
            .unwrap();
        mock.index_doctor(&Doctor::new(2, "Meera Iyer", "Pediatric Cardiology", "Chennai"))
            .await
            .unwrap();
        mock.index_doctor(&Doctor::new(3, "Ravi Menon", "Neurology", "Kochi"))
            .await
            .unwrap();

        let hits = mock.search_by_specialty(Some("cardiology")).await.unwrap();
        assert_eq!(hits.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);

        let hits = mock.search_by_specialty(Some("")).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_mock_index_records_searches() {
        let mock = MockDoctorIndex::new();

        let _ = mock.search_by_specialty(Some("Cardiology")).await;
        let _ = mock.search_by_specialty(None).await;

        assert_eq!(
            mock.get_searches(),
            vec![Some("Cardiology".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_mock_index_upserts_by_document_id() {
        let mock = MockDoctorIndex::new();
        mock.index_doctor(&Doctor::new(5, "Old", "Oncology", "Pune"))
            .await
            .unwrap();
        mock.index_doctor(&Doctor::new(5, "New", "Oncology", "Pune"))
            .await
            .unwrap();

        let documents = mock.get_documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].0, "5");
        assert_eq!(documents[0].1.name, "New");
    }

    #[tokio::test]
    async fn test_mock_index_failure() {
        let mock = MockDoctorIndex::failing("index closed");

        let result = mock
            .index_doctor(&Doctor::new(1, "Asha Rao", "Cardiology", "Mumbai"))
            .await;
        assert!(matches!(result, Err(AppError::Search(_))));
        assert!(mock.get_documents().is_empty());
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let repository = MockDoctorRepository::new();
        let index = MockDoctorIndex::new();

        assert!(repository.health_check().await.is_ok());
        assert!(index.health_check().await.is_ok());

        repository.set_healthy(false);
        index.set_healthy(false);

        assert!(repository.health_check().await.is_err());
        assert!(index.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_latency() {
        let mock = MockDoctorRepository::with_config(MockConfig::success().with_latency(5));
        let started = std::time::Instant::now();
        mock.get_doctor(1).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}

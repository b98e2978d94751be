//! OpenSearch client implementation.
//!
//! Wraps the `opensearch` crate's client for the handful of APIs this
//! service needs: document index, `_search`, `_refresh` and ping.

use async_trait::async_trait;
use opensearch::{
    IndexParts, OpenSearch, SearchParts,
    auth::Credentials,
    http::{
        Url,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::IndicesRefreshParts,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{AppError, Doctor, DoctorIndex, SearchError};

/// Name of the index holding doctor documents unless configured otherwise.
pub const DEFAULT_INDEX: &str = "doctors";

/// Configuration for the search client
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    pub index: String,
    pub timeout: Duration,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            timeout: Duration::from_secs(30),
            username: None,
            password: None,
        }
    }
}

/// OpenSearch client bound to a single index
pub struct OpenSearchClient {
    client: OpenSearch,
    config: SearchClientConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    hits: HitsEnvelope<T>,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope<T> {
    hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
struct Hit<T> {
    #[serde(rename = "_source")]
    source: T,
}

/// Builds the `_search` body for a single-field match on `specialty`.
///
/// An absent value leaves the match clause empty rather than sending `null`.
#[must_use]
pub fn specialty_match_query(specialty: Option<&str>) -> Value {
    let mut clause = Map::new();
    if let Some(specialty) = specialty {
        clause.insert("specialty".to_string(), Value::String(specialty.to_string()));
    }
    json!({ "query": { "match": clause } })
}

/// Extracts the `_source` bodies from a `_search` response, keeping hit order.
pub fn parse_search_hits(body: Value) -> Result<Vec<Doctor>, SearchError> {
    let response: SearchResponse<Doctor> =
        serde_json::from_value(body).map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
    Ok(response.hits.hits.into_iter().map(|hit| hit.source).collect())
}

/// Turn a non-2xx answer into `SearchError::Status`, keeping the body when readable
async fn check_status(response: Response) -> Result<Response, SearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!(status = status.as_u16(), error = %e, "Failed to read error body");
            String::new()
        }
    };
    Err(SearchError::Status {
        status: status.as_u16(),
        body,
    })
}

impl OpenSearchClient {
    /// Create a new search client with custom configuration
    pub fn new(endpoint: &str, config: SearchClientConfig) -> Result<Self, AppError> {
        let url: Url = endpoint
            .parse()
            .map_err(|e| SearchError::Connection(format!("Invalid URL '{endpoint}': {e}")))?;

        let mut builder =
            TransportBuilder::new(SingleNodeConnectionPool::new(url)).timeout(config.timeout);
        if let Some(username) = &config.username {
            let password = config
                .password
                .as_ref()
                .map(|p| p.expose_secret().to_string())
                .unwrap_or_default();
            builder = builder.auth(Credentials::Basic(username.clone(), password));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchError::Connection(format!("Failed to build transport: {e}")))?;

        info!(endpoint = %endpoint, index = %config.index, "Created search client");
        Ok(Self {
            client: OpenSearch::new(transport),
            config,
        })
    }

    /// Create a new search client with default configuration
    pub fn with_defaults(endpoint: &str) -> Result<Self, AppError> {
        Self::new(endpoint, SearchClientConfig::default())
    }

    /// Name of the index this client reads and writes
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.config.index
    }

    /// Make every indexed document visible to search.
    ///
    /// The engine refreshes on its own interval; tests call this to avoid
    /// waiting for it.
    #[instrument(skip(self))]
    pub async fn refresh_index(&self) -> Result<(), AppError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[self.index_name()]))
            .send()
            .await
            .map_err(SearchError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl DoctorIndex for OpenSearchClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let response = self.client.ping().send().await.map_err(SearchError::from)?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, doctor), fields(doctor_id = doctor.id))]
    async fn index_doctor(&self, doctor: &Doctor) -> Result<(), AppError> {
        let document_id = doctor.document_id();
        debug!(index = %self.config.index, document_id = %document_id, "Indexing doctor");
        let response = self
            .client
            .index(IndexParts::IndexId(self.index_name(), &document_id))
            .body(doctor)
            .send()
            .await
            .map_err(SearchError::from)?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search_by_specialty(&self, specialty: Option<&str>) -> Result<Vec<Doctor>, AppError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index_name()]))
            .body(specialty_match_query(specialty))
            .send()
            .await
            .map_err(SearchError::from)?;
        let body = check_status(response)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        Ok(parse_search_hits(body)?)
    }
}

//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use utoipa::OpenApi;

use super::extractors::JsonBody;
use crate::app::AppState;
use crate::domain::{
    AppError, CreateDoctorRequest, CreateDoctorResponse, Doctor, DoctorId, ErrorResponse,
    HealthResponse, HealthStatus, SpecialtyQuery,
};

/// Body of every 404 from the doctor routes.
pub const NOT_FOUND_MESSAGE: &str = "Not found";
/// Body of a failed create.
pub const CREATE_FAILED_MESSAGE: &str = "Error creating doctor";
/// Body of a failed lookup by id.
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching doctor";
/// Body of a failed specialty search.
pub const SEARCH_FAILED_MESSAGE: &str = "Error searching doctors";

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Doctor Directory API",
        version = "0.1.0",
        description = "Create doctor records in PostgreSQL and search them by specialty through OpenSearch",
        license(
            name = "MIT"
        )
    ),
    paths(
        create_doctor_handler,
        get_doctor_handler,
        search_doctors_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            Doctor,
            CreateDoctorRequest,
            CreateDoctorResponse,
            ErrorResponse,
            HealthResponse,
            HealthStatus,
        )
    ),
    tags(
        (name = "doctors", description = "Doctor records and specialty search"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Error returned by the doctor handlers.
///
/// Store failures collapse into one fixed message per endpoint; the
/// underlying error is only logged.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    InvalidInput(String),
    /// The body could not be read as a create request
    Rejected {
        status: StatusCode,
        detail: String,
    },
    Failed {
        message: &'static str,
        source: AppError,
    },
}

impl ApiError {
    fn failed(message: &'static str, source: AppError) -> Self {
        match source {
            AppError::Validation(err) => ApiError::InvalidInput(err.to_string()),
            source => ApiError::Failed { message, source },
        }
    }

    pub fn creating(source: AppError) -> Self {
        Self::failed(CREATE_FAILED_MESSAGE, source)
    }

    pub fn fetching(source: AppError) -> Self {
        Self::failed(FETCH_FAILED_MESSAGE, source)
    }

    pub fn searching(source: AppError) -> Self {
        Self::failed(SEARCH_FAILED_MESSAGE, source)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            ApiError::InvalidInput(detail) => {
                warn!(detail = %detail, "Rejected invalid input");
                (StatusCode::BAD_REQUEST, format!("Invalid doctor: {detail}"))
            }
            ApiError::Rejected { status, detail } => {
                warn!(status = status.as_u16(), detail = %detail, "Rejected request body");
                (status, detail)
            }
            ApiError::Failed { message, source } => {
                error!(
                    store = source.source_store(),
                    error = %source,
                    "{}", message
                );
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Create a new doctor
#[utoipa::path(
    post,
    path = "/doctor",
    tag = "doctors",
    request_body = CreateDoctorRequest,
    responses(
        (status = 201, description = "Doctor stored and indexed", body = CreateDoctorResponse),
        (status = 400, description = "Validation error or malformed JSON", body = ErrorResponse),
        (status = 415, description = "Missing JSON content type", body = ErrorResponse),
        (status = 422, description = "Missing or mistyped field", body = ErrorResponse),
        (status = 500, description = "Either store failed", body = ErrorResponse)
    )
)]
pub async fn create_doctor_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<CreateDoctorResponse>), ApiError> {
    let doctor = state
        .service
        .create_doctor(&payload)
        .await
        .map_err(ApiError::creating)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateDoctorResponse::created(doctor)),
    ))
}

/// Get a single doctor by id from the relational store
#[utoipa::path(
    get,
    path = "/doctor/{id}",
    tag = "doctors",
    params(
        ("id" = String, Path, description = "Doctor id")
    ),
    responses(
        (status = 200, description = "Doctor found", body = Doctor),
        (status = 404, description = "Doctor not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn get_doctor_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    // Ids are generated integers, so anything else cannot exist
    let id: DoctorId = id.trim().parse().map_err(|_| ApiError::NotFound)?;
    let doctor = state
        .service
        .get_doctor(id)
        .await
        .map_err(ApiError::fetching)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(doctor))
}

/// Search doctors by specialty through the search index
#[utoipa::path(
    get,
    path = "/search/doctors",
    tag = "doctors",
    params(SpecialtyQuery),
    responses(
        (status = 200, description = "Matching doctors in relevance order", body = [Doctor]),
        (status = 500, description = "Search engine error", body = ErrorResponse)
    )
)]
pub async fn search_doctors_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpecialtyQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let doctors = state
        .service
        .search_doctors(query.specialty.as_deref())
        .await
        .map_err(ApiError::searching)?;
    Ok(Json(doctors))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness check
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// OpenAPI document as JSON
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatabaseError, SearchError, ValidationError};
    use http_body_util::BodyExt;

    async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_store_failures_collapse_to_fixed_message() {
        let (status, body) = body_of(ApiError::creating(AppError::Database(
            DatabaseError::Duplicate("doctors_pkey".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Error creating doctor");

        let (status, body) = body_of(ApiError::creating(AppError::Search(
            SearchError::Timeout("30s".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Error creating doctor");
    }

    #[tokio::test]
    async fn test_fetch_and_search_messages() {
        let (_, body) = body_of(ApiError::fetching(AppError::Database(
            DatabaseError::Query("syntax".to_string()),
        )))
        .await;
        assert_eq!(body.error, "Error fetching doctor");

        let (_, body) = body_of(ApiError::searching(AppError::Search(
            SearchError::InvalidResponse("no hits".to_string()),
        )))
        .await;
        assert_eq!(body.error, "Error searching doctors");
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not found");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let (status, body) = body_of(ApiError::creating(AppError::Validation(
            ValidationError::Failed("name: Name must be 1-255 characters".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Invalid doctor:"));
    }

    #[test]
    fn test_openapi_lists_doctor_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/doctor"));
        assert!(doc.paths.paths.contains_key("/doctor/{id}"));
        assert!(doc.paths.paths.contains_key("/search/doctors"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Identifier generated by the relational store for a doctor row.
pub type DoctorId = i64;

/// Message returned alongside a freshly created doctor.
pub const DOCTOR_CREATED_MESSAGE: &str = "Doctor created";

/// Core domain entity representing a doctor record.
///
/// The same flat shape is stored as a row in PostgreSQL and as the
/// document body in the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Doctor {
    #[schema(example = 1)]
    pub id: DoctorId,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[schema(example = "Mumbai")]
    pub location: String,
}

impl Doctor {
    pub fn new(
        id: DoctorId,
        name: impl Into<String>,
        specialty: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            specialty: specialty.into(),
            location: location.into(),
        }
    }

    /// Combines a generated id with the fields of a create request.
    pub fn from_request(id: DoctorId, request: &CreateDoctorRequest) -> Self {
        Self {
            id,
            name: request.name.clone(),
            specialty: request.specialty.clone(),
            location: request.location.clone(),
        }
    }

    /// Key of this doctor's document in the search index.
    #[must_use]
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

/// Request payload for creating a new doctor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDoctorRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[validate(length(max = 255, message = "Specialty must be at most 255 characters"))]
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    #[schema(example = "Mumbai")]
    pub location: String,
}

impl CreateDoctorRequest {
    pub fn new(
        name: impl Into<String>,
        specialty: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
            location: location.into(),
        }
    }
}

/// Response payload for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CreateDoctorResponse {
    #[schema(example = "Doctor created")]
    pub message: String,
    pub doctor: Doctor,
}

impl CreateDoctorResponse {
    pub fn created(doctor: Doctor) -> Self {
        Self {
            message: DOCTOR_CREATED_MESSAGE.to_string(),
            doctor,
        }
    }
}

/// Query string accepted by the specialty search endpoint.
///
/// `specialty` stays optional so an absent parameter reaches the
/// search engine untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpecialtyQuery {
    /// Text matched against the indexed `specialty` field
    pub specialty: Option<String>,
}

/// Error body returned by every failing doctor endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Error creating doctor")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub search: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(database: HealthStatus, search: HealthStatus) -> Self {
        let status = match (&database, &search) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            _ => HealthStatus::Unhealthy,
        };

        Self {
            status,
            database,
            search,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_from_request() {
        let request = CreateDoctorRequest::new("Asha Rao", "Cardiology", "Mumbai");
        let doctor = Doctor::from_request(42, &request);

        assert_eq!(doctor.id, 42);
        assert_eq!(doctor.name, "Asha Rao");
        assert_eq!(doctor.specialty, "Cardiology");
        assert_eq!(doctor.location, "Mumbai");
    }

    #[test]
    fn test_document_id_is_string_form_of_id() {
        let doctor = Doctor::new(1007, "Lin", "Dermatology", "Taipei");
        assert_eq!(doctor.document_id(), "1007");
    }

    #[test]
    fn test_create_response_wire_format() {
        let doctor = Doctor::new(1, "Asha Rao", "Cardiology", "Mumbai");
        let response = CreateDoctorResponse::created(doctor);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Doctor created",
                "doctor": {
                    "id": 1,
                    "name": "Asha Rao",
                    "specialty": "Cardiology",
                    "location": "Mumbai"
                }
            })
        );
    }

    #[test]
    fn test_error_response_wire_format() {
        let json = serde_json::to_string(&ErrorResponse::new("Not found")).unwrap();
        assert_eq!(json, r#"{"error":"Not found"}"#);
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateDoctorRequest::new("Asha Rao", "Cardiology", "Mumbai");
        assert!(valid.validate().is_ok());

        let empty_name = CreateDoctorRequest::new("", "Cardiology", "Mumbai");
        assert!(empty_name.validate().is_err());

        // Only the name is required to be non-empty
        let sparse = CreateDoctorRequest::new("Asha Rao", "", "");
        assert!(sparse.validate().is_ok());

        let long_location = CreateDoctorRequest::new("Asha Rao", "Cardiology", "x".repeat(256));
        let errors = long_location.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("location"));
    }

    #[test]
    fn test_create_request_rejects_missing_fields() {
        let result = serde_json::from_str::<CreateDoctorRequest>(r#"{"name":"Asha Rao"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_specialty_query_absent_and_empty() {
        let absent: SpecialtyQuery = serde_json::from_str("{}").unwrap();
        assert!(absent.specialty.is_none());

        let empty: SpecialtyQuery = serde_json::from_str(r#"{"specialty":""}"#).unwrap();
        assert_eq!(empty.specialty.as_deref(), Some(""));
    }

    #[test]
    fn test_health_response_all_healthy() {
        let response = HealthResponse::new(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_health_response_unhealthy_if_either_store_is() {
        let response = HealthResponse::new(HealthStatus::Healthy, HealthStatus::Unhealthy);
        assert_eq!(response.status, HealthStatus::Unhealthy);

        let response = HealthResponse::new(HealthStatus::Unhealthy, HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_health_status_wire_values() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Healthy).unwrap(),
            serde_json::json!("healthy")
        );
        assert_eq!(
            serde_json::to_value(HealthStatus::Unhealthy).unwrap(),
            serde_json::json!("unhealthy")
        );
        assert!(serde_json::from_str::<HealthStatus>(r#""degraded""#).is_err());
    }

    #[test]
    fn test_doctor_serialization() {
        let doctor = Doctor::new(9, "Ravi Menon", "Neurology", "Kochi");

        let json = serde_json::to_string(&doctor).unwrap();
        let deserialized: Doctor = serde_json::from_str(&json).unwrap();

        assert_eq!(doctor, deserialized);
    }
}

//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError, SearchError, ValidationError};
pub use traits::{DoctorIndex, DoctorRepository};
pub use types::{
    CreateDoctorRequest, CreateDoctorResponse, DOCTOR_CREATED_MESSAGE, Doctor, DoctorId,
    ErrorResponse, HealthResponse, HealthStatus, SpecialtyQuery,
};

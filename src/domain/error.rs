//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[derive(Error, Debug, Clone)]
pub enum SearchError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Search engine returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Validation failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::Failed(err.to_string()))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::Io(io_err) => DatabaseError::Connection(io_err.to_string()),
            sqlx::Error::Database(db_err) => {
                // SQLSTATE class 23 is integrity constraint violation
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::Duplicate(db_err.message().to_string()),
                    Some(code) if code.starts_with("23") => {
                        DatabaseError::Constraint(db_err.message().to_string())
                    }
                    _ => DatabaseError::Query(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::Migration(err.to_string()))
    }
}

impl From<opensearch::Error> for SearchError {
    fn from(err: opensearch::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout(err.to_string())
        } else if let Some(status) = err.status_code() {
            SearchError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            SearchError::Request(err.to_string())
        }
    }
}

impl AppError {
    /// Name of the backing store the error came from, for log fields.
    #[must_use]
    pub fn source_store(&self) -> &'static str {
        match self {
            AppError::Database(_) => "postgres",
            AppError::Search(_) => "search",
            AppError::Validation(_) => "request",
        }
    }
}

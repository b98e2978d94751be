//! PostgreSQL database client implementation.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::{
    AppError, CreateDoctorRequest, DatabaseError, Doctor, DoctorId, DoctorRepository,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from explicit connect options
    pub async fn new(options: PgConnectOptions, config: PostgresConfig) -> Result<Self, AppError> {
        info!(
            host = %options.get_host(),
            database = ?options.get_database(),
            "Connecting to PostgreSQL..."
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from a connection URL
    pub async fn connect(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Self::new(options, config).await
    }

    /// Create a new PostgreSQL client with default pool configuration
    pub async fn with_defaults(database_url: &str) -> Result<Self, AppError> {
        Self::connect(database_url, PostgresConfig::default()).await
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection; used on shutdown
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }

    fn row_to_doctor(row: &PgRow) -> Result<Doctor, AppError> {
        Ok(Doctor {
            id: row.try_get("id").map_err(DatabaseError::from)?,
            name: row.try_get("name").map_err(DatabaseError::from)?,
            specialty: row.try_get("specialty").map_err(DatabaseError::from)?,
            location: row.try_get("location").map_err(DatabaseError::from)?,
        })
    }
}

#[async_trait]
impl DoctorRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self, data), fields(specialty = %data.specialty))]
    async fn insert_doctor(&self, data: &CreateDoctorRequest) -> Result<Doctor, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO doctors (name, specialty, location)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.specialty)
        .bind(&data.location)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        let id: DoctorId = row.try_get("id").map_err(DatabaseError::from)?;
        Ok(Doctor::from_request(id, data))
    }

    #[instrument(skip(self))]
    async fn get_doctor(&self, id: DoctorId) -> Result<Option<Doctor>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, specialty, location
            FROM doctors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        row.as_ref().map(Self::row_to_doctor).transpose()
    }
}

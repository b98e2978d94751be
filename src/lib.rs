//! Doctor Directory
//!
//! An HTTP service that stores doctor records in PostgreSQL and mirrors
//! them into an OpenSearch index for specialty search.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   HTTP handlers, routing, error responses    │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Create, fetch and search orchestration     │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Store traits, doctor types, error types    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  PostgreSQL repository, OpenSearch client    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! PostgreSQL is the source of truth and serves lookups by id. The search
//! index receives a copy of every created doctor and serves specialty
//! queries. The two writes are sequential and not atomic; a failed index
//! write leaves the row in place.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use doctor_directory::api::create_router;
//! use doctor_directory::app::AppState;
//! use doctor_directory::infra::{OpenSearchClient, PostgresClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repository = Arc::new(PostgresClient::with_defaults(&database_url).await?);
//!     let index = Arc::new(OpenSearchClient::with_defaults("http://localhost:9200")?);
//!
//!     let state = Arc::new(AppState::new(repository, index));
//!
//!     let router = create_router(state);
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Mocks are shared with the integration tests through the `test-utils` feature
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

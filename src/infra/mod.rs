//! Infrastructure layer implementations.

pub mod database;
pub mod observability;
pub mod search;

pub use database::{PostgresClient, PostgresConfig};
pub use search::{OpenSearchClient, SearchClientConfig};

//! Concrete database client implementations.
//!
//! This module contains the PostgreSQL adapter that implements
//! the `DoctorRepository` trait defined in the domain layer.

pub mod postgres;

pub use postgres::{PostgresClient, PostgresConfig};

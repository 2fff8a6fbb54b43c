//! modelkit Store - persistence layer over SQLite
//!
//! Provides:
//! - Environment-sourced connection configuration
//! - Connection management and embedded, checksummed migrations
//! - Metadata-driven table creation for tests and scratch databases
//! - `Session`, the unit of work, with its query surface and
//!   `SimpleModel::get_latest_by_type`

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod schema;
pub mod session;

// Re-export key types
pub use config::DatabaseConfig;
pub use errors::Result;
pub use session::{Aggregate, Annotated, LatestByType, Session, TypeAggregate};

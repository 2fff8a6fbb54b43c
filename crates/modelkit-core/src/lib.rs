//! modelkit Core - typed model layer
//!
//! This crate provides everything about the `simplemodel` table that does
//! not need a live database connection:
//! - `ModelType` value codec (enumerated tag encoding with validation)
//! - `SimpleModel` record type with lifecycle tracking and diagnostic rendering
//! - Declarative `TableSchema` descriptions with a deterministic naming convention
//! - A small query builder (`Predicate`, `Query`) compiled to SQL fragments
//! - The structured error and logging facilities shared by all crates

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ModelError, Result};
pub use model::{Attr, Column, ModelType, RecordState, SimpleModel};
pub use query::{Direction, Predicate, Query, SqlValue};
pub use schema::{Model, SchemaRegistry, TableSchema};

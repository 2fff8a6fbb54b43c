//! Query composition
//!
//! A small builder over the `simplemodel` columns. It only produces SQL
//! fragments and bound parameters; the database evaluates them.

pub mod builder;
pub mod predicate;
pub mod value;

pub use builder::{CompiledQuery, Direction, Query};
pub use predicate::Predicate;
pub use value::SqlValue;

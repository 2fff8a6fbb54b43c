//! Core types shared across modelkit facilities
//!
//! This crate provides foundational types used by the error, logging and
//! configuration layers:
//!
//! - **Schema constants**: Canonical log field keys and event names
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction of
//!   credentials such as the database password

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;

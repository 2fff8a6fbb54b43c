//! Declarative table descriptions
//!
//! A record type is associated with its [`TableSchema`] through the
//! [`Model`] trait. Schemas know their own DDL and resolve constraint names
//! through a deterministic [`NamingConvention`].

pub mod naming;
pub mod registry;
pub mod table;

pub use naming::{ConstraintKind, NameParts, NamingConvention};
pub use registry::{Model, SchemaRegistry};
pub use table::{
    ColumnDef, ColumnDefault, ColumnType, Constraint, Index, TableSchema, TableSchemaBuilder,
    CURRENT_TIMESTAMP_SQL,
};

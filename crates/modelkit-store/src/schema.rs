//! Metadata-driven table creation
//!
//! The migrations are the deployed schema; `create_all` and `drop_all`
//! build the same tables straight from the registered [`TableSchema`]s,
//! which is what test setup and throwaway databases use.
//!
//! [`TableSchema`]: modelkit_core::TableSchema

use rusqlite::Connection;
use std::sync::OnceLock;

use modelkit_core::model::default_registry;
use modelkit_core::SchemaRegistry;

use crate::errors::{from_rusqlite, Result};

/// Registry of every table the store manages
pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(default_registry)
}

/// Create every table and index in `registry`, skipping existing ones
pub fn create_all(conn: &Connection, registry: &SchemaRegistry) -> Result<()> {
    for table in registry.tables() {
        for statement in table.create_sql() {
            conn.execute_batch(&statement).map_err(from_rusqlite)?;
        }
        tracing::debug!(table = table.name(), "table created");
    }
    Ok(())
}

/// Drop every table in `registry`, in reverse registration order
pub fn drop_all(conn: &Connection, registry: &SchemaRegistry) -> Result<()> {
    for table in registry.tables().iter().rev() {
        conn.execute_batch(&table.drop_sql()).map_err(from_rusqlite)?;
        tracing::debug!(table = table.name(), "table dropped");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_create_and_drop() {
        let conn = Connection::open_in_memory().unwrap();
        create_all(&conn, registry()).unwrap();
        assert!(table_exists(&conn, "simplemodel"));

        // second run is a no-op
        create_all(&conn, registry()).unwrap();

        drop_all(&conn, registry()).unwrap();
        assert!(!table_exists(&conn, "simplemodel"));
    }
}

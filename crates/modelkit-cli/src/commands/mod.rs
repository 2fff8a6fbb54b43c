//! Subcommand implementations
//!
//! Every command runs against an already migrated connection and prints JSON
//! on stdout; logs go to stderr.

use std::path::Path;

use rusqlite::Connection;

use modelkit_store::{db, migrations, DatabaseConfig};

pub mod add;
pub mod count;
pub mod latest;
pub mod migrate;
pub mod stats;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database from `--db`, or from the environment when absent
pub fn connect(path: Option<&Path>) -> Result<Connection, Box<dyn std::error::Error>> {
    let mut conn = match path {
        Some(path) => db::open(path)?,
        None => db::connect(&DatabaseConfig::from_env()?)?,
    };
    let applied = migrations::apply_migrations(&mut conn)?;
    if !applied.is_empty() {
        tracing::info!(applied = ?applied, "schema migrated");
    }
    Ok(conn)
}

/// Pretty-print a serializable value on stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

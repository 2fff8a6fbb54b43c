//! Migrate command
//!
//! Usage: modelkit migrate

use rusqlite::Connection;
use serde_json::json;

use modelkit_store::migrations;

use super::{print_json, CommandResult};

/// Report the migrations recorded in `schema_version`
///
/// Pending migrations were already applied when the connection was opened.
pub fn execute(conn: &mut Connection) -> CommandResult {
    let applied = migrations::applied_migrations(conn)?;
    print_json(&json!({ "applied": applied }))
}

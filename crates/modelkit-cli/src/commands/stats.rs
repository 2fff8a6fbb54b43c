//! Stats command
//!
//! Usage: modelkit stats

use rusqlite::Connection;
use serde_json::json;

use modelkit_core::Query;
use modelkit_store::Session;

use super::{print_json, CommandResult};

pub fn execute(conn: &mut Connection) -> CommandResult {
    let session = Session::begin(conn)?;
    let all = Query::new();
    let overall = session.aggregate(&all)?;
    let by_type = session.aggregate_by_type(&all)?;

    print_json(&json!({
        "overall": overall,
        "by_type": by_type,
    }))
}

//! Count command
//!
//! Usage: modelkit count [--col-1 <TEXT>] [--col-2 <TEXT>]

use clap::Args;
use rusqlite::Connection;
use serde_json::json;

use modelkit_core::{Column, Query};
use modelkit_store::Session;

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct CountArgs {
    #[arg(long = "col-1")]
    pub col_1: Option<String>,

    #[arg(long = "col-2")]
    pub col_2: Option<String>,
}

pub fn execute(conn: &mut Connection, args: CountArgs) -> CommandResult {
    let mut query = Query::new();
    if let Some(col_1) = args.col_1 {
        query = query.filter_by(Column::Col1, col_1);
    }
    if let Some(col_2) = args.col_2 {
        query = query.filter_by(Column::Col2, col_2);
    }

    let session = Session::begin(conn)?;
    print_json(&json!({ "count": session.count(&query)? }))
}

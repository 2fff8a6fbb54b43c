//! Latest command
//!
//! Usage: modelkit latest --type <TAG>

use clap::Args;
use rusqlite::Connection;

use modelkit_core::{ModelType, SimpleModel};
use modelkit_store::{LatestByType, Session};

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct LatestArgs {
    /// NORMAL or SUPER
    #[arg(long = "type")]
    pub model_type: ModelType,
}

/// Prints `null` when no record of the type exists
pub fn execute(conn: &mut Connection, args: LatestArgs) -> CommandResult {
    let session = Session::begin(conn)?;
    let latest = SimpleModel::get_latest_by_type(&session, args.model_type)?;
    let view = latest.as_ref().map(SimpleModel::view).transpose()?;
    print_json(&view)
}

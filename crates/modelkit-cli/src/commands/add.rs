//! Add command
//!
//! Usage: modelkit add [--col-1 <TEXT>] [--col-2 <TEXT>] [--type <TAG>] [--value <NUM>]

use clap::Args;
use rusqlite::Connection;

use modelkit_core::{ModelType, SimpleModel};
use modelkit_store::Session;

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long = "col-1")]
    pub col_1: Option<String>,

    #[arg(long = "col-2")]
    pub col_2: Option<String>,

    /// NORMAL or SUPER
    #[arg(long = "type")]
    pub model_type: Option<ModelType>,

    #[arg(long)]
    pub value: Option<f64>,
}

pub fn execute(conn: &mut Connection, args: AddArgs) -> CommandResult {
    let mut builder = SimpleModel::builder();
    if let Some(col_1) = args.col_1 {
        builder = builder.col_1(col_1);
    }
    if let Some(col_2) = args.col_2 {
        builder = builder.col_2(col_2);
    }
    if let Some(model_type) = args.model_type {
        builder = builder.model_type(model_type);
    }
    if let Some(value) = args.value {
        builder = builder.value(value);
    }

    let mut session = Session::begin(conn)?;
    session.add(builder.build())?;
    let written = session.commit()?;

    let views = written
        .iter()
        .map(SimpleModel::view)
        .collect::<Result<Vec<_>, _>>()?;
    match views.as_slice() {
        [view] => print_json(view),
        _ => print_json(&views),
    }
}

//! modelkit CLI
//!
//! Command-line access to the SimpleModel store

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use modelkit_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "modelkit")]
#[command(about = "modelkit - typed access to the SimpleModel store", long_about = None)]
struct Cli {
    /// Database file; overrides the DB_* environment configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Insert one record and print it
    Add(commands::add::AddArgs),
    /// Print the most recently created record of a type
    Latest(commands::latest::LatestArgs),
    /// Print value aggregates, overall and per type
    Stats,
    /// Count records, optionally filtered on col_1 and col_2
    Count(commands::count::CountArgs),
}

fn main() {
    init(Profile::Development);
    let cli = Cli::parse();

    let result = commands::connect(cli.db.as_deref()).and_then(|mut conn| match cli.command {
        Commands::Migrate => commands::migrate::execute(&mut conn),
        Commands::Add(args) => commands::add::execute(&mut conn, args),
        Commands::Latest(args) => commands::latest::execute(&mut conn, args),
        Commands::Stats => commands::stats::execute(&mut conn),
        Commands::Count(args) => commands::count::execute(&mut conn, args),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

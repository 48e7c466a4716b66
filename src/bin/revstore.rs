//! revstore CLI
//!
//! Inspect and bootstrap revision directories.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use revstore::scanner::list_revisions;
use revstore::version::read_record;
use revstore::{Config, Database, RecoveryPolicy, Result, Snapshot};
use tracing_subscriber::{fmt, EnvFilter};

/// revstore CLI
#[derive(Parser, Debug)]
#[command(name = "revstore")]
#[command(about = "Inspect and create revstore database directories")]
#[command(version)]
struct Args {
    /// Database directory
    #[arg(short, long, default_value = "./revstore_data")]
    data_dir: PathBuf,

    /// Fall back to older revisions if the newest is unreadable
    #[arg(long)]
    fallback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the newest revision and its table roots
    Show,

    /// List every revision file and whether it decodes
    List,

    /// Create a new, empty database
    Create,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,revstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let policy = if args.fallback {
        RecoveryPolicy::FallBackToOlder
    } else {
        RecoveryPolicy::Strict
    };
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .recovery_policy(policy)
        .build();

    let result = match args.command {
        Commands::Show => show(config),
        Commands::List => list(&config),
        Commands::Create => create(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn show(config: Config) -> Result<()> {
    let db = Database::open(config)?;
    print_snapshot(&db.snapshot());
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    for file in list_revisions(&config.data_dir)? {
        match read_record(&file.path) {
            Ok(record) => println!("{:08x}  ok       {}", file.revision, record.uuid),
            Err(e) => println!("{:08x}  corrupt  {}", file.revision, e),
        }
    }
    Ok(())
}

fn create(config: Config) -> Result<()> {
    let db = Database::create(config)?;
    print_snapshot(&db.snapshot());
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("revision: {:08x}", snapshot.revision);
    println!("uuid:     {}", snapshot.uuid);
    for (table, root) in snapshot.roots.iter() {
        match root {
            Some(block) => println!("  {:<10} {}", table, block),
            None => println!("  {:<10} -", table),
        }
    }
}

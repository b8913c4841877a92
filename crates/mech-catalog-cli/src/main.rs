use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use mech_catalog_loader::{
    collect_stats, default_samples, ensure_corpus_root, populate, run_migration, validate_samples,
    PopulateOptions, DEFAULT_BATCH_SIZE,
};
use mech_catalog_store_sqlite::SqliteStore;
use serde_json::{json, Value};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const CLI_CONTRACT_VERSION: &str = "cli.v1";
const DEFAULT_LOG_FILTER: &str = "mechcat=info,mech_catalog=info";

#[derive(Debug, Parser)]
#[command(name = "mechcat")]
#[command(about = "Battle unit catalog loader and corpus migrator")]
struct Cli {
    #[arg(long, global = true, env = "MECH_CATALOG_DB", default_value = "./battletech_dev.sqlite")]
    db: PathBuf,

    #[arg(
        long,
        global = true,
        env = "MECH_CATALOG_CORPUS",
        default_value = "./megameklab_converted_output/mekfiles"
    )]
    corpus: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Wipe the database and reload it from the corpus.
    Populate(PopulateArgs),
    /// Back-fill missing fields into the corpus files in place.
    Migrate(SampleArgs),
    /// Check sample files for back-filled fields.
    Validate(SampleArgs),
    /// Unit type breakdown of a populated database.
    Stats,
}

#[derive(Debug, Args)]
struct PopulateArgs {
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[derive(Debug, Args)]
struct SampleArgs {
    /// Sample file relative to the corpus root; repeatable.
    #[arg(long = "sample")]
    samples: Vec<String>,
}

impl SampleArgs {
    fn samples_or_default(self) -> Vec<String> {
        if self.samples.is_empty() {
            default_samples()
        } else {
            self.samples
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other
        }),
    }
}

fn emit_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Populate(args) => {
            if args.batch_size == 0 {
                return Err(anyhow!("--batch-size must be at least 1"));
            }
            tracing::info!("Populating {} from {}", cli.db.display(), cli.corpus.display());
            let report = populate(&PopulateOptions {
                corpus_root: cli.corpus,
                database: cli.db,
                batch_size: args.batch_size,
            })?;
            let report = serde_json::to_value(report)?;
            emit_json(json!({ "command": "populate", "report": report }))
        }
        Command::Migrate(args) => {
            tracing::info!("Migrating corpus at {}", cli.corpus.display());
            let report = run_migration(&cli.corpus, &args.samples_or_default())?;
            let report = serde_json::to_value(report)?;
            emit_json(json!({ "command": "migrate", "report": report }))
        }
        Command::Validate(args) => {
            ensure_corpus_root(&cli.corpus)?;
            let results = validate_samples(&cli.corpus, &args.samples_or_default());
            let results = serde_json::to_value(results)?;
            emit_json(json!({
                "command": "validate",
                "corpus": cli.corpus.display().to_string(),
                "samples": results,
            }))
        }
        Command::Stats => {
            if !cli.db.is_file() {
                return Err(anyhow!("database not found: {}", cli.db.display()));
            }
            let store = SqliteStore::open(&cli.db)?;
            let stats = collect_stats(&store)
                .with_context(|| format!("failed to read stats from {}", cli.db.display()))?;
            let stats = serde_json::to_value(stats)?;
            emit_json(json!({ "command": "stats", "stats": stats }))
        }
    }
}

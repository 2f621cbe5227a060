// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use ruletable_rs::config::Settings;
use ruletable_rs::engine::{DecisionTable, Facts, OutputMode, TableLoader};
use ruletable_rs::error::RuleTableError;
use ruletable_rs::server;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a table against a set of facts
    Eval {
        /// Path to the table file
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// A fact as name=value, repeatable
        #[arg(short, long = "fact")]
        facts: Vec<String>,

        /// Facts as a JSON object, applied before --fact
        #[arg(long)]
        facts_json: Option<String>,

        /// Write output cells as raw text instead of typed values
        #[arg(long)]
        raw_outputs: bool,
    },
    /// Print a table's columns and rows
    Inspect {
        /// Path to the table file
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
    /// Serve table evaluation over HTTP
    Serve {
        /// Path to the table file
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

async fn load_table(path: &Path, mode: OutputMode) -> Result<DecisionTable, RuleTableError> {
    Ok(TableLoader::new().load(path).await?.with_output_mode(mode))
}

fn build_facts(json: Option<&str>, assignments: &[String]) -> Result<Facts, RuleTableError> {
    let mut facts = match json {
        Some(text) => Facts::from_json(&serde_json::from_str(text)?)?,
        None => Facts::new(),
    };
    for assignment in assignments {
        let (name, value) = Facts::parse_assignment(assignment)?;
        facts.insert(&name, value);
    }
    Ok(facts)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();

    let args = Args::parse();

    // The HTTP layers report through tracing; everything else logs through env_logger.
    if matches!(args.command, Commands::Serve { .. }) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        env_logger::init();
    }

    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Commands::Eval {
            table,
            facts,
            facts_json,
            raw_outputs,
        } => {
            let mode = if raw_outputs {
                OutputMode::Raw
            } else {
                settings.output_mode
            };
            let path = settings.table_path(table)?;
            let table = load_table(&path, mode).await?;
            let facts = build_facts(facts_json.as_deref(), &facts)?;

            log::info!("Evaluating {:?} against {} facts", path, facts.len());
            let decision = table.decide(facts);
            println!("{}", serde_json::to_string_pretty(&decision.to_json())?);
        }
        Commands::Inspect { table } => {
            let path = settings.table_path(table)?;
            let table = load_table(&path, settings.output_mode).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Serve { table, port } => {
            let path = settings.table_path(table)?;
            let table = Arc::new(load_table(&path, settings.output_mode).await?);
            let port = port.unwrap_or(settings.port);
            server::serve(table, &settings.host, port).await?;
        }
    }

    Ok(())
}

//! Itemreg CLI - Command line access to a registry of JSON documents

mod config;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use itemreg_core::{Item, RedbRegistry, Registry, RegistryError};

#[derive(Parser)]
#[command(name = "itemreg")]
#[command(about = "Store and query JSON documents in an embedded registry", long_about = None)]
struct Cli {
    /// Registry directory (created if missing)
    #[arg(long, global = true, default_value = "registry")]
    db: PathBuf,

    /// JSON file with registry options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or replace a document
    Put {
        /// Document id
        id: String,
        /// Document body as JSON
        json: String,
    },
    /// Print a document
    Get {
        /// Document id
        id: String,
    },
    /// Delete a document and print what was removed
    Delete {
        /// Document id
        id: String,
    },
    /// List documents as a JSON array
    List {
        /// Only ids starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Only documents whose top-level field equals a value (NAME=VALUE)
        #[arg(long)]
        field: Option<String>,
    },
    /// Print every id, one per line
    Ids,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("document is not valid JSON: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("field filter must look like NAME=VALUE, got `{0}`")]
    InvalidField(String),

    #[error("cannot encode output: {0}")]
    Output(#[source] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = config::load(cli.config.as_deref())?;
    let registry = RedbRegistry::<Value>::open_with(&cli.db, &options)?;

    let result = match cli.command {
        Commands::Put { id, json } => cmd_put(&registry, id, &json, cli.pretty),
        Commands::Get { id } => cmd_get(&registry, &id, cli.pretty),
        Commands::Delete { id } => cmd_delete(&registry, &id, cli.pretty),
        Commands::List { prefix, field } => {
            cmd_list(&registry, prefix.as_deref(), field.as_deref(), cli.pretty)
        }
        Commands::Ids => cmd_ids(&registry),
    };

    registry.close();
    result
}

fn cmd_put(
    registry: &dyn Registry<Value>,
    id: String,
    json: &str,
    pretty: bool,
) -> Result<(), CliError> {
    let data: Value = serde_json::from_str(json).map_err(CliError::InvalidDocument)?;
    let item = registry.create_or_update(Item::new(id, data))?;
    print_json(&item, pretty)
}

fn cmd_get(registry: &dyn Registry<Value>, id: &str, pretty: bool) -> Result<(), CliError> {
    let item = registry.read(id)?;
    print_json(&item, pretty)
}

fn cmd_delete(registry: &dyn Registry<Value>, id: &str, pretty: bool) -> Result<(), CliError> {
    let item = registry.delete(id)?;
    print_json(&item, pretty)
}

fn cmd_list(
    registry: &dyn Registry<Value>,
    prefix: Option<&str>,
    field: Option<&str>,
    pretty: bool,
) -> Result<(), CliError> {
    let field = field.map(parse_field).transpose()?;

    let filter = |item: &Item<Value>| {
        let prefix_ok = prefix.map_or(true, |p| item.id.starts_with(p));
        let field_ok = field
            .as_ref()
            .map_or(true, |(name, value)| item.data.get(name) == Some(value));
        prefix_ok && field_ok
    };

    let items = registry.list_items(&filter)?;
    print_json(&items, pretty)
}

fn cmd_ids(registry: &dyn Registry<Value>) -> Result<(), CliError> {
    let mut ids = registry.list_ids()?;
    ids.sort();
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

/// Split `NAME=VALUE`; the value is read as JSON when it parses, else as a string
fn parse_field(spec: &str) -> Result<(String, Value), CliError> {
    let (name, raw) = spec
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| CliError::InvalidField(spec.to_string()))?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

fn print_json<S: serde::Serialize>(value: &S, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(CliError::Output)?;
    println!("{}", json);
    Ok(())
}

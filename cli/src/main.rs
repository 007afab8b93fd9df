//! inscribe CLI - Main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use inscribe_cli::commands;
use inscribe_cli::config::{CONFIG_FILE, Config};
use inscribe_cli::error::{self, CliError};
use inscribe_cli::output;

/// Query inscription data with the same parameters an API would accept
#[derive(Parser, Debug)]
#[command(name = "inscribe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: inscribe.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, value_name = "PATH", env = "INSCRIBE_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a page of records
    Query {
        entity: String,

        /// URL query string, e.g. "block_number=gt:840000&page_size=10"
        #[arg(default_value = "")]
        query: String,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Fetch one record by id
    Get {
        entity: String,

        id: String,

        /// URL query string (expand, include, exclude, filters)
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the SQL statement a query would run, without running it
    Explain {
        entity: String,

        #[arg(default_value = "")]
        query: String,
    },

    /// Validate the configuration against the database
    Check,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = Config::load_from(&config_path)?;
    let database = cli.database.unwrap_or_else(|| config.database_path());

    let open = || {
        commands::open_store(&database)
            .with_context(|| format!("failed to open database {}", database.display()))
    };

    match cli.command {
        Command::Query {
            entity,
            query,
            pretty,
        } => {
            let store = open()?;
            emit(commands::query::run(&config, &store, &entity, &query), pretty)
        }
        Command::Get {
            entity,
            id,
            query,
            pretty,
        } => {
            let store = open()?;
            emit(commands::get::run(&config, &store, &entity, &id, &query), pretty)
        }
        Command::Explain { entity, query } => match commands::explain::run(&config, &entity, &query) {
            Ok(explained) => {
                commands::explain::print(&explained);
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => emit(Err(err), true),
        },
        Command::Check => {
            let store = database.exists().then(open).transpose()?;
            let ok = commands::check::run(&config, store.as_ref())?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Prints a result body, or the error body for rejected requests.
fn emit(result: Result<serde_json::Value, CliError>, pretty: bool) -> anyhow::Result<ExitCode> {
    let (body, code) = match result {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(CliError::Query(err)) => {
            let response = err.to_response();
            eprintln!("{}", output::error_response(&response));
            let code = ExitCode::from(error::exit_code(response.status));
            (serde_json::to_value(response)?, code)
        }
        Err(other) => return Err(other.into()),
    };

    let text = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{text}");
    Ok(code)
}

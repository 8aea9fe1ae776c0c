//! `t38q` CLI — compile JSON query descriptions into Tile38 commands.
//!
//! ## Usage
//!
//! ```sh
//! # Compile a query from stdin, print the command line
//! echo '{"key":{"cmd":"get","key":"fleet","id":"truck1"}}' | t38q compile
//!
//! # Compile from file to file
//! t38q compile -i query.json -o command.txt
//!
//! # Emit the command as {"name": .., "args": [..]} instead of a command line
//! t38q compile --json -i query.json
//!
//! # Several queries at once (a JSON array), one command per line
//! t38q compile -i batch.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tile38_query::{Command, Query};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "t38q",
    version,
    about = "Compile JSON query descriptions into Tile38 commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log clause overwrites and compiled commands to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query (or a JSON array of queries) into commands
    Compile {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write each command as a JSON object instead of a command line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile {
            input,
            output,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            let queries = parse_queries(&text)?;
            let mut lines = Vec::with_capacity(queries.len());
            for (i, query) in queries.iter().enumerate() {
                let command = query
                    .compile()
                    .with_context(|| format!("Failed to compile query #{}", i + 1))?;
                lines.push(render(&command, json)?);
            }
            tracing::info!(count = lines.len(), "compiled queries");
            write_output(output.as_deref(), &lines.join("\n"))?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries commands. `RUST_LOG` wins over
/// `--verbose` when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Accept either a single query object or an array of them.
fn parse_queries(text: &str) -> Result<Vec<Query>> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("Failed to parse query JSON")?;
    let queries = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Query>, _>>(),
        other => serde_json::from_value(other).map(|query| vec![query]),
    };
    queries.context("Failed to parse query description")
}

fn render(command: &Command, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(command)?)
    } else {
        Ok(command.to_string())
    }
}

/// Read the query description from `path`, or stdin when no path is given.
fn read_input(path: Option<&str>) -> Result<String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read query JSON from stdin")?;
            buf
        }
    };
    if text.trim().is_empty() {
        anyhow::bail!("No query given: input is empty");
    }
    tracing::debug!(bytes = text.len(), source = path.unwrap_or("stdin"), "read query input");
    Ok(text)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write commands to: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

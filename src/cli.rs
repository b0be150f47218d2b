//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Query an Arrow Flight SQL endpoint and print the results with timings.
#[derive(Parser, Debug)]
#[command(name = "flight-query", version, about)]
pub struct Cli {
    /// Endpoint URL, e.g. http://localhost:8082 or https://host
    #[arg(long)]
    pub url: String,

    /// Target database name
    #[arg(long)]
    pub db: String,

    /// Bearer token sent with every request
    #[arg(
        long,
        env = "FLIGHT_QUERY_TOKEN",
        default_value = "",
        hide_env_values = true
    )]
    pub token: String,

    /// Extra header pairs, repeatable
    #[arg(
        short = 'H',
        long = "header",
        value_name = "KEY=VALUE",
        value_parser = parse_header,
        env = "FLIGHT_QUERY_HEADERS",
        value_delimiter = ','
    )]
    pub headers: Vec<(String, String)>,

    /// Generate a random trace ID and send it with the query
    #[arg(long)]
    pub gen_trace_id: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a SQL query and print the result table
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text
    pub query: String,

    /// Skip the warmup request issued before timing starts
    #[arg(long)]
    pub skip_warmup: bool,

    /// File where the table is printed instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

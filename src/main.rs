use std::fs::File;
use std::io::{self, Write};
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flight_query::cli::{Cli, Command, QueryArgs};
use flight_query::error::{ClientError, Result};
use flight_query::session::{self, Session};
use flight_query::timings::Timings;
use flight_query::{query, Client};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let target = session::parse_target(&cli.url)?;

    let mut session = Session::new(&cli.db, &cli.token).with_headers(cli.headers.clone());
    if cli.gen_trace_id {
        let trace_id = session::generate_trace_id();
        session = session.with_trace_id(&trace_id);
        println!("Trace ID set to {trace_id}");
    }

    let mut client = Client::connect(&target, &session).await?;

    match cli.command {
        Command::Query(ref args) => run_query(&mut client, args).await,
    }
}

async fn run_query(client: &mut Client, args: &QueryArgs) -> Result<()> {
    // absorb first-request connection overhead before the measured phases
    let before_warmup = Instant::now();
    if !args.skip_warmup {
        client.get_catalogs().await?;
    }
    let warmup = before_warmup.elapsed();

    let mut w: Box<dyn Write> = match &args.output {
        Some(path) => {
            Box::new(File::create(path).map_err(|e| ClientError::Write(e.to_string()))?)
        }
        None => Box::new(io::stdout()),
    };

    let timings = query::print_query(client, &mut w, &args.query).await?;
    w.flush().map_err(|e| ClientError::Write(e.to_string()))?;

    println!();
    println!(
        "{}",
        timings.merge(Timings {
            warmup,
            ..Timings::default()
        })
    );

    Ok(())
}

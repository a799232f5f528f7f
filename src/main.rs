#![forbid(unsafe_code)]

use error_iter::ErrorIter as _;
use is_terminal::IsTerminal as _;
use onlyargs::{CliError, OnlyArgs as _};
use onlyargs_derive::OnlyArgs;
use spendcount::client::starling::{StarlingClient, DEFAULT_API_URL};
use spendcount::model::Stats;
use spendcount::spending::{tally, Spending};
use spendcount::starling_proto::starling::Token;
use std::{env, process::ExitCode};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

/// Sum Starling Bank transaction amounts by spending category.
#[derive(Debug, OnlyArgs)]
#[footer = "Environment variables:"]
#[footer = "  - RUST_LOG accepts tracing filter directives, e.g. \"spendcount=trace\""]
#[footer = "      default is \"info\""]
#[footer = "  - TERM_COLOR accepts \"always\" to override automatic terminal sensing"]
struct Args {
    /// Personal access token for the Starling API.
    token: String,

    /// Enable verbose output.
    /// Prints every fetched transaction detail.
    verbose: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("Argument parsing error")]
    Cli(#[from] CliError),

    #[error("Unable to create Starling client")]
    Client(#[from] spendcount::errors::StarlingClientError),

    #[error("Unable to tally spending")]
    Tally(#[from] spendcount::errors::SpendingError),
}

fn main() -> ExitCode {
    // Initialize the tracing subscriber for instrumentation.
    // Uses the `RUST_LOG` environment var for configuration. E.g. `RUST_LOG=trace cargo run`
    // Logs go to stderr, the report goes to stdout.
    //
    // See: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/struct.EnvFilter.html#directives
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let term_color = env::var("TERM_COLOR")
        .map(|color| color == "always")
        .unwrap_or_else(|_| std::io::stderr().is_terminal());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(term_color)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    match run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(err, Error::Cli(_)) {
                eprintln!("{}", Args::HELP);
            }

            eprintln!("Error: {err}");
            for source in err.sources().skip(1) {
                eprintln!("  Caused by: {source}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let args: Args = onlyargs::parse()?;

    let client = StarlingClient::new(DEFAULT_API_URL, Token::from(args.token))?;
    let mut stats = Stats::default();
    let Spending { details, totals } = tally(&client, &mut stats)?;

    if args.verbose {
        println!("Transaction Details");
        println!("=========== =======");
        println!();
        for detail in &details {
            println!("{detail:#?}");
        }
        println!();
    }

    let spending = totals
        .iter()
        .map(|(category, total)| format!("{category}: {total}"))
        .collect::<Vec<_>>()
        .join(", ");
    info!("Spending: {{{spending}}}");

    println!("Spending by Category");
    println!("======== == ========");
    println!();
    println!("{totals}");

    stats.pretty_print();

    Ok(())
}

//! HQL - SQL-like queries over JVM heap snapshots.
//!
//! This is the entry point for the `hql` binary.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hql_graph::Heap;
use hql_repl::Repl;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hql")]
#[command(about = "Query JVM heap snapshots with SQL-like syntax", long_about = None)]
#[command(version)]
struct Cli {
    /// Heap snapshot in hprof format
    heap: PathBuf,

    /// Run a query and exit; may be repeated
    #[arg(short, long = "query", value_name = "TEXT")]
    queries: Vec<String>,

    /// Run the queries of a file and exit
    #[arg(short, long, value_name = "PATH", conflicts_with = "queries")]
    file: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not read or write the history file
    #[arg(long)]
    no_history: bool,

    /// History file for interactive mode
    #[arg(long, env = "HQL_HISTORY", value_name = "PATH", hide_env_values = true)]
    history: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `HQL_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("HQL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let heap = Heap::open(&cli.heap)
        .with_context(|| format!("failed to load heap from {}", cli.heap.display()))?;
    eprintln!(
        "Loaded {}: {} classes, {} instances",
        heap.header().format,
        heap.classes().len(),
        heap.instances().len()
    );

    let history = if cli.no_history {
        None
    } else {
        cli.history
            .or_else(|| dirs::home_dir().map(|home| home.join(".hql_history")))
    };
    let mut repl = Repl::new(&heap).with_history(history);

    // One-shot
    if !cli.queries.is_empty() {
        return Ok(match repl.run_queries(&cli.queries) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        });
    }

    // Batch
    let failures = if let Some(path) = &cli.file {
        repl.run_file(path)?
    } else if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        repl.run_script(&input)
    } else {
        repl.interactive()?;
        0
    };

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

//! Pulseline CLI - command-line front end for the import pipeline
//!
//! Commands:
//! - import: Run an export payload through the pipeline and print the report
//! - detect: Print the dialect a payload would be routed to

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use pulseline::{detect, envelope, error::Stage, import, ImportBundle, Transport, PIPELINE_VERSION};

/// Pulseline - import normalization for health-tracking export payloads
#[derive(Parser)]
#[command(name = "pulseline")]
#[command(author = "Pulseline Labs")]
#[command(version = PIPELINE_VERSION)]
#[command(about = "Normalize health export payloads into import bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an export payload through the pipeline and print a JSON report
    Import {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Transport wrapping of the payload
        #[arg(long, default_value = "json")]
        transport: TransportArg,

        /// Caller identity stamped onto produced records
        #[arg(long)]
        actor: Option<String>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the dialect a payload would be routed to
    Detect {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Transport wrapping of the payload
        #[arg(long, default_value = "json")]
        transport: TransportArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TransportArg {
    Json,
    Multipart,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Transport {
        match arg {
            TransportArg::Json => Transport::Json,
            TransportArg::Multipart => Transport::Multipart,
        }
    }
}

#[derive(Serialize)]
struct CliReport {
    version: &'static str,
    imported: usize,
    failed: usize,
    bundles: Vec<ImportBundle>,
    failures: Vec<CliFailure>,
}

#[derive(Serialize)]
struct CliFailure {
    index: usize,
    stage: Stage,
    error: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Import {
            input,
            transport,
            actor,
            pretty,
        } => {
            let payload = read_input(&input)?;
            let report = import(&payload, transport.into(), actor.as_deref())
                .map_err(|err| format!("{} ({} stage)", err, err.stage()))?;

            let failures = report
                .failures
                .into_iter()
                .map(|f| CliFailure {
                    index: f.index,
                    stage: f.error.stage(),
                    error: f.error.to_string(),
                })
                .collect::<Vec<_>>();
            let out = CliReport {
                version: PIPELINE_VERSION,
                imported: report.bundles.len(),
                failed: failures.len(),
                bundles: report.bundles,
                failures,
            };
            print_json(&out, pretty);
            Ok(())
        }

        Commands::Detect { input, transport } => {
            let payload = read_input(&input)?;
            let doc = envelope::extract(&payload, transport.into()).map_err(|e| e.to_string())?;
            match detect::detect(&doc) {
                Some(dialect) => {
                    println!("{dialect}");
                    Ok(())
                }
                None => Err("document structure matches no known export dialect".to_string()),
            }
        }
    }
}

fn read_input(path: &PathBuf) -> Result<Vec<u8>, String> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to render report: {e}"),
    }
}

//! Reindex relay handler
//!
//! Runs one step of an index-to-index copy per invocation. The invocation
//! substrate (or a prior step's self-dispatch) delivers a job payload; this
//! binary validates it, talks to the search clusters, prints the JSON result
//! on stdout, and — unless the job is finished — hands the next step's
//! payload back to the substrate.
//!
//! ## Usage
//!
//! ```text
//! reindex-handler payload.json          # one step, asynchronous dispatch
//! echo '{"source_host": ...}' | reindex-handler -
//! reindex-handler payload.json --inline # drive the whole job in-process
//! ```
//!
//! Output is `{"acknowledged": true}` on success or `{"error": "<message>"}`
//! on a fatal step failure (exit code 1). Logs go to stderr.

use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use reindex_core::{drive_to_completion, ReindexController};
use reindex_dispatch::{HttpDispatcher, QueueDispatcher};
use reindex_gateway::HttpSearchGateway;
use reindex_protocol::{ErrorReply, JobRequest};

mod runtime_env;

enum PayloadSource {
    Stdin,
    File(PathBuf),
}

struct Invocation {
    payload: PayloadSource,
    inline: bool,
}

fn print_help() {
    println!("Reindex relay handler");
    println!();
    println!("Usage: reindex-handler [PAYLOAD.json|-] [--inline]");
    println!();
    println!("Reads one job payload (file argument, or stdin with '-'), runs one");
    println!("step of the index copy, and prints the JSON result on stdout.");
    println!();
    println!("Flags:");
    println!("  --inline       Drive the whole job in-process instead of dispatching");
    println!("  --version      Print version and exit");
    println!("  --help         Print this help and exit");
}

fn parse_args() -> std::result::Result<Invocation, i32> {
    let mut payload = None;
    let mut inline = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Err(0);
            }
            "--version" | "-V" => {
                println!("reindex-handler {}", env!("CARGO_PKG_VERSION"));
                return Err(0);
            }
            "--inline" => inline = true,
            "-" => payload = Some(PayloadSource::Stdin),
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_help();
                return Err(2);
            }
            other => {
                if payload.is_some() {
                    eprintln!("More than one payload argument");
                    return Err(2);
                }
                payload = Some(PayloadSource::File(PathBuf::from(other)));
            }
        }
    }

    Ok(Invocation {
        payload: payload.unwrap_or(PayloadSource::Stdin),
        inline,
    })
}

fn read_payload(source: &PayloadSource) -> Result<String> {
    match source {
        PayloadSource::Stdin => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("read payload from stdin")?;
            Ok(buffer)
        }
        PayloadSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read payload from {}", path.display())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let invocation = match parse_args() {
        Ok(invocation) => invocation,
        Err(code) => std::process::exit(code),
    };

    // Logs go to stderr; stdout carries only the JSON result.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let settings = runtime_env::load_from_env();
    for warning in &settings.warnings {
        log::warn!("{warning}");
    }

    let raw = read_payload(&invocation.payload)?;
    let request: JobRequest = serde_json::from_str(&raw).context("parse job payload")?;

    let config = settings.config.clone();
    let gateway = Arc::new(HttpSearchGateway::new(config.request_timeout)?);

    let result = if invocation.inline || config.inline_dispatch {
        let queue = Arc::new(QueueDispatcher::new());
        let controller = ReindexController::new(gateway, queue.clone(), config);
        drive_to_completion(&controller, &queue, request)
            .await
            .map(|report| {
                log::info!("job finished after {} steps", report.steps);
                report.outcome
            })
    } else {
        let dispatch_url = settings
            .dispatch_url
            .clone()
            .context("REINDEX_DISPATCH_URL must be set (or pass --inline)")?;
        let dispatcher = Arc::new(HttpDispatcher::new(dispatch_url, config.request_timeout)?);
        let controller = ReindexController::new(gateway, dispatcher, config);
        controller.step(request).await
    };

    match result {
        Ok(outcome) => {
            println!("{}", serde_json::to_string(&outcome.ack())?);
            Ok(())
        }
        Err(err) => {
            log::error!("{err}");
            println!("{}", serde_json::to_string(&ErrorReply::new(err.to_string()))?);
            std::process::exit(1);
        }
    }
}

//! sendsay-cli: call Sendsay API actions from the command line
//!
//! Usage:
//!   sendsay-cli ping                                   Liveness probe (no login needed)
//!   sendsay-cli login                                  Log in and print the session
//!   sendsay-cli request <action> [json]                Call an action with JSON params
//!   sendsay-cli track <id> [--interval s] [--max-polls n]
//!                                                      Poll an async job until it finishes

use anyhow::{bail, Context};
use sendsay_api::{SendsayClient, SendsayClientBuilder, Track, TrackId, WaitOptions, WaitOutcome};
use serde_json::Value;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "ping" => cmd_ping().await,
        "login" => cmd_login().await,
        "request" => cmd_request(&args[2..]).await,
        "track" => cmd_track(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"sendsay-cli - Sendsay API command-line client

USAGE:
    sendsay-cli <COMMAND> [OPTIONS]

COMMANDS:
    ping                                Check that the API answers
    login                               Log in and print the session token
    request <action> [json]             Call <action> with optional JSON object params
    track <id> [--interval <secs>] [--max-polls <n>]
                                        Poll an async job until it finishes
    version                             Show version information
    help                                Show this help message

ENVIRONMENT:
    SENDSAY_LOGIN, SENDSAY_SUBLOGIN, SENDSAY_PASSWORD   Credentials
    SENDSAY_API_URL                                    API URL override
    SENDSAY_CERT, SENDSAY_CERT_KEY                     Client TLS certificate (PEM)
    SENDSAY_HTTP_TIMEOUT_SECS                          HTTP timeout (default 30)
    SENDSAY_DEBUG=1                                    Debug logging (or use RUST_LOG)"#
    );
}

fn cmd_version() {
    println!(
        "sendsay-cli {} ({})",
        env!("CARGO_PKG_VERSION"),
        sendsay_api::transport::CLIENT_VERSION,
    );
}

fn init_tracing() {
    let debug = std::env::var("SENDSAY_DEBUG").ok().as_deref() == Some("1");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "sendsay_api=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn client() -> anyhow::Result<SendsayClient> {
    Ok(SendsayClientBuilder::from_env()?.build()?)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_ping() -> anyhow::Result<()> {
    let response = client()?.ping().await?;
    print_json(response.data())
}

async fn cmd_login() -> anyhow::Result<()> {
    let mut client = client()?;
    if !client.is_authenticated() {
        bail!("SENDSAY_LOGIN and SENDSAY_PASSWORD must be set");
    }
    println!("{}", client.login().await?);
    Ok(())
}

async fn cmd_request(args: &[String]) -> anyhow::Result<()> {
    let Some(action) = args.first() else {
        bail!("Usage: sendsay-cli request <action> [json]");
    };
    let params: Value = match args.get(1) {
        Some(raw) => serde_json::from_str(raw).context("params must be a JSON object")?,
        None => Value::Null,
    };

    let mut client = client()?;
    let response = client.request(action, params).await?;
    if let Some(track_id) = response.track_id() {
        eprintln!("track.id: {track_id}");
    }
    print_json(response.data())
}

async fn cmd_track(args: &[String]) -> anyhow::Result<()> {
    let Some(raw_id) = args.first() else {
        bail!("Usage: sendsay-cli track <id> [--interval <secs>] [--max-polls <n>]");
    };
    let id = match raw_id.parse::<i64>() {
        Ok(n) => TrackId::from(n),
        Err(_) => TrackId::from(raw_id.as_str()),
    };

    let mut options = WaitOptions::default();
    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .with_context(|| format!("{flag} requires a value"))?;
        match flag.as_str() {
            "--interval" => {
                options = options.with_interval(Duration::from_secs(
                    value.parse().context("--interval must be a number of seconds")?,
                ))
            }
            "--max-polls" => {
                options = options.with_max_polls(value.parse().context("--max-polls must be a number")?)
            }
            other => bail!("Unknown option: {other}"),
        }
    }

    let mut client = client()?;
    let mut track = Track::new(id);
    let outcome = track
        .wait(&mut client, &options, |poll| {
            eprintln!("  {} ({})", poll.status_label(), poll.status_code());
        })
        .await?;

    match outcome {
        WaitOutcome::Finished(last) => println!("finished: {}", last.status_label()),
        WaitOutcome::Exhausted { polls, last } => {
            println!("still {} after {polls} polls", last.status_label());
            std::process::exit(2);
        }
    }
    Ok(())
}

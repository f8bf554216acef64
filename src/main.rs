// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! craft-relay — chunking HTTP relay in front of the recording vault.
//!
//! Usage:
//!   craft-relay serve  --config relay.toml [--port 3000]   # run the HTTP API
//!   craft-relay status --config relay.toml                 # print configuration
//!   craft-relay split  --input recording.json              # show how a payload would be chunked

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use craft_relay::api::{self, AppState};
use craft_relay::codec;
use craft_relay::config::{BackendMode, ChunkingConfig, Config};
use craft_relay::protocol::chunker::ChunkPlan;
use craft_relay::recording::RecordingData;
use craft_relay::relay::Relay;
use craft_relay::storage;

#[derive(Parser)]
#[command(name = "craft-relay", about = "Chunking relay for pose recordings", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API.
    Serve {
        /// Path to the TOML configuration file.
        #[arg(short, long, default_value = "relay.toml")]
        config: PathBuf,
        /// Override `server.port`.
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Print the effective configuration and exit.
    Status {
        #[arg(short, long, default_value = "relay.toml")]
        config: PathBuf,
    },
    /// Show how a JSON payload file would be split into fragments.
    Split {
        /// JSON file to inspect.
        #[arg(short, long)]
        input: PathBuf,
        /// Fragment size in characters.
        #[arg(long, default_value_t = ChunkingConfig::default().max_fragment_size)]
        fragment_size: usize,
        /// Records per backend write call.
        #[arg(long, default_value_t = ChunkingConfig::default().max_batch_size)]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Serve { config, port } => run_serve(config, port).await,
        Command::Status { config } => run_status(config),
        Command::Split { input, fragment_size, batch_size } => {
            run_split(input, fragment_size, batch_size)
        }
    };

    if let Err(e) = outcome {
        error!(error = format!("{e:#}"), "Command failed");
        std::process::exit(1);
    }
}

async fn run_serve(config_path: PathBuf, port: Option<u16>) -> anyhow::Result<()> {
    let cfg = Config::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let port = port.unwrap_or(cfg.server.port);

    let backend = storage::open_backend(&cfg.backend).context("opening storage backend")?;
    if cfg.backend.mode == BackendMode::Memory {
        info!("Memory backend selected; records are lost on exit");
    }

    let relay = Relay::new(backend, cfg.chunking).context("building relay")?;
    info!(
        backend = relay.backend_description(),
        max_fragment_size = cfg.chunking.max_fragment_size,
        max_batch_size = cfg.chunking.max_batch_size,
        "Starting relay"
    );

    let state = Arc::new(AppState { relay, max_body_bytes: cfg.server.max_body_bytes });
    api::start_server(state, port)
        .await
        .with_context(|| format!("serving on port {port}"))
}

fn run_status(config_path: PathBuf) -> anyhow::Result<()> {
    let cfg = Config::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    println!("=== Relay Status ===");
    println!("Port          : {}", cfg.server.port);
    println!("Body limit    : {} bytes", cfg.server.max_body_bytes);
    println!("Fragment size : {} chars", cfg.chunking.max_fragment_size);
    println!("Batch size    : {} records", cfg.chunking.max_batch_size);
    println!("Backend       : {:?}", cfg.backend.mode);
    if cfg.backend.mode == BackendMode::Vault {
        println!("Schema        : {}", cfg.backend.schema_id);
        println!("Timeout       : {}s", cfg.backend.request_timeout_secs);
        println!("Nodes         : {}", cfg.backend.nodes.len());
        for node in &cfg.backend.nodes {
            let auth = if node.token.is_empty() { "no token" } else { "token set" };
            println!("  {} ({})", node.url, auth);
        }
    }
    Ok(())
}

fn run_split(input: PathBuf, fragment_size: usize, batch_size: usize) -> anyhow::Result<()> {
    anyhow::ensure!(fragment_size > 0, "--fragment-size must be > 0");
    anyhow::ensure!(batch_size > 0, "--batch-size must be > 0");

    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let payload: Value = codec::deserialize(&raw).context("input is not valid JSON")?;
    let text = codec::serialize(&payload)?;
    let plan = ChunkPlan::for_text(&text, fragment_size);

    println!("=== Chunk Plan ===");
    if let Ok(rec) = serde_json::from_value::<RecordingData>(payload) {
        println!("Recording     : {} ({})", rec.id, rec.timestamp);
        println!("Frames        : {} over {:.1}s", rec.frames.len(), rec.duration_secs());
        println!("Landmarks     : {}", rec.landmark_count());
    }
    println!("Serialized    : {} chars", plan.total_chars);
    println!("Fragments     : {} × ≤{} chars", plan.total_chunks(), plan.max_fragment_size);
    println!("Write calls   : {} (≤{} records each)", plan.batches(batch_size), batch_size);
    if let Some(last) = plan.fragment_lengths.last() {
        println!("Last fragment : {} chars", last);
    }
    Ok(())
}

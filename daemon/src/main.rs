//! Ballot daemon: drives the ballot application from the command line.
//!
//! `replay` feeds an ordered transaction log through admission and commit
//! the way a consensus engine would; `query` and `info` read the result.

use anyhow::{bail, Context};
use ballot_node::{LmdbBallotApp, NodeConfig};
use ballot_utils::{init_logging, LogFormat};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ballot-daemon", about = "Permissioned e-voting ledger daemon")]
struct Cli {
    /// Data directory for the LMDB store.
    #[arg(long, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Hex public key allowed to create elections and polls.
    #[arg(long, env = "BALLOT_AUTHORITY_KEY")]
    authority_key: Option<String>,

    /// Directory holding poll manifest folders (`<dir>/<hash>/poll.json`).
    #[arg(long, env = "BALLOT_MANIFEST_DIR")]
    manifest_dir: Option<PathBuf>,

    /// LMDB map size in MiB.
    #[arg(long, env = "BALLOT_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Commit every transaction of a log file, one JSON envelope per line.
    Replay {
        file: PathBuf,

        /// Number of lines per block.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        block_size: u64,
    },
    /// Run a read-only query and print its value.
    Query {
        /// e.g. "/elections", "/polls/latest", "/votes".
        path: String,

        /// JSON parameters, e.g. '{"poll_hash":"Qm..."}'.
        #[arg(long, default_value = "")]
        params: String,
    },
    /// Print height, size and app hash.
    Info,
    /// Print a fresh key pair as hex.
    Keygen,
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(key) = &cli.authority_key {
        config.authority_key = key.clone();
    }
    if let Some(dir) = &cli.manifest_dir {
        config.manifest_dir = dir.clone();
    }
    if let Some(mb) = cli.map_size_mb {
        config.map_size_mb = mb;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn open_app(config: &NodeConfig) -> anyhow::Result<LmdbBallotApp> {
    LmdbBallotApp::open(config).context("opening ballot app")
}

fn replay(app: &LmdbBallotApp, file: &Path, block_size: u64) -> anyhow::Result<()> {
    let log = std::fs::read_to_string(file)
        .with_context(|| format!("reading transaction log {}", file.display()))?;

    let (mut committed, mut rejected, mut in_block) = (0u64, 0u64, 0u64);
    for (line_no, line) in log.lines().enumerate() {
        let tx = line.trim();
        if tx.is_empty() {
            continue;
        }
        let tx = tx.as_bytes();

        let admission = app.admission_check(tx);
        let outcome = if admission.is_ok() {
            app.commit(tx)
        } else {
            admission
        };
        if outcome.is_ok() {
            committed += 1;
        } else {
            rejected += 1;
            tracing::warn!(line = line_no + 1, code = %outcome.code, reason = %outcome.log, "transaction rejected");
        }

        in_block += 1;
        if in_block == block_size {
            app.finalize_block()?;
            in_block = 0;
        }
    }
    if in_block > 0 {
        app.finalize_block()?;
    }

    let info = app.info()?;
    tracing::info!(committed, rejected, height = info.height, "replay finished");
    println!(
        "committed={committed} rejected={rejected} height={} app_hash={}",
        info.height,
        hex::encode(info.app_hash)
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Keygen => {
            let kp = ballot_crypto::generate_keypair();
            println!("public:  {}", kp.public.to_hex());
            println!("private: {}", hex::encode(kp.private.0));
        }
        Command::Replay { file, block_size } => replay(&open_app(&config)?, &file, block_size)?,
        Command::Query { path, params } => {
            let resp = open_app(&config)?.query(&path, params.as_bytes());
            if !resp.code.is_ok() {
                bail!("query {path} failed with {}: {}", resp.code, resp.log);
            }
            println!("{}", String::from_utf8_lossy(&resp.value));
        }
        Command::Info => {
            let info = open_app(&config)?.info()?;
            let out = serde_json::json!({
                "height": info.height,
                "size": info.size,
                "app_hash": hex::encode(info.app_hash),
            });
            println!("{out}");
        }
    }
    Ok(())
}

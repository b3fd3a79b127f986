//! votechain: command-line entry point for the vote ledger.

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;

use votechain_consensus::{parse_threshold_override, Roster};
use votechain_ledger::{LedgerConfig, SignatureOutcome};
use votechain_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "votechain", about = "Proof-of-Authority vote ledger")]
struct Cli {
    /// Directory holding the ledger file.
    #[arg(long, env = "VOTECHAIN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Ledger file name inside the data directory.
    #[arg(long)]
    ledger_file: Option<String>,

    /// Signatures required per block (clamped to the roster size).
    #[arg(long, env = "POA_THRESHOLD")]
    threshold: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTECHAIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Summarize the ledger.
    Status,
    /// Append a vote block.
    Cast {
        /// Vote payload as JSON, e.g. '{"vote": "A"}'.
        #[arg(long)]
        payload: String,
    },
    /// Verify the whole chain. Exits non-zero when verification fails.
    Verify {
        /// Print a per-block report instead of the first failure.
        #[arg(long)]
        report: bool,
    },
    /// Add a validator's endorsement (latest block by default).
    Sign {
        #[arg(long)]
        validator: String,
        /// Endorse every block this validator has not endorsed yet.
        #[arg(long, conflicts_with = "block")]
        all: bool,
        /// Endorse the block at this index.
        #[arg(long)]
        block: Option<usize>,
    },
    /// List the validator roster.
    Validators,
    /// Print blocks.
    Show {
        /// Only the block at this index.
        #[arg(long)]
        index: Option<usize>,
    },
    /// Count votes per candidate.
    Tally,
}

fn load_config(cli: &Cli) -> anyhow::Result<LedgerConfig> {
    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_toml_file(&path.to_string_lossy())
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(file) = &cli.ledger_file {
        config.ledger_file = file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    // A malformed override is logged and ignored.
    if let Some(threshold) = cli.threshold.as_deref().and_then(parse_threshold_override) {
        config.threshold = Some(threshold);
    }

    tracing::debug!(?config, "configuration resolved");
    let mut ledger = config.open_ledger();

    let defaulted = ledger.roster().defaulted_ids();
    if !defaulted.is_empty() {
        tracing::warn!(
            validators = ?defaulted,
            "using documented default secrets; set POA_<ID>_SECRET before any real deployment"
        );
    }
    if ledger.is_dirty() {
        tracing::warn!(path = %config.ledger_path().display(), "ledger could not be persisted");
    }

    match cli.command {
        Command::Status => {
            print_json(&json!({
                "ledger": config.ledger_path(),
                "blocks": ledger.len(),
                "threshold": ledger.threshold(),
                "validators": ledger.roster().size(),
                "valid": ledger.is_valid(),
                "dirty": ledger.is_dirty(),
                "last_hash": ledger.last_block().map(|b| b.hash.as_str()),
            }))?;
        }
        Command::Cast { payload } => {
            let payload: Value = serde_json::from_str(&payload).context("payload is not valid JSON")?;
            let block = ledger.add_block(payload)?;
            tracing::info!(index = block.index, hash = %block.hash, "vote recorded");
            print_json(block)?;
        }
        Command::Verify { report } => {
            let audit = ledger.audit();
            if report {
                print_json(&audit)?;
            }
            match audit.first_failure() {
                None => println!("ledger valid ({} blocks)", ledger.len()),
                Some(e) => bail!("ledger failed verification: {e}"),
            }
        }
        Command::Sign {
            validator,
            all,
            block,
        } => {
            if all {
                let touched = ledger.add_signature_all(&validator)?;
                println!("{validator} endorsed {touched} block(s)");
            } else {
                let outcome = match block {
                    Some(index) => ledger.add_signature(index, &validator)?,
                    None => ledger.add_signature_latest(&validator)?,
                };
                match outcome {
                    SignatureOutcome::Added => println!("endorsement added"),
                    SignatureOutcome::AlreadyPresent => println!("{validator} had already endorsed this block"),
                }
            }
        }
        Command::Validators => {
            print_json(&json!({
                "threshold": ledger.threshold(),
                "validators": ledger.get_validators_full(),
            }))?;
        }
        Command::Show { index } => match index {
            Some(i) => match ledger.blocks().get(i) {
                Some(block) => print_json(block)?,
                None => bail!("no block at index {i} (chain has {} blocks)", ledger.len()),
            },
            None => print_json(&ledger.blocks())?,
        },
        Command::Tally => print_json(&ledger.tally())?,
    }

    Ok(())
}

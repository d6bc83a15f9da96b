//! pledge: inspect a pledge deployment backed by LMDB.
//!
//! Every command is read-only: stakes, proof windows and cohort pools are
//! read through the same engine accessors the host uses, so what is printed
//! here is exactly what a call would see.

mod views;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pledge_crypto::Ed25519Verifier;
use pledge_settlement::{AssetTransfer, Payout, PledgeConfig, PledgeEngine, TransferError};
use pledge_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use pledge_types::{Address, AssetKind, CohortId, StakeKey, StakeMode, Timestamp};
use pledge_utils::{format_duration, init_logging, LogFormat};
use serde::Serialize;

use crate::views::{DayView, StakeView};

#[derive(Parser)]
#[command(name = "pledge", about = "Inspect a pledge settlement deployment", version)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "PLEDGE_CONFIG")]
    config: Option<PathBuf>,

    /// LMDB data directory of the deployment.
    #[arg(long, default_value = "./pledge_data", env = "PLEDGE_DATA_DIR")]
    data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[arg(long, default_value_t = 1024, env = "PLEDGE_MAP_SIZE_MB")]
    map_size_mb: usize,

    /// Override the stake mode from the configuration: "single" or "multi".
    #[arg(long, env = "PLEDGE_MODE", value_parser = parse_mode)]
    mode: Option<StakeMode>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "PLEDGE_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "PLEDGE_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or check the effective configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect stakes.
    Stake {
        #[command(subcommand)]
        action: StakeAction,
    },
    /// Whether a daily proof would be accepted.
    Day {
        #[arg(long)]
        owner: String,
        /// Stake sequence (multi-stake deployments only).
        #[arg(long)]
        sequence: Option<u64>,
        #[arg(long)]
        day: u32,
        /// Evaluate at this Unix time instead of now.
        #[arg(long)]
        at: Option<u64>,
    },
    /// Show both asset pools of a cohort.
    Pool {
        /// Cohort id; defaults to the cohort containing `--at` (or now).
        #[arg(long)]
        cohort: Option<u64>,
        #[arg(long)]
        at: Option<u64>,
    },
    /// Check that every database of the deployment is readable.
    Integrity,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Validate the configuration and summarise its time windows.
    Check,
}

#[derive(Subcommand)]
enum StakeAction {
    /// Show one open stake.
    Show {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        sequence: Option<u64>,
        #[arg(long)]
        at: Option<u64>,
    },
    /// List an owner's open stakes.
    List {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        at: Option<u64>,
    },
}

fn parse_mode(s: &str) -> Result<StakeMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "single" => Ok(StakeMode::Single),
        "multi" => Ok(StakeMode::Multi),
        _ => Err(format!(
            "unknown stake mode {s:?} (expected \"single\" or \"multi\")"
        )),
    }
}

/// Inspection never moves funds.
struct NoTransfers;

impl AssetTransfer for NoTransfers {
    fn transfer_all(&self, _asset: AssetKind, _payouts: &[Payout]) -> Result<(), TransferError> {
        Err(TransferError::Failed(
            "transfers are disabled in inspection mode".into(),
        ))
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PledgeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path
                .to_str()
                .with_context(|| format!("config path {} is not UTF-8", path.display()))?;
            let config = PledgeConfig::from_toml_file(path)?;
            tracing::info!(path, "loaded config");
            config
        }
        None => PledgeConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

fn open_engine(cli: &Cli, config: PledgeConfig) -> anyhow::Result<PledgeEngine<LmdbEnvironment>> {
    let env = open_env(&cli.data_dir, cli.map_size_mb)?;
    let engine = PledgeEngine::new(
        Arc::new(env),
        config,
        Arc::new(Ed25519Verifier),
        Arc::new(NoTransfers),
    )?;
    Ok(engine)
}

fn open_env(data_dir: &Path, map_size_mb: usize) -> anyhow::Result<LmdbEnvironment> {
    if !data_dir.exists() {
        bail!("no deployment at {}", data_dir.display());
    }
    check_data_dir(data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(data_dir, map_size_mb * 1024 * 1024)
        .with_context(|| format!("opening {}", data_dir.display()))?;
    Ok(env)
}

fn parse_owner(raw: &str) -> anyhow::Result<Address> {
    Address::parse(raw).with_context(|| format!("malformed owner address {raw:?}"))
}

fn at_or_now(at: Option<u64>) -> Timestamp {
    at.map(Timestamp::new).unwrap_or_else(Timestamp::now)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level)?;
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Config { action } => match action {
            ConfigAction::Show => print!("{}", config.to_toml_string()?),
            ConfigAction::Check => {
                let e = &config.economics;
                println!("configuration ok ({:?} mode)", config.mode);
                println!("  day length        {}", format_duration(e.day_length_secs));
                println!("  proof grace       {}", format_duration(e.proof_grace_secs));
                println!("  resolution buffer {}", format_duration(e.resolution_buffer_secs));
                println!("  cohort length     {}", format_duration(e.cohort_length_secs));
            }
        },
        Command::Stake { action } => {
            let engine = open_engine(&cli, config)?;
            match action {
                StakeAction::Show {
                    owner,
                    sequence,
                    at,
                } => {
                    let owner = parse_owner(owner)?;
                    let now = at_or_now(*at);
                    let Some(stake) = engine.stake(&owner, *sequence)? else {
                        bail!("no open stake for {owner}");
                    };
                    let key = StakeKey {
                        owner,
                        sequence: *sequence,
                    };
                    print_json(&StakeView::new(engine.params(), &key, &stake, now))?;
                }
                StakeAction::List { owner, at } => {
                    let owner = parse_owner(owner)?;
                    let now = at_or_now(*at);
                    let mut views = Vec::new();
                    for key in engine.stakes_of(&owner)? {
                        if let Some(stake) = engine.stake(&key.owner, key.sequence)? {
                            views.push(StakeView::new(engine.params(), &key, &stake, now));
                        }
                    }
                    print_json(&views)?;
                }
            }
        }
        Command::Day {
            owner,
            sequence,
            day,
            at,
        } => {
            let engine = open_engine(&cli, config)?;
            let owner = parse_owner(owner)?;
            let status = engine.day_status(&owner, *sequence, *day, at_or_now(*at))?;
            print_json(&DayView::new(*day, status))?;
        }
        Command::Pool { cohort, at } => {
            let engine = open_engine(&cli, config)?;
            let cohort = match cohort {
                Some(id) => CohortId(*id),
                None => engine.cohort_of(at_or_now(*at)),
            };
            print_json(&engine.pool_snapshot(cohort)?)?;
        }
        Command::Integrity => {
            let env = open_env(&cli.data_dir, cli.map_size_mb)?;
            let report = check_integrity(&env)?;
            println!(
                "{} databases, {} entries",
                report.databases_checked, report.total_entries
            );
            for error in &report.errors {
                println!("  error: {error}");
            }
            if !report.is_healthy() {
                bail!("integrity check failed");
            }
        }
    }
    Ok(())
}

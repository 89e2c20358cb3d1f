//! drip-cli: operator interface for a Drip ledger and its stake pool.
//!
//! State lives in a data directory as JSON (`ledger.json`, `pool.json`).
//! Every command that can accrue or move value takes an explicit
//! `--block` height; nothing here reads a clock.

mod amount;
mod config;
mod state;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use drip_core::constants::DECIMALS;
use drip_core::events::LedgerEvent;
use drip_core::traits::Custody;
use drip_core::types::{Address, CallContext};
use drip_ledger::{Ledger, TokenMetadata};
use drip_stake::{MemoryCustody, StakePool};

use crate::amount::{format_tokens, parse_tokens};
use crate::config::DripConfig;
use crate::state::State;

/// Block-indexed interest ledger with a collateral stake pool.
#[derive(Parser, Debug)]
#[command(name = "drip-cli", version, about = "Drip interest ledger operator CLI")]
struct Cli {
    /// Data directory for ledger and pool state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy a new ledger and bind a stake pool as its authority.
    Init(InitArgs),
    /// Show accrual counters and pool totals.
    Status,
    /// Credit external collateral to an owner's wallet.
    Fund(FundArgs),
    /// Stake collateral.
    Stake(StakeArgs),
    /// Withdraw staked collateral.
    Unstake(StakeArgs),
    /// Realize pending interest into the caller's balance.
    Mint(CallerArgs),
    /// Quote pending interest without changing state.
    Take(CallerArgs),
    /// Show an owner's balance, productivity and stake.
    Balance(BalanceArgs),
    /// Transfer realized tokens.
    Transfer(TransferArgs),
    /// Change the emission rate (governor only).
    SetRate(SetRateArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Deployer and initial governor
    #[arg(long)]
    deployer: Address,
    /// Address the stake pool acts under
    #[arg(long)]
    pool: Address,
    /// Emission per block in tokens (overrides config)
    #[arg(long)]
    rate: Option<String>,
    /// Deployment block height
    #[arg(long, default_value_t = 0)]
    block: u64,
}

#[derive(Args, Debug)]
struct FundArgs {
    #[arg(long)]
    owner: Address,
    /// Collateral amount in collateral units
    #[arg(long)]
    amount: u128,
}

#[derive(Args, Debug)]
struct StakeArgs {
    #[arg(long)]
    from: Address,
    /// Collateral amount in collateral units
    #[arg(long)]
    amount: u128,
    #[arg(long)]
    block: u64,
}

#[derive(Args, Debug)]
struct CallerArgs {
    #[arg(long)]
    from: Address,
    #[arg(long)]
    block: u64,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[arg(long)]
    owner: Address,
}

#[derive(Args, Debug)]
struct TransferArgs {
    #[arg(long)]
    from: Address,
    #[arg(long)]
    to: Address,
    /// Token amount (decimals allowed)
    #[arg(long)]
    amount: String,
    #[arg(long)]
    block: u64,
}

#[derive(Args, Debug)]
struct SetRateArgs {
    #[arg(long)]
    from: Address,
    /// New emission per block in tokens
    #[arg(long)]
    rate: String,
    #[arg(long)]
    block: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = DripConfig::load(cli.data_dir).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    if let Some(format) = cli.log_format {
        cfg.log_format = format;
    }
    init_logging(&cfg.log_level, &cfg.log_format);
    info!(data_dir = %cfg.data_dir.display(), "drip-cli v{}", env!("CARGO_PKG_VERSION"));

    let output = match cli.command {
        Command::Init(args) => init(&cfg, args)?,
        Command::Status => status(&State::load(&cfg)?),
        Command::Fund(args) => {
            let mut st = State::load(&cfg)?;
            st.pool
                .custody_mut()
                .fund(&args.owner, args.amount)
                .context("Failed to fund wallet")?;
            st.save()?;
            let wallet = st.pool.custody().wallet(&args.owner);
            json!({ "owner": args.owner, "wallet": wallet.to_string() })
        }
        Command::Stake(args) => {
            let mut st = State::load(&cfg)?;
            let ctx = CallContext::new(args.from, args.block);
            st.pool
                .stake(&mut st.ledger, &ctx, args.amount)
                .context("Stake failed")?;
            let position = st.pool.position(&args.from);
            finish(st, json!({ "position": position.to_string() }))?
        }
        Command::Unstake(args) => {
            let mut st = State::load(&cfg)?;
            let ctx = CallContext::new(args.from, args.block);
            st.pool
                .unstake(&mut st.ledger, &ctx, args.amount)
                .context("Unstake failed")?;
            let position = st.pool.position(&args.from);
            finish(st, json!({ "position": position.to_string() }))?
        }
        Command::Mint(args) => {
            let mut st = State::load(&cfg)?;
            let minted = st
                .ledger
                .mint(&CallContext::new(args.from, args.block))
                .context("Mint failed")?;
            finish(st, json!({ "minted": format_tokens(minted) }))?
        }
        Command::Take(args) => {
            let st = State::load(&cfg)?;
            let (pending, block) = st
                .ledger
                .take_with_block(&CallContext::new(args.from, args.block))
                .context("Quote failed")?;
            json!({ "pending": format_tokens(pending), "block": block })
        }
        Command::Balance(args) => balance(&State::load(&cfg)?, &args.owner),
        Command::Transfer(args) => {
            let mut st = State::load(&cfg)?;
            let value = parse_tokens(&args.amount)?;
            st.ledger
                .transfer(&CallContext::new(args.from, args.block), &args.to, value)
                .context("Transfer failed")?;
            finish(st, json!({ "transferred": format_tokens(value) }))?
        }
        Command::SetRate(args) => {
            let mut st = State::load(&cfg)?;
            let rate = parse_tokens(&args.rate)?;
            st.ledger
                .change_interest_rate_per_block(&CallContext::new(args.from, args.block), rate)
                .context("Rate change failed")?;
            finish(st, json!({ "interests_per_block": format_tokens(rate) }))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init(cfg: &DripConfig, args: InitArgs) -> Result<serde_json::Value> {
    if args.deployer == args.pool {
        bail!("pool address must differ from the deployer");
    }
    let rate = parse_tokens(args.rate.as_deref().unwrap_or(&cfg.interests_per_block))
        .context("Invalid emission rate")?;
    let metadata = TokenMetadata {
        name: cfg.token_name.clone(),
        symbol: cfg.token_symbol.clone(),
        decimals: DECIMALS,
    };
    let mut ledger = Ledger::with_metadata(args.deployer, rate, args.block, metadata);
    let pool = StakePool::new(args.pool, MemoryCustody::new());
    pool.bind(&mut ledger, &CallContext::new(args.deployer, args.block))
        .context("Failed to bind stake pool")?;

    let st = State::create(cfg, ledger, pool)?;
    info!(config = %cfg.config_file().display(), "initialized");
    finish(
        st,
        json!({
            "data_dir": cfg.data_dir,
            "authority": args.pool,
            "governor": args.deployer,
            "interests_per_block": format_tokens(rate),
        }),
    )
}

fn status(st: &State) -> serde_json::Value {
    let (last_reward_block, total_productivity, acc, minted) = st.ledger.get_status();
    json!({
        "name": st.ledger.name(),
        "symbol": st.ledger.symbol(),
        "last_reward_block": last_reward_block,
        "total_productivity": total_productivity.to_string(),
        "acc_amount_per_share": acc.to_string(),
        "mint_cumulation": format_tokens(minted),
        "total_supply": format_tokens(st.ledger.total_supply()),
        "interests_per_block": format_tokens(st.ledger.interests_per_block()),
        "authority": st.ledger.authority(),
        "governor": st.ledger.governor(),
        "total_staked": st.pool.total_staked().to_string(),
        "collateral_held": st.pool.custody().held().to_string(),
    })
}

fn balance(st: &State, owner: &Address) -> serde_json::Value {
    let (productivity, _) = st.ledger.get_productivity(owner);
    json!({
        "owner": owner,
        "balance": format_tokens(st.ledger.balance_of(owner)),
        "productivity": productivity.to_string(),
        "position": st.pool.position(owner).to_string(),
        "wallet": st.pool.custody().wallet(owner).to_string(),
    })
}

/// Log and attach drained events, then persist.
fn finish(mut st: State, mut output: serde_json::Value) -> Result<serde_json::Value> {
    let events: Vec<LedgerEvent> = st.ledger.drain_events();
    for event in &events {
        info!(event = event.name(), "ledger event");
    }
    st.save()?;
    output["events"] = serde_json::to_value(&events)?;
    Ok(output)
}

/// Initialize the tracing subscriber with an env filter and optional JSON output.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    // Logs go to stderr so stdout stays machine-readable.
    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drip_core::constants::COIN;

    #[test]
    fn status_reports_collateral_held_by_custody() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DripConfig {
            data_dir: dir.path().to_path_buf(),
            ..DripConfig::default()
        };
        let (deployer, staker) = (Address([1; 20]), Address([3; 20]));
        let mut ledger = Ledger::new(deployer, COIN, 0);
        let mut pool = StakePool::new(Address([2; 20]), MemoryCustody::new());
        pool.bind(&mut ledger, &CallContext::new(deployer, 0)).unwrap();
        pool.custody_mut().fund(&staker, 100).unwrap();
        pool.stake(&mut ledger, &CallContext::new(staker, 0), 40)
            .unwrap();

        let st = State::create(&cfg, ledger, pool).unwrap();
        let out = status(&st);
        assert_eq!(out["collateral_held"], "40");
        assert_eq!(out["total_staked"], "40");
        assert_eq!(out["acc_amount_per_share"], "0");
    }
}

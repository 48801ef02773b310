//! console-cli: Superfluid Console calculators on the command line.
//!
//! Evaluates flowing balances, pool shares and distribution windows over
//! values pasted from the subgraph, and keeps a local address book.

mod config;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use clap::{Args, Parser, Subcommand};
use num_bigint::BigInt;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use console_core::address_book::{AddressBook, AddressBookEntry};
use console_core::constants::{DEFAULT_PERCENTAGE_DECIMAL_PLACES, StreamGranularity};
use console_core::types::{
    parse_int, BalanceSnapshot, DistributionEvent, PoolMemberSnapshot, PoolSnapshot, UnitsUpdatedEvent,
};
use console_flow::flowing::{depletion_date, extrapolate, time_until_depletion};
use console_flow::format::{format_ether, format_flow_rate};
use console_flow::percentage::{percentage, round_percentage};
use console_flow::pro_rata::member_received_at;
use console_flow::reconcile::{active_window, attribute_distributions, sort_newest_first};

use config::Config;

/// Superfluid Console calculators.
#[derive(Parser)]
#[command(name = "console-cli")]
#[command(version, about = "Flowing balances and distribution shares for Superfluid.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// A member's percentage of pool units.
    Percentage(PercentageArgs),
    /// Current value of a streamed balance.
    Extrapolate(SnapshotArgs),
    /// When a draining balance reaches zero.
    Depletion(SnapshotArgs),
    /// Amount a GDA pool member has received.
    PoolReceived(PoolReceivedArgs),
    /// Active window of a membership and the distributions credited to it.
    Window(WindowArgs),
    /// Render a wei amount or flow rate.
    Format(FormatArgs),
    /// Local address book.
    AddressBook {
        #[command(subcommand)]
        action: AddressBookAction,
    },
}

#[derive(Args)]
struct PercentageArgs {
    /// Total pool units.
    #[arg(short, long)]
    total: String,

    /// The member's units.
    #[arg(short, long)]
    member: String,

    /// Decimal places to round to.
    #[arg(short, long, default_value_t = DEFAULT_PERCENTAGE_DECIMAL_PLACES)]
    places: i64,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Balance at the snapshot, in wei.
    #[arg(short, long, allow_hyphen_values = true)]
    balance: String,

    /// Snapshot time, unix seconds.
    #[arg(short, long)]
    timestamp: u64,

    /// Net flow rate in wei per second (negative for outflow).
    #[arg(short, long, allow_hyphen_values = true)]
    flow_rate: String,

    /// Evaluate at this unix time in milliseconds (default: now).
    #[arg(long)]
    at_ms: Option<i64>,
}

#[derive(Args)]
struct PoolReceivedArgs {
    /// JSON file holding the pool member entity.
    #[arg(short, long)]
    member: PathBuf,

    /// JSON file holding the pool entity.
    #[arg(short, long)]
    pool: PathBuf,

    /// Evaluate at this unix time in seconds (default: now).
    #[arg(long)]
    at: Option<u64>,
}

#[derive(Args)]
struct WindowArgs {
    /// JSON array of units-updated events, any order. Raw subgraph
    /// entities work: the log index is taken from `id` when absent.
    #[arg(short, long)]
    units: PathBuf,

    /// JSON array of distribution events.
    #[arg(short, long)]
    distributions: Option<PathBuf>,
}

#[derive(Args)]
struct FormatArgs {
    /// Amount in wei.
    #[arg(allow_hyphen_values = true)]
    wei: String,

    /// Treat the amount as a flow rate per second.
    #[arg(long)]
    flow_rate: bool,

    /// Override the configured decimal places.
    #[arg(short, long)]
    places: Option<u32>,

    /// Override the configured stream granularity.
    #[arg(short, long)]
    granularity: Option<String>,
}

#[derive(Subcommand)]
enum AddressBookAction {
    /// List all entries.
    List,
    /// Add or replace an entry.
    Add {
        #[arg(short, long)]
        chain_id: u64,
        #[arg(short, long)]
        address: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        ens: Option<String>,
    },
    /// Remove an entry by id (`{chain}_{address}_{ens}`).
    Remove { id: String },
    /// Look up the name tag of an address.
    Find {
        #[arg(short, long)]
        chain_id: u64,
        #[arg(short, long)]
        address: String,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Percentage(args) => cmd_percentage(args),
        Commands::Extrapolate(args) => cmd_extrapolate(args, &config),
        Commands::Depletion(args) => cmd_depletion(args),
        Commands::PoolReceived(args) => cmd_pool_received(args, &config),
        Commands::Window(args) => cmd_window(args),
        Commands::Format(args) => cmd_format(args, &config),
        Commands::AddressBook { action } => cmd_address_book(action, &config),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn snapshot_from(args: &SnapshotArgs) -> Result<BalanceSnapshot> {
    Ok(BalanceSnapshot {
        balance: parse_int(&args.balance).context("--balance")?,
        timestamp: args.timestamp,
        flow_rate: parse_int(&args.flow_rate).context("--flow-rate")?,
    })
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

fn cmd_percentage(args: PercentageArgs) -> Result<()> {
    let total = BigDecimal::from_str(&args.total).context("--total must be a decimal number")?;
    let member = BigDecimal::from_str(&args.member).context("--member must be a decimal number")?;
    let share = percentage(&total, &member);
    debug!(%share, "full precision share");
    println!("{}%", round_percentage(&share, args.places));
    Ok(())
}

fn cmd_extrapolate(args: SnapshotArgs, config: &Config) -> Result<()> {
    let snapshot = snapshot_from(&args)?;
    let at_ms = args.at_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let wei = extrapolate(&snapshot, at_ms);

    println!("balance:   {wei} wei");
    println!("formatted: {}", format_ether(&wei, config.ether_decimal_places));
    println!(
        "flow rate: {}",
        format_flow_rate(&snapshot.flow_rate, config.stream_granularity, config.ether_decimal_places)
    );
    Ok(())
}

fn cmd_depletion(args: SnapshotArgs) -> Result<()> {
    let snapshot = snapshot_from(&args)?;
    match depletion_date(&snapshot) {
        Some(date) => {
            let now = args.at_ms.map(|ms| (ms / 1_000).max(0) as u64).unwrap_or_else(now_secs);
            println!("depletes at: {} (unix {})", date.to_rfc3339(), date.timestamp());
            if let Some(left) = time_until_depletion(&snapshot, now) {
                println!("time left:   {}d {}h", left.num_days(), left.num_hours() % 24);
            }
        }
        None => println!("balance is not draining"),
    }
    Ok(())
}

fn cmd_pool_received(args: PoolReceivedArgs, config: &Config) -> Result<()> {
    let member: PoolMemberSnapshot = read_json(&args.member)?;
    let pool: PoolSnapshot = read_json(&args.pool)?;
    let at = args.at.unwrap_or_else(now_secs);

    let receipt = member_received_at(&member, &pool, at);
    info!(at, units = %member.units, "evaluated pool member");

    println!("{}", serde_json::to_string_pretty(&receipt)?);
    println!("received:  {}", format_ether(&receipt.amount, config.ether_decimal_places));
    println!(
        "flow rate: {}",
        format_flow_rate(&receipt.flow_rate, config.stream_granularity, config.ether_decimal_places)
    );
    Ok(())
}

fn cmd_window(args: WindowArgs) -> Result<()> {
    let mut units: Vec<UnitsUpdatedEvent> = read_json(&args.units)?;
    sort_newest_first(&mut units);

    let window = active_window(&units);
    println!("{}", serde_json::to_string_pretty(&window)?);

    if let Some(path) = args.distributions {
        let distributions: Vec<DistributionEvent> = read_json(&path)?;
        let attributed = attribute_distributions(&units, &distributions);
        info!(
            total = distributions.len(),
            matched = attributed.len(),
            "distributions reconciled"
        );
        println!("{}", serde_json::to_string_pretty(&attributed)?);
    }
    Ok(())
}

fn cmd_format(args: FormatArgs, config: &Config) -> Result<()> {
    let wei: BigInt = parse_int(&args.wei).context("amount must be an integer in wei")?;
    let places = args.places.unwrap_or(config.ether_decimal_places);
    let granularity = match args.granularity {
        Some(raw) => raw.parse::<StreamGranularity>()?,
        None => config.stream_granularity,
    };

    if args.flow_rate {
        println!("{}", format_flow_rate(&wei, granularity, places));
    } else {
        println!("{}", format_ether(&wei, places));
    }
    Ok(())
}

fn cmd_address_book(action: AddressBookAction, config: &Config) -> Result<()> {
    let path = &config.address_book_path;
    let mut book = AddressBook::load(path)?;

    match action {
        AddressBookAction::List => {
            if book.is_empty() {
                println!("address book is empty ({})", path.display());
            }
            for entry in book.entries() {
                println!("{:<48} {}", entry.id(), entry.name_tag);
            }
        }
        AddressBookAction::Add {
            chain_id,
            address,
            name,
            ens,
        } => {
            let entry = AddressBookEntry {
                ens_name: ens,
                ..AddressBookEntry::new(chain_id, address, name)
            };
            let id = entry.id();
            if let Some(old) = book.upsert(entry) {
                info!(%id, old = %old.name_tag, "replaced address book entry");
            }
            book.save(path)?;
            println!("saved {id}");
        }
        AddressBookAction::Remove { id } => {
            let removed = book.remove(&id)?;
            book.save(path)?;
            println!("removed {} ({})", id, removed.name_tag);
        }
        AddressBookAction::Find { chain_id, address } => match book.find(chain_id, &address) {
            Some(entry) => println!("{}", entry.name_tag),
            None => println!("{address} is not in the address book"),
        },
    }
    Ok(())
}

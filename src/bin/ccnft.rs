//! ccnft command line
//!
//! ```text
//! ccnft -c config.json user paused
//! ccnft -c config.json admin add-whitelist -f owners.csv -m 3
//! ccnft -c config.json snapshot --block 14000000 > owners.csv
//! ```

use alloy::primitives::Address;
use ccnft::{load_address_list, BlockContext, CarClient, Config, Phase, Receipt, RpcChain};
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

/// CyberCar NFT CLI
#[derive(Parser, Debug)]
#[command(name = "ccnft", author, version, about, long_about = None)]
struct Args {
    /// Load configuration from `file`
    #[arg(short, long, env = "CCNFT_CONFIG", default_value = ccnft::constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the RPC endpoint from the configuration
    #[arg(long, env = "RPC_URL")]
    rpc: Option<String>,

    /// Log filter; defaults to `log.level` from the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// User interfaces to interact with the NFT contract
    #[command(subcommand, visible_alias = "u")]
    User(UserCommand),

    /// Admin interfaces to manage the NFT contract
    #[command(subcommand, visible_alias = "a")]
    Admin(AdminCommand),

    /// Print `tokenId,owner` for every token at a block
    Snapshot {
        /// Block number to read at; the current head when omitted
        #[arg(short, long)]
        block: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Check airdrop quota of an owner
    AirdropQuota {
        /// Owner address
        #[arg(short = 'r', long)]
        owner: Address,
    },
    /// Check mint quota of a whitelist owner
    MintQuota {
        /// Owner address
        #[arg(short = 'r', long)]
        owner: Address,
    },
    /// Check if the contract is paused
    Paused,
    /// Check mint phase
    Phase,
    /// Number of tokens minted
    TotalSupply,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Add airdrop list with quota
    AddAirdrop(ListArgs),
    /// Add mint whitelist with quota
    AddWhitelist(ListArgs),
    /// Add reserve list with quota
    AddReserve(ListArgs),
    /// Pause the contract
    Pause,
    /// Unpause the contract
    Unpause,
    /// Set phase of operation (0 closed, 1 whitelist, 2 public)
    SetPhase {
        /// New phase
        phase: Phase,
    },
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Owner address list file, in csv format
    #[arg(short = 'f', long)]
    address_list: PathBuf,

    /// Amount of NFT per address
    #[arg(short = 'm', long)]
    amount: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    if let Some(rpc) = &args.rpc {
        config = config.with_rpc_url(rpc);
    }

    let directive = args.log_level.clone().unwrap_or_else(|| config.log.level.clone());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let result = match args.command {
        Command::User(cmd) => run_user(cmd, &config, &cancel).await,
        Command::Admin(cmd) => run_admin(cmd, &config, &cancel).await,
        Command::Snapshot { block } => run_snapshot(block, &config, &cancel).await,
    };

    // Reverted, dropped and timed-out transactions need operator follow-up
    if let Some(hash) = result
        .as_ref()
        .err()
        .and_then(|err| err.downcast_ref::<ccnft::Error>())
        .and_then(ccnft::Error::tx_hash)
    {
        eprintln!("Transaction: {hash}");
    }
    result
}

async fn run_snapshot(block: Option<u64>, config: &Config, cancel: &CancellationToken) -> Result<()> {
    let client = CarClient::connect(config)?;
    let block = block.map_or(BlockContext::Latest, BlockContext::Number);
    for (id, owner) in client.snapshot(block, cancel).await? {
        println!("{id},{owner}");
    }
    Ok(())
}

async fn run_user(cmd: UserCommand, config: &Config, cancel: &CancellationToken) -> Result<()> {
    let client = CarClient::connect(config)?;
    match cmd {
        UserCommand::AirdropQuota { owner } => {
            println!("{}", client.airdrop_quota(owner, cancel).await?);
        }
        UserCommand::MintQuota { owner } => {
            println!("{}", client.mint_quota(owner, cancel).await?);
        }
        UserCommand::Paused => println!("Paused: {}", client.paused(cancel).await?),
        UserCommand::Phase => println!("Phase: {}", client.phase(cancel).await?),
        UserCommand::TotalSupply => {
            let total = client.total_supply(BlockContext::Latest, cancel).await?;
            println!("TotalSupply: {total}");
        }
    }
    Ok(())
}

async fn run_admin(cmd: AdminCommand, config: &Config, cancel: &CancellationToken) -> Result<()> {
    // Parse list inputs before touching the wallet or the network
    let list = match &cmd {
        AdminCommand::AddAirdrop(list)
        | AdminCommand::AddWhitelist(list)
        | AdminCommand::AddReserve(list) => Some(load_address_list(&list.address_list)?),
        _ => None,
    };

    let client: CarClient<RpcChain> = CarClient::connect_with_account(config)?;
    let receipt = match cmd {
        AdminCommand::AddAirdrop(args) => {
            Some(client.add_airdrop(list.unwrap_or_default(), args.amount, cancel).await?)
        }
        AdminCommand::AddWhitelist(args) => {
            Some(client.add_whitelist(list.unwrap_or_default(), args.amount, cancel).await?)
        }
        AdminCommand::AddReserve(args) => {
            Some(client.add_reserve(list.unwrap_or_default(), args.amount, cancel).await?)
        }
        AdminCommand::Pause => client.pause(cancel).await.context("pause")?,
        AdminCommand::Unpause => client.unpause(cancel).await.context("unpause")?,
        AdminCommand::SetPhase { phase } => Some(client.set_phase(phase, cancel).await?),
    };

    match receipt {
        Some(receipt) => print_receipt(&receipt),
        None => println!("Nothing to do"),
    }
    Ok(())
}

fn print_receipt(receipt: &Receipt) {
    match receipt.block_number {
        Some(block) => println!(
            "Confirmed {} in block {block}, gas used {}",
            receipt.tx_hash, receipt.gas_used
        ),
        None => println!("Confirmed {}, gas used {}", receipt.tx_hash, receipt.gas_used),
    }
}

async fn cancel_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let Ok(mut term) = signal(SignalKind::terminate()) else {
            let _ = tokio::signal::ctrl_c().await;
            cancel.cancel();
            return;
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::warn!("interrupted, cancelling");
    cancel.cancel();
}

mod commands;
mod config;

use anyhow::Context;
use baboon_core::BaboonError;
use baboon_games::{coordinator_from_config, GameError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "baboon")]
#[command(about = "Baboon Games - two-player token wagers")]
#[command(version)]
struct Cli {
    /// Config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint used for contract reads and receipts
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// JSON-RPC endpoint of the signing wallet
    #[arg(long, global = true)]
    wallet_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the wallet and show account, role and deposit amount
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Approve the games contract to spend one deposit
    Approve {
        /// Return once submitted
        #[arg(long)]
        no_wait: bool,
    },
    /// Approve and deposit tokens for a game
    Deposit {
        /// Game ID
        game_id: String,
        /// Player 1 address
        player1: String,
        /// Player 2 address
        player2: String,
        /// Return once submitted
        #[arg(long)]
        no_wait: bool,
    },
    /// Pick the winner of a game (admin only)
    PickWinner {
        /// Game ID
        game_id: String,
        /// Winner address
        winner: String,
        /// Return once submitted
        #[arg(long)]
        no_wait: bool,
    },
    /// Show a game record
    Game {
        /// Game ID
        game_id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show token balance for an account (defaults to the connected one)
    Balance { account: Option<String> },
    /// Menu-driven session
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "baboon={},baboon_core={},baboon_games={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let overrides = config::Overrides {
        rpc_url: cli.rpc_url,
        wallet_url: cli.wallet_url,
    };
    let config = config::resolve(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;
    let mut coordinator =
        coordinator_from_config(&config).context("Failed to set up wallet and provider")?;

    // Execute command
    let result = match cli.command {
        Commands::Status { json } => commands::query::status(&mut coordinator, json).await,
        Commands::Approve { no_wait } => commands::wager::approve(&mut coordinator, no_wait).await,
        Commands::Deposit {
            game_id,
            player1,
            player2,
            no_wait,
        } => {
            commands::wager::deposit(&mut coordinator, &game_id, &player1, &player2, no_wait)
                .await
        }
        Commands::PickWinner {
            game_id,
            winner,
            no_wait,
        } => commands::wager::pick_winner(&mut coordinator, &game_id, &winner, no_wait).await,
        Commands::Game { game_id, json } => {
            commands::query::game(&coordinator, &game_id, json).await
        }
        Commands::Balance { account } => {
            commands::query::balance(&mut coordinator, account.as_deref()).await
        }
        Commands::Interactive => commands::interactive::run(&mut coordinator).await,
    };

    if let Err(e) = result {
        match &e {
            GameError::Core(BaboonError::WalletRejected(msg)) => {
                eprintln!("Error: Request rejected in wallet: {}", msg);
            }
            GameError::Core(BaboonError::NetworkConnection(msg)) => {
                eprintln!("Error: Network connection failed: {}", msg);
                eprintln!(
                    "Check that the node at {} and the wallet at {} are running",
                    config.rpc_url, config.wallet_url
                );
            }
            GameError::Core(BaboonError::ContractRevert { reason }) => {
                eprintln!("Error: Contract rejected the call: {}", reason);
            }
            GameError::NotAdmin => {
                eprintln!("Error: {}", e);
                eprintln!("Admin accounts are set with `admins` in the config file");
            }
            GameError::Core(BaboonError::Timeout(msg)) => {
                eprintln!("Error: {}", msg);
                eprintln!("The transaction may still confirm; check it in your wallet");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

use alloy_primitives::utils::format_ether;
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};

pub type TxHash = B256;

/// Outcome of polling a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Pending,
    Success {
        block_number: u64,
        events: Vec<GameEvent>,
    },
    Reverted {
        block_number: u64,
    },
}

impl ReceiptStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReceiptStatus::Pending)
    }
}

/// Events emitted by the wager contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TokensDeposited {
        player1: Address,
        player2: Address,
        deposit: U256,
        game_id: U256,
    },
    WinnerSelected {
        winner: Address,
        game_id: U256,
        amount: U256,
    },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::TokensDeposited {
                player1,
                player2,
                deposit,
                game_id,
            } => write!(
                f,
                "Game {}: {} tokens deposited for {} vs {}",
                game_id,
                format_token_amount(*deposit),
                player1,
                player2
            ),
            GameEvent::WinnerSelected {
                winner,
                game_id,
                amount,
            } => write!(
                f,
                "Game {}: {} won {} tokens",
                game_id,
                winner,
                format_token_amount(*amount)
            ),
        }
    }
}

/// On-chain record returned by `games(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: U256,
    pub players: [Address; 2],
    pub winner: Address,
    pub is_played: bool,
}

impl GameRecord {
    /// Unused ids read back as all-zero records.
    pub fn exists(&self) -> bool {
        self.players.iter().any(|p| !p.is_zero())
    }

    pub fn winner(&self) -> Option<Address> {
        (!self.winner.is_zero()).then_some(self.winner)
    }
}

/// Raw log as returned inside `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<U64>,
    pub status: Option<U64>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Transaction handed to the wallet for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

/// Token amounts use 18 decimals, same as ether.
pub fn format_token_amount(amount: U256) -> String {
    format_ether(amount)
}

/// `0x1234...abcd` form used in the connection banner.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

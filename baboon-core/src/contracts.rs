//! ABI bindings for the wager contract and its ERC-20 token.
//!
//! The contract surface is fixed; this module only encodes calls, decodes
//! view results, event logs and custom revert errors.

use crate::error::Result;
use crate::types::{GameEvent, GameRecord, LogEntry};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall, SolEvent, SolInterface};
use serde::{Deserialize, Serialize};

sol! {
    interface IBaboonGames {
        error GameAlreadyFinished();
        error InvalidPlayers();
        error InvalidWinner();
        error WinnerNotInGame();

        event TokensDeposited(address indexed player1, address indexed player2, uint256 deposit, uint256 gameID);
        event WinnerSelected(address indexed winner, uint256 id, uint256 amount);

        function depositTokens(uint256 id, address player1, address player2) external;
        function depositAmount() external view returns (uint256);
        function games(uint256) external view returns (address[2] memory players, address winner, uint8 isPlayed);
        function pickWinner(uint256 id, address _winner) external;
        function token() external view returns (address);
    }

    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Deployed addresses of the two contracts the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub games: Address,
    pub token: Address,
}

/// A state-mutating call against one of the two contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Approve { spender: Address, amount: U256 },
    DepositTokens { id: U256, player1: Address, player2: Address },
    PickWinner { id: U256, winner: Address },
}

impl ContractCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::DepositTokens { .. } => "depositTokens",
            Self::PickWinner { .. } => "pickWinner",
        }
    }

    pub fn target(&self, contracts: &ContractAddresses) -> Address {
        match self {
            Self::Approve { .. } => contracts.token,
            Self::DepositTokens { .. } | Self::PickWinner { .. } => contracts.games,
        }
    }

    pub fn calldata(&self) -> Bytes {
        let encoded = match self {
            Self::Approve { spender, amount } => IERC20::approveCall {
                spender: *spender,
                amount: *amount,
            }
            .abi_encode(),
            Self::DepositTokens {
                id,
                player1,
                player2,
            } => IBaboonGames::depositTokensCall {
                id: *id,
                player1: *player1,
                player2: *player2,
            }
            .abi_encode(),
            Self::PickWinner { id, winner } => IBaboonGames::pickWinnerCall {
                id: *id,
                _winner: *winner,
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }
}

pub fn deposit_amount_calldata() -> Bytes {
    Bytes::from(IBaboonGames::depositAmountCall {}.abi_encode())
}

pub fn decode_deposit_amount(data: &[u8]) -> Result<U256> {
    let ret = IBaboonGames::depositAmountCall::abi_decode_returns(data, true)?;
    Ok(ret._0)
}

pub fn token_calldata() -> Bytes {
    Bytes::from(IBaboonGames::tokenCall {}.abi_encode())
}

pub fn decode_token(data: &[u8]) -> Result<Address> {
    let ret = IBaboonGames::tokenCall::abi_decode_returns(data, true)?;
    Ok(ret._0)
}

pub fn game_calldata(id: U256) -> Bytes {
    Bytes::from(IBaboonGames::gamesCall { _0: id }.abi_encode())
}

pub fn decode_game(id: U256, data: &[u8]) -> Result<GameRecord> {
    let ret = IBaboonGames::gamesCall::abi_decode_returns(data, true)?;
    Ok(GameRecord {
        id,
        players: ret.players,
        winner: ret.winner,
        is_played: ret.isPlayed != 0,
    })
}

pub fn balance_of_calldata(account: Address) -> Bytes {
    Bytes::from(IERC20::balanceOfCall { account }.abi_encode())
}

pub fn decode_balance(data: &[u8]) -> Result<U256> {
    let ret = IERC20::balanceOfCall::abi_decode_returns(data, true)?;
    Ok(ret._0)
}

/// Decode the wager contract's events out of a receipt's logs.
///
/// Logs emitted by other contracts (the token's `Approval`/`Transfer`) and
/// logs with unknown topics are skipped.
pub fn decode_game_events(games: Address, logs: &[LogEntry]) -> Vec<GameEvent> {
    logs.iter()
        .filter(|log| log.address == games)
        .filter_map(|log| {
            let topic0 = *log.topics.first()?;
            if topic0 == IBaboonGames::TokensDeposited::SIGNATURE_HASH {
                let event = IBaboonGames::TokensDeposited::decode_raw_log(
                    log.topics.iter().copied(),
                    &log.data,
                    true,
                )
                .map_err(|e| tracing::warn!("Undecodable TokensDeposited log: {}", e))
                .ok()?;
                Some(GameEvent::TokensDeposited {
                    player1: event.player1,
                    player2: event.player2,
                    deposit: event.deposit,
                    game_id: event.gameID,
                })
            } else if topic0 == IBaboonGames::WinnerSelected::SIGNATURE_HASH {
                let event = IBaboonGames::WinnerSelected::decode_raw_log(
                    log.topics.iter().copied(),
                    &log.data,
                    true,
                )
                .map_err(|e| tracing::warn!("Undecodable WinnerSelected log: {}", e))
                .ok()?;
                Some(GameEvent::WinnerSelected {
                    winner: event.winner,
                    game_id: event.id,
                    amount: event.amount,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Map revert data onto the wager contract's custom error names.
pub fn decode_revert(data: &[u8]) -> Option<&'static str> {
    use IBaboonGames::IBaboonGamesErrors as Errors;

    match Errors::abi_decode(data, true).ok()? {
        Errors::GameAlreadyFinished(_) => Some("GameAlreadyFinished"),
        Errors::InvalidPlayers(_) => Some("InvalidPlayers"),
        Errors::InvalidWinner(_) => Some("InvalidWinner"),
        Errors::WinnerNotInGame(_) => Some("WinnerNotInGame"),
    }
}

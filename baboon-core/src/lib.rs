//! Baboon Games SDK - core library for the two-player token wager contracts
//!
//! Wraps the wallet that signs, the provider that reads, and the fixed ABI
//! of the wager contract and its ERC-20 token behind two traits so callers
//! can swap in their own implementations.

pub mod config;
pub mod contracts;
pub mod error;
pub mod gateway;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use config::BaboonConfig;
pub use contracts::{ContractAddresses, ContractCall};
pub use error::{BaboonError, Result};
pub use gateway::{watch_receipt, ContractGateway, RpcGateway};
pub use types::{GameEvent, GameRecord, ReceiptStatus, TransactionRequest, TxHash};
pub use wallet::{RpcWallet, WalletAdapter};

pub use alloy_primitives::{Address, U256};

use std::sync::Arc;

/// Wire an [`RpcWallet`] and an [`RpcGateway`] from configuration.
pub fn connect_rpc(config: &BaboonConfig) -> Result<(Arc<RpcWallet>, Arc<RpcGateway>)> {
    config.validate()?;

    let wallet = Arc::new(RpcWallet::new(config.wallet_url.clone())?);
    let gateway = Arc::new(RpcGateway::new(
        config.rpc_url.clone(),
        wallet.clone(),
        config.contracts,
    )?);

    Ok((wallet, gateway))
}

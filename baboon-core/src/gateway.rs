//! Reads, writes and receipts against the wager and token contracts.

use crate::contracts::{self, ContractAddresses, ContractCall};
use crate::error::{BaboonError, Result};
use crate::rpc::JsonRpcClient;
use crate::types::{GameRecord, ReceiptStatus, RpcReceipt, TransactionRequest, TxHash};
use crate::wallet::WalletAdapter;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use futures::stream::{self, Stream};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait ContractGateway: Send + Sync {
    fn contracts(&self) -> &ContractAddresses;

    async fn deposit_amount(&self) -> Result<U256>;

    async fn game(&self, id: U256) -> Result<GameRecord>;

    async fn token(&self) -> Result<Address>;

    async fn balance_of(&self, account: Address) -> Result<U256>;

    /// Submit a state-mutating call signed by the connected wallet.
    async fn write(&self, call: ContractCall) -> Result<TxHash>;

    async fn receipt_status(&self, hash: TxHash) -> Result<ReceiptStatus>;
}

/// Poll `receipt_status` every `interval`, yielding each observation.
///
/// The stream ends after the first terminal status or the first error.
pub fn watch_receipt<'a>(
    gateway: &'a dyn ContractGateway,
    hash: TxHash,
    interval: Duration,
) -> impl Stream<Item = Result<ReceiptStatus>> + 'a {
    stream::unfold((false, true), move |(done, first)| async move {
        if done {
            return None;
        }
        if !first {
            tokio::time::sleep(interval).await;
        }

        let item = gateway.receipt_status(hash).await;
        let finished = match &item {
            Ok(status) => status.is_terminal(),
            Err(_) => true,
        };
        Some((item, (finished, false)))
    })
}

pub struct RpcGateway {
    rpc: JsonRpcClient,
    wallet: Arc<dyn WalletAdapter>,
    contracts: ContractAddresses,
}

impl RpcGateway {
    pub fn new(
        rpc_url: impl Into<String>,
        wallet: Arc<dyn WalletAdapter>,
        contracts: ContractAddresses,
    ) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(rpc_url)?,
            wallet,
            contracts,
        })
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.rpc
            .request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }
}

#[async_trait]
impl ContractGateway for RpcGateway {
    fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    async fn deposit_amount(&self) -> Result<U256> {
        let data = self
            .call(self.contracts.games, contracts::deposit_amount_calldata())
            .await?;
        contracts::decode_deposit_amount(&data)
    }

    async fn game(&self, id: U256) -> Result<GameRecord> {
        let data = self
            .call(self.contracts.games, contracts::game_calldata(id))
            .await?;
        contracts::decode_game(id, &data)
    }

    async fn token(&self) -> Result<Address> {
        let data = self
            .call(self.contracts.games, contracts::token_calldata())
            .await?;
        contracts::decode_token(&data)
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        let data = self
            .call(self.contracts.token, contracts::balance_of_calldata(account))
            .await?;
        contracts::decode_balance(&data)
    }

    async fn write(&self, call: ContractCall) -> Result<TxHash> {
        let from = self.wallet.address().ok_or(BaboonError::NotConnected)?;
        let request = TransactionRequest {
            from,
            to: call.target(&self.contracts),
            data: call.calldata(),
        };

        tracing::info!("Submitting {} to {}", call.function_name(), request.to);
        let hash = self.wallet.send_transaction(request).await?;
        tracing::info!("{} submitted: {}", call.function_name(), hash);
        Ok(hash)
    }

    async fn receipt_status(&self, hash: TxHash) -> Result<ReceiptStatus> {
        let receipt: Option<RpcReceipt> = self
            .rpc
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;

        Ok(receipt_to_status(&self.contracts, receipt))
    }
}

fn receipt_to_status(contracts: &ContractAddresses, receipt: Option<RpcReceipt>) -> ReceiptStatus {
    let Some(receipt) = receipt else {
        return ReceiptStatus::Pending;
    };
    // Some nodes return a receipt skeleton before the block is sealed.
    let Some(block) = receipt.block_number else {
        return ReceiptStatus::Pending;
    };
    let block_number = block.to::<u64>();

    match receipt.status.map(|s| s.to::<u64>()) {
        Some(0) => ReceiptStatus::Reverted { block_number },
        _ => ReceiptStatus::Success {
            block_number,
            events: contracts::decode_game_events(contracts.games, &receipt.logs),
        },
    }
}

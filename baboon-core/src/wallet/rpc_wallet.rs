use crate::error::{BaboonError, Result};
use crate::rpc::JsonRpcClient;
use crate::types::{TransactionRequest, TxHash};
use crate::wallet::WalletAdapter;
use alloy_primitives::Address;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::json;

/// Wallet reached through an EIP-1193 style JSON-RPC endpoint.
pub struct RpcWallet {
    rpc: JsonRpcClient,
    account: RwLock<Option<Address>>,
}

impl RpcWallet {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(url)?,
            account: RwLock::new(None),
        })
    }

    pub fn url(&self) -> &str {
        self.rpc.url()
    }
}

#[async_trait]
impl WalletAdapter for RpcWallet {
    async fn connect(&self) -> Result<Address> {
        let accounts: Vec<Address> = self.rpc.request("eth_requestAccounts", json!([])).await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| BaboonError::wallet("Wallet returned no accounts"))?;

        *self.account.write() = Some(account);
        tracing::info!("Wallet connected: {}", account);
        Ok(account)
    }

    async fn disconnect(&self) -> Result<()> {
        // Injected providers have no disconnect call; forgetting the account is enough.
        if let Some(account) = self.account.write().take() {
            tracing::info!("Wallet disconnected: {}", account);
        }
        Ok(())
    }

    fn address(&self) -> Option<Address> {
        *self.account.read()
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash> {
        let connected = self.address().ok_or(BaboonError::NotConnected)?;
        if connected != request.from {
            return Err(BaboonError::wallet(format!(
                "Transaction sender {} is not the connected account {}",
                request.from, connected
            )));
        }

        let hash: TxHash = self
            .rpc
            .request("eth_sendTransaction", json!([request]))
            .await?;

        tracing::debug!("Wallet broadcast {} to {}", hash, request.to);
        Ok(hash)
    }
}

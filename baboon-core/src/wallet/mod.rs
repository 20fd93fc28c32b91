pub mod rpc_wallet;

pub use rpc_wallet::RpcWallet;

use crate::error::Result;
use crate::types::{TransactionRequest, TxHash};
use alloy_primitives::Address;
use async_trait::async_trait;

/// Something that holds keys and signs on the user's behalf: a browser
/// extension, a desktop wallet exposing an RPC port, or a test double.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Ask the wallet for an account. The wallet may prompt the user.
    async fn connect(&self) -> Result<Address>;

    async fn disconnect(&self) -> Result<()>;

    fn address(&self) -> Option<Address>;

    fn is_connected(&self) -> bool {
        self.address().is_some()
    }

    /// Sign and broadcast. Returns once the wallet hands back a hash, not on inclusion.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash>;
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BaboonError>;

/// EIP-1193 code returned by wallets when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum BaboonError {
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Request rejected by wallet: {0}")]
    WalletRejected(String),

    #[error("No wallet connected")]
    NotConnected,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Contract reverted: {reason}")]
    ContractRevert { reason: String },

    #[error("Network connection error: {0}")]
    NetworkConnection(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation timeout: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BaboonError {
    pub fn wallet(msg: impl Into<String>) -> Self {
        Self::Wallet(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn network_connection(msg: impl Into<String>) -> Self {
        Self::NetworkConnection(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }
}

impl From<reqwest::Error> for BaboonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BaboonError::Timeout(err.to_string())
        } else {
            BaboonError::NetworkConnection(err.to_string())
        }
    }
}

impl From<alloy_sol_types::Error> for BaboonError {
    fn from(err: alloy_sol_types::Error) -> Self {
        BaboonError::Abi(err.to_string())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for BaboonError {
    fn from(err: dialoguer::Error) -> Self {
        BaboonError::Dialog(err.to_string())
    }
}

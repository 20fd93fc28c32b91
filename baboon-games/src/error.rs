use baboon_core::TxHash;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Baboon core error: {0}")]
    Core(#[from] baboon_core::BaboonError),

    #[error("Please fill in all fields (missing: {})", missing.join(", "))]
    IncompleteForm { missing: Vec<&'static str> },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Connect a wallet first")]
    NotConnected,

    #[error("Only the admin can pick a winner")]
    NotAdmin,

    #[error("Transaction {0} is still pending")]
    TransactionPending(TxHash),

    #[error("Another submission is already in progress")]
    SubmissionInProgress,

    #[error("No pending transaction")]
    NoPendingTransaction,

    #[error("Deposit amount has not been loaded from the contract")]
    DepositAmountUnavailable,

    #[error("Transaction {0} reverted")]
    Reverted(TxHash),
}

//! Baboon Games client logic
//!
//! Sequences the approve/deposit and pick-winner calls for two-player token
//! wagers, tracks the one in-flight transaction, and derives what the
//! front-end should show. Nothing here draws to a screen.

pub mod coordinator;
pub mod error;
pub mod forms;
pub mod role;
pub mod session;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use coordinator::{ReceiptOptions, TransactionCoordinator};
pub use error::{GameError, Result};
pub use forms::{DepositIntent, FormField, FormFields, PickWinnerIntent};
pub use role::{RoleResolver, StaticRoles};
pub use session::Session;
pub use state::{AppEvent, AppState, Intent, PendingTransaction, TxOutcome, TxPhase};
pub use view::ViewModel;

use baboon_core::BaboonConfig;
use std::sync::Arc;

/// Build a coordinator wired to the JSON-RPC wallet and provider from `config`.
pub fn coordinator_from_config(config: &BaboonConfig) -> Result<TransactionCoordinator> {
    let (wallet, gateway) = baboon_core::connect_rpc(config)?;
    let roles = Arc::new(StaticRoles::new(config.admins.iter().copied()));
    let receipts = ReceiptOptions {
        poll_interval: config.receipt_poll_interval(),
        timeout: config.receipt_timeout(),
    };

    Ok(TransactionCoordinator::new(gateway, wallet, roles, receipts))
}

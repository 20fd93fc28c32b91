//! What the front-end shows for a given [`AppState`], independent of how it is drawn.

use crate::state::{AppState, Intent, TxOutcome};
use alloy_primitives::Address;
use baboon_core::types::{format_token_amount, short_address};
use serde::Serialize;

pub const PROCESSING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConnectionView {
    Disconnected,
    Connected { address: Address, short: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositFormView {
    pub game_id: String,
    pub player1: String,
    pub player2: String,
    /// Per-player amount in whole tokens, `None` while loading.
    pub deposit_amount: Option<String>,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickWinnerFormView {
    pub game_id: String,
    pub winner: String,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub connection: ConnectionView,
    pub deposit: Option<DepositFormView>,
    /// Present only for admin sessions.
    pub pick_winner: Option<PickWinnerFormView>,
    pub pending: Option<String>,
}

impl ViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let session = state.session();
        let busy = state.is_pending();

        let Some(address) = session.address() else {
            return Self {
                connection: ConnectionView::Disconnected,
                deposit: None,
                pick_winner: None,
                pending: pending_line(state),
            };
        };

        let form = state.form();
        let deposit = DepositFormView {
            game_id: form.game_id.clone(),
            player1: form.player1.clone(),
            player2: form.player2.clone(),
            deposit_amount: state.deposit_amount().map(format_token_amount),
            submit_label: if busy { PROCESSING_LABEL } else { "Deposit Tokens" },
            submit_enabled: !busy,
        };

        let pick_winner = session.is_admin().then(|| PickWinnerFormView {
            game_id: form.game_id.clone(),
            winner: form.winner.clone(),
            submit_label: if busy { PROCESSING_LABEL } else { "Pick Winner" },
            submit_enabled: !busy,
        });

        Self {
            connection: ConnectionView::Connected {
                address,
                short: short_address(&address),
            },
            deposit: Some(deposit),
            pick_winner,
            pending: pending_line(state),
        }
    }
}

fn pending_line(state: &AppState) -> Option<String> {
    let pending = state.pending()?;
    Some(match pending.hash {
        Some(hash) => format!("Waiting for {} ({} submitted)", hash, pending.submitted.len()),
        None => "Waiting for wallet...".to_string(),
    })
}

pub fn connected_alert(address: &Address) -> String {
    format!("Connected: {}", address)
}

pub fn failure_alert(intent: Intent, reason: &str) -> String {
    format!("Failed to {}: {}", intent.action(), reason)
}

/// Alert text for the last resolved transaction.
pub fn outcome_alert(outcome: &TxOutcome) -> String {
    match outcome {
        TxOutcome::Confirmed { .. } => "Transaction successful!".to_string(),
        TxOutcome::Failed { intent, reason } => failure_alert(*intent, reason),
    }
}

//! Immutable client state and the events that move it forward.
//!
//! Every transition goes through [`AppState::apply`], which returns a new
//! snapshot and leaves the old one untouched.

use crate::error::{GameError, Result};
use crate::forms::{FormField, FormFields};
use crate::session::Session;
use alloy_primitives::U256;
use baboon_core::{GameEvent, TxHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Approve,
    Deposit,
    PickWinner,
}

impl Intent {
    /// Verb used in user-facing failure messages.
    pub fn action(&self) -> &'static str {
        match self {
            Intent::Approve => "approve tokens",
            Intent::Deposit => "deposit tokens",
            Intent::PickWinner => "pick winner",
        }
    }
}

/// The one in-flight user intent and the transactions it has broadcast so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub id: Uuid,
    pub intent: Intent,
    /// Latest submitted hash; this is the one whose receipt is awaited.
    pub hash: Option<TxHash>,
    pub submitted: Vec<TxHash>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptOutcome {
    Success {
        block_number: u64,
        events: Vec<GameEvent>,
    },
    Reverted {
        block_number: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxOutcome {
    Confirmed {
        hash: TxHash,
        block_number: u64,
        events: Vec<GameEvent>,
    },
    Failed {
        intent: Intent,
        reason: String,
    },
}

/// `idle -> submitted -> (confirmed | failed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    Submitted,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Connected(Session),
    Disconnected,
    FieldChanged(FormField, String),
    DepositAmountLoaded(U256),
    IntentStarted { id: Uuid, intent: Intent },
    TransactionSubmitted(TxHash),
    SubmissionFailed(String),
    ReceiptResolved { hash: TxHash, outcome: ReceiptOutcome },
    FormReset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    session: Session,
    form: FormFields,
    deposit_amount: Option<U256>,
    pending: Option<PendingTransaction>,
    last_outcome: Option<TxOutcome>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn deposit_amount(&self) -> Option<U256> {
        self.deposit_amount
    }

    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    pub fn pending_hash(&self) -> Option<TxHash> {
        self.pending.as_ref().and_then(|p| p.hash)
    }

    pub fn last_outcome(&self) -> Option<&TxOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> TxPhase {
        if self.pending.is_some() {
            return TxPhase::Submitted;
        }
        match self.last_outcome {
            None => TxPhase::Idle,
            Some(TxOutcome::Confirmed { .. }) => TxPhase::Confirmed,
            Some(TxOutcome::Failed { .. }) => TxPhase::Failed,
        }
    }

    pub fn apply(&self, event: AppEvent) -> Result<AppState> {
        let mut next = self.clone();

        match event {
            AppEvent::Connected(session) => {
                next.session = session;
            }
            AppEvent::Disconnected => {
                next.session = Session::disconnected();
            }
            AppEvent::FieldChanged(field, value) => {
                next.form = next.form.with(field, value);
            }
            AppEvent::DepositAmountLoaded(amount) => {
                next.deposit_amount = Some(amount);
            }
            AppEvent::IntentStarted { id, intent } => {
                if let Some(pending) = &self.pending {
                    return Err(match pending.hash {
                        Some(hash) => GameError::TransactionPending(hash),
                        None => GameError::SubmissionInProgress,
                    });
                }
                next.pending = Some(PendingTransaction {
                    id,
                    intent,
                    hash: None,
                    submitted: Vec::new(),
                    started_at: Utc::now(),
                });
            }
            AppEvent::TransactionSubmitted(hash) => {
                let pending = next
                    .pending
                    .as_mut()
                    .ok_or(GameError::NoPendingTransaction)?;
                pending.hash = Some(hash);
                pending.submitted.push(hash);
            }
            AppEvent::SubmissionFailed(reason) => {
                let pending = next
                    .pending
                    .take()
                    .ok_or(GameError::NoPendingTransaction)?;
                next.last_outcome = Some(TxOutcome::Failed {
                    intent: pending.intent,
                    reason,
                });
            }
            AppEvent::ReceiptResolved { hash, outcome } => {
                if self.pending_hash() != Some(hash) {
                    tracing::warn!("Ignoring receipt for {} which is not the pending transaction", hash);
                    return Ok(next);
                }
                let pending = next
                    .pending
                    .take()
                    .ok_or(GameError::NoPendingTransaction)?;

                next.last_outcome = Some(match outcome {
                    ReceiptOutcome::Success {
                        block_number,
                        events,
                    } => {
                        next.form = FormFields::default();
                        TxOutcome::Confirmed {
                            hash,
                            block_number,
                            events,
                        }
                    }
                    ReceiptOutcome::Reverted { block_number } => TxOutcome::Failed {
                        intent: pending.intent,
                        reason: format!("transaction {} reverted in block {}", hash, block_number),
                    },
                });
            }
            AppEvent::FormReset => {
                next.form = FormFields::default();
                next.pending = None;
            }
        }

        Ok(next)
    }
}

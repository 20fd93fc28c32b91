use crate::error::{GameError, Result};
use crate::forms::{DepositIntent, FormField, PickWinnerIntent};
use crate::role::RoleResolver;
use crate::session::Session;
use crate::state::{AppEvent, AppState, Intent, ReceiptOutcome};
use alloy_primitives::Address;
use baboon_core::{watch_receipt, ContractCall, ContractGateway, ReceiptStatus, TxHash, WalletAdapter};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct ReceiptOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Turns user intents into ordered contract calls and folds the outcomes
/// back into [`AppState`].
pub struct TransactionCoordinator {
    gateway: Arc<dyn ContractGateway>,
    wallet: Arc<dyn WalletAdapter>,
    roles: Arc<dyn RoleResolver>,
    receipts: ReceiptOptions,
    state: AppState,
}

impl TransactionCoordinator {
    pub fn new(
        gateway: Arc<dyn ContractGateway>,
        wallet: Arc<dyn WalletAdapter>,
        roles: Arc<dyn RoleResolver>,
        receipts: ReceiptOptions,
    ) -> Self {
        Self {
            gateway,
            wallet,
            roles,
            receipts,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gateway(&self) -> &dyn ContractGateway {
        self.gateway.as_ref()
    }

    fn apply(&mut self, event: AppEvent) -> Result<()> {
        self.state = self.state.apply(event)?;
        Ok(())
    }

    // Session

    pub async fn connect(&mut self) -> Result<Session> {
        let address = self.wallet.connect().await?;
        let session = Session::connected(address, self.roles.as_ref());
        self.apply(AppEvent::Connected(session))?;

        tracing::info!(
            "Connected: {} (admin: {})",
            address,
            session.is_admin()
        );
        Ok(session)
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        self.wallet.disconnect().await?;
        self.apply(AppEvent::Disconnected)
    }

    fn connected_address(&self) -> Result<Address> {
        self.state
            .session()
            .address()
            .ok_or(GameError::NotConnected)
    }

    // Reads

    pub async fn load_deposit_amount(&mut self) -> Result<()> {
        let amount = self.gateway.deposit_amount().await?;
        tracing::debug!("Deposit amount: {}", amount);
        self.apply(AppEvent::DepositAmountLoaded(amount))
    }

    // Forms

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.apply(AppEvent::FieldChanged(field, value.into()))
    }

    /// Clear the forms and forget the pending transaction. Broadcast transactions are not affected.
    pub fn reset_form(&mut self) -> Result<()> {
        if let Some(hash) = self.state.pending_hash() {
            tracing::warn!("Form reset; no longer tracking {}", hash);
        }
        self.apply(AppEvent::FormReset)
    }

    // Writes

    pub async fn approve_tokens(&mut self) -> Result<TxHash> {
        self.begin_intent(Intent::Approve)?;
        let result = self.submit_approve().await;
        self.finish_intent(Intent::Approve, result)
    }

    pub async fn deposit_tokens(
        &mut self,
        game_id: &str,
        player1: &str,
        player2: &str,
    ) -> Result<TxHash> {
        let intent = DepositIntent::parse(game_id, player1, player2)?;
        self.begin_intent(Intent::Deposit)?;

        let result: Result<TxHash> = async {
            // only submission of the approval is awaited, not its inclusion
            self.submit_approve().await?;
            self.submit(ContractCall::DepositTokens {
                id: intent.game_id,
                player1: intent.player1,
                player2: intent.player2,
            })
            .await
        }
        .await;

        self.finish_intent(Intent::Deposit, result)
    }

    pub async fn pick_winner(&mut self, game_id: &str, winner: &str) -> Result<TxHash> {
        let intent = PickWinnerIntent::parse(game_id, winner)?;
        if !self.state.session().is_admin() {
            return Err(GameError::NotAdmin);
        }
        self.begin_intent(Intent::PickWinner)?;

        let result = self
            .submit(ContractCall::PickWinner {
                id: intent.game_id,
                winner: intent.winner,
            })
            .await;

        self.finish_intent(Intent::PickWinner, result)
    }

    pub async fn submit_deposit_form(&mut self) -> Result<TxHash> {
        let form = self.state.form().clone();
        self.deposit_tokens(&form.game_id, &form.player1, &form.player2)
            .await
    }

    pub async fn submit_pick_winner_form(&mut self) -> Result<TxHash> {
        let form = self.state.form().clone();
        self.pick_winner(&form.game_id, &form.winner).await
    }

    fn begin_intent(&mut self, intent: Intent) -> Result<()> {
        self.connected_address()?;

        let id = Uuid::new_v4();
        self.apply(AppEvent::IntentStarted { id, intent })?;
        tracing::debug!("Intent {} started: {:?}", id, intent);
        Ok(())
    }

    /// A failed step clears the pending handle but keeps the form populated.
    fn finish_intent(&mut self, intent: Intent, result: Result<TxHash>) -> Result<TxHash> {
        match result {
            Ok(hash) => Ok(hash),
            Err(err) => {
                tracing::warn!("Failed to {}: {}", intent.action(), err);
                self.apply(AppEvent::SubmissionFailed(err.to_string()))?;
                Err(err)
            }
        }
    }

    async fn submit_approve(&mut self) -> Result<TxHash> {
        let amount = self
            .state
            .deposit_amount()
            .ok_or(GameError::DepositAmountUnavailable)?;
        let call = ContractCall::Approve {
            spender: self.gateway.contracts().games,
            amount,
        };
        self.submit(call).await
    }

    async fn submit(&mut self, call: ContractCall) -> Result<TxHash> {
        let hash = self.gateway.write(call).await?;
        self.apply(AppEvent::TransactionSubmitted(hash))?;
        Ok(hash)
    }

    // Receipts

    /// Wait for the pending transaction to resolve and apply the result.
    ///
    /// On timeout the transaction stays pending so the caller may wait again
    /// or reset the form.
    pub async fn await_receipt(&mut self) -> Result<ReceiptStatus> {
        let hash = self
            .state
            .pending_hash()
            .ok_or(GameError::NoPendingTransaction)?;

        let status = {
            let watch = watch_receipt(self.gateway.as_ref(), hash, self.receipts.poll_interval);
            let last_status = async move {
                let mut watch = Box::pin(watch);
                let mut last = Ok(ReceiptStatus::Pending);
                while let Some(item) = watch.next().await {
                    if let Ok(ReceiptStatus::Pending) = &item {
                        tracing::debug!("{} still pending", hash);
                    }
                    last = item;
                }
                last
            };

            match tokio::time::timeout(self.receipts.timeout, last_status).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(baboon_core::BaboonError::timeout(format!(
                        "no receipt for {} after {:?}",
                        hash, self.receipts.timeout
                    ))
                    .into())
                }
            }
        };

        let outcome = match &status {
            ReceiptStatus::Pending => return Ok(status),
            ReceiptStatus::Success {
                block_number,
                events,
            } => {
                tracing::info!("Transaction {} confirmed in block {}", hash, block_number);
                ReceiptOutcome::Success {
                    block_number: *block_number,
                    events: events.clone(),
                }
            }
            ReceiptStatus::Reverted { block_number } => {
                tracing::warn!("Transaction {} reverted in block {}", hash, block_number);
                ReceiptOutcome::Reverted {
                    block_number: *block_number,
                }
            }
        };

        self.apply(AppEvent::ReceiptResolved { hash, outcome })?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::StaticRoles;
    use crate::state::{TxOutcome, TxPhase};
    use crate::test_helpers::*;
    use baboon_core::{BaboonError, GameEvent, U256};

    fn coordinator(
        gateway: &Arc<MockGateway>,
        wallet: Arc<MockWallet>,
    ) -> TransactionCoordinator {
        TransactionCoordinator::new(
            gateway.clone(),
            wallet,
            Arc::new(StaticRoles::new([ADMIN])),
            ReceiptOptions {
                poll_interval: Duration::from_millis(1),
                timeout: Duration::from_secs(5),
            },
        )
    }

    async fn ready(gateway: &Arc<MockGateway>, account: Address) -> TransactionCoordinator {
        let mut coord = coordinator(gateway, MockWallet::new(account));
        coord.connect().await.unwrap();
        coord.load_deposit_amount().await.unwrap();
        coord
    }

    #[tokio::test]
    async fn test_deposit_with_empty_field_never_calls_gateway() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, PLAYER).await;

        for (game_id, p1, p2) in [("", P1_TEXT, P2_TEXT), ("1", "", P2_TEXT), ("1", P1_TEXT, "")] {
            let err = coord.deposit_tokens(game_id, p1, p2).await.unwrap_err();
            assert!(matches!(err, GameError::IncompleteForm { .. }));
        }

        assert!(gateway.calls().is_empty());
        assert!(coord.state().pending().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_deposit_input_never_calls_gateway() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, PLAYER).await;

        let err = coord.deposit_tokens("abc", P1_TEXT, P2_TEXT).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput { field: "Game ID", .. }));

        let err = coord.deposit_tokens("1", "0xAAA", P2_TEXT).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput { .. }));

        assert!(gateway.calls().is_empty());
        assert!(coord.state().pending().is_none());
        assert_eq!(coord.state().phase(), TxPhase::Idle);
    }

    #[tokio::test]
    async fn test_unparseable_winner_never_calls_gateway() {
        let gateway = MockGateway::new(100);
        let mut admin = ready(&gateway, ADMIN).await;

        let err = admin.pick_winner("1", "0xAAA").await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput { field: "Winner Address", .. }));

        let err = admin.pick_winner("one", P1_TEXT).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput { field: "Game ID", .. }));

        assert!(gateway.calls().is_empty());
        assert!(admin.state().pending().is_none());
        assert_eq!(admin.state().phase(), TxPhase::Idle);
    }

    #[tokio::test]
    async fn test_deposit_approves_then_deposits() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, PLAYER).await;

        let hash = coord.deposit_tokens("1", P1_TEXT, P2_TEXT).await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                ContractCall::Approve {
                    spender: GAMES,
                    amount: U256::from(100),
                },
                ContractCall::DepositTokens {
                    id: U256::from(1),
                    player1: P1,
                    player2: P2,
                },
            ]
        );

        // the deposit is the tracked transaction
        assert_eq!(hash, MockGateway::hash_for(2));
        let pending = coord.state().pending().unwrap();
        assert_eq!(pending.hash, Some(hash));
        assert_eq!(pending.submitted, vec![MockGateway::hash_for(1), hash]);
        assert_eq!(coord.state().phase(), TxPhase::Submitted);
    }

    #[tokio::test]
    async fn test_rejected_approve_aborts_deposit() {
        let gateway = MockGateway::new(100);
        gateway.fail_on("approve");
        let mut coord = ready(&gateway, PLAYER).await;
        coord.set_field(FormField::GameId, "1").unwrap();
        coord.set_field(FormField::Player1, P1_TEXT).unwrap();
        coord.set_field(FormField::Player2, P2_TEXT).unwrap();

        let err = coord.submit_deposit_form().await.unwrap_err();

        assert!(matches!(err, GameError::Core(BaboonError::WalletRejected(_))));
        assert!(gateway.calls().is_empty());
        assert!(coord.state().pending().is_none());
        assert_eq!(coord.state().form().game_id, "1");
        assert_eq!(coord.state().phase(), TxPhase::Failed);
    }

    #[tokio::test]
    async fn test_failed_deposit_does_not_roll_back_approve() {
        let gateway = MockGateway::new(100);
        gateway.fail_on("depositTokens");
        let mut coord = ready(&gateway, PLAYER).await;

        assert!(coord.deposit_tokens("1", P1_TEXT, P2_TEXT).await.is_err());

        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(gateway.calls()[0].function_name(), "approve");
        assert!(coord.state().pending().is_none());
    }

    #[tokio::test]
    async fn test_approve_requires_deposit_amount() {
        let gateway = MockGateway::new(100);
        let mut coord = coordinator(&gateway, MockWallet::new(PLAYER));
        coord.connect().await.unwrap();

        let err = coord.approve_tokens().await.unwrap_err();
        assert!(matches!(err, GameError::DepositAmountUnavailable));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_writes_require_connection() {
        let gateway = MockGateway::new(100);
        let mut coord = coordinator(&gateway, MockWallet::new(PLAYER));
        coord.load_deposit_amount().await.unwrap();

        let err = coord.deposit_tokens("1", P1_TEXT, P2_TEXT).await.unwrap_err();
        assert!(matches!(err, GameError::NotConnected));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_connect_leaves_session_empty() {
        let gateway = MockGateway::new(100);
        let mut coord = coordinator(&gateway, MockWallet::rejecting(PLAYER));

        assert!(coord.connect().await.is_err());
        assert!(!coord.state().session().is_connected());
    }

    #[tokio::test]
    async fn test_pick_winner_is_admin_only() {
        let gateway = MockGateway::new(100);
        let mut player = ready(&gateway, PLAYER).await;

        let err = player.pick_winner("1", P1_TEXT).await.unwrap_err();
        assert!(matches!(err, GameError::NotAdmin));
        assert!(gateway.calls().is_empty());

        let mut admin = ready(&gateway, ADMIN).await;
        let hash = admin.pick_winner("1", P1_TEXT).await.unwrap();
        assert_eq!(
            gateway.calls(),
            vec![ContractCall::PickWinner {
                id: U256::from(1),
                winner: P1,
            }]
        );
        assert_eq!(admin.state().pending_hash(), Some(hash));
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_pending() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, ADMIN).await;

        let first = coord.deposit_tokens("1", P1_TEXT, P2_TEXT).await.unwrap();
        let err = coord.pick_winner("1", P1_TEXT).await.unwrap_err();

        assert!(matches!(err, GameError::TransactionPending(h) if h == first));
        assert_eq!(gateway.calls().len(), 2);
        // the guard must not disturb the pending deposit
        assert_eq!(coord.state().pending_hash(), Some(first));
    }

    #[tokio::test]
    async fn test_receipt_success_clears_everything() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, ADMIN).await;
        for (field, value) in [
            (FormField::GameId, "1"),
            (FormField::Player1, P1_TEXT),
            (FormField::Player2, P2_TEXT),
            (FormField::Winner, P1_TEXT),
        ] {
            coord.set_field(field, value).unwrap();
        }

        let hash = coord.submit_deposit_form().await.unwrap();
        let deposited = GameEvent::TokensDeposited {
            player1: P1,
            player2: P2,
            deposit: U256::from(100),
            game_id: U256::from(1),
        };
        gateway.script_receipt(
            hash,
            vec![
                ReceiptStatus::Pending,
                ReceiptStatus::Pending,
                ReceiptStatus::Success {
                    block_number: 12,
                    events: vec![deposited.clone()],
                },
            ],
        );

        let status = coord.await_receipt().await.unwrap();

        assert!(matches!(status, ReceiptStatus::Success { block_number: 12, .. }));
        assert_eq!(
            coord.state().last_outcome(),
            Some(&TxOutcome::Confirmed {
                hash,
                block_number: 12,
                events: vec![deposited],
            })
        );
        assert!(coord.state().form().is_empty());
        assert!(coord.state().pending().is_none());
        assert_eq!(coord.state().phase(), TxPhase::Confirmed);
    }

    #[tokio::test]
    async fn test_reverted_receipt_keeps_form() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, ADMIN).await;
        coord.set_field(FormField::GameId, "1").unwrap();
        coord.set_field(FormField::Winner, P2_TEXT).unwrap();

        let hash = coord.submit_pick_winner_form().await.unwrap();
        gateway.script_receipt(hash, vec![ReceiptStatus::Reverted { block_number: 3 }]);

        coord.await_receipt().await.unwrap();

        assert_eq!(coord.state().phase(), TxPhase::Failed);
        assert_eq!(coord.state().form().winner, P2_TEXT);
        assert!(coord.state().pending().is_none());
    }

    #[tokio::test]
    async fn test_receipt_timeout_keeps_pending() {
        let gateway = MockGateway::new(100);
        let mut coord = TransactionCoordinator::new(
            gateway.clone(),
            MockWallet::new(PLAYER),
            Arc::new(StaticRoles::default()),
            ReceiptOptions {
                poll_interval: Duration::from_millis(5),
                timeout: Duration::from_millis(30),
            },
        );
        coord.connect().await.unwrap();
        coord.load_deposit_amount().await.unwrap();

        let hash = coord.approve_tokens().await.unwrap();
        gateway.script_receipt(hash, vec![ReceiptStatus::Pending]);

        let err = coord.await_receipt().await.unwrap_err();
        assert!(matches!(err, GameError::Core(BaboonError::Timeout(_))));
        assert_eq!(coord.state().pending_hash(), Some(hash));

        coord.reset_form().unwrap();
        assert!(coord.state().pending().is_none());
    }

    #[tokio::test]
    async fn test_await_receipt_without_pending() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, PLAYER).await;

        let err = coord.await_receipt().await.unwrap_err();
        assert!(matches!(err, GameError::NoPendingTransaction));
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let gateway = MockGateway::new(100);
        let mut coord = ready(&gateway, ADMIN).await;
        assert!(coord.state().session().is_admin());

        coord.disconnect().await.unwrap();
        assert!(!coord.state().session().is_connected());
        assert!(!coord.state().session().is_admin());
    }
}

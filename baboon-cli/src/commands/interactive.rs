use super::{connect, load_deposit_amount};
use baboon_core::{BaboonError, ReceiptStatus};
use baboon_games::view::{failure_alert, outcome_alert, ConnectionView};
use baboon_games::{FormField, Intent, Result, TransactionCoordinator, ViewModel};
use chrono::Utc;
use dialoguer::{Confirm, Input, Select};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Connect,
    EditDeposit,
    SubmitDeposit,
    EditPickWinner,
    SubmitPickWinner,
    WaitForReceipt,
    ResetForm,
    Disconnect,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Connect => "Connect Wallet",
            Action::EditDeposit => "Edit deposit form",
            Action::SubmitDeposit => "Deposit Tokens",
            Action::EditPickWinner => "Edit pick winner form",
            Action::SubmitPickWinner => "Pick Winner",
            Action::WaitForReceipt => "Wait for pending transaction",
            Action::ResetForm => "Reset form",
            Action::Disconnect => "Disconnect",
            Action::Quit => "Quit",
        }
    }
}

/// Menu entries for the current view. Submit entries disappear while a
/// transaction is in flight.
fn available_actions(view: &ViewModel) -> Vec<Action> {
    if view.connection == ConnectionView::Disconnected {
        return vec![Action::Connect, Action::Quit];
    }

    let mut actions = Vec::new();
    if let Some(deposit) = &view.deposit {
        actions.push(Action::EditDeposit);
        if deposit.submit_enabled {
            actions.push(Action::SubmitDeposit);
        }
    }
    if let Some(pick) = &view.pick_winner {
        actions.push(Action::EditPickWinner);
        if pick.submit_enabled {
            actions.push(Action::SubmitPickWinner);
        }
    }
    if view.pending.is_some() {
        actions.push(Action::WaitForReceipt);
    }
    actions.extend([Action::ResetForm, Action::Disconnect, Action::Quit]);
    actions
}

pub async fn run(coordinator: &mut TransactionCoordinator) -> Result<()> {
    println!("Baboon Games");

    loop {
        let view = ViewModel::from_state(coordinator.state());
        render(coordinator, &view);

        let actions = available_actions(&view);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(BaboonError::from)?;

        match actions[selection] {
            Action::Connect => match connect(coordinator).await {
                Ok(_) => load_deposit_amount(coordinator).await,
                Err(e) => println!("Failed to connect wallet: {}", e),
            },
            Action::EditDeposit => {
                edit_fields(
                    coordinator,
                    &[FormField::GameId, FormField::Player1, FormField::Player2],
                )?;
            }
            Action::SubmitDeposit => {
                let result = coordinator.submit_deposit_form().await;
                report_submission(coordinator, Intent::Deposit, result).await;
            }
            Action::EditPickWinner => {
                edit_fields(coordinator, &[FormField::GameId, FormField::Winner])?;
            }
            Action::SubmitPickWinner => {
                let result = coordinator.submit_pick_winner_form().await;
                report_submission(coordinator, Intent::PickWinner, result).await;
            }
            Action::WaitForReceipt => wait_for_receipt(coordinator).await,
            Action::ResetForm => coordinator.reset_form()?,
            Action::Disconnect => {
                if let Err(e) = coordinator.disconnect().await {
                    println!("Failed to disconnect: {}", e);
                }
            }
            Action::Quit => {
                if coordinator.state().is_pending() {
                    let leave = Confirm::new()
                        .with_prompt("A transaction is still pending. Quit anyway?")
                        .default(false)
                        .interact()
                        .map_err(BaboonError::from)?;
                    if !leave {
                        continue;
                    }
                }
                return Ok(());
            }
        }
    }
}

fn render(coordinator: &TransactionCoordinator, view: &ViewModel) {
    println!();
    match &view.connection {
        ConnectionView::Disconnected => println!("Not connected"),
        ConnectionView::Connected { short, .. } => println!("Connected: {}", short),
    }

    if let Some(deposit) = &view.deposit {
        println!("Deposit Tokens");
        match &deposit.deposit_amount {
            Some(amount) => println!("  Deposit amount: {} tokens per player", amount),
            None => println!("  Loading..."),
        }
        println!("  {}: {}", FormField::GameId.label(), deposit.game_id);
        println!("  {}: {}", FormField::Player1.label(), deposit.player1);
        println!("  {}: {}", FormField::Player2.label(), deposit.player2);
        println!("  [{}]", deposit.submit_label);
    }

    if let Some(pick) = &view.pick_winner {
        println!("Pick Winner");
        println!("  {}: {}", FormField::GameId.label(), pick.game_id);
        println!("  {}: {}", FormField::Winner.label(), pick.winner);
        println!("  [{}]", pick.submit_label);
    }

    if let (Some(line), Some(pending)) = (&view.pending, coordinator.state().pending()) {
        let elapsed = Utc::now().signed_duration_since(pending.started_at);
        println!("{} for {}s", line, elapsed.num_seconds());
    }
}

fn edit_fields(coordinator: &mut TransactionCoordinator, fields: &[FormField]) -> Result<()> {
    for &field in fields {
        let current = coordinator.state().form().get(field).to_string();
        let value: String = Input::new()
            .with_prompt(field.label())
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .map_err(BaboonError::from)?;
        coordinator.set_field(field, value)?;
    }
    Ok(())
}

async fn report_submission(
    coordinator: &mut TransactionCoordinator,
    intent: Intent,
    result: Result<baboon_core::TxHash>,
) {
    match result {
        Ok(hash) => {
            println!("Submitted {}", hash);
            wait_for_receipt(coordinator).await;
        }
        Err(e) => println!("{}", failure_alert(intent, &e.to_string())),
    }
}

async fn wait_for_receipt(coordinator: &mut TransactionCoordinator) {
    let intent = coordinator.state().pending().map(|p| p.intent);
    println!("Waiting for confirmation...");

    match coordinator.await_receipt().await {
        Ok(ReceiptStatus::Pending) => println!("Still pending"),
        Ok(_) => {
            if let Some(outcome) = coordinator.state().last_outcome() {
                println!("{}", outcome_alert(outcome));
            }
        }
        Err(e) => match intent {
            Some(intent) => println!("{}", failure_alert(intent, &e.to_string())),
            None => println!("{}", e),
        },
    }
}

use super::{connect, load_deposit_amount};
use baboon_core::types::format_token_amount;
use baboon_core::ReceiptStatus;
use baboon_games::view::outcome_alert;
use baboon_games::{GameError, Result, TransactionCoordinator};

pub async fn approve(coordinator: &mut TransactionCoordinator, no_wait: bool) -> Result<()> {
    connect(coordinator).await?;
    load_deposit_amount(coordinator).await;
    print_deposit_amount(coordinator);

    let hash = coordinator.approve_tokens().await?;
    println!("Approval submitted: {}", hash);

    finish(coordinator, no_wait).await
}

pub async fn deposit(
    coordinator: &mut TransactionCoordinator,
    game_id: &str,
    player1: &str,
    player2: &str,
    no_wait: bool,
) -> Result<()> {
    connect(coordinator).await?;
    load_deposit_amount(coordinator).await;
    print_deposit_amount(coordinator);

    let hash = coordinator.deposit_tokens(game_id, player1, player2).await?;
    if let Some(pending) = coordinator.state().pending() {
        for (step, submitted) in pending.submitted.iter().enumerate() {
            let label = if step == 0 { "Approval" } else { "Deposit" };
            println!("{} submitted: {}", label, submitted);
        }
    } else {
        println!("Deposit submitted: {}", hash);
    }

    finish(coordinator, no_wait).await
}

pub async fn pick_winner(
    coordinator: &mut TransactionCoordinator,
    game_id: &str,
    winner: &str,
    no_wait: bool,
) -> Result<()> {
    connect(coordinator).await?;

    let hash = coordinator.pick_winner(game_id, winner).await?;
    println!("Pick winner submitted: {}", hash);

    finish(coordinator, no_wait).await
}

fn print_deposit_amount(coordinator: &TransactionCoordinator) {
    match coordinator.state().deposit_amount() {
        Some(amount) => println!(
            "Deposit amount: {} tokens per player",
            format_token_amount(amount)
        ),
        None => println!("Deposit amount: Loading..."),
    }
}

async fn finish(coordinator: &mut TransactionCoordinator, no_wait: bool) -> Result<()> {
    let hash = coordinator
        .state()
        .pending_hash()
        .ok_or(GameError::NoPendingTransaction)?;

    if no_wait {
        println!("Not waiting for confirmation of {}", hash);
        return Ok(());
    }

    println!("Waiting for confirmation...");
    match coordinator.await_receipt().await? {
        ReceiptStatus::Success {
            block_number,
            events,
        } => {
            println!("Transaction successful!");
            println!("  Block: {}", block_number);
            for event in events {
                println!("  {}", event);
            }
            Ok(())
        }
        ReceiptStatus::Reverted { .. } => {
            if let Some(outcome) = coordinator.state().last_outcome() {
                println!("{}", outcome_alert(outcome));
            }
            Err(GameError::Reverted(hash))
        }
        ReceiptStatus::Pending => {
            println!("Transaction {} is still pending", hash);
            Ok(())
        }
    }
}

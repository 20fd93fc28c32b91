pub mod interactive;
pub mod query;
pub mod wager;

use baboon_games::view::connected_alert;
use baboon_games::{Result, Session, TransactionCoordinator};

/// Ask the wallet for an account and announce it.
pub async fn connect(coordinator: &mut TransactionCoordinator) -> Result<Session> {
    let session = coordinator.connect().await?;
    if let Some(address) = session.address() {
        println!("{}", connected_alert(&address));
    }
    Ok(session)
}

/// A missing deposit amount only matters once a deposit is attempted.
pub async fn load_deposit_amount(coordinator: &mut TransactionCoordinator) {
    if let Err(e) = coordinator.load_deposit_amount().await {
        tracing::warn!("Error fetching deposit amount: {}", e);
    }
}

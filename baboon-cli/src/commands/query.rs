use super::{connect, load_deposit_amount};
use alloy_primitives::{Address, U256};
use baboon_core::types::format_token_amount;
use baboon_core::BaboonError;
use baboon_games::view::ConnectionView;
use baboon_games::{GameError, Result, TransactionCoordinator, ViewModel};
use comfy_table::{presets::UTF8_FULL, Table};

pub async fn status(coordinator: &mut TransactionCoordinator, json: bool) -> Result<()> {
    connect(coordinator).await?;
    load_deposit_amount(coordinator).await;

    let contracts = *coordinator.gateway().contracts();
    match coordinator.gateway().token().await {
        Ok(token) if token != contracts.token => {
            tracing::warn!(
                "Games contract uses token {} but {} is configured",
                token,
                contracts.token
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not read token address from games contract: {}", e),
    }

    let view = ViewModel::from_state(coordinator.state());
    if json {
        let rendered = serde_json::to_string_pretty(&view).map_err(BaboonError::from)?;
        println!("{}", rendered);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    if let ConnectionView::Connected { address, .. } = &view.connection {
        table.add_row(vec!["Account".to_string(), address.to_string()]);
    }
    let role = if view.pick_winner.is_some() {
        "Admin"
    } else {
        "Player"
    };
    table.add_row(vec!["Role".to_string(), role.to_string()]);
    let amount = view
        .deposit
        .as_ref()
        .and_then(|d| d.deposit_amount.clone())
        .map(|a| format!("{} tokens per player", a))
        .unwrap_or_else(|| "Loading...".to_string());
    table.add_row(vec!["Deposit amount".to_string(), amount]);
    table.add_row(vec!["Games contract".to_string(), contracts.games.to_string()]);
    table.add_row(vec!["Token contract".to_string(), contracts.token.to_string()]);

    println!("{}", table);
    Ok(())
}

pub async fn game(coordinator: &TransactionCoordinator, game_id: &str, json: bool) -> Result<()> {
    let id = U256::from_str_radix(game_id.trim(), 10).map_err(|e| GameError::InvalidInput {
        field: "Game ID",
        reason: e.to_string(),
    })?;

    let record = coordinator.gateway().game(id).await?;
    if json {
        let rendered = serde_json::to_string_pretty(&record).map_err(BaboonError::from)?;
        println!("{}", rendered);
        return Ok(());
    }

    if !record.exists() {
        println!("Game {} has no deposits yet", id);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Game ID", "Player 1", "Player 2", "Winner", "Played"]);
    table.add_row(vec![
        record.id.to_string(),
        record.players[0].to_string(),
        record.players[1].to_string(),
        record
            .winner()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string()),
        if record.is_played { "yes" } else { "no" }.to_string(),
    ]);

    println!("{}", table);
    Ok(())
}

pub async fn balance(coordinator: &mut TransactionCoordinator, account: Option<&str>) -> Result<()> {
    let account = match account {
        Some(text) => text
            .trim()
            .parse::<Address>()
            .map_err(|e| GameError::InvalidInput {
                field: "Account",
                reason: e.to_string(),
            })?,
        None => connect(coordinator)
            .await?
            .address()
            .ok_or(GameError::NotConnected)?,
    };

    let balance = coordinator.gateway().balance_of(account).await?;
    println!("Balance for {}:", account);
    println!("  {} tokens", format_token_amount(balance));
    Ok(())
}

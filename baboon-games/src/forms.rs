//! Raw form input and its conversion into typed contract intents.

use crate::error::{GameError, Result};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    GameId,
    Player1,
    Player2,
    Winner,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::GameId => "Game ID",
            FormField::Player1 => "Player 1 Address",
            FormField::Player2 => "Player 2 Address",
            FormField::Winner => "Winner Address",
        }
    }
}

/// Text as the user typed it. `game_id` is shared by both forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub game_id: String,
    pub player1: String,
    pub player2: String,
    pub winner: String,
}

impl FormFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::GameId => &self.game_id,
            FormField::Player1 => &self.player1,
            FormField::Player2 => &self.player2,
            FormField::Winner => &self.winner,
        }
    }

    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            FormField::GameId => self.game_id = value,
            FormField::Player1 => self.player1 = value,
            FormField::Player2 => self.player2 = value,
            FormField::Winner => self.winner = value,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositIntent {
    pub game_id: U256,
    pub player1: Address,
    pub player2: Address,
}

impl DepositIntent {
    /// Emptiness is checked for every field before anything is parsed.
    pub fn parse(game_id: &str, player1: &str, player2: &str) -> Result<Self> {
        require_filled(&[
            (FormField::GameId, game_id),
            (FormField::Player1, player1),
            (FormField::Player2, player2),
        ])?;

        Ok(Self {
            game_id: parse_game_id(game_id)?,
            player1: parse_address(FormField::Player1, player1)?,
            player2: parse_address(FormField::Player2, player2)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickWinnerIntent {
    pub game_id: U256,
    pub winner: Address,
}

impl PickWinnerIntent {
    pub fn parse(game_id: &str, winner: &str) -> Result<Self> {
        require_filled(&[(FormField::GameId, game_id), (FormField::Winner, winner)])?;

        Ok(Self {
            game_id: parse_game_id(game_id)?,
            winner: parse_address(FormField::Winner, winner)?,
        })
    }
}

fn require_filled(fields: &[(FormField, &str)]) -> Result<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.label())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GameError::IncompleteForm { missing })
    }
}

fn parse_game_id(value: &str) -> Result<U256> {
    U256::from_str_radix(value.trim(), 10).map_err(|e| GameError::InvalidInput {
        field: FormField::GameId.label(),
        reason: e.to_string(),
    })
}

fn parse_address(field: FormField, value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| GameError::InvalidInput {
            field: field.label(),
            reason: e.to_string(),
        })
}

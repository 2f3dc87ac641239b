//! Response types for the betting platform API.
//!
//! Every record is validated at the boundary: required fields must be present with the
//! right type, optional fields default to `None`, and (with the `tracing` feature) fields
//! the record does not know about are logged.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{BetStatus, TransactionType};
use crate::serde_helpers::StringFromAny;
use crate::types::{DateTime, Decimal, Utc};

/// Status reported when the health endpoint cannot be reached.
pub const STATUS_OFFLINE: &str = "offline";
/// Status reported when the database check endpoint cannot be reached.
pub const STATUS_ERROR: &str = "error";
/// Database state reported when the database check endpoint cannot be reached.
pub const DATABASE_DISCONNECTED: &str = "disconnected";

/// Result of `POST /auth/connect`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AuthResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    #[serde_as(as = "StringFromAny")]
    pub user_id: String,
}

/// A game offered by the platform.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Game {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub min_bet: Option<Decimal>,
    pub max_bet: Option<Decimal>,
    /// Fraction of each stake retained by the house, e.g. `0.01`.
    pub house_edge: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// A bet, as returned by placement, lookup, settlement and listing.
///
/// `server_seed` is only revealed once the bet is settled; before that only its hash is
/// published.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Bet {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    #[serde_as(as = "StringFromAny")]
    pub game_id: String,
    #[serde_as(as = "Option<StringFromAny>")]
    pub user_id: Option<String>,
    pub bet_amount: Decimal,
    pub status: BetStatus,
    pub client_seed: Option<String>,
    pub server_seed_hash: Option<String>,
    pub server_seed: Option<String>,
    pub nonce: Option<u64>,
    pub multiplier: Option<Decimal>,
    pub payout: Option<Decimal>,
    /// Game-specific outcome (a roll, a crash point, a card sequence).
    pub outcome: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// A wallet transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Transaction {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    #[serde_as(as = "Option<StringFromAny>")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub token_symbol: Option<String>,
    pub status: Option<String>,
    /// On-chain transaction hash, once broadcast.
    pub tx_hash: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of `GET {root}/health`.
///
/// Produced locally with `status = "offline"` when the server cannot be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[non_exhaustive]
pub struct HealthResponse {
    pub status: String,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    /// Transport failure message, set when the status was produced locally.
    pub error: Option<String>,
}

impl HealthResponse {
    pub(crate) fn offline(error: String) -> Self {
        Self {
            status: STATUS_OFFLINE.to_owned(),
            message: None,
            timestamp: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.status == STATUS_OFFLINE
    }
}

/// Result of `GET {root}/db-check`.
///
/// Produced locally with `status = "error"` and `database = "disconnected"` when the
/// server cannot be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[non_exhaustive]
pub struct DatabaseCheckResponse {
    pub status: String,
    pub database: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl DatabaseCheckResponse {
    pub(crate) fn unreachable(error: String) -> Self {
        Self {
            status: STATUS_ERROR.to_owned(),
            database: Some(DATABASE_DISCONNECTED.to_owned()),
            message: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.database.as_deref() == Some(DATABASE_DISCONNECTED)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::dec;

    #[test]
    fn bet_deserializes_numeric_ids() {
        let bet: Bet = serde_json::from_value(json!({
            "id": 17,
            "gameId": 3,
            "userId": "u1",
            "betAmount": 2.5,
            "status": "pending",
            "clientSeed": "abc",
            "serverSeedHash": "9f86d081",
            "nonce": 4,
            "createdAt": "2026-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(bet.id, "17");
        assert_eq!(bet.game_id, "3");
        assert_eq!(bet.bet_amount, dec!(2.5));
        assert_eq!(bet.status, BetStatus::Pending);
        assert_eq!(bet.nonce, Some(4));
        assert!(bet.server_seed.is_none());
        assert!(bet.created_at.is_some());
    }

    #[test]
    fn bet_requires_amount() {
        let result = serde_json::from_value::<Bet>(json!({
            "id": "b1",
            "gameId": "dice",
            "status": "won"
        }));

        result.unwrap_err();
    }

    #[test]
    fn transaction_type_field() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "tx1",
            "type": "withdrawal",
            "amount": "50",
            "tokenSymbol": "USDC"
        }))
        .unwrap();

        assert_eq!(tx.transaction_type, TransactionType::Withdraw);
        assert_eq!(tx.amount, dec!(50));
        assert_eq!(tx.token_symbol.as_deref(), Some("USDC"));
    }

    #[test]
    fn local_health_statuses() {
        let health = HealthResponse::offline("connection refused".to_owned());
        assert!(health.is_offline());
        assert_eq!(health.error.as_deref(), Some("connection refused"));

        let db = DatabaseCheckResponse::unreachable("connection refused".to_owned());
        assert_eq!(db.status, STATUS_ERROR);
        assert!(db.is_disconnected());
    }

    #[test]
    fn game_builder() {
        let game = Game::builder()
            .id("dice")
            .name("Dice")
            .category("classic")
            .house_edge(dec!(0.01))
            .build();

        assert_eq!(game.category.as_deref(), Some("classic"));
        assert_eq!(game.min_bet, None);
    }
}

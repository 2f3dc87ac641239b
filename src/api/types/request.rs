//! Request types for the betting platform API.
//!
//! Public query records use the [`bon`](https://docs.rs/bon) builder pattern. JSON bodies
//! are built by the client from method arguments and borrow from them.

#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;
use serde_with::skip_serializing_none;

use super::{BetStatus, TransactionType};
use crate::types::Decimal;

/// Query parameters for `GET /bets/user/{userId}`.
///
/// Unset fields are omitted from the query string; set fields are emitted in the order
/// `status`, `limit`, `offset`.
///
/// # Example
///
/// ```
/// use betting_client_sdk::ToQueryParams as _;
/// use betting_client_sdk::api::types::BetStatus;
/// use betting_client_sdk::api::types::request::UserBetsRequest;
///
/// let request = UserBetsRequest::builder()
///     .status(BetStatus::Pending)
///     .limit(10)
///     .build();
///
/// assert_eq!(request.query_params(), "?status=pending&limit=10");
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
#[non_exhaustive]
pub struct UserBetsRequest {
    /// Only return bets in this state.
    pub status: Option<BetStatus>,
    /// Maximum number of bets to return.
    pub limit: Option<u32>,
    /// Number of bets to skip.
    pub offset: Option<u32>,
}

/// Query parameters for `GET /games`.
#[derive(Debug, Serialize)]
pub(crate) struct GamesByCategoryQuery<'req> {
    pub(crate) category: &'req str,
}

/// Query parameters for `GET /transactions`.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub(crate) struct TransactionsQuery<'req> {
    #[serde(rename = "type")]
    pub(crate) transaction_type: Option<&'req TransactionType>,
}

/// Body of `POST /auth/connect`.
#[derive(Debug, Serialize)]
pub(crate) struct ConnectWalletBody<'req> {
    pub(crate) address: &'req str,
    pub(crate) signature: &'req str,
}

/// Body of `POST /bets/place`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceBetBody<'req> {
    pub(crate) game_id: &'req str,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) bet_amount: Decimal,
    pub(crate) client_seed: &'req str,
}

/// Body of `POST /transactions/deposit` and `POST /transactions/withdraw`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferBody<'req> {
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    pub(crate) token_symbol: &'req str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToQueryParams as _;
    use crate::types::dec;

    #[test]
    fn user_bets_query_omits_offset() {
        let request = UserBetsRequest::builder()
            .status(BetStatus::Pending)
            .limit(10)
            .build();

        assert_eq!(request.query_params(), "?status=pending&limit=10");
    }

    #[test]
    fn user_bets_query_keeps_field_order() {
        let request = UserBetsRequest::builder()
            .offset(20)
            .status(BetStatus::Won)
            .limit(5)
            .build();

        assert_eq!(request.query_params(), "?status=won&limit=5&offset=20");
    }

    #[test]
    fn empty_user_bets_query() {
        assert_eq!(UserBetsRequest::default().query_params(), "");
    }

    #[test]
    fn category_is_url_encoded() {
        let query = GamesByCategoryQuery {
            category: "live dealer&more",
        };

        assert_eq!(query.query_params(), "?category=live+dealer%26more");
    }

    #[test]
    fn transactions_query() {
        let some = TransactionsQuery {
            transaction_type: Some(&TransactionType::Deposit),
        };
        let none = TransactionsQuery {
            transaction_type: None,
        };

        assert_eq!(some.query_params(), "?type=deposit");
        assert_eq!(none.query_params(), "");
    }

    #[test]
    fn place_bet_body_shape() {
        let body = PlaceBetBody {
            game_id: "dice",
            bet_amount: dec!(2.5),
            client_seed: "seed",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"gameId": "dice", "betAmount": 2.5, "clientSeed": "seed"})
        );
    }

    #[test]
    fn transfer_body_shape() {
        let body = TransferBody {
            amount: dec!(100),
            token_symbol: "USDC",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"amount": 100.0, "tokenSymbol": "USDC"})
        );
    }
}

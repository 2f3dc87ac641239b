//! Types for the betting platform API.
//!
//! This module contains all types used by the [`Client`](crate::api::Client), organized into:
//!
//! - **Common types**: enums shared between requests and responses, such as
//!   [`BetStatus`] and [`TransactionType`].
//!
//! - **Request types**: query records and JSON bodies (e.g. [`request::UserBetsRequest`]).
//!
//! - **Response types**: records the server's JSON is validated against
//!   (e.g. [`response::Game`], [`response::Bet`], [`response::Transaction`]).
//!
//! # Request Building
//!
//! Query records use the builder pattern via the [`bon`](https://docs.rs/bon) crate:
//!
//! ```
//! use betting_client_sdk::api::types::BetStatus;
//! use betting_client_sdk::api::types::request::UserBetsRequest;
//!
//! let request = UserBetsRequest::builder()
//!     .status(BetStatus::Pending)
//!     .limit(10)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

pub mod request;
pub mod response;

/// Lifecycle state of a bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum BetStatus {
    /// Placed, outcome not yet settled.
    Pending,
    Won,
    Lost,
    /// Settled without a win/loss distinction (e.g. a push).
    Settled,
    Cancelled,
    /// Unknown status from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

/// Kind of wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum TransactionType {
    Deposit,
    #[serde(alias = "withdrawal")]
    Withdraw,
    /// Stake debited when a bet is placed.
    Bet,
    /// Winnings credited when a bet settles.
    Payout,
    /// Unknown type from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

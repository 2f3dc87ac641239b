//! Betting platform API client and types.
//!
//! This module provides a client for the betting platform's HTTP API: wallet
//! authentication, the game catalogue, bet placement and settlement, wallet transactions,
//! and server health checks.
//!
//! # Overview
//!
//! Every call goes to `{host}{path}` where `host` defaults to
//! `http://localhost:3001/api`. Once [`Client::authenticate_wallet`] succeeds, the returned
//! token is sent as `Authorization: Bearer <token>` on every request and the session is
//! persisted in the client's [`SessionStore`](crate::storage::SessionStore).
//!
//! ## Available Endpoints
//!
//! | Endpoint | Method | Auth | Description |
//! |----------|--------|------|-------------|
//! | `/auth/connect` | POST | no | Exchange a wallet signature for a session |
//! | `/games` | GET | no | List games, optionally filtered by `category` |
//! | `/games/{id}` | GET | no | Get a single game |
//! | `/bets/place` | POST | yes | Place a bet |
//! | `/bets/{id}` | GET | yes | Get a bet |
//! | `/bets/{id}/settle` | POST | yes | Settle a bet |
//! | `/bets/user/{userId}` | GET | yes | List the session user's bets |
//! | `/transactions/deposit` | POST | yes | Deposit funds |
//! | `/transactions/withdraw` | POST | yes | Withdraw funds |
//! | `/transactions` | GET | yes | List transactions, optionally filtered by `type` |
//! | `{root}/health` | GET | no | Server health, never fails |
//! | `{root}/db-check` | GET | no | Database connectivity, never fails |
//!
//! `{root}` is the host with a trailing `/api` removed.
//!
//! # Example
//!
//! ```no_run
//! use betting_client_sdk::api::{Client, Config};
//! use betting_client_sdk::storage::FileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads BETTING_API_URL and restores any session saved by a previous run
//! let client = Client::from_env(Config::default(), FileStore::open("session.json")?)?;
//!
//! let health = client.check_health().await;
//! println!("server is {}", health.status);
//!
//! for game in client.get_games_by_category("dice").await? {
//!     println!("{}: {}", game.id, game.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::{Client, Config};

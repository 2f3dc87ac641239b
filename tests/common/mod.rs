#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Each test binary only uses part of the shared setup"
)]

use betting_client_sdk::api::{Client, Config};
use httpmock::MockServer;
use serde_json::{Value, json};

pub const TOKEN: &str = "t1";
pub const USER_ID: &str = "u1";
pub const WALLET_ADDRESS: &str = "0xABC";
pub const SIGNATURE: &str = "0xsig";

pub const BEARER: &str = "Bearer t1";

/// Base URL of the mock server as the client expects it, with the `/api` prefix.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.base_url())
}

pub fn create_client(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::new(&api_url(server), Config::default())?)
}

pub fn create_authenticated(server: &MockServer) -> anyhow::Result<Client> {
    let client = create_client(server)?;
    client.set_session(
        TOKEN.to_owned(),
        USER_ID.to_owned(),
        WALLET_ADDRESS.to_owned(),
    )?;

    Ok(client)
}

pub fn game_json(id: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{id} game"),
        "category": category,
        "minBet": 0.1,
        "maxBet": 100,
        "houseEdge": 0.01,
        "isActive": true
    })
}

pub fn bet_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "gameId": "dice",
        "userId": USER_ID,
        "betAmount": 2.5,
        "status": status,
        "clientSeed": "abc",
        "serverSeedHash": "9f86d081884c7d65",
        "nonce": 1,
        "createdAt": "2026-01-02T03:04:05Z"
    })
}

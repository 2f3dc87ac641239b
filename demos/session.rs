//! Authenticated flow: connect a wallet, place and settle a bet, then review bets and
//! transactions. The session is kept in a JSON file, so later runs skip the connect step.
//!
//! Provide a wallet address and a signature the server accepts on the first run:
//! ```sh
//! WALLET_ADDRESS=0x... WALLET_SIGNATURE=0x... RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example session --features tracing
//! ```
//!
//! Set `SESSION_FILE` to choose where the session is stored (default `betting-session.json`),
//! and `LOGOUT=1` to clear it at the end.

use std::fs::File;

use betting_client_sdk::api::types::BetStatus;
use betting_client_sdk::api::types::request::UserBetsRequest;
use betting_client_sdk::api::{Client, Config};
use betting_client_sdk::storage::FileStore;
use betting_client_sdk::types::dec;
use futures_util::StreamExt as _;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let path = std::env::var("SESSION_FILE").unwrap_or_else(|_| "betting-session.json".to_owned());
    let client = Client::from_env(Config::default(), FileStore::open(&path)?)?;

    if client.is_authenticated() {
        info!(session = ?client.session(), "restored session from {path}");
    } else {
        let address = std::env::var("WALLET_ADDRESS")?;
        let signature = std::env::var("WALLET_SIGNATURE")?;

        let response = client.authenticate_wallet(&address, &signature).await?;
        info!(endpoint = "auth_connect", user_id = %response.user_id);
    }

    let games = client.get_all_games().await?;
    let Some(game) = games.first() else {
        info!("no games available");
        return Ok(());
    };

    let seed = betting_client_sdk::generate_client_seed();
    match client.place_bet(&game.id, dec!(1), &seed).await {
        Ok(bet) => {
            info!(
                endpoint = "place_bet",
                id = %bet.id,
                game = %bet.game_id,
                status = %bet.status,
                server_seed_hash = ?bet.server_seed_hash
            );

            match client.settle_bet(&bet.id).await {
                Ok(settled) => info!(
                    endpoint = "settle_bet",
                    id = %settled.id,
                    status = %settled.status,
                    payout = ?settled.payout,
                    server_seed = ?settled.server_seed
                ),
                Err(e) => debug!(endpoint = "settle_bet", error = %e),
            }
        }
        Err(e) => debug!(endpoint = "place_bet", error = %e),
    }

    let request = UserBetsRequest::builder().status(BetStatus::Won).build();
    let stream = client.stream_user_bets(request, 25);
    futures_util::pin_mut!(stream);

    let mut won = 0_usize;
    while let Some(bet) = stream.next().await {
        match bet {
            Ok(bet) => {
                won += 1;
                debug!(endpoint = "user_bets", id = %bet.id, payout = ?bet.payout);
            }
            Err(e) => {
                debug!(endpoint = "user_bets", error = %e);
                break;
            }
        }
    }
    info!(endpoint = "user_bets", status = "won", count = won);

    match client.get_transactions(None).await {
        Ok(transactions) => {
            for tx in &transactions {
                info!(
                    endpoint = "transactions",
                    id = %tx.id,
                    kind = %tx.transaction_type,
                    amount = %tx.amount,
                    token = ?tx.token_symbol
                );
            }
        }
        Err(e) => debug!(endpoint = "transactions", error = %e),
    }

    if std::env::var("LOGOUT").is_ok() {
        client.deauthenticate()?;
        info!("session cleared");
    }

    Ok(())
}

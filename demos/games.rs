//! Public endpoints: server health and the game catalogue. No wallet needed.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example games --features tracing
//! ```
//!
//! Point it at another server with `BETTING_API_URL`, and optionally log to a file:
//! ```sh
//! BETTING_API_URL=https://bets.example.com/api LOG_FILE=games.log RUST_LOG=info cargo run --example games --features tracing
//! ```

use std::fs::File;

use betting_client_sdk::api::{Client, Config};
use betting_client_sdk::storage::MemoryStore;
use tracing::{debug, info, warn};
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

    let client = Client::from_env(Config::default(), MemoryStore::new())?;

    let health = client.check_health().await;
    if health.is_offline() {
        warn!(endpoint = "health", root = client.root(), error = ?health.error);
        return Ok(());
    }
    info!(endpoint = "health", status = %health.status, message = ?health.message);

    let db = client.check_database().await;
    info!(endpoint = "db_check", status = %db.status, database = ?db.database);

    let games = match client.get_all_games().await {
        Ok(games) => games,
        Err(e) => {
            debug!(endpoint = "games", error = %e);
            return Ok(());
        }
    };
    info!(endpoint = "games", count = games.len());

    for game in &games {
        info!(
            endpoint = "games",
            id = %game.id,
            name = %game.name,
            category = ?game.category,
            house_edge = ?game.house_edge,
            min_bet = ?game.min_bet,
            max_bet = ?game.max_bet
        );
    }

    if let Some(category) = games.iter().find_map(|game| game.category.as_deref()) {
        match client.get_games_by_category(category).await {
            Ok(found) => info!(endpoint = "games_by_category", category, count = found.len()),
            Err(e) => debug!(endpoint = "games_by_category", category, error = %e),
        }
    }

    if let Some(first) = games.first() {
        match client.get_game(&first.id).await {
            Ok(game) => info!(endpoint = "game", id = %game.id, description = ?game.description),
            Err(e) => debug!(endpoint = "game", id = %first.id, error = %e),
        }
    }

    Ok(())
}

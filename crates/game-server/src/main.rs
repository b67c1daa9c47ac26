//! Replay a list of moves into a fresh game and print the result.
//!
//! Usage: `game-server e2-e4 e7-e5 g1-f3 ...`
//! Moves alternate White/Black. With `DATABASE_URL` set the game is stored
//! in Postgres, otherwise in memory.

use game_server::config::Config;
use game_server::store::{MemoryStore, PgStore, Store};
use game_server::GameService;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let moves: Vec<String> = std::env::args().skip(1).collect();
    if moves.is_empty() {
        tracing::warn!("No moves given; the game will stay at the starting position");
    }

    if config.database_url.is_some() {
        let store = PgStore::connect(&config).await?;
        replay(GameService::new(store), &moves).await
    } else {
        tracing::info!("DATABASE_URL not set - using in-memory store");
        replay(GameService::new(MemoryStore::new()), &moves).await
    }
}

async fn replay<S: Store>(service: GameService<S>, moves: &[String]) -> anyhow::Result<()> {
    let suffix = chrono::Utc::now().timestamp_millis();
    let white = service
        .register_player(&format!("white_{suffix}"), &format!("white_{suffix}@example.com"))
        .await?;
    let black = service
        .register_player(&format!("black_{suffix}"), &format!("black_{suffix}@example.com"))
        .await?;
    let game = service.create_game(white.id, black.id).await?;

    for (i, text) in moves.iter().enumerate() {
        let player_id = if i % 2 == 0 { white.id } else { black.id };
        match service.submit_player_move(game.id, player_id, text).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(game_id = game.id, mv = %text, "Move rejected"),
            Err(e) if e.is_client_error() => {
                tracing::warn!(game_id = game.id, mv = %text, "Bad move: {e}")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let history = service.history(game.id).await?;
    let board: Vec<_> = service
        .board(game.id)
        .await?
        .into_iter()
        .filter(|entry| entry.state.is_occupied())
        .collect();

    let out = json!({
        "game": game,
        "moves": history,
        "pieces": board,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

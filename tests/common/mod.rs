#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use chess_core::square::parse;
use chess_core::Square;
use game_server::models::Game;
use game_server::store::{MemoryStore, Store};
use game_server::GameService;

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

pub fn sq(s: &str) -> Square {
    parse(s).unwrap()
}

/// Register two fresh players and start a game between them.
pub async fn start_game<S: Store>(service: &GameService<S>) -> Game {
    let suffix = unique_suffix();
    let white = service
        .register_player(&format!("white_{suffix}"), &format!("white_{suffix}@chess.dev"))
        .await
        .unwrap();
    let black = service
        .register_player(&format!("black_{suffix}"), &format!("black_{suffix}@chess.dev"))
        .await
        .unwrap();
    service.create_game(white.id, black.id).await.unwrap()
}

pub async fn memory_game() -> (GameService<MemoryStore>, Game) {
    let service = GameService::new(MemoryStore::new());
    let game = start_game(&service).await;
    (service, game)
}

//! Runs against a real Postgres when `DATABASE_URL` is set; otherwise each
//! test returns immediately.

mod common;

use chess_core::{PieceKind, PlayerRole};
use game_server::config::Config;
use game_server::store::{BoardStore, MoveLog, PgStore};
use game_server::{AppError, GameService};

use common::sq;

async fn pg_service() -> Option<GameService<PgStore>> {
    let config = Config::from_env();
    config.database_url.as_ref()?;
    let store = PgStore::connect(&config).await.unwrap();
    Some(GameService::new(store))
}

#[tokio::test]
async fn pg_game_lifecycle() {
    let Some(service) = pg_service().await else {
        return;
    };
    let game = common::start_game(&service).await;

    let board = service.board(game.id).await.unwrap();
    assert_eq!(board.len(), 64);
    assert_eq!(board.iter().filter(|e| e.state.is_occupied()).count(), 32);

    assert!(service.submit_player_move(game.id, game.white_player_id, "e2-e4").await.unwrap());
    assert!(service.submit_player_move(game.id, game.black_player_id, "d7-d5").await.unwrap());
    assert!(service.submit_player_move(game.id, game.white_player_id, "e4xd5").await.unwrap());
    assert!(!service.submit_player_move(game.id, game.black_player_id, "d8-d8").await.unwrap_or(false));

    let store = service.store();
    assert_eq!(store.latest_sequence(game.id).await.unwrap(), 3);
    assert_eq!(store.piece_at(game.id, sq("d5")).await.unwrap(), Some(PieceKind::Pawn));
    assert_eq!(store.color_at(game.id, sq("d5")).await.unwrap(), Some(PlayerRole::White));

    let notations: Vec<_> = service
        .history(game.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.notation)
        .collect();
    assert_eq!(notations, ["Pe2-e4", "Pd7-d5", "Pe4xd5"]);

    let finished = service.finish_game(game.id).await.unwrap();
    assert!(finished.is_finished());
}

#[tokio::test]
async fn pg_set_square_on_missing_board_is_not_found() {
    let Some(service) = pg_service().await else {
        return;
    };
    let err = service
        .store()
        .set_square(-1, sq("e4"), Some(PieceKind::Pawn), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn pg_duplicate_email_conflicts() {
    let Some(service) = pg_service().await else {
        return;
    };
    let suffix = common::unique_suffix();
    let email = format!("dup_{suffix}@chess.dev");
    service.register_player(&format!("dup_a_{suffix}"), &email).await.unwrap();
    let err = service
        .register_player(&format!("dup_b_{suffix}"), &email)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn pg_initialize_twice_conflicts() {
    let Some(service) = pg_service().await else {
        return;
    };
    let game = common::start_game(&service).await;
    let err = service.store().initialize(game.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

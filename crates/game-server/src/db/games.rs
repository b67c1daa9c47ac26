use chess_core::PlayerRole;
use sqlx::PgPool;

use crate::db::board;
use crate::error::AppError;
use crate::models::Game;

const GAME_COLUMNS: &str = "id, white_player_id, black_player_id, start_time, end_time";

/// Insert the game and its 64 starting squares in one transaction.
pub async fn create_game(
    pool: &PgPool,
    white_player_id: i64,
    black_player_id: i64,
) -> Result<Game, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    let game = sqlx::query_as::<_, Game>(&format!(
        "INSERT INTO games (white_player_id, black_player_id) VALUES ($1, $2) RETURNING {GAME_COLUMNS}"
    ))
    .bind(white_player_id)
    .bind(black_player_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    board::insert_starting_board(&mut *tx, game.id).await?;

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(game)
}

pub async fn get_game(pool: &PgPool, game_id: i64) -> Result<Option<Game>, AppError> {
    sqlx::query_as::<_, Game>(&format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1"))
        .bind(game_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)
}

pub async fn games_for_player(
    pool: &PgPool,
    player_id: i64,
    role: PlayerRole,
) -> Result<Vec<Game>, AppError> {
    let filter = match role {
        PlayerRole::White => "white_player_id = $1",
        PlayerRole::Black => "black_player_id = $1",
        PlayerRole::Either => "(white_player_id = $1 OR black_player_id = $1)",
    };
    let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE {filter} ORDER BY id");

    sqlx::query_as::<_, Game>(&query)
        .bind(player_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)
}

/// Set `end_time` unless it is already set.
pub async fn finish_game(pool: &PgPool, game_id: i64) -> Result<Option<Game>, AppError> {
    sqlx::query_as::<_, Game>(&format!(
        "UPDATE games SET end_time = COALESCE(end_time, NOW()) WHERE id = $1 RETURNING {GAME_COLUMNS}"
    ))
    .bind(game_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Sqlx)
}

use sqlx::PgPool;

use crate::db::board;
use crate::error::AppError;
use crate::models::{MoveCommit, MoveRecord};
use chess_core::SquareState;

pub async fn latest_sequence(pool: &PgPool, game_id: i64) -> Result<i32, AppError> {
    let row: (i32,) = sqlx::query_as(
        "SELECT COALESCE(MAX(seq), 0) FROM game_moves WHERE game_id = $1",
    )
    .bind(game_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(row.0)
}

pub async fn list_moves(pool: &PgPool, game_id: i64) -> Result<Vec<MoveRecord>, AppError> {
    sqlx::query_as::<_, MoveRecord>(
        "SELECT game_id, seq, notation FROM game_moves WHERE game_id = $1 ORDER BY seq",
    )
    .bind(game_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::Sqlx)
}

/// Append the move and update both squares in one transaction.
///
/// The game row is locked first so concurrent commits on the same game
/// take sequence numbers one at a time.
pub async fn commit_move(
    pool: &PgPool,
    game_id: i64,
    commit: &MoveCommit,
) -> Result<MoveRecord, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM games WHERE id = $1 FOR UPDATE")
        .bind(game_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;
    if locked.is_none() {
        return Err(AppError::game_not_found(game_id));
    }

    let record = sqlx::query_as::<_, MoveRecord>(
        r#"INSERT INTO game_moves (game_id, seq, notation)
           SELECT $1, COALESCE(MAX(seq), 0) + 1, $2 FROM game_moves WHERE game_id = $1
           RETURNING game_id, seq, notation"#,
    )
    .bind(game_id)
    .bind(&commit.notation)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    let placed = SquareState::occupied(commit.piece, commit.color);
    if !board::set_square(&mut *tx, game_id, commit.to, placed).await? {
        return Err(AppError::NotFound(format!("Square {} not on board {game_id}", commit.to)));
    }
    if !board::set_square(&mut *tx, game_id, commit.from, SquareState::EMPTY).await? {
        return Err(AppError::NotFound(format!("Square {} not on board {game_id}", commit.from)));
    }

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(record)
}

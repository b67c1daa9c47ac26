use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Player;

const PLAYER_COLUMNS: &str = "id, username, email, created_at, deleted_at";

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AppError> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM players WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL)",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(row.0)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AppError> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM players WHERE LOWER(username) = LOWER($1) AND deleted_at IS NULL)",
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(row.0)
}

pub async fn create_player(pool: &PgPool, username: &str, email: &str) -> Result<Player, AppError> {
    let result = sqlx::query_as::<_, Player>(&format!(
        "INSERT INTO players (username, email) VALUES ($1, $2) RETURNING {PLAYER_COLUMNS}"
    ))
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await;

    match result {
        Ok(player) => Ok(player),
        // lost a race against a concurrent registration
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::Conflict("Username or email already registered".into()))
        }
        Err(e) => Err(AppError::Sqlx(e)),
    }
}

pub async fn get_player(pool: &PgPool, player_id: i64) -> Result<Option<Player>, AppError> {
    sqlx::query_as::<_, Player>(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"))
        .bind(player_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)
}

pub async fn player_id_by_email(pool: &PgPool, email: &str) -> Result<Option<i64>, AppError> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM players WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(row.map(|r| r.0))
}

pub async fn list_players(pool: &PgPool) -> Result<Vec<Player>, AppError> {
    sqlx::query_as::<_, Player>(&format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id"))
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)
}

/// Soft delete. Returns false when no such player exists.
pub async fn delete_player(pool: &PgPool, player_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE players SET deleted_at = COALESCE(deleted_at, NOW()) WHERE id = $1",
    )
    .bind(player_id)
    .execute(pool)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}

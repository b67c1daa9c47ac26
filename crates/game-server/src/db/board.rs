use chess_core::{Board, Color, PieceKind, Square, SquareState};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;

type SquareRow = (String, Option<String>, Option<String>);

fn decode_row((square, piece, color): SquareRow) -> Result<(Square, SquareState), AppError> {
    let square: Square = square
        .parse()
        .map_err(|e| AppError::Internal(format!("Stored square: {e}")))?;
    let piece = piece
        .map(|p| p.parse::<PieceKind>())
        .transpose()
        .map_err(|e| AppError::Internal(format!("Stored piece on {square}: {e}")))?;
    let color = color
        .map(|c| c.parse::<Color>())
        .transpose()
        .map_err(|e| AppError::Internal(format!("Stored color on {square}: {e}")))?;
    Ok((square, SquareState::from_parts(piece, color)))
}

/// Insert all 64 starting squares in a single statement.
pub async fn insert_starting_board(conn: &mut PgConnection, game_id: i64) -> Result<(), AppError> {
    let board = Board::starting();
    let mut squares = Vec::with_capacity(64);
    let mut pieces = Vec::with_capacity(64);
    let mut colors = Vec::with_capacity(64);
    for (square, state) in board.iter() {
        squares.push(square.to_string());
        pieces.push(state.piece().map(|p| p.name().to_string()));
        colors.push(state.color().map(|c| c.name().to_string()));
    }

    let result = sqlx::query(
        r#"INSERT INTO board_squares (game_id, square, piece, color)
           SELECT $1, s.square, s.piece, s.color
           FROM UNNEST($2::text[], $3::text[], $4::text[]) AS s(square, piece, color)"#,
    )
    .bind(game_id)
    .bind(&squares)
    .bind(&pieces)
    .bind(&colors)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            format!("Board for game {game_id} already initialized"),
        )),
        Err(e) => Err(AppError::Sqlx(e)),
    }
}

pub async fn get_square(
    pool: &PgPool,
    game_id: i64,
    square: Square,
) -> Result<Option<SquareState>, AppError> {
    let row: Option<SquareRow> = sqlx::query_as(
        "SELECT square, piece, color FROM board_squares WHERE game_id = $1 AND square = $2",
    )
    .bind(game_id)
    .bind(square.to_string())
    .fetch_optional(pool)
    .await
    .map_err(AppError::Sqlx)?;

    row.map(|r| decode_row(r).map(|(_, state)| state)).transpose()
}

/// Returns false when the square row does not exist.
pub async fn set_square(
    conn: &mut PgConnection,
    game_id: i64,
    square: Square,
    state: SquareState,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE board_squares SET piece = $3, color = $4 WHERE game_id = $1 AND square = $2",
    )
    .bind(game_id)
    .bind(square.to_string())
    .bind(state.piece().map(|p| p.name()))
    .bind(state.color().map(|c| c.name()))
    .execute(&mut *conn)
    .await
    .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() == 1)
}

pub async fn load_squares(
    pool: &PgPool,
    game_id: i64,
) -> Result<Vec<(Square, SquareState)>, AppError> {
    let rows: Vec<SquareRow> = sqlx::query_as(
        "SELECT square, piece, color FROM board_squares WHERE game_id = $1",
    )
    .bind(game_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::Sqlx)?;

    rows.into_iter().map(decode_row).collect()
}

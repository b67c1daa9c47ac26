//! Postgres backend. Thin adapter from the store traits onto `crate::db`.

use chess_core::{Board, Color, PieceKind, PlayerRole, Square, SquareState};
use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::{Game, MoveCommit, MoveRecord, Player};
use crate::store::{BoardStore, GameRepository, MoveLog, PlayerRepository};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with `config.database_url` and apply the schema.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| AppError::Internal("DATABASE_URL is not set".into()))?;

        tracing::info!("Connecting to database...");
        let pool = db::pool::create_pool(url, config.db_max_connections).await?;

        tracing::info!("Running migrations...");
        db::pool::run_migrations(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl BoardStore for PgStore {
    async fn initialize(&self, game_id: i64) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Sqlx)?;
        db::board::insert_starting_board(&mut conn, game_id).await
    }

    async fn square(&self, game_id: i64, square: Square) -> Result<SquareState, AppError> {
        db::board::get_square(&self.pool, game_id, square)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Square {square} not on board {game_id}")))
    }

    async fn set_square(
        &self,
        game_id: i64,
        square: Square,
        piece: Option<PieceKind>,
        color: Option<Color>,
    ) -> Result<(), AppError> {
        let state = match piece {
            Some(_) => SquareState::from_parts(piece, color),
            None => SquareState::EMPTY,
        };
        let mut conn = self.pool.acquire().await.map_err(AppError::Sqlx)?;
        if db::board::set_square(&mut conn, game_id, square, state).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Square {square} not on board {game_id}")))
        }
    }

    async fn load_board(&self, game_id: i64) -> Result<Board, AppError> {
        let rows = db::board::load_squares(&self.pool, game_id).await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(format!("Board for game {game_id} not initialized")));
        }
        Board::from_rows(rows)
            .ok_or_else(|| AppError::Internal(format!("Board for game {game_id} is missing squares")))
    }
}

impl MoveLog for PgStore {
    async fn latest_sequence(&self, game_id: i64) -> Result<i32, AppError> {
        db::moves::latest_sequence(&self.pool, game_id).await
    }

    async fn moves(&self, game_id: i64) -> Result<Vec<MoveRecord>, AppError> {
        db::moves::list_moves(&self.pool, game_id).await
    }

    async fn commit_move(&self, game_id: i64, commit: &MoveCommit) -> Result<MoveRecord, AppError> {
        db::moves::commit_move(&self.pool, game_id, commit).await
    }
}

impl GameRepository for PgStore {
    async fn create_game(&self, white_player_id: i64, black_player_id: i64) -> Result<Game, AppError> {
        db::games::create_game(&self.pool, white_player_id, black_player_id).await
    }

    async fn get_game(&self, game_id: i64) -> Result<Option<Game>, AppError> {
        db::games::get_game(&self.pool, game_id).await
    }

    async fn games_for_player(&self, player_id: i64, role: PlayerRole) -> Result<Vec<Game>, AppError> {
        db::games::games_for_player(&self.pool, player_id, role).await
    }

    async fn finish_game(&self, game_id: i64) -> Result<Game, AppError> {
        db::games::finish_game(&self.pool, game_id)
            .await?
            .ok_or_else(|| AppError::game_not_found(game_id))
    }
}

impl PlayerRepository for PgStore {
    async fn add_player(&self, username: &str, email: &str) -> Result<Player, AppError> {
        if db::players::email_exists(&self.pool, email).await? {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if db::players::username_exists(&self.pool, username).await? {
            return Err(AppError::Conflict("Username already taken".into()));
        }
        db::players::create_player(&self.pool, username, email).await
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>, AppError> {
        db::players::get_player(&self.pool, player_id).await
    }

    async fn player_id_by_email(&self, email: &str) -> Result<Option<i64>, AppError> {
        db::players::player_id_by_email(&self.pool, email).await
    }

    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        db::players::list_players(&self.pool).await
    }

    async fn delete_player(&self, player_id: i64) -> Result<(), AppError> {
        if db::players::delete_player(&self.pool, player_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Player {player_id} not found")))
        }
    }
}

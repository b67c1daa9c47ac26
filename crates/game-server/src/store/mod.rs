//! Storage seams. Every backend keeps one board, one move log and one game
//! record per game id; games never share mutable state.

use std::future::Future;

use chess_core::board::BoardEntry;
use chess_core::{Board, Color, PieceKind, PlayerRole, Square, SquareState};

use crate::error::AppError;
use crate::models::{Game, MoveCommit, MoveRecord, Player};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Occupancy of the 64 squares of each game.
pub trait BoardStore: Send + Sync {
    /// Lay out the starting position. All 64 squares are written or none.
    fn initialize(&self, game_id: i64) -> impl Future<Output = Result<(), AppError>> + Send;

    /// `NotFound` when the square was never initialized for `game_id`.
    fn square(
        &self,
        game_id: i64,
        square: Square,
    ) -> impl Future<Output = Result<SquareState, AppError>> + Send;

    /// Overwrite one square. A `None` piece empties the square and drops the
    /// color with it.
    fn set_square(
        &self,
        game_id: i64,
        square: Square,
        piece: Option<PieceKind>,
        color: Option<Color>,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Full 64-square snapshot.
    fn load_board(&self, game_id: i64) -> impl Future<Output = Result<Board, AppError>> + Send;

    fn piece_at(
        &self,
        game_id: i64,
        square: Square,
    ) -> impl Future<Output = Result<Option<PieceKind>, AppError>> + Send {
        async move { Ok(self.square(game_id, square).await?.piece()) }
    }

    fn color_at(
        &self,
        game_id: i64,
        square: Square,
    ) -> impl Future<Output = Result<Option<PlayerRole>, AppError>> + Send {
        async move {
            Ok(self
                .square(game_id, square)
                .await?
                .color()
                .map(PlayerRole::from))
        }
    }

    fn is_occupied(
        &self,
        game_id: i64,
        square: Square,
    ) -> impl Future<Output = Result<bool, AppError>> + Send {
        async move { Ok(self.square(game_id, square).await?.is_occupied()) }
    }

    fn list_all(
        &self,
        game_id: i64,
    ) -> impl Future<Output = Result<Vec<BoardEntry>, AppError>> + Send {
        async move { Ok(self.load_board(game_id).await?.entries()) }
    }
}

/// Append-only history of applied moves.
pub trait MoveLog: Send + Sync {
    /// Highest sequence number recorded for the game, 0 before the first move.
    fn latest_sequence(&self, game_id: i64) -> impl Future<Output = Result<i32, AppError>> + Send;

    /// Moves in sequence order.
    fn moves(&self, game_id: i64) -> impl Future<Output = Result<Vec<MoveRecord>, AppError>> + Send;

    /// Append the record with the next sequence number, put the piece on
    /// `to` and clear `from`. Readers see all of it or none of it.
    fn commit_move(
        &self,
        game_id: i64,
        commit: &MoveCommit,
    ) -> impl Future<Output = Result<MoveRecord, AppError>> + Send;
}

pub trait GameRepository: Send + Sync {
    /// Create the game record together with its starting board.
    fn create_game(
        &self,
        white_player_id: i64,
        black_player_id: i64,
    ) -> impl Future<Output = Result<Game, AppError>> + Send;

    fn get_game(&self, game_id: i64) -> impl Future<Output = Result<Option<Game>, AppError>> + Send;

    fn games_for_player(
        &self,
        player_id: i64,
        role: PlayerRole,
    ) -> impl Future<Output = Result<Vec<Game>, AppError>> + Send;

    /// Stamp `end_time`. A game that already ended keeps its first stamp.
    fn finish_game(&self, game_id: i64) -> impl Future<Output = Result<Game, AppError>> + Send;
}

pub trait PlayerRepository: Send + Sync {
    /// `Conflict` when a live player already uses the username or email.
    fn add_player(
        &self,
        username: &str,
        email: &str,
    ) -> impl Future<Output = Result<Player, AppError>> + Send;

    /// Looks up deleted players too; check `Player::is_live`.
    fn player(&self, player_id: i64) -> impl Future<Output = Result<Option<Player>, AppError>> + Send;

    fn player_id_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<i64>, AppError>> + Send;

    fn list_players(&self) -> impl Future<Output = Result<Vec<Player>, AppError>> + Send;

    /// Soft delete. Deleting twice is a no-op; an unknown id is `NotFound`.
    fn delete_player(&self, player_id: i64) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Everything `GameService` needs from a backend.
pub trait Store: BoardStore + MoveLog + GameRepository + PlayerRepository {}

impl<T> Store for T where T: BoardStore + MoveLog + GameRepository + PlayerRepository {}

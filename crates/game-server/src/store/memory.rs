//! In-process backend: an arena of per-game slots.
//!
//! Each game's record, board and move log sit behind one mutex, so a move
//! commit is atomic and games never contend with each other beyond the
//! brief arena lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chess_core::{Board, Color, PieceKind, PlayerRole, Square, SquareState};
use chrono::Utc;

use crate::error::AppError;
use crate::models::{Game, MoveCommit, MoveRecord, Player};
use crate::store::{BoardStore, GameRepository, MoveLog, PlayerRepository};

struct GameSlot {
    game: Option<Game>,
    board: Option<Board>,
    moves: Vec<MoveRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<i64, Arc<Mutex<GameSlot>>>>,
    players: RwLock<Vec<Player>>,
    next_game_id: AtomicI64,
    next_player_id: AtomicI64,
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("store lock poisoned".into())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, game_id: i64) -> Result<Arc<Mutex<GameSlot>>, AppError> {
        self.games
            .read()
            .map_err(poisoned)?
            .get(&game_id)
            .cloned()
            .ok_or_else(|| AppError::game_not_found(game_id))
    }

    fn slot_or_insert(&self, game_id: i64) -> Result<Arc<Mutex<GameSlot>>, AppError> {
        let mut games = self.games.write().map_err(poisoned)?;
        let slot = games.entry(game_id).or_insert_with(|| {
            Arc::new(Mutex::new(GameSlot {
                game: None,
                board: None,
                moves: Vec::new(),
            }))
        });
        Ok(Arc::clone(slot))
    }

    fn with_board<R>(
        &self,
        game_id: i64,
        f: impl FnOnce(&mut Board) -> R,
    ) -> Result<R, AppError> {
        let slot = self.slot(game_id)?;
        let mut slot = lock(&slot)?;
        let board = slot
            .board
            .as_mut()
            .ok_or_else(|| AppError::NotFound(format!("Board for game {game_id} not initialized")))?;
        Ok(f(board))
    }
}

fn lock(slot: &Mutex<GameSlot>) -> Result<MutexGuard<'_, GameSlot>, AppError> {
    slot.lock().map_err(poisoned)
}

impl BoardStore for MemoryStore {
    async fn initialize(&self, game_id: i64) -> Result<(), AppError> {
        let slot = self.slot_or_insert(game_id)?;
        let mut slot = lock(&slot)?;
        if slot.board.is_some() {
            return Err(AppError::Conflict(format!("Board for game {game_id} already initialized")));
        }
        slot.board = Some(Board::starting());
        Ok(())
    }

    async fn square(&self, game_id: i64, square: Square) -> Result<SquareState, AppError> {
        self.with_board(game_id, |board| board.get(square))
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
        self.with_board(game_id, |board| board.set(square, state))
    }

    async fn load_board(&self, game_id: i64) -> Result<Board, AppError> {
        self.with_board(game_id, |board| board.clone())
    }
}

impl MoveLog for MemoryStore {
    async fn latest_sequence(&self, game_id: i64) -> Result<i32, AppError> {
        let slot = self.slot(game_id)?;
        let slot = lock(&slot)?;
        Ok(slot.moves.last().map(|m| m.seq).unwrap_or(0))
    }

    async fn moves(&self, game_id: i64) -> Result<Vec<MoveRecord>, AppError> {
        let slot = self.slot(game_id)?;
        let slot = lock(&slot)?;
        Ok(slot.moves.clone())
    }

    async fn commit_move(&self, game_id: i64, commit: &MoveCommit) -> Result<MoveRecord, AppError> {
        let slot = self.slot(game_id)?;
        let mut slot = lock(&slot)?;
        let seq = slot.moves.last().map(|m| m.seq).unwrap_or(0) + 1;
        let board = slot
            .board
            .as_mut()
            .ok_or_else(|| AppError::NotFound(format!("Board for game {game_id} not initialized")))?;

        board.set(commit.to, SquareState::occupied(commit.piece, commit.color));
        board.set(commit.from, SquareState::EMPTY);

        let record = MoveRecord {
            game_id,
            seq,
            notation: commit.notation.clone(),
        };
        slot.moves.push(record.clone());
        Ok(record)
    }
}

impl GameRepository for MemoryStore {
    async fn create_game(&self, white_player_id: i64, black_player_id: i64) -> Result<Game, AppError> {
        let id = self.next_game_id.fetch_add(1, Ordering::SeqCst) + 1;
        let game = Game {
            id,
            white_player_id,
            black_player_id,
            start_time: Utc::now(),
            end_time: None,
        };
        let slot = GameSlot {
            game: Some(game.clone()),
            board: Some(Board::starting()),
            moves: Vec::new(),
        };
        self.games
            .write()
            .map_err(poisoned)?
            .insert(id, Arc::new(Mutex::new(slot)));
        Ok(game)
    }

    async fn get_game(&self, game_id: i64) -> Result<Option<Game>, AppError> {
        let slot = match self.slot(game_id) {
            Ok(slot) => slot,
            Err(AppError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let slot = lock(&slot)?;
        Ok(slot.game.clone())
    }

    async fn games_for_player(&self, player_id: i64, role: PlayerRole) -> Result<Vec<Game>, AppError> {
        let slots: Vec<_> = self.games.read().map_err(poisoned)?.values().cloned().collect();
        let mut games = Vec::new();
        for slot in slots {
            if let Some(game) = lock(&slot)?.game.clone() {
                if plays_as(&game, player_id, role) {
                    games.push(game);
                }
            }
        }
        games.sort_by_key(|g| g.id);
        Ok(games)
    }

    async fn finish_game(&self, game_id: i64) -> Result<Game, AppError> {
        let slot = self.slot(game_id)?;
        let mut slot = lock(&slot)?;
        let game = slot
            .game
            .as_mut()
            .ok_or_else(|| AppError::game_not_found(game_id))?;
        if game.end_time.is_none() {
            game.end_time = Some(Utc::now());
        }
        Ok(game.clone())
    }
}

fn plays_as(game: &Game, player_id: i64, role: PlayerRole) -> bool {
    match role {
        PlayerRole::White => game.white_player_id == player_id,
        PlayerRole::Black => game.black_player_id == player_id,
        PlayerRole::Either => game.white_player_id == player_id || game.black_player_id == player_id,
    }
}

impl PlayerRepository for MemoryStore {
    async fn add_player(&self, username: &str, email: &str) -> Result<Player, AppError> {
        let mut players = self.players.write().map_err(poisoned)?;
        let live = players.iter().filter(|p| p.is_live());
        for existing in live {
            if existing.email.eq_ignore_ascii_case(email) {
                return Err(AppError::Conflict("Email already registered".into()));
            }
            if existing.username.eq_ignore_ascii_case(username) {
                return Err(AppError::Conflict("Username already taken".into()));
            }
        }

        let player = Player {
            id: self.next_player_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        };
        players.push(player.clone());
        Ok(player)
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>, AppError> {
        let players = self.players.read().map_err(poisoned)?;
        Ok(players.iter().find(|p| p.id == player_id).cloned())
    }

    async fn player_id_by_email(&self, email: &str) -> Result<Option<i64>, AppError> {
        let players = self.players.read().map_err(poisoned)?;
        Ok(players
            .iter()
            .find(|p| p.is_live() && p.email.eq_ignore_ascii_case(email))
            .map(|p| p.id))
    }

    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        Ok(self.players.read().map_err(poisoned)?.clone())
    }

    async fn delete_player(&self, player_id: i64) -> Result<(), AppError> {
        let mut players = self.players.write().map_err(poisoned)?;
        let player = players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| AppError::NotFound(format!("Player {player_id} not found")))?;
        if player.deleted_at.is_none() {
            player.deleted_at = Some(Utc::now());
        }
        Ok(())
    }
}

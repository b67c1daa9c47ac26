//! Game sessions: player checks, game lifecycle and move application.

use std::sync::LazyLock;

use chess_core::board::BoardEntry;
use chess_core::notation::{is_capture, long_algebraic, parse_long_algebraic};
use chess_core::square::parse;
use chess_core::{rules, Color, PieceKind, PlayerRole, RuleError, Square, SquareState};
use regex::Regex;

use crate::error::AppError;
use crate::locks::GameLocks;
use crate::models::{Game, MoveCommit, MoveRecord, Player};
use crate::store::Store;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern compiles"));

const MAX_FIELD_LEN: usize = 50;

pub struct GameService<S> {
    store: S,
    locks: GameLocks,
}

impl<S: Store> GameService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: GameLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -- players -----------------------------------------------------------

    pub async fn register_player(&self, username: &str, email: &str) -> Result<Player, AppError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || username.len() > MAX_FIELD_LEN {
            return Err(AppError::BadRequest(format!(
                "Username must be 1 to {MAX_FIELD_LEN} characters"
            )));
        }
        if !USERNAME_RE.is_match(username) {
            return Err(AppError::BadRequest(
                "Username can only contain letters, numbers, and underscores".into(),
            ));
        }
        if email.len() > MAX_FIELD_LEN || !is_plausible_email(email) {
            return Err(AppError::BadRequest(format!("Invalid email `{email}`")));
        }

        let player = self.store.add_player(username, email).await?;
        tracing::info!(player_id = player.id, username = %player.username, "Registered player");
        Ok(player)
    }

    /// Live players only; deleted ones are `NotFound`.
    pub async fn get_player(&self, player_id: i64) -> Result<Player, AppError> {
        self.store
            .player(player_id)
            .await?
            .filter(Player::is_live)
            .ok_or_else(|| AppError::NotFound(format!("Player {player_id} not found")))
    }

    pub async fn delete_player(&self, player_id: i64) -> Result<(), AppError> {
        self.store.delete_player(player_id).await?;
        tracing::info!(player_id, "Deleted player");
        Ok(())
    }

    pub async fn player_id_by_email(&self, email: &str) -> Result<Option<i64>, AppError> {
        self.store.player_id_by_email(email.trim()).await
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        self.store.list_players().await
    }

    async fn ensure_live_player(&self, player_id: i64, role: &str) -> Result<(), AppError> {
        match self.store.player(player_id).await? {
            None => Err(AppError::InvalidPlayer(format!(
                "{role} with ID {player_id} does not exist."
            ))),
            Some(p) if !p.is_live() => Err(AppError::InvalidPlayer(format!(
                "{role} with ID {player_id} is deleted."
            ))),
            Some(_) => Ok(()),
        }
    }

    // -- games -------------------------------------------------------------

    /// Create a game between two live players. The board is laid out as part
    /// of the same operation.
    pub async fn create_game(&self, white_player_id: i64, black_player_id: i64) -> Result<Game, AppError> {
        self.ensure_live_player(white_player_id, "White player").await?;
        self.ensure_live_player(black_player_id, "Black player").await?;

        let game = self.store.create_game(white_player_id, black_player_id).await?;
        tracing::info!(
            game_id = game.id,
            white = white_player_id,
            black = black_player_id,
            "Created game"
        );
        Ok(game)
    }

    pub async fn get_game(&self, game_id: i64) -> Result<Game, AppError> {
        self.store
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::game_not_found(game_id))
    }

    pub async fn games_for_player(&self, player_id: i64, role: PlayerRole) -> Result<Vec<Game>, AppError> {
        self.store.games_for_player(player_id, role).await
    }

    pub async fn finish_game(&self, game_id: i64) -> Result<Game, AppError> {
        self.get_game(game_id).await?;
        let _guard = self.locks.lock(game_id).await;
        let game = self.store.finish_game(game_id).await?;
        tracing::info!(game_id, "Finished game");
        Ok(game)
    }

    pub async fn board(&self, game_id: i64) -> Result<Vec<BoardEntry>, AppError> {
        self.get_game(game_id).await?;
        self.store.list_all(game_id).await
    }

    pub async fn history(&self, game_id: i64) -> Result<Vec<MoveRecord>, AppError> {
        self.get_game(game_id).await?;
        self.store.moves(game_id).await
    }

    pub async fn player_color(&self, game_id: i64, player_id: i64) -> Result<Color, AppError> {
        let game = self.get_game(game_id).await?;
        game.color_of(player_id).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Player {player_id} is not a participant in game {game_id}"
            ))
        })
    }

    /// Game exists, is still running and `player_id` plays in it.
    pub async fn check_move_preconditions(&self, game_id: i64, player_id: i64) -> Result<Game, AppError> {
        let game = self.store.get_game(game_id).await?.ok_or_else(|| {
            AppError::NotFound(
                "The specified game does not exist. Please create the game before making a move."
                    .into(),
            )
        })?;
        if game.is_finished() {
            tracing::warn!(game_id, player_id, "Move submitted to finished game");
            return Err(AppError::BadRequest(
                "The game has already finished. You cannot make a move in a finished game.".into(),
            ));
        }
        if game.color_of(player_id).is_none() {
            tracing::warn!(game_id, player_id, "Move submitted by non-participant");
            return Err(AppError::BadRequest(
                "The player must be one of the participants in the game.".into(),
            ));
        }
        Ok(game)
    }

    // -- moves -------------------------------------------------------------

    /// Submit `start` -> `end` for `mover`. `Ok(false)` means the move was
    /// rejected and nothing changed.
    pub async fn submit_move(
        &self,
        game_id: i64,
        start: &str,
        end: &str,
        mover: PlayerRole,
    ) -> Result<bool, AppError> {
        let from = parse(start)?;
        let to = parse(end)?;
        let game = self.get_game(game_id).await?;
        self.apply_move(&game, from, to, mover).await
    }

    /// Submit move text such as `e2-e4` or `Ng1-f3` on behalf of a player.
    pub async fn submit_player_move(
        &self,
        game_id: i64,
        player_id: i64,
        text: &str,
    ) -> Result<bool, AppError> {
        let game = self.check_move_preconditions(game_id, player_id).await?;
        let color = game.color_of(player_id).ok_or_else(|| {
            AppError::BadRequest(format!("Player {player_id} is not a participant in game {game_id}"))
        })?;
        let parsed = parse_long_algebraic(text)?;

        self.apply_checked(&game, parsed.from, parsed.to, color.into(), parsed.piece)
            .await
    }

    /// Validate and apply one move.
    ///
    /// Holds the game's lock from the board read until the commit, so the
    /// record and both square updates land together or not at all.
    pub async fn apply_move(
        &self,
        game: &Game,
        from: Square,
        to: Square,
        mover: PlayerRole,
    ) -> Result<bool, AppError> {
        self.apply_checked(game, from, to, mover, None).await
    }

    async fn apply_checked(
        &self,
        game: &Game,
        from: Square,
        to: Square,
        mover: PlayerRole,
        expected: Option<PieceKind>,
    ) -> Result<bool, AppError> {
        let _guard = self.locks.lock(game.id).await;
        let board = self.store.load_board(game.id).await?;

        let origin = board.get(from);
        let Some(piece) = origin.piece() else {
            tracing::debug!(game_id = game.id, %from, "No piece on origin square");
            return Ok(false);
        };
        if expected.is_some_and(|kind| kind != piece) {
            tracing::debug!(game_id = game.id, %from, %piece, "Move text names a different piece");
            return Ok(false);
        }

        if !rules::validate(&board, piece, from, to, mover)? {
            tracing::debug!(game_id = game.id, %piece, %from, %to, ?mover, "Illegal move");
            return Ok(false);
        }

        let color = mover.color().or(origin.color()).ok_or_else(|| {
            RuleError::InvalidState(format!("no color for the piece on {from}"))
        })?;
        let capture = is_capture(board.get(to), mover);
        let commit = MoveCommit {
            from,
            to,
            piece,
            color,
            notation: long_algebraic(piece.name(), from, to, capture),
        };

        let record = self.store.commit_move(game.id, &commit).await?;
        tracing::info!(
            game_id = game.id,
            seq = record.seq,
            notation = %record.notation,
            "Move applied"
        );
        Ok(true)
    }

    /// Occupancy of one square, for callers that only need a single lookup.
    pub async fn square(&self, game_id: i64, square: &str) -> Result<SquareState, AppError> {
        let square = parse(square)?;
        self.store.square(game_id, square).await
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

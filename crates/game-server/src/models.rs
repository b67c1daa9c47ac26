//! Records shared by every storage backend.

use chess_core::{Color, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Player {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Game {
    pub id: i64,
    pub white_player_id: i64,
    pub black_player_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Game {
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Color `player_id` plays in this game, if they play at all.
    pub fn color_of(&self, player_id: i64) -> Option<Color> {
        if player_id == self.white_player_id {
            Some(Color::White)
        } else if player_id == self.black_player_id {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// One applied move. `seq` starts at 1 and has no gaps within a game.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct MoveRecord {
    pub game_id: i64,
    pub seq: i32,
    pub notation: String,
}

/// Everything a backend needs to apply a validated move in one step.
#[derive(Debug, Clone)]
pub struct MoveCommit {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub color: Color,
    pub notation: String,
}

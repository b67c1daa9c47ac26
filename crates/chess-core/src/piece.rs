use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Look up a kind by the letter used in move notation (`N` for knight).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PieceKind {
    type Err = RuleError;

    /// Case-insensitive piece name ("pawn", "Knight", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(RuleError::InvalidArgument(
                "piece type must not be empty".into(),
            ));
        }
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuleError::InvalidArgument(format!("invalid piece type `{s}`")))
    }
}

/// Owner of a piece.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step: White moves up the board, Black down.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row pawns start on, from which the double advance is allowed.
    pub fn pawn_home_row(self) -> i32 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            _ => Err(RuleError::InvalidArgument(format!("invalid color `{s}`"))),
        }
    }
}

/// Acting color of a move, or a filter over games. `Either` matches both.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum PlayerRole {
    White,
    Black,
    #[default]
    Either,
}

impl PlayerRole {
    pub fn color(self) -> Option<Color> {
        match self {
            PlayerRole::White => Some(Color::White),
            PlayerRole::Black => Some(Color::Black),
            PlayerRole::Either => None,
        }
    }

    pub fn matches(self, color: Color) -> bool {
        match self.color() {
            Some(c) => c == color,
            None => true,
        }
    }
}

impl From<Color> for PlayerRole {
    fn from(color: Color) -> Self {
        match color {
            Color::White => PlayerRole::White,
            Color::Black => PlayerRole::Black,
        }
    }
}

/// Occupancy of one square.
///
/// A square with neither piece nor color is empty; anything else counts as
/// occupied. Boards built through `occupied` always carry both.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SquareState {
    piece: Option<PieceKind>,
    color: Option<Color>,
}

impl SquareState {
    pub const EMPTY: SquareState = SquareState {
        piece: None,
        color: None,
    };

    pub fn occupied(piece: PieceKind, color: Color) -> Self {
        Self {
            piece: Some(piece),
            color: Some(color),
        }
    }

    /// Raw constructor for rows loaded from storage or seeded by tests.
    pub fn from_parts(piece: Option<PieceKind>, color: Option<Color>) -> Self {
        Self { piece, color }
    }

    pub fn is_occupied(&self) -> bool {
        self.piece.is_some() || self.color.is_some()
    }

    pub fn piece(&self) -> Option<PieceKind> {
        self.piece
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

//! 64-square occupancy snapshot and the standard starting layout.

use serde::Serialize;

use crate::piece::{Color, PieceKind, SquareState};
use crate::square::Square;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Read access to square occupancy. The move rules only ever look at a
/// board through this trait.
pub trait Occupancy {
    fn square_state(&self, square: Square) -> SquareState;

    fn is_occupied(&self, square: Square) -> bool {
        self.square_state(square).is_occupied()
    }

    fn piece_at(&self, square: Square) -> Option<PieceKind> {
        self.square_state(square).piece()
    }

    fn color_at(&self, square: Square) -> Option<Color> {
        self.square_state(square).color()
    }
}

/// Dense board: every one of the 64 squares has a state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    squares: [SquareState; 64],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [SquareState::EMPTY; 64],
        }
    }

    /// Standard arrangement: White on rows 1-2, Black on rows 7-8.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for square in Square::all() {
            board.set(square, starting_state(square));
        }
        board
    }

    pub fn get(&self, square: Square) -> SquareState {
        self.squares[square.index()]
    }

    pub fn set(&mut self, square: Square, state: SquareState) {
        self.squares[square.index()] = state;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, SquareState)> + '_ {
        Square::all().map(move |sq| (sq, self.get(sq)))
    }

    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_occupied()).count()
    }

    /// Rebuild a board from stored `(square, state)` rows. Squares missing
    /// from `rows` come back as `None` so callers can reject sparse boards.
    pub fn from_rows<I>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Square, SquareState)>,
    {
        let mut seen = [false; 64];
        let mut board = Self::empty();
        for (square, state) in rows {
            seen[square.index()] = true;
            board.set(square, state);
        }
        seen.iter().all(|s| *s).then_some(board)
    }

    pub fn entries(&self) -> Vec<BoardEntry> {
        self.iter()
            .map(|(square, state)| BoardEntry { square, state })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl Occupancy for Board {
    fn square_state(&self, square: Square) -> SquareState {
        self.get(square)
    }
}

/// One square of a listed board.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BoardEntry {
    pub square: Square,
    #[serde(flatten)]
    pub state: SquareState,
}

/// What stands on `square` before the first move.
pub fn starting_state(square: Square) -> SquareState {
    let back_rank = BACK_RANK[(square.column_number() - 1) as usize];
    match square.row() {
        1 => SquareState::occupied(back_rank, Color::White),
        2 => SquareState::occupied(PieceKind::Pawn, Color::White),
        7 => SquareState::occupied(PieceKind::Pawn, Color::Black),
        8 => SquareState::occupied(back_rank, Color::Black),
        _ => SquareState::EMPTY,
    }
}

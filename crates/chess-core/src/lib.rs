//! Board model and move rules for two-player chess games.
//!
//! Everything in this crate is pure computation over a 64-square `Board`
//! snapshot. Storage, locking and history live in `game-server`.

pub mod board;
pub mod error;
pub mod notation;
pub mod piece;
pub mod rules;
pub mod square;

pub use board::{Board, Occupancy};
pub use error::RuleError;
pub use notation::{long_algebraic, parse_long_algebraic, ParsedMove};
pub use piece::{Color, PieceKind, PlayerRole, SquareState};
pub use rules::{is_valid_move, validate};
pub use square::Square;

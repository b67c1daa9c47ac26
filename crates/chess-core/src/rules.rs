//! Move validation.
//!
//! Pawn and knight rules are implemented. The sliding pieces, the king and
//! the check family fail with `RuleError::NotImplemented` instead of
//! guessing an answer.

use crate::board::Occupancy;
use crate::error::RuleError;
use crate::piece::{PieceKind, PlayerRole};
use crate::square::{is_position_valid, Square};

/// Decide whether `piece` may move from `start` to `end` for `mover`.
///
/// `piece` is a case-insensitive name; empty or unknown names are an
/// `InvalidArgument`. Coordinates shorter than two characters are an
/// `InvalidFormat`. Longer coordinates, and two-character ones that fall
/// off the board, make the move illegal (`Ok(false)`).
pub fn is_valid_move<B: Occupancy + ?Sized>(
    board: &B,
    piece: &str,
    start: &str,
    end: &str,
    mover: PlayerRole,
) -> Result<bool, RuleError> {
    let kind: PieceKind = piece.parse()?;

    let (Some(from), Some(to)) = (coordinate(start)?, coordinate(end)?) else {
        return Ok(false);
    };

    validate(board, kind, from, to, mover)
}

/// Typed form of [`is_valid_move`] for squares that are already parsed.
pub fn validate<B: Occupancy + ?Sized>(
    board: &B,
    kind: PieceKind,
    from: Square,
    to: Square,
    mover: PlayerRole,
) -> Result<bool, RuleError> {
    match kind {
        PieceKind::Pawn => is_pawn_move_valid(board, from, to, mover),
        PieceKind::Knight => Ok(is_knight_move_valid(from, to)),
        PieceKind::Bishop => Err(RuleError::NotImplemented("bishop movement")),
        PieceKind::Rook => Err(RuleError::NotImplemented("rook movement")),
        PieceKind::Queen => Err(RuleError::NotImplemented("queen movement")),
        PieceKind::King => Err(RuleError::NotImplemented("king movement")),
    }
}

/// Split `"e2"` into column and row and bounds-check both.
fn coordinate(text: &str) -> Result<Option<Square>, RuleError> {
    let mut chars = text.chars();
    let Some(column) = chars.next() else {
        return Err(RuleError::InvalidFormat(format!(
            "coordinate `{text}` is too short"
        )));
    };
    let rest = chars.as_str();
    if rest.is_empty() {
        return Err(RuleError::InvalidFormat(format!(
            "coordinate `{text}` is too short"
        )));
    }

    // the row is a single digit; "e02" or "e+2" is not a square
    let mut rest = rest.chars();
    let (Some(row), None) = (rest.next(), rest.next()) else {
        return Ok(None);
    };
    let Some(row) = row.to_digit(10) else {
        return Ok(None);
    };
    let row = row as i32;

    let column = column.to_ascii_lowercase();
    if !is_position_valid(column.encode_utf8(&mut [0; 4]), row) {
        return Ok(None);
    }
    Ok(Square::new(column, row))
}

pub fn is_pawn_move_valid<B: Occupancy + ?Sized>(
    board: &B,
    from: Square,
    to: Square,
    mover: PlayerRole,
) -> Result<bool, RuleError> {
    let Some(color) = mover.color() else {
        return Ok(false);
    };
    let dir = color.forward();

    let same_column = from.column() == to.column();
    let one_column_away = (from.column_number() - to.column_number()).abs() == 1;
    let one_step_forward = to.row() == from.row() + dir;

    if board.is_occupied(to) {
        // only a one-step diagonal capture may land on a piece
        if one_column_away && one_step_forward {
            return is_opponent_piece(board, to, mover);
        }
        return Ok(false);
    }

    if same_column && one_step_forward {
        return Ok(true);
    }

    if same_column && from.row() == color.pawn_home_row() && to.row() == from.row() + 2 * dir {
        let Some(between) = from.offset(0, dir) else {
            return Ok(false);
        };
        return Ok(!board.is_occupied(between));
    }

    Ok(false)
}

/// True iff the piece on `square` does not belong to `mover`.
///
/// Only meaningful for occupied squares: a square with no recorded color is
/// an `InvalidState`.
pub fn is_opponent_piece<B: Occupancy + ?Sized>(
    board: &B,
    square: Square,
    mover: PlayerRole,
) -> Result<bool, RuleError> {
    let color = board.color_at(square).ok_or_else(|| {
        RuleError::InvalidState(format!("no piece color recorded on {square}"))
    })?;
    Ok(PlayerRole::from(color) != mover)
}

/// L-shape: two columns and one row, or one column and two rows.
pub fn is_knight_move_valid(from: Square, to: Square) -> bool {
    let column_delta = (to.column_number() - from.column_number()).abs();
    let row_delta = (to.row() - from.row()).abs();
    matches!((column_delta, row_delta), (2, 1) | (1, 2))
}

/// Whether a square beside `end`'s column on `start_row` holds a piece.
///
/// This is only the adjacency half of en passant. It does not look at the
/// previous move and must not be used as a legality verdict.
pub fn is_en_passant_candidate<B: Occupancy + ?Sized>(board: &B, start_row: i32, end: Square) -> bool {
    [-1, 1].into_iter().any(|side| {
        end.offset(side, start_row - end.row())
            .is_some_and(|sq| board.piece_at(sq).is_some())
    })
}

pub fn is_en_passant_valid<B: Occupancy + ?Sized>(
    _board: &B,
    _from: Square,
    _to: Square,
    _mover: PlayerRole,
) -> Result<bool, RuleError> {
    Err(RuleError::NotImplemented("en passant"))
}

pub fn is_castling_move_valid<B: Occupancy + ?Sized>(
    _board: &B,
    _from: Square,
    _to: Square,
    _mover: PlayerRole,
) -> Result<bool, RuleError> {
    Err(RuleError::NotImplemented("castling"))
}

pub fn is_in_check<B: Occupancy + ?Sized>(_board: &B, _king: Square) -> Result<bool, RuleError> {
    Err(RuleError::NotImplemented("check detection"))
}

pub fn is_checkmate<B: Occupancy + ?Sized>(_board: &B, _king: Square) -> Result<bool, RuleError> {
    Err(RuleError::NotImplemented("checkmate detection"))
}

pub fn is_stalemate<B: Occupancy + ?Sized>(_board: &B, _mover: PlayerRole) -> Result<bool, RuleError> {
    Err(RuleError::NotImplemented("stalemate detection"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::{Color, SquareState};
    use crate::square::parse;

    fn sq(s: &str) -> Square {
        parse(s).unwrap()
    }

    fn place(board: &mut Board, s: &str, piece: PieceKind, color: Color) {
        board.set(sq(s), SquareState::occupied(piece, color));
    }

    fn pawn(board: &Board, start: &str, end: &str, mover: PlayerRole) -> bool {
        is_valid_move(board, "Pawn", start, end, mover).unwrap()
    }

    #[test]
    fn test_white_pawn_advances() {
        let board = Board::starting();
        assert!(pawn(&board, "e2", "e3", PlayerRole::White));
        assert!(pawn(&board, "e2", "e4", PlayerRole::White));
        assert!(!pawn(&board, "e2", "e5", PlayerRole::White));
        assert!(!pawn(&board, "e2", "d3", PlayerRole::White));
        assert!(!pawn(&board, "e2", "e1", PlayerRole::White));
    }

    #[test]
    fn test_double_advance_needs_clear_path_and_home_row() {
        let mut board = Board::starting();
        place(&mut board, "e3", PieceKind::Knight, Color::Black);
        assert!(!pawn(&board, "e2", "e4", PlayerRole::White));

        let mut board = Board::empty();
        place(&mut board, "e3", PieceKind::Pawn, Color::White);
        assert!(!pawn(&board, "e3", "e5", PlayerRole::White));
    }

    #[test]
    fn test_black_pawn_moves_down() {
        let board = Board::starting();
        assert!(pawn(&board, "d7", "d6", PlayerRole::Black));
        assert!(pawn(&board, "d7", "d5", PlayerRole::Black));
        assert!(!pawn(&board, "d7", "d8", PlayerRole::Black));
        assert!(!pawn(&board, "d7", "d4", PlayerRole::Black));
    }

    #[test]
    fn test_pawn_diagonal_needs_capture() {
        let mut board = Board::starting();
        assert!(!pawn(&board, "e2", "f3", PlayerRole::White));

        place(&mut board, "f3", PieceKind::Pawn, Color::Black);
        assert!(pawn(&board, "e2", "f3", PlayerRole::White));

        place(&mut board, "f3", PieceKind::Pawn, Color::White);
        assert!(!pawn(&board, "e2", "f3", PlayerRole::White));

        let mut board = Board::empty();
        place(&mut board, "d4", PieceKind::Pawn, Color::White);
        assert!(!pawn(&board, "d4", "e5", PlayerRole::White));
    }

    #[test]
    fn test_black_pawn_captures_down_the_board() {
        let mut board = Board::starting();
        place(&mut board, "e6", PieceKind::Knight, Color::White);
        assert!(pawn(&board, "d7", "e6", PlayerRole::Black));

        place(&mut board, "e6", PieceKind::Knight, Color::Black);
        assert!(!pawn(&board, "d7", "e6", PlayerRole::Black));

        // backward diagonal onto an enemy piece
        let mut board = Board::empty();
        place(&mut board, "d7", PieceKind::Pawn, Color::Black);
        place(&mut board, "e8", PieceKind::Rook, Color::White);
        assert!(!pawn(&board, "d7", "e8", PlayerRole::Black));
    }

    #[test]
    fn test_pawn_cannot_push_into_piece() {
        let mut board = Board::starting();
        place(&mut board, "e3", PieceKind::Pawn, Color::Black);
        assert!(!pawn(&board, "e2", "e3", PlayerRole::White));
    }

    #[test]
    fn test_pawn_without_acting_color_is_illegal() {
        let board = Board::starting();
        assert!(!pawn(&board, "e2", "e3", PlayerRole::Either));
    }

    #[test]
    fn test_knight_moves() {
        let board = Board::starting();
        assert!(is_valid_move(&board, "Knight", "g1", "f3", PlayerRole::White).unwrap());
        assert!(is_valid_move(&board, "knight", "b1", "c3", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Knight", "e3", "e5", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Knight", "g1", "g1", PlayerRole::White).unwrap());
    }

    #[test]
    fn test_off_board_coordinates_are_illegal() {
        let board = Board::starting();
        assert!(!is_valid_move(&board, "Pawn", "e2", "e9", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Pawn", "z2", "e3", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Pawn", "ex", "e3", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Pawn", "e02", "e3", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Pawn", "e+2", "e4", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Knight", "g1", "f03", PlayerRole::White).unwrap());
        assert!(!is_valid_move(&board, "Pawn", "e2", "e3 ", PlayerRole::White).unwrap());
    }

    #[test]
    fn test_short_coordinates_are_rejected() {
        let board = Board::starting();
        assert!(matches!(
            is_valid_move(&board, "Pawn", "e", "e3", PlayerRole::White),
            Err(RuleError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unknown_piece_is_invalid_argument() {
        let board = Board::starting();
        for name in ["", "Dragon"] {
            assert!(matches!(
                is_valid_move(&board, name, "e2", "e3", PlayerRole::White),
                Err(RuleError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_unimplemented_pieces_fail_loudly() {
        let board = Board::starting();
        for name in ["Bishop", "Rook", "Queen", "King"] {
            assert!(matches!(
                is_valid_move(&board, name, "a1", "a2", PlayerRole::White),
                Err(RuleError::NotImplemented(_))
            ));
        }
        assert!(is_castling_move_valid(&board, sq("e1"), sq("g1"), PlayerRole::White).is_err());
        assert!(is_in_check(&board, sq("e1")).is_err());
        assert!(is_checkmate(&board, sq("e1")).is_err());
        assert!(is_stalemate(&board, PlayerRole::White).is_err());
        assert!(is_en_passant_valid(&board, sq("e5"), sq("d6"), PlayerRole::White).is_err());
    }

    #[test]
    fn test_is_opponent_piece() {
        let board = Board::starting();
        assert!(!is_opponent_piece(&board, sq("a1"), PlayerRole::White).unwrap());
        assert!(is_opponent_piece(&board, sq("c8"), PlayerRole::White).unwrap());
        assert!(is_opponent_piece(&board, sq("a1"), PlayerRole::Black).unwrap());
        assert!(!is_opponent_piece(&board, sq("h8"), PlayerRole::Black).unwrap());
        assert!(matches!(
            is_opponent_piece(&board, sq("e4"), PlayerRole::White),
            Err(RuleError::InvalidState(_))
        ));
    }

    #[test]
    fn test_en_passant_candidate_checks_adjacent_squares() {
        let board = Board::empty();
        assert!(!is_en_passant_candidate(&board, 5, sq("d6")));

        let mut board = Board::empty();
        place(&mut board, "c5", PieceKind::Pawn, Color::Black);
        assert!(is_en_passant_candidate(&board, 5, sq("d6")));
        assert!(!is_en_passant_candidate(&board, 4, sq("d6")));

        // a-file has no left neighbour
        let mut board = Board::empty();
        place(&mut board, "b5", PieceKind::Pawn, Color::Black);
        assert!(is_en_passant_candidate(&board, 5, sq("a6")));
    }
}

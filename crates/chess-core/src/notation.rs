//! Long-algebraic move text: `Ng1-f3`, `Pe4xd5`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RuleError;
use crate::piece::{PieceKind, PlayerRole, SquareState};
use crate::square::{parse, Square};

static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([PNBRQK])?([a-hA-H][1-8])([-x])?([a-hA-H][1-8])$").expect("move pattern compiles")
});

/// Letter for a piece name: `N` for knights, otherwise the first letter
/// uppercased. Names outside the standard set keep working (`Dragon` -> `D`).
pub fn piece_letter(piece: &str) -> String {
    if piece.eq_ignore_ascii_case("knight") {
        return "N".to_string();
    }
    piece
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// A move captures when the destination, as it stood before the move, holds
/// something not owned by `mover`. An occupied square with no recorded
/// color counts as a capture.
pub fn is_capture(destination: SquareState, mover: PlayerRole) -> bool {
    destination.is_occupied() && destination.color().map(PlayerRole::from) != Some(mover)
}

pub fn long_algebraic(piece: &str, from: Square, to: Square, capture: bool) -> String {
    let sep = if capture { 'x' } else { '-' };
    format!("{}{from}{sep}{to}", piece_letter(piece))
}

/// Move text submitted by a player.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ParsedMove {
    pub piece: Option<PieceKind>,
    pub from: Square,
    pub to: Square,
    pub capture: bool,
}

/// Parse `e2e4`, `e2-e4`, `e4xd5`, optionally prefixed with a piece letter.
pub fn parse_long_algebraic(text: &str) -> Result<ParsedMove, RuleError> {
    let text = text.trim();
    let caps = MOVE_RE
        .captures(text)
        .ok_or_else(|| RuleError::InvalidFormat(format!("unrecognised move `{text}`")))?;

    let piece = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(PieceKind::from_letter);

    Ok(ParsedMove {
        piece,
        from: parse(&caps[2])?,
        to: parse(&caps[4])?,
        capture: caps.get(3).is_some_and(|m| m.as_str() == "x"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn sq(s: &str) -> Square {
        parse(s).unwrap()
    }

    #[test]
    fn test_long_algebraic() {
        assert_eq!(long_algebraic("Knight", sq("g1"), sq("f3"), false), "Ng1-f3");
        assert_eq!(long_algebraic("Knight", sq("g1"), sq("f3"), true), "Ng1xf3");
        assert_eq!(long_algebraic("Pawn", sq("e4"), sq("d5"), true), "Pe4xd5");
        assert_eq!(long_algebraic("Pawn", sq("e2"), sq("e4"), false), "Pe2-e4");
        assert_eq!(long_algebraic("Dragon", sq("e2"), sq("e4"), false), "De2-e4");
        assert_eq!(long_algebraic("queen", sq("d1"), sq("h5"), false), "Qd1-h5");
    }

    #[test]
    fn test_is_capture() {
        let black_pawn = SquareState::occupied(PieceKind::Pawn, Color::Black);
        assert!(is_capture(black_pawn, PlayerRole::White));
        assert!(!is_capture(black_pawn, PlayerRole::Black));
        assert!(!is_capture(SquareState::EMPTY, PlayerRole::White));

        let colorless = SquareState::from_parts(Some(PieceKind::Pawn), None);
        assert!(is_capture(colorless, PlayerRole::White));
    }

    #[test]
    fn test_parse_long_algebraic() {
        let mv = parse_long_algebraic("e2-e4").unwrap();
        assert_eq!((mv.from, mv.to, mv.piece, mv.capture), (sq("e2"), sq("e4"), None, false));

        let mv = parse_long_algebraic("Ng1f3").unwrap();
        assert_eq!(mv.piece, Some(PieceKind::Knight));
        assert_eq!(mv.to, sq("f3"));

        let mv = parse_long_algebraic(" Pe4xd5 ").unwrap();
        assert!(mv.capture);
        assert_eq!(mv.piece, Some(PieceKind::Pawn));

        // lowercase b is a column, not a bishop
        let mv = parse_long_algebraic("b2b3").unwrap();
        assert_eq!((mv.piece, mv.from), (None, sq("b2")));
    }

    #[test]
    fn test_parse_long_algebraic_rejects_garbage() {
        for bad in ["", "e4", "e2-e9", "Xe2-e4", "e2--e4", "castle"] {
            assert!(
                matches!(parse_long_algebraic(bad), Err(RuleError::InvalidFormat(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }
}

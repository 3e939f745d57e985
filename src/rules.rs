//! Move execution: placement, capture resolution, and legality.
//!
//! [`apply_move`] never touches the position it is given. It works on a copy
//! and hands back either the new position with everything the move removed,
//! or the reason the move is illegal. Ko is the simple kind: a move may not
//! recreate the position that stood before the previous move.

use serde::Serialize;
use thiserror::Error;

use crate::board::{Color, Position, PositionHash};
use crate::coord::{Point, decode};

/// Why a move was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum MoveError {
    #[error("Illegal move: coordinate is off the board")]
    OffBoard,
    #[error("Illegal move: point is already occupied")]
    Occupied,
    #[error("Illegal move: suicide")]
    Suicide,
    #[error("Illegal move: retakes ko")]
    KoViolation,
}

/// The result of a legal move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: Position,
    /// Number of opponent stones removed.
    pub captured: usize,
    pub removed: Vec<Point>,
    /// `None` for a pass.
    pub played: Option<Point>,
}

/// Play `color` at `coord` on a copy of `pos`.
///
/// An empty `coord` is a pass. `hash_before_last_move`, when given, is the
/// position from before the previous move; a result equal to it retakes ko.
///
/// # Errors
/// - [`MoveError::OffBoard`] - `coord` does not decode on this board
/// - [`MoveError::Occupied`] - the point already holds a stone
/// - [`MoveError::Suicide`] - the new stone's group has no liberties after captures
/// - [`MoveError::KoViolation`] - the result repeats `hash_before_last_move`
pub fn apply_move(
    pos: &Position,
    color: Color,
    coord: &str,
    hash_before_last_move: Option<&PositionHash>,
) -> Result<MoveOutcome, MoveError> {
    if coord.is_empty() {
        return Ok(MoveOutcome {
            position: pos.clone(),
            captured: 0,
            removed: Vec::new(),
            played: None,
        });
    }

    let pt = decode(coord, pos.size).ok_or(MoveError::OffBoard)?;
    if !pos.is_empty_at(pt) {
        return Err(MoveError::Occupied);
    }

    let mut next = pos.clone();
    next.set(pt, color);

    let opp = color.opponent();
    let mut removed: Vec<Point> = Vec::new();
    for n in pt.neighbors(next.size) {
        // Already-captured neighbors read as empty here and are skipped.
        if next.get(n) != Some(opp) {
            continue;
        }
        let group = next.collect_group(n);
        if next.count_liberties(&group) == 0 {
            for r in group {
                next.remove(r);
                removed.push(r);
            }
        }
    }

    let own = next.collect_group(pt);
    if next.count_liberties(&own) == 0 {
        return Err(MoveError::Suicide);
    }

    if hash_before_last_move.is_some_and(|h| *h == next.hash()) {
        return Err(MoveError::KoViolation);
    }

    Ok(MoveOutcome {
        position: next,
        captured: removed.len(),
        removed,
        played: Some(pt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::encode;

    fn place(pos: &mut Position, color: Color, coords: &[&str]) {
        for c in coords {
            let pt = decode(c, pos.size).expect("test coordinate on board");
            pos.set(pt, color);
        }
    }

    #[test]
    fn test_pass_returns_unchanged_copy() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::Black, &["cc"]);
        let out = apply_move(&pos, Color::White, "", None).unwrap();
        assert_eq!(out.position, pos);
        assert_eq!(out.captured, 0);
        assert!(out.removed.is_empty());
        assert_eq!(out.played, None);
    }

    #[test]
    fn test_off_board() {
        let pos = Position::new(9);
        assert_eq!(apply_move(&pos, Color::Black, "jj", None), Err(MoveError::OffBoard));
        assert_eq!(apply_move(&pos, Color::Black, "a", None), Err(MoveError::OffBoard));
    }

    #[test]
    fn test_occupied_every_size() {
        for size in 1..=19 {
            let pos = Position::new(size);
            let pt = Point::new(size / 2, size / 2);
            let coord = encode(pt);
            // A lone stone on a 1x1 board has no liberties.
            if size == 1 {
                assert_eq!(apply_move(&pos, Color::Black, &coord, None), Err(MoveError::Suicide));
                let mut filled = pos.clone();
                filled.set(pt, Color::Black);
                assert_eq!(
                    apply_move(&filled, Color::White, &coord, None),
                    Err(MoveError::Occupied)
                );
                continue;
            }
            let first = apply_move(&pos, Color::Black, &coord, None).unwrap();
            assert_eq!(
                apply_move(&first.position, Color::White, &coord, None),
                Err(MoveError::Occupied)
            );
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["aa"]);
        place(&mut pos, Color::Black, &["ba"]);
        let before = pos.clone();
        let out = apply_move(&pos, Color::Black, "ab", None).unwrap();
        assert_eq!(out.captured, 1);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_capture_corner_stone() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["aa"]);
        place(&mut pos, Color::Black, &["ba"]);
        let out = apply_move(&pos, Color::Black, "ab", None).unwrap();
        assert_eq!(out.removed, vec![Point::new(0, 0)]);
        assert!(out.position.is_empty_at(Point::new(0, 0)));
        assert_eq!(out.played, Some(Point::new(0, 1)));
    }

    #[test]
    fn test_capture_two_groups_at_once() {
        // White stones at aa and ca, each cut off by black; black ba captures both.
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["aa", "ca"]);
        place(&mut pos, Color::Black, &["ab", "cb", "da"]);
        let out = apply_move(&pos, Color::Black, "ba", None).unwrap();
        assert_eq!(out.captured, 2);
        assert_eq!(out.position.stone_count(), 4);
    }

    #[test]
    fn test_capture_shared_group_counted_once() {
        // One white group touches the played point on two sides.
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["ba", "bb", "ab"]);
        place(&mut pos, Color::Black, &["ca", "cb", "bc", "ac"]);
        let out = apply_move(&pos, Color::Black, "aa", None).unwrap();
        assert_eq!(out.captured, 3);
        assert_eq!(out.removed.len(), 3);
    }

    #[test]
    fn test_suicide_without_capture() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::Black, &["ba", "ab"]);
        assert_eq!(apply_move(&pos, Color::White, "aa", None), Err(MoveError::Suicide));
    }

    #[test]
    fn test_multi_stone_suicide() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["aa"]);
        place(&mut pos, Color::Black, &["ca", "bb", "ab"]);
        // White ba joins aa; the pair has no liberties and captures nothing.
        assert_eq!(apply_move(&pos, Color::White, "ba", None), Err(MoveError::Suicide));
    }

    #[test]
    fn test_capture_beats_suicide() {
        // Filling the last liberty is legal when it captures.
        let mut pos = Position::new(9);
        place(&mut pos, Color::White, &["ba", "ab"]);
        place(&mut pos, Color::Black, &["ca", "bb", "ac"]);
        let out = apply_move(&pos, Color::Black, "aa", None).unwrap();
        assert_eq!(out.captured, 2);
    }

    #[test]
    fn test_ko_hash_rejects_repeat() {
        let mut pos = Position::new(9);
        place(&mut pos, Color::Black, &["bc", "cb", "cd"]);
        place(&mut pos, Color::White, &["cc", "db", "dd", "ec"]);
        let before = pos.hash();
        let take = apply_move(&pos, Color::Black, "dc", None).unwrap();
        assert_eq!(take.captured, 1);
        assert_eq!(
            apply_move(&take.position, Color::White, "cc", Some(&before)),
            Err(MoveError::KoViolation)
        );
        // Without a ko hash the recapture goes through.
        let retake = apply_move(&take.position, Color::White, "cc", None).unwrap();
        assert_eq!(retake.position.hash(), before);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(MoveError::Occupied.to_string(), "Illegal move: point is already occupied");
        assert_eq!(MoveError::KoViolation.to_string(), "Illegal move: retakes ko");
    }
}

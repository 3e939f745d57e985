//! Random game generation.
//!
//! Plays uniformly random legal moves from an empty board and records them as
//! a game tree. Every move is appended through
//! [`append_move_at_path`], so the generated record replays cleanly.

use crate::coord::{Point, encode};
use crate::replay::simulate_board_at_path;
use crate::rules::apply_move;
use crate::tree::{Collection, GameTreeNode, TreeError, append_move_at_path, next_color};

/// Generate a random game on an empty `size` x `size` board.
///
/// Stops after two consecutive passes or `max_moves` moves, whichever comes
/// first. The same seed in `rng` gives the same game.
pub fn random_game(
    size: usize,
    max_moves: usize,
    rng: &mut fastrand::Rng,
) -> Result<Collection, TreeError> {
    let mut collection = Collection::with_board_size(size);
    let root = collection.first_root_mut()?;
    let mut path = Vec::new();
    let mut passes = 0;

    for _ in 0..max_moves {
        if passes >= 2 {
            break;
        }
        let coord = choose_random_move(root, &path, rng).unwrap_or_default();
        passes = if coord.is_empty() { passes + 1 } else { 0 };
        path = append_move_at_path(root, &path, &coord)?;
    }
    Ok(collection)
}

/// Pick a random legal move for the side to play after `path`, or `None`
/// when every empty point is illegal.
fn choose_random_move(
    root: &GameTreeNode,
    path: &[usize],
    rng: &mut fastrand::Rng,
) -> Option<String> {
    let sim = simulate_board_at_path(root, path);
    let color = next_color(root, path);

    let mut candidates: Vec<Point> = (0..sim.size)
        .flat_map(|y| (0..sim.size).map(move |x| Point::new(x, y)))
        .filter(|&pt| sim.position.is_empty_at(pt))
        .collect();
    rng.shuffle(&mut candidates);

    candidates.into_iter().map(encode).find(|coord| {
        apply_move(&sim.position, color, coord, sim.hash_before_last_move.as_ref()).is_ok()
    })
}

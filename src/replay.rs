//! Rebuilding the board at a node of a game tree.
//!
//! Replay starts from an empty board, then for the root and every node along
//! the path applies setup stones followed by the node's move. Setup is never
//! checked for legality. Stored moves are checked, but a move that fails is
//! skipped instead of aborting replay; it is listed in
//! [`BoardSimulation::rejected`]. Replay itself does not enforce ko.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::board::{Color, Position, PositionHash};
use crate::constants::{
    DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, PROP_ADD_BLACK, PROP_ADD_EMPTY, PROP_ADD_WHITE, PROP_SIZE,
};
use crate::coord::{Point, decode, expand_point_list};
use crate::rules::{MoveError, apply_move};
use crate::tree::GameTreeNode;

/// The most recent move on the replayed path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LastMove {
    pub color: Color,
    /// Coordinate as stored; empty for a pass.
    pub coord: String,
    pub point: Option<Point>,
}

/// Captures made by each color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Captures {
    #[serde(rename = "B")]
    pub black: usize,
    #[serde(rename = "W")]
    pub white: usize,
}

impl Captures {
    pub fn by(&self, color: Color) -> usize {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn add(&mut self, color: Color, n: usize) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }
}

/// A stored move that replay could not apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedMove {
    /// Path depth of the node (0 = root).
    pub depth: usize,
    pub color: Color,
    pub coord: String,
    pub reason: MoveError,
}

/// Board state at a node, derived from the tree on every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSimulation {
    pub size: usize,
    pub position: Position,
    /// Move number of the stone on each point, for display.
    pub move_marks: BTreeMap<Point, usize>,
    pub current_hash: PositionHash,
    pub hash_before_last_move: Option<PositionHash>,
    pub move_number: usize,
    pub last_move: Option<LastMove>,
    pub captures: Captures,
    /// How many path steps were followed; less than the path length when an
    /// index did not exist.
    pub depth: usize,
    pub rejected: Vec<RejectedMove>,
}

/// Read the board size from the root's `SZ` property.
///
/// Only the leading digits count (`"19:19"` is 19). Missing or unparsable
/// sizes, and sizes outside `1..=MAX_BOARD_SIZE`, fall back to
/// [`DEFAULT_BOARD_SIZE`].
pub fn board_size(root: &GameTreeNode) -> usize {
    root.first_value(PROP_SIZE)
        .and_then(|v| {
            let v = v.trim();
            let end = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
            v[..end].parse::<usize>().ok()
        })
        .filter(|n| (1..=MAX_BOARD_SIZE).contains(n))
        .unwrap_or(DEFAULT_BOARD_SIZE)
}

struct Replay {
    position: Position,
    move_marks: BTreeMap<Point, usize>,
    hash_before_last_move: Option<PositionHash>,
    move_number: usize,
    last_move: Option<LastMove>,
    captures: Captures,
    rejected: Vec<RejectedMove>,
}

impl Replay {
    fn new(size: usize) -> Self {
        Self {
            position: Position::new(size),
            move_marks: BTreeMap::new(),
            hash_before_last_move: None,
            move_number: 0,
            last_move: None,
            captures: Captures::default(),
            rejected: Vec::new(),
        }
    }

    fn setup(&mut self, node: &GameTreeNode, ident: &str, color: Option<Color>) {
        let size = self.position.size;
        for value in node.values(ident) {
            for pt in expand_point_list(value, size) {
                // A mark describes the stone a move put there; setup replaces it.
                self.move_marks.remove(&pt);
                match color {
                    Some(c) => self.position.set(pt, c),
                    None => {
                        self.position.remove(pt);
                    }
                }
            }
        }
    }

    fn play(&mut self, depth: usize, color: Color, coord: &str) {
        let before = self.position.hash();
        let outcome = match apply_move(&self.position, color, coord, None) {
            Ok(outcome) => outcome,
            Err(reason) => {
                self.rejected.push(RejectedMove {
                    depth,
                    color,
                    coord: coord.to_string(),
                    reason,
                });
                return;
            }
        };

        self.position = outcome.position;
        self.hash_before_last_move = Some(before);
        self.captures.add(color, outcome.captured);
        self.move_number += 1;
        for r in &outcome.removed {
            self.move_marks.remove(r);
        }
        if let Some(pt) = outcome.played {
            self.move_marks.insert(pt, self.move_number);
        }
        self.last_move = Some(LastMove {
            color,
            coord: coord.to_string(),
            point: decode(coord, self.position.size),
        });
    }

    fn process(&mut self, depth: usize, node: &GameTreeNode) {
        self.setup(node, PROP_ADD_BLACK, Some(Color::Black));
        self.setup(node, PROP_ADD_WHITE, Some(Color::White));
        self.setup(node, PROP_ADD_EMPTY, None);
        if let Some((color, coord)) = node.move_played() {
            self.play(depth, color, coord);
        }
    }

    fn finish(self, depth: usize) -> BoardSimulation {
        BoardSimulation {
            size: self.position.size,
            current_hash: self.position.hash(),
            position: self.position,
            move_marks: self.move_marks,
            hash_before_last_move: self.hash_before_last_move,
            move_number: self.move_number,
            last_move: self.last_move,
            captures: self.captures,
            depth,
            rejected: self.rejected,
        }
    }
}

/// Replay the tree from `root` along `path`.
///
/// Never fails: an index with no matching child ends the walk at the last
/// valid node, and stored moves that are illegal are skipped.
pub fn simulate_board_at_path(root: &GameTreeNode, path: &[usize]) -> BoardSimulation {
    let mut replay = Replay::new(board_size(root));
    replay.process(0, root);

    let mut node = root;
    let mut depth = 0;
    for &index in path {
        let Some(next) = node.children.get(index) else {
            break;
        };
        depth += 1;
        replay.process(depth, next);
        node = next;
    }
    replay.finish(depth)
}

/// Check whether `color` may play `coord` after the node at `path`.
///
/// Ko is checked against the position that stood before the path's last move.
pub fn validate_move_at_path(
    root: &GameTreeNode,
    path: &[usize],
    color: Color,
    coord: &str,
) -> Result<(), MoveError> {
    let sim = simulate_board_at_path(root, path);
    apply_move(&sim.position, color, coord, sim.hash_before_last_move.as_ref()).map(|_| ())
}

impl fmt::Display for BoardSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)?;
        write!(f, "move {}", self.move_number)?;
        if let Some(last) = &self.last_move {
            match last.point {
                Some(pt) => write!(f, ", last {} {pt}", last.color)?,
                None => write!(f, ", last {} pass", last.color)?,
            }
        }
        write!(f, ", captures")?;
        for color in [Color::Black, Color::White] {
            write!(f, " {color} {}", self.captures.by(color))?;
        }
        writeln!(f)
    }
}

//! Stone arrangements, connected groups, liberties, and position hashing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::HASH_DELIMITER;
use crate::coord::{Point, encode};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The move property identifier for this color (`"B"` or `"W"`).
    pub fn ident(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }

    pub fn from_ident(s: &str) -> Option<Color> {
        match s {
            "B" | "b" => Some(Color::Black),
            "W" | "w" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident())
    }
}

/// Canonical fingerprint of a stone arrangement, e.g. `"dd:B|ed:W"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionHash(String);

impl PositionHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stones on a square board. Points not in the map are empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub size: usize,
    stones: BTreeMap<Point, Color>,
}

impl Position {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            stones: BTreeMap::new(),
        }
    }

    pub fn get(&self, pt: Point) -> Option<Color> {
        self.stones.get(&pt).copied()
    }

    pub fn is_empty_at(&self, pt: Point) -> bool {
        !self.stones.contains_key(&pt)
    }

    /// Put a stone down, replacing whatever was there. No legality checks.
    pub fn set(&mut self, pt: Point, color: Color) {
        self.stones.insert(pt, color);
    }

    /// Clear a point, returning the stone that was on it.
    pub fn remove(&mut self, pt: Point) -> Option<Color> {
        self.stones.remove(&pt)
    }

    pub fn stone_count(&self) -> usize {
        self.stones.len()
    }

    /// Occupied points in coordinate order.
    pub fn stones(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        self.stones.iter().map(|(&pt, &c)| (pt, c))
    }

    /// Collect the group containing `start`.
    ///
    /// Uses flood-fill over same-colored orthogonal neighbors. Returns an
    /// empty set when `start` is empty.
    pub fn collect_group(&self, start: Point) -> BTreeSet<Point> {
        let mut visited = BTreeSet::new();
        let Some(color) = self.get(start) else {
            return visited;
        };
        let mut stack = vec![start];
        while let Some(pt) = stack.pop() {
            if !visited.insert(pt) {
                continue;
            }
            for n in pt.neighbors(self.size) {
                if !visited.contains(&n) && self.get(n) == Some(color) {
                    stack.push(n);
                }
            }
        }
        visited
    }

    /// Count the distinct empty points adjacent to any stone of `group`.
    pub fn count_liberties(&self, group: &BTreeSet<Point>) -> usize {
        let mut liberties = BTreeSet::new();
        for &pt in group {
            for n in pt.neighbors(self.size) {
                if self.is_empty_at(n) {
                    liberties.insert(n);
                }
            }
        }
        liberties.len()
    }

    /// Canonical hash of the stone arrangement.
    ///
    /// Entries are `key:color` sorted by encoded key. The map is already
    /// ordered by point, which matches encoded-key order, so equal
    /// arrangements hash equally no matter how they were built.
    pub fn hash(&self) -> PositionHash {
        let mut out = String::with_capacity(self.stones.len() * 5);
        for (i, (pt, color)) in self.stones().enumerate() {
            if i > 0 {
                out.push(HASH_DELIMITER);
            }
            out.push_str(&encode(pt));
            out.push(':');
            out.push_str(color.ident());
        }
        PositionHash(out)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get(Point::new(x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

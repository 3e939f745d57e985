//! Conversion between board points and two-letter record coordinates.
//!
//! Columns and rows are both written as lowercase letters starting at `a`,
//! column first: the point `(3, 15)` is `"dp"`. An empty coordinate string is
//! a pass and is handled by the callers, not here.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::constants::{COORD_BASE, POINT_LIST_SEPARATOR};

/// A board intersection, `x` is the column and `y` the row, both zero-based.
///
/// Points order by column then row, which is also the order of their encoded
/// coordinate strings. They serialize as that string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbors that lie on a board of the given size.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Point> {
        let Point { x, y } = self;
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push(Point::new(x - 1, y));
        }
        if x + 1 < size {
            v.push(Point::new(x + 1, y));
        }
        if y > 0 {
            v.push(Point::new(x, y - 1));
        }
        if y + 1 < size {
            v.push(Point::new(x, y + 1));
        }
        v.into_iter()
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(*self))
    }
}

fn letter(v: usize) -> char {
    u32::try_from(v)
        .ok()
        .and_then(|v| char::from_u32(COORD_BASE as u32 + v))
        .unwrap_or('?')
}

/// Encode a point as a two-letter coordinate. No bounds check.
pub fn encode(pt: Point) -> String {
    let mut s = String::with_capacity(2);
    s.push(letter(pt.x));
    s.push(letter(pt.y));
    s
}

/// Decode a two-letter coordinate, returning `None` when it is malformed or
/// off a board of the given size.
pub fn decode(text: &str, size: usize) -> Option<Point> {
    let mut chars = text.chars();
    let (cx, cy) = match (chars.next(), chars.next(), chars.next()) {
        (Some(cx), Some(cy), None) => (cx, cy),
        _ => return None,
    };
    let axis = |c: char| {
        let v = (c as u32).checked_sub(COORD_BASE as u32)? as usize;
        (v < size).then_some(v)
    };
    Some(Point::new(axis(cx)?, axis(cy)?))
}

/// Expand a setup value into points.
///
/// Accepts a single coordinate or a compressed rectangle such as `"aa:cc"`
/// (corners in any order). Anything that does not decode yields no points.
pub fn expand_point_list(text: &str, size: usize) -> Vec<Point> {
    let Some((from, to)) = text.split_once(POINT_LIST_SEPARATOR) else {
        return decode(text, size).into_iter().collect();
    };
    let (Some(a), Some(b)) = (decode(from, size), decode(to, size)) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for x in a.x.min(b.x)..=a.x.max(b.x) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            out.push(Point::new(x, y));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_corners() {
        assert_eq!(encode(Point::new(0, 0)), "aa");
        assert_eq!(encode(Point::new(18, 18)), "ss");
        assert_eq!(encode(Point::new(3, 15)), "dp");
    }

    #[test]
    fn test_decode_roundtrip_all_sizes() {
        for size in 1..=19 {
            for x in 0..size {
                for y in 0..size {
                    let pt = Point::new(x, y);
                    assert_eq!(decode(&encode(pt), size), Some(pt), "size {size}");
                }
            }
        }
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode("", 19), None);
        assert_eq!(decode("a", 19), None);
        assert_eq!(decode("abc", 19), None);
        assert_eq!(decode("tt", 19), None);
        assert_eq!(decode("jj", 9), None);
        assert_eq!(decode("ii", 9), Some(Point::new(8, 8)));
        // Uppercase sits below 'a' and must not wrap around.
        assert_eq!(decode("AA", 19), None);
    }

    #[test]
    fn test_neighbors_at_edges() {
        assert_eq!(Point::new(0, 0).neighbors(9).count(), 2);
        assert_eq!(Point::new(4, 0).neighbors(9).count(), 3);
        assert_eq!(Point::new(4, 4).neighbors(9).count(), 4);
        assert_eq!(Point::new(0, 0).neighbors(1).count(), 0);
    }

    #[test]
    fn test_expand_point_list() {
        assert_eq!(expand_point_list("bb", 9), vec![Point::new(1, 1)]);
        let rect = expand_point_list("cb:ba", 9);
        assert_eq!(rect.len(), 4);
        assert!(rect.contains(&Point::new(1, 0)));
        assert!(rect.contains(&Point::new(2, 1)));
        assert!(expand_point_list("aa:zz", 9).is_empty());
        assert!(expand_point_list("zz", 9).is_empty());
    }
}

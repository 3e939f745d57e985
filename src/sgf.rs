//! Reading and writing game records in SGF.
//!
//! The reader accepts the subset of SGF this crate works with: collections of
//! game trees made of `;`-prefixed nodes whose properties are uppercase
//! identifiers followed by one or more bracketed values. Inside a value a
//! backslash escapes the next character. A sequence `;a;b;c` becomes a chain
//! of single children and each parenthesized variation after it becomes an
//! additional child of the last node in the chain.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::constants::{
    APPLICATION_NAME, MAX_VARIATION_DEPTH, NODE_ALLOWED, PROP_APPLICATION, ROOT_EXTRA_ALLOWED,
    ROOT_GAME_INFO,
};
use crate::tree::{Collection, Game, GameTreeNode, Property};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    Eof,
    #[error("expected '{expected}' at byte {at}")]
    Expected { expected: char, at: usize },
    #[error("expected property identifier at byte {at}")]
    ExpectedIdent { at: usize },
    #[error("property '{ident}' at byte {at} has no values")]
    NoValues { ident: String, at: usize },
    #[error("game tree at byte {at} has no nodes")]
    EmptySequence { at: usize },
    #[error("no game trees found")]
    NoGames,
    #[error("variations nested deeper than {MAX_VARIATION_DEPTH} at byte {at}")]
    TooDeep { at: usize },
}

struct Reader<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((at, _)) => Err(ParseError::Expected { expected, at }),
            None => Err(ParseError::Eof),
        }
    }

    /// `( sequence variation* )`, where `depth` counts the enclosing trees.
    fn game_tree(&mut self, depth: usize) -> Result<GameTreeNode, ParseError> {
        self.skip_ws();
        let at = self.offset();
        if depth >= MAX_VARIATION_DEPTH {
            return Err(ParseError::TooDeep { at });
        }
        self.expect('(')?;
        self.skip_ws();

        let mut chain = Vec::new();
        while self.peek() == Some(';') {
            chain.push(self.node()?);
            self.skip_ws();
        }
        if chain.is_empty() {
            return Err(ParseError::EmptySequence { at });
        }

        let mut variations = Vec::new();
        while self.peek() == Some('(') {
            variations.push(self.game_tree(depth + 1)?);
            self.skip_ws();
        }
        self.expect(')')?;

        // Fold the chain from the bottom up so each node owns the rest.
        let mut tail = chain.pop().ok_or(ParseError::EmptySequence { at })?;
        tail.children.extend(variations);
        while let Some(mut parent) = chain.pop() {
            parent.children.push(tail);
            tail = parent;
        }
        Ok(tail)
    }

    fn node(&mut self) -> Result<GameTreeNode, ParseError> {
        self.expect(';')?;
        let mut node = GameTreeNode::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None | Some(';' | '(' | ')') => return Ok(node),
                Some(_) => node.properties.push(self.property()?),
            }
        }
    }

    fn property(&mut self) -> Result<Property, ParseError> {
        let at = self.offset();
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_uppercase()) {
            ident.push(c);
        }
        if ident.is_empty() {
            return Err(ParseError::ExpectedIdent { at });
        }

        let mut values = Vec::new();
        self.skip_ws();
        while self.peek() == Some('[') {
            values.push(self.value()?);
            self.skip_ws();
        }
        if values.is_empty() {
            return Err(ParseError::NoValues { ident, at });
        }
        Ok(Property { ident, values })
    }

    fn value(&mut self) -> Result<String, ParseError> {
        self.expect('[')?;
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                ']' => return Ok(out),
                '\\' => out.push(self.chars.next().ok_or(ParseError::Eof)?.1),
                _ => out.push(c),
            }
        }
        Err(ParseError::Eof)
    }
}

/// Parse every game tree in `input`.
pub fn parse_collection(input: &str) -> Result<Collection, ParseError> {
    let mut reader = Reader::new(input);
    let mut games = Vec::new();
    reader.skip_ws();
    while reader.peek().is_some() {
        games.push(Game {
            root: reader.game_tree(0)?,
        });
        reader.skip_ws();
    }
    if games.is_empty() {
        return Err(ParseError::NoGames);
    }
    Ok(Collection { games })
}

/// Write a collection back out as SGF text.
pub fn serialize_collection(collection: &Collection) -> String {
    let mut out = String::new();
    for game in &collection.games {
        out.push('(');
        write_sequence(&game.root, &mut out);
        out.push(')');
    }
    out
}

fn write_sequence(node: &GameTreeNode, out: &mut String) {
    let mut node = node;
    loop {
        out.push(';');
        for prop in &node.properties {
            out.push_str(&prop.ident);
            for value in &prop.values {
                out.push('[');
                escape_into(value, out);
                out.push(']');
            }
        }
        match node.children.as_slice() {
            [] => return,
            [only] => node = only,
            variations => {
                for v in variations {
                    out.push('(');
                    write_sequence(v, out);
                    out.push(')');
                }
                return;
            }
        }
    }
}

fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        if c == '\\' || c == ']' {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Copy of `collection` holding only the properties this crate persists.
///
/// The root keeps game info, setup and comments, and gets a fresh `AP`
/// property naming this tool. Other nodes keep moves, setup and comments.
pub fn normalize_for_save(collection: &Collection) -> Collection {
    Collection {
        games: collection
            .games
            .iter()
            .map(|g| Game {
                root: normalize_node(&g.root, true),
            })
            .collect(),
    }
}

fn normalize_node(node: &GameTreeNode, is_root: bool) -> GameTreeNode {
    let allowed = |ident: &str| {
        if is_root {
            ROOT_GAME_INFO.contains(&ident) || ROOT_EXTRA_ALLOWED.contains(&ident)
        } else {
            NODE_ALLOWED.contains(&ident)
        }
    };
    let mut properties: Vec<Property> = node
        .properties
        .iter()
        .filter(|p| allowed(&p.ident))
        .cloned()
        .collect();
    if is_root {
        properties.push(Property::new(PROP_APPLICATION, APPLICATION_NAME));
    }
    GameTreeNode {
        properties,
        children: node.children.iter().map(|c| normalize_node(c, false)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_game() {
        let c = parse_collection("(;GM[1]FF[4]SZ[19];B[pd];W[dd])").unwrap();
        assert_eq!(c.games.len(), 1);
        let root = &c.games[0].root;
        assert_eq!(root.properties[0].ident, "GM");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children[0].first_value("W"), Some("dd"));
    }

    #[test]
    fn test_parse_variations() {
        let c = parse_collection("(;B[pd](;W[dd])(;W[qp];B[oq]))").unwrap();
        let root = &c.games[0].root;
        assert_eq!(root.first_value("B"), Some("pd"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].children.len(), 1);
    }

    #[test]
    fn test_parse_multiple_values_and_whitespace() {
        let c = parse_collection(" ( ;SZ [9]\n AB[aa] [bb]\t;W[] ) ").unwrap();
        let root = &c.games[0].root;
        assert_eq!(root.values("AB").len(), 2);
        assert_eq!(root.children[0].first_value("W"), Some(""));
    }

    #[test]
    fn test_escapes() {
        let c = parse_collection(r"(;C[a \] b \\ c])").unwrap();
        assert_eq!(c.games[0].root.first_value("C"), Some(r"a ] b \ c"));
        let text = serialize_collection(&c);
        assert_eq!(text, r"(;C[a \] b \\ c])");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_collection(""), Err(ParseError::NoGames));
        assert_eq!(parse_collection("(;B[aa]"), Err(ParseError::Eof));
        assert_eq!(parse_collection("()"), Err(ParseError::EmptySequence { at: 0 }));
        assert_eq!(
            parse_collection("(;b[aa])"),
            Err(ParseError::ExpectedIdent { at: 2 })
        );
        assert_eq!(
            parse_collection("(;B)"),
            Err(ParseError::NoValues {
                ident: "B".to_string(),
                at: 2
            })
        );
        assert_eq!(
            parse_collection("x"),
            Err(ParseError::Expected {
                expected: '(',
                at: 0
            })
        );
        assert_eq!(parse_collection("(;C[unterminated"), Err(ParseError::Eof));
    }

    fn nested(levels: usize) -> String {
        "(;B[aa]".repeat(levels) + &")".repeat(levels)
    }

    #[test]
    fn test_variation_depth_limit() {
        let c = parse_collection(&nested(MAX_VARIATION_DEPTH)).unwrap();
        assert_eq!(c.games.len(), 1);
        assert_eq!(
            parse_collection(&nested(MAX_VARIATION_DEPTH + 1)),
            Err(ParseError::TooDeep {
                at: MAX_VARIATION_DEPTH * "(;B[aa]".len()
            })
        );
        // Far past the limit the reader still stops with an error.
        assert!(matches!(
            parse_collection(&"(;B[aa]".repeat(100_000)),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_roundtrip() {
        let src = "(;GM[1]FF[4]SZ[19];B[pd](;W[dd];B[pp])(;W[qp]))(;SZ[9]AB[aa:bb])";
        let first = parse_collection(src).unwrap();
        let text = serialize_collection(&first);
        assert_eq!(text, src);
        assert_eq!(parse_collection(&text).unwrap(), first);
    }

    #[test]
    fn test_normalize_for_save() {
        let src = "(;SZ[9]AP[Other]PB[x]XX[1];B[aa]TR[bb]C[hi];PB[y]W[bb])";
        let c = parse_collection(src).unwrap();
        let n = normalize_for_save(&c);
        let root = &n.games[0].root;
        let idents: Vec<&str> = root.properties.iter().map(|p| p.ident.as_str()).collect();
        assert_eq!(idents, ["SZ", "PB", "AP"]);
        assert_eq!(root.first_value("AP"), Some(APPLICATION_NAME));
        let child = &root.children[0];
        assert!(!child.has_property("TR"));
        assert_eq!(child.first_value("C"), Some("hi"));
        assert!(!child.children[0].has_property("PB"));
        // The source is left as it was.
        assert!(c.games[0].root.has_property("XX"));
    }
}

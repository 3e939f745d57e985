//! Game records as trees of property-carrying nodes.
//!
//! A node holds an ordered list of properties and an ordered list of child
//! nodes; several children mean a variation. Nodes are addressed by a path of
//! child indices from the root. The editing helpers here are the only code in
//! the crate that mutates a tree, and every new move goes through
//! [`validate_move_at_path`] first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Color;
use crate::constants::{
    DEFAULT_BOARD_SIZE, PROP_BLACK, PROP_COMMENT, PROP_SIZE, PROP_WHITE, ROOT_GAME_INFO,
};
use crate::replay::validate_move_at_path;
use crate::rules::MoveError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub ident: String,
    pub values: Vec<String>,
}

impl Property {
    pub fn new(ident: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTreeNode {
    pub properties: Vec<Property>,
    pub children: Vec<GameTreeNode>,
}

/// One game: a root node and everything under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub root: GameTreeNode,
}

/// All games stored in one record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node not found: no child {index} at depth {depth}")]
    PathNotFound { depth: usize, index: usize },
    #[error(transparent)]
    IllegalMove(#[from] MoveError),
    #[error("'{0}' is not a game-info property")]
    NotGameInfo(String),
    #[error("collection contains no games")]
    EmptyCollection,
}

impl GameTreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node carrying a single move.
    pub fn with_move(color: Color, coord: &str) -> Self {
        Self {
            properties: vec![Property::new(color.ident(), coord)],
            children: Vec::new(),
        }
    }

    fn property(&self, ident: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.ident == ident)
    }

    /// Values of the first property named `ident`, empty if absent.
    pub fn values(&self, ident: &str) -> &[String] {
        self.property(ident).map(|p| p.values.as_slice()).unwrap_or(&[])
    }

    pub fn first_value(&self, ident: &str) -> Option<&str> {
        self.values(ident).first().map(String::as_str)
    }

    pub fn has_property(&self, ident: &str) -> bool {
        self.property(ident).is_some()
    }

    /// The move this node plays, if any. Black wins if both are present.
    pub fn move_played(&self) -> Option<(Color, &str)> {
        if let Some(c) = self.first_value(PROP_BLACK) {
            return Some((Color::Black, c));
        }
        self.first_value(PROP_WHITE).map(|c| (Color::White, c))
    }

    /// Replace a property with a single value; an empty value removes it.
    pub fn set_single_property(&mut self, ident: &str, value: &str) {
        if value.is_empty() {
            self.properties.retain(|p| p.ident != ident);
            return;
        }
        match self.properties.iter_mut().find(|p| p.ident == ident) {
            Some(p) => p.values = vec![value.to_string()],
            None => self.properties.push(Property::new(ident, value)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

impl Collection {
    /// A single empty game on a standard board.
    pub fn new_empty() -> Self {
        Self::with_board_size(DEFAULT_BOARD_SIZE)
    }

    pub fn with_board_size(size: usize) -> Self {
        let root = GameTreeNode {
            properties: vec![
                Property::new("FF", "4"),
                Property::new("GM", "1"),
                Property::new(PROP_SIZE, size.to_string()),
            ],
            children: Vec::new(),
        };
        Self {
            games: vec![Game { root }],
        }
    }

    pub fn first_root(&self) -> Result<&GameTreeNode, TreeError> {
        self.games.first().map(|g| &g.root).ok_or(TreeError::EmptyCollection)
    }

    pub fn first_root_mut(&mut self) -> Result<&mut GameTreeNode, TreeError> {
        self.games
            .first_mut()
            .map(|g| &mut g.root)
            .ok_or(TreeError::EmptyCollection)
    }
}

/// Follow `path` from `root`.
pub fn node_at_path<'a>(
    root: &'a GameTreeNode,
    path: &[usize],
) -> Result<&'a GameTreeNode, TreeError> {
    let mut node = root;
    for (depth, &index) in path.iter().enumerate() {
        node = node
            .children
            .get(index)
            .ok_or(TreeError::PathNotFound { depth, index })?;
    }
    Ok(node)
}

pub fn node_at_path_mut<'a>(
    root: &'a mut GameTreeNode,
    path: &[usize],
) -> Result<&'a mut GameTreeNode, TreeError> {
    let mut node = root;
    for (depth, &index) in path.iter().enumerate() {
        node = node
            .children
            .get_mut(index)
            .ok_or(TreeError::PathNotFound { depth, index })?;
    }
    Ok(node)
}

/// Nodes from the root along `path`, stopping at the first bad index.
pub fn nodes_along<'a>(root: &'a GameTreeNode, path: &[usize]) -> Vec<&'a GameTreeNode> {
    let mut nodes = vec![root];
    let mut node = root;
    for &index in path {
        let Some(next) = node.children.get(index) else {
            break;
        };
        nodes.push(next);
        node = next;
    }
    nodes
}

/// Color of the nearest move at or above the node at `path`.
pub fn last_move_color(root: &GameTreeNode, path: &[usize]) -> Option<Color> {
    nodes_along(root, path)
        .into_iter()
        .rev()
        .find_map(|n| n.move_played().map(|(color, _)| color))
}

/// The color to play after the node at `path`. Black starts.
pub fn next_color(root: &GameTreeNode, path: &[usize]) -> Color {
    last_move_color(root, path).map_or(Color::Black, Color::opponent)
}

/// Path that always follows the first child down to a leaf.
pub fn main_line_path(root: &GameTreeNode) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = root;
    while let Some(first) = node.children.first() {
        path.push(0);
        node = first;
    }
    path
}

/// Append the next move below the node at `path` and return the new node's path.
///
/// The color alternates from the last move on the path. The tree is left
/// untouched when the node is missing or the move is illegal.
pub fn append_move_at_path(
    root: &mut GameTreeNode,
    path: &[usize],
    coord: &str,
) -> Result<Vec<usize>, TreeError> {
    node_at_path(root, path)?;
    let color = next_color(root, path);
    validate_move_at_path(root, path, color, coord)?;

    let node = node_at_path_mut(root, path)?;
    node.children.push(GameTreeNode::with_move(color, coord));
    let mut child_path = path.to_vec();
    child_path.push(node.children.len() - 1);
    Ok(child_path)
}

/// Set or clear (empty text) the comment on the node at `path`.
pub fn set_comment(root: &mut GameTreeNode, path: &[usize], text: &str) -> Result<(), TreeError> {
    node_at_path_mut(root, path)?.set_single_property(PROP_COMMENT, text);
    Ok(())
}

/// Set or clear (empty value) a game-info property on the root.
pub fn set_root_game_info(
    root: &mut GameTreeNode,
    ident: &str,
    value: &str,
) -> Result<(), TreeError> {
    if !ROOT_GAME_INFO.contains(&ident) {
        return Err(TreeError::NotGameInfo(ident.to_string()));
    }
    root.set_single_property(ident, value);
    Ok(())
}

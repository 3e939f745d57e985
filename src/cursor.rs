//! Navigation over a game tree.
//!
//! A [`Cursor`] is just a path. Every movement returns `true` when the path
//! changed and `false` when the move was not possible (already at the root,
//! at a leaf, or asked for a variation that does not exist).

use crate::tree::{GameTreeNode, main_line_path, node_at_path};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    path: Vec<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Jump to an arbitrary path. It is not checked until [`Cursor::repair`].
    pub fn set_path(&mut self, path: Vec<usize>) {
        self.path = path;
    }

    pub fn go_to_start(&mut self) -> bool {
        let moved = !self.path.is_empty();
        self.path.clear();
        moved
    }

    pub fn go_prev(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn has_next(&self, root: &GameTreeNode) -> bool {
        node_at_path(root, &self.path).is_ok_and(|n| !n.is_terminal())
    }

    /// Step into the first child.
    pub fn go_next(&mut self, root: &GameTreeNode) -> bool {
        self.switch_variation(root, 0)
    }

    /// Step into child `index` of the current node.
    pub fn switch_variation(&mut self, root: &GameTreeNode, index: usize) -> bool {
        let exists = node_at_path(root, &self.path).is_ok_and(|n| index < n.children.len());
        if exists {
            self.path.push(index);
        }
        exists
    }

    /// Jump to the end of the main line from the root.
    pub fn go_to_end(&mut self, root: &GameTreeNode) -> bool {
        let end = main_line_path(root);
        let moved = end != self.path;
        self.path = end;
        moved
    }

    /// Reset to the root if the path no longer resolves in `root`.
    pub fn repair(&mut self, root: &GameTreeNode) -> bool {
        if node_at_path(root, &self.path).is_ok() {
            return false;
        }
        self.path.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    fn sample() -> GameTreeNode {
        let mut root = GameTreeNode::new();
        let mut b = GameTreeNode::with_move(Color::Black, "dd");
        b.children.push(GameTreeNode::with_move(Color::White, "ee"));
        b.children.push(GameTreeNode::with_move(Color::White, "cc"));
        root.children.push(b);
        root
    }

    #[test]
    fn test_next_and_prev() {
        let root = sample();
        let mut c = Cursor::new();
        assert!(!c.go_prev());
        assert!(c.go_next(&root));
        assert!(c.go_next(&root));
        assert_eq!(c.path(), &[0, 0]);
        assert!(!c.has_next(&root));
        assert!(!c.go_next(&root));
        assert!(c.go_prev());
        assert_eq!(c.path(), &[0]);
    }

    #[test]
    fn test_switch_variation() {
        let root = sample();
        let mut c = Cursor::new();
        c.go_next(&root);
        assert!(!c.switch_variation(&root, 2));
        assert!(c.switch_variation(&root, 1));
        assert_eq!(c.path(), &[0, 1]);
    }

    #[test]
    fn test_start_and_end() {
        let root = sample();
        let mut c = Cursor::new();
        assert!(!c.go_to_start());
        assert!(c.go_to_end(&root));
        assert_eq!(c.path(), &[0, 0]);
        assert!(!c.go_to_end(&root));
        assert!(c.go_to_start());
        assert!(c.path().is_empty());
    }

    #[test]
    fn test_repair() {
        let root = sample();
        let mut c = Cursor::new();
        c.set_path(vec![0, 1]);
        assert!(!c.repair(&root));
        c.set_path(vec![0, 4]);
        assert!(c.repair(&root));
        assert!(c.path().is_empty());
    }
}

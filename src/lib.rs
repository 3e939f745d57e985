//! kifu-rules: Go game record replay and rules checking.
//!
//! This crate rebuilds the board at any node of a branching game record and
//! decides whether a new move is legal there (occupied point, suicide, simple
//! ko). Around that core it provides SGF reading and writing, tree editing,
//! navigation, and a small command shell.
//!
//! ## Modules
//!
//! - [`constants`] - Default board size, property identifiers, tool defaults
//! - [`coord`] - Two-letter coordinates and board points
//! - [`board`] - Stone positions, groups, liberties, position hashing
//! - [`rules`] - Move execution with captures, suicide and ko
//! - [`replay`] - Board state at a path through the game tree
//! - [`tree`] - Game tree types and editing
//! - [`cursor`] - Navigation over a game tree
//! - [`sgf`] - SGF reader, writer and save normalization
//! - [`playout`] - Random game generation
//! - [`shell`] - Line-oriented command shell
//!
//! ## Example
//!
//! ```
//! use kifu_rules::board::Color;
//! use kifu_rules::replay::{simulate_board_at_path, validate_move_at_path};
//! use kifu_rules::sgf::parse_collection;
//!
//! let record = parse_collection("(;SZ[9];B[ee];W[ed])").unwrap();
//! let root = &record.games[0].root;
//!
//! let sim = simulate_board_at_path(root, &[0, 0]);
//! assert_eq!(sim.move_number, 2);
//!
//! // Black may not play on White's stone.
//! assert!(validate_move_at_path(root, &[0, 0], Color::Black, "ed").is_err());
//! ```

pub mod board;
pub mod constants;
pub mod coord;
pub mod cursor;
pub mod playout;
pub mod replay;
pub mod rules;
pub mod sgf;
pub mod shell;
pub mod tree;

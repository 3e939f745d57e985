//! Constants for board geometry, record property identifiers, and tool defaults.
//!
//! Board size is not fixed at compile time: every game record carries its own
//! `SZ` property, and [`DEFAULT_BOARD_SIZE`] is used only when that property is
//! missing or unusable.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when the root node has no usable `SZ` property.
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Largest board a two-letter lowercase coordinate can address.
pub const MAX_BOARD_SIZE: usize = 26;

/// First coordinate letter; column/row 0.
pub const COORD_BASE: char = 'a';

/// Separator between the two corners of a compressed point list (`aa:cc`).
pub const POINT_LIST_SEPARATOR: char = ':';

/// Separator between entries of a position hash.
pub const HASH_DELIMITER: char = '|';

// =============================================================================
// Record Properties
// =============================================================================

/// Board size.
pub const PROP_SIZE: &str = "SZ";

/// Setup: add black stones.
pub const PROP_ADD_BLACK: &str = "AB";

/// Setup: add white stones.
pub const PROP_ADD_WHITE: &str = "AW";

/// Setup: clear points.
pub const PROP_ADD_EMPTY: &str = "AE";

/// Black move.
pub const PROP_BLACK: &str = "B";

/// White move.
pub const PROP_WHITE: &str = "W";

/// Node comment.
pub const PROP_COMMENT: &str = "C";

/// Application that wrote the record.
pub const PROP_APPLICATION: &str = "AP";

/// Game-info identifiers that may only appear on the root node.
pub const ROOT_GAME_INFO: &[&str] = &[
    "FF", "GM", "SZ", "EV", "DT", "KM", "RE", "PB", "BR", "PW", "WR",
];

/// Identifiers kept on non-root nodes when a record is normalized for saving.
pub const NODE_ALLOWED: &[&str] = &["B", "W", "AB", "AW", "AE", "C"];

/// Identifiers kept on the root node when a record is normalized for saving,
/// in addition to [`ROOT_GAME_INFO`].
pub const ROOT_EXTRA_ALLOWED: &[&str] = &["AB", "AW", "AE", "C"];

/// Deepest nesting of `(` game trees the SGF reader accepts.
pub const MAX_VARIATION_DEPTH: usize = 500;

/// Value written into the `AP` property on save.
pub const APPLICATION_NAME: &str = "kifu-rules";

// =============================================================================
// Tool Defaults
// =============================================================================

/// Board size for generated demo games.
pub const DEMO_BOARD_SIZE: usize = 9;

/// Move cap for generated demo games.
pub const DEMO_MAX_MOVES: usize = 80;

/// Seed used by the demo when none is given on the command line.
pub const DEMO_SEED: u64 = 1;

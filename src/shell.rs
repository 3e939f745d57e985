//! Line-oriented command shell for viewing and editing a game record.
//!
//! The protocol follows the shape of GTP: each line is an optional numeric id,
//! a command, and arguments. Responses start with `=` on success or `?` on
//! failure, followed by the id (if any), the message, and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `new [size]` - Start an empty record
//! - `load <file>` / `save <file>` - Read or write SGF
//! - `show` - Board at the current node
//! - `path` - Current path as comma-separated child indices
//! - `start`, `end`, `next`, `prev`, `variation <i>` - Navigation
//! - `play <coord|pass>` - Append the next move and step into it
//! - `validate <B|W> <coord|pass>` - Check a move without playing it
//! - `comment <text...>` - Set the current node's comment (no text clears it)
//! - `info <IDENT> [value...]` - Set or clear a root game-info property
//!
//! ## Example
//!
//! ```ignore
//! use kifu_rules::shell::KifuShell;
//! let mut shell = KifuShell::new();
//! shell.run();
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};

use crate::board::Color;
use crate::constants::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
use crate::cursor::Cursor;
use crate::replay::{simulate_board_at_path, validate_move_at_path};
use crate::sgf::{normalize_for_save, parse_collection, serialize_collection};
use crate::tree::{Collection, append_move_at_path, set_comment, set_root_game_info};

/// The list of known shell commands.
const KNOWN_COMMANDS: &[&str] = &[
    "comment",
    "end",
    "info",
    "known_command",
    "list_commands",
    "load",
    "name",
    "new",
    "next",
    "path",
    "play",
    "prev",
    "quit",
    "save",
    "show",
    "start",
    "validate",
    "variation",
    "version",
];

/// Shell state: the record being edited and where we are in it.
pub struct KifuShell {
    collection: Collection,
    cursor: Cursor,
    /// Set when the record has changes not yet saved.
    dirty: bool,
}

impl Default for KifuShell {
    fn default() -> Self {
        Self::new()
    }
}

impl KifuShell {
    /// Create a shell holding an empty record on the default board.
    pub fn new() -> Self {
        Self::with_collection(Collection::new_empty())
    }

    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collection,
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn path(&self) -> &[usize] {
        self.cursor.path()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run the command loop over stdin and stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over any line source and sink.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(message) => (true, message),
            Err(e) => (false, format!("{e:#}")),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> anyhow::Result<String> {
        let root = self.collection.first_root()?;
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    bail!("missing argument");
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "new" => {
                let size = match args.first() {
                    Some(s) => s.parse::<usize>().context("invalid size")?,
                    None => DEFAULT_BOARD_SIZE,
                };
                if !(1..=MAX_BOARD_SIZE).contains(&size) {
                    bail!("unacceptable size {size}, expected 1 to {MAX_BOARD_SIZE}");
                }
                self.collection = Collection::with_board_size(size);
                self.cursor = Cursor::new();
                self.dirty = false;
                Ok(String::new())
            }

            "load" => {
                let file = args.first().context("missing file name")?;
                self.load(Path::new(file))?;
                Ok(String::new())
            }

            "save" => {
                let file = args.first().context("missing file name")?;
                self.save(Path::new(file))?;
                Ok(String::new())
            }

            "show" => Ok(format!("\n{}", simulate_board_at_path(root, self.cursor.path()))),

            "path" => Ok(format_path(self.cursor.path())),

            "start" => {
                self.cursor.go_to_start();
                Ok(String::new())
            }

            "end" => {
                self.cursor.go_to_end(root);
                Ok(format_path(self.cursor.path()))
            }

            "next" => {
                if !self.cursor.go_next(root) {
                    bail!("no next move");
                }
                Ok(format_path(self.cursor.path()))
            }

            "prev" => {
                if !self.cursor.go_prev() {
                    bail!("already at the start");
                }
                Ok(format_path(self.cursor.path()))
            }

            "variation" => {
                let index = args
                    .first()
                    .context("missing argument")?
                    .parse::<usize>()
                    .context("invalid variation index")?;
                if !self.cursor.switch_variation(root, index) {
                    bail!("no variation {index} here");
                }
                Ok(format_path(self.cursor.path()))
            }

            "play" => {
                let coord = move_arg(args.first().copied())?;
                let path = self.cursor.path().to_vec();
                let root = self.collection.first_root_mut()?;
                let new_path = append_move_at_path(root, &path, &coord)?;
                self.cursor.set_path(new_path);
                self.dirty = true;
                Ok(format_path(self.cursor.path()))
            }

            "validate" => {
                let color = args
                    .first()
                    .and_then(|c| Color::from_ident(c))
                    .context("expected color B or W")?;
                let coord = move_arg(args.get(1).copied())?;
                validate_move_at_path(root, self.cursor.path(), color, &coord)?;
                Ok("legal".to_string())
            }

            "comment" => {
                let text = args.join(" ");
                let path = self.cursor.path().to_vec();
                set_comment(self.collection.first_root_mut()?, &path, &text)?;
                self.dirty = true;
                Ok(String::new())
            }

            "info" => {
                let Some((ident, value)) = args.split_first() else {
                    bail!("missing property identifier");
                };
                let value = value.join(" ");
                set_root_game_info(self.collection.first_root_mut()?, ident, &value)?;
                self.dirty = true;
                Ok(String::new())
            }

            _ => bail!("unknown command: {command}"),
        }
    }

    /// Replace the record with the one in `file` and go back to its root.
    pub fn load(&mut self, file: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let collection = parse_collection(&text)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        collection.first_root()?;
        self.collection = collection;
        self.cursor = Cursor::new();
        self.dirty = false;
        Ok(())
    }

    /// Write the normalized record to `file`.
    pub fn save(&mut self, file: &Path) -> anyhow::Result<()> {
        let text = serialize_collection(&normalize_for_save(&self.collection));
        fs::write(file, text).with_context(|| format!("failed to write {}", file.display()))?;
        self.dirty = false;
        Ok(())
    }
}

/// A move argument: a coordinate, or `pass` for the empty coordinate.
fn move_arg(arg: Option<&str>) -> anyhow::Result<String> {
    match arg {
        None => bail!("missing move"),
        Some(a) if a.eq_ignore_ascii_case("pass") => Ok(String::new()),
        Some(a) => Ok(a.to_string()),
    }
}

/// Comma-separated child indices; empty for the root.
pub fn format_path(path: &[usize]) -> String {
    path.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

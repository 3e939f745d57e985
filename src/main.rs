//! kifu-rules: view, check, and edit Go game records.
//!
//! ## Usage
//!
//! - `kifu-rules` - Show a demo (random game)
//! - `kifu-rules shell` - Start the interactive command shell
//! - `kifu-rules replay game.sgf --path 0,0,1` - Print the board at a node
//! - `kifu-rules validate game.sgf --color W pd` - Check a move
//! - `kifu-rules demo --size 9 --seed 3` - Generate a random game

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kifu_rules::board::Color;
use kifu_rules::constants::{DEMO_BOARD_SIZE, DEMO_MAX_MOVES, DEMO_SEED, MAX_BOARD_SIZE};
use kifu_rules::playout::random_game;
use kifu_rules::replay::{simulate_board_at_path, validate_move_at_path};
use kifu_rules::sgf::{parse_collection, serialize_collection};
use kifu_rules::shell::KifuShell;
use kifu_rules::tree::{Collection, main_line_path};

/// kifu-rules: Go game record viewer and rules checker
#[derive(Parser)]
#[command(name = "kifu-rules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive command shell on stdin/stdout
    Shell {
        /// Record to load on startup
        file: Option<PathBuf>,
    },
    /// Print the board at a node of a record
    Replay {
        file: PathBuf,
        /// Child indices from the root, comma separated
        #[arg(long, value_delimiter = ',', conflicts_with = "main_line")]
        path: Vec<usize>,
        /// Follow first children to the end of the main line
        #[arg(long)]
        main_line: bool,
        /// Print the board state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a move is legal at a node of a record
    Validate {
        file: PathBuf,
        /// Coordinate such as "pd", or "pass"
        coord: String,
        /// Color to move: B or W
        #[arg(long, value_parser = parse_color)]
        color: Color,
        /// Child indices from the root, comma separated
        #[arg(long, value_delimiter = ',')]
        path: Vec<usize>,
    },
    /// Generate a random game and print it
    Demo {
        #[arg(long, default_value_t = DEMO_BOARD_SIZE, value_parser = parse_size)]
        size: usize,
        #[arg(long, default_value_t = DEMO_MAX_MOVES)]
        moves: usize,
        #[arg(long, default_value_t = DEMO_SEED)]
        seed: u64,
    },
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_ident(s).ok_or_else(|| format!("expected B or W, got '{s}'"))
}

fn parse_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if (1..=MAX_BOARD_SIZE).contains(&n) => Ok(n),
        _ => Err(format!("expected a board size from 1 to {MAX_BOARD_SIZE}, got '{s}'")),
    }
}

fn load(file: &Path) -> Result<Collection> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    parse_collection(&text).with_context(|| format!("failed to parse {}", file.display()))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Shell { file }) => {
            let mut shell = KifuShell::new();
            if let Some(file) = file {
                shell.load(&file)?;
            }
            shell.run()?;
        }
        Some(Commands::Replay {
            file,
            path,
            main_line,
            json,
        }) => {
            let collection = load(&file)?;
            let root = collection.first_root()?;
            let path = if main_line { main_line_path(root) } else { path };
            let sim = simulate_board_at_path(root, &path);
            if json {
                println!("{}", serde_json::to_string_pretty(&sim)?);
            } else {
                print!("{sim}");
                if sim.depth < path.len() {
                    eprintln!("path ends after {} of {} steps", sim.depth, path.len());
                }
                for r in &sim.rejected {
                    eprintln!("skipped {} {} at depth {}: {}", r.color, r.coord, r.depth, r.reason);
                }
            }
        }
        Some(Commands::Validate {
            file,
            coord,
            color,
            path,
        }) => {
            let collection = load(&file)?;
            let coord = if coord.eq_ignore_ascii_case("pass") { String::new() } else { coord };
            match validate_move_at_path(collection.first_root()?, &path, color, &coord) {
                Ok(()) => println!("legal"),
                Err(e) => {
                    println!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Demo { size, moves, seed }) => run_demo(size, moves, seed)?,
        None => run_demo(DEMO_BOARD_SIZE, DEMO_MAX_MOVES, DEMO_SEED)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn run_demo(size: usize, moves: usize, seed: u64) -> Result<()> {
    println!("kifu-rules: random game on {size}x{size} (seed {seed})\n");
    let mut rng = fastrand::Rng::with_seed(seed);
    let collection = random_game(size, moves, &mut rng)?;
    println!("{}\n", serialize_collection(&collection));

    let root = collection.first_root()?;
    print!("{}", simulate_board_at_path(root, &main_line_path(root)));
    Ok(())
}

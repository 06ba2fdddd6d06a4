use clap::{Parser, ValueEnum};
use mailbox::{Color, SQUARES_PER_LINE};

/// Largest possible score ever achievable: the opponent has been mated.
pub const MAX_EVAL: i32 = i32::MAX;

/// Smallest possible score: the side being evaluated has been mated.
///
/// Kept symmetric with [`MAX_EVAL`] so that scores can always be negated.
pub const MIN_EVAL: i32 = -MAX_EVAL;

/// Multiplier turning a piece's value in pawns into evaluation units.
pub const MATERIAL_SCALE: i32 = 100;

/// Bonus for every square one of the evaluated side's pieces attacks.
pub const MOBILITY_BONUS: i32 = 5;

/// Default number of plies the engine looks ahead.
pub const DEFAULT_DEPTH: usize = 1;

/// Width and height of the (square) board window, in pixels.
pub const WINDOW_SIZE: i32 = 600;

/// Width and height of a single square on the board, in pixels.
pub const SQUARE_SIZE: i32 = WINDOW_SIZE / SQUARES_PER_LINE;

/// Play chess against a fixed-depth engine from the terminal.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Which side you play. Your pieces start at the bottom of the board.
    #[arg(short, long, value_enum, default_value_t = Side::White)]
    pub player: Side,

    /// How many plies the engine looks ahead.
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Start from this FEN string instead of the standard starting position.
    #[arg(short, long)]
    pub fen: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: Side::White,
            depth: DEFAULT_DEPTH,
            fen: None,
        }
    }
}

/// The side the human plays, as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

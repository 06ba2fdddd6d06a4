pub use types::*;

/// The 8x8 grid of squares that holds every piece on the board.
pub mod matrix;
/// All code related to generating moves for pieces on a board, and checking their legality.
pub mod movegen;
/// Enums and structs for modeling the movement of a piece on a chessboard.
pub mod moves;
/// Utility functions for performance testing and validating move generation.
pub mod perft;
/// A chessboard, complete with piece placements, orientation, and en passant state.
///
/// You probably want to look here.
pub mod position;
/// Saving and restoring the parts of a position that a move changes.
pub mod snapshot;

pub use matrix::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use position::*;
pub use snapshot::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::matrix::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::position::*;
    pub use crate::snapshot::*;
    pub use types::prelude::*;
}

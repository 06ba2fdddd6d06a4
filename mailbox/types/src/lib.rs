/// Row/column addresses on the board, and the arithmetic used to step between them.
pub mod coordinates;
/// Enums for piece kinds, colors, and a struct for a chess piece.
pub mod piece;
/// Misc utility constants: board dimensions, movement deltas, and well-known FEN strings.
pub mod utils;

pub use coordinates::*;
pub use piece::*;
pub use utils::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::coordinates::*;
    pub use crate::piece::*;
    pub use crate::utils::*;
}

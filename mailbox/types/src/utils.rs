use super::Coordinates;

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

/// Number of squares along one edge of the board.
pub const SQUARES_PER_LINE: i32 = 8;

/// Largest valid row or column index.
pub const LAST_INDEX: i32 = SQUARES_PER_LINE - 1;

/// Number of cells in the board matrix.
pub const SQUARE_COUNT: usize = (SQUARES_PER_LINE * SQUARES_PER_LINE) as usize;

/// The most destinations a single piece can ever have (a Queen in the middle of an empty board).
pub const MAX_PIECE_MOVES: usize = 27;

/// <https://www.chessprogramming.org/Chess_Position#cite_note-4>
pub const MAX_NUM_MOVES: usize = 218;

/// Unit directions for the movement of the Queen.
pub const QUEEN_DIRECTIONS: [Coordinates; 8] = [
    /* Rook */
    Coordinates::new(1, 0),
    Coordinates::new(0, -1),
    Coordinates::new(-1, 0),
    Coordinates::new(0, 1),
    /* Bishop */
    Coordinates::new(1, 1),
    Coordinates::new(1, -1),
    Coordinates::new(-1, -1),
    Coordinates::new(-1, 1),
];

/// Unit directions for the movement of the Rook.
pub const ROOK_DIRECTIONS: [Coordinates; 4] = [
    QUEEN_DIRECTIONS[0],
    QUEEN_DIRECTIONS[1],
    QUEEN_DIRECTIONS[2],
    QUEEN_DIRECTIONS[3],
];

/// Unit directions for the movement of the Bishop.
pub const BISHOP_DIRECTIONS: [Coordinates; 4] = [
    QUEEN_DIRECTIONS[4],
    QUEEN_DIRECTIONS[5],
    QUEEN_DIRECTIONS[6],
    QUEEN_DIRECTIONS[7],
];

/// The King steps one square in any of the Queen's directions.
pub const KING_OFFSETS: [Coordinates; 8] = QUEEN_DIRECTIONS;

/// Offsets for the movement of the Knight.
pub const KNIGHT_OFFSETS: [Coordinates; 8] = [
    Coordinates::new(1, 2),
    Coordinates::new(1, -2),
    Coordinates::new(2, 1),
    Coordinates::new(2, -1),
    Coordinates::new(-1, 2),
    Coordinates::new(-1, -2),
    Coordinates::new(-2, 1),
    Coordinates::new(-2, -1),
];

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

use super::{
    BoardMatrix, Color, Coordinates, MoveKind, Piece, PieceKind, LAST_INDEX, SQUARES_PER_LINE,
};

/// Order of the pieces on each side's back rank, from the a-file to the h-file.
const BACK_RANK: [PieceKind; SQUARES_PER_LINE as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// File on which both Kings start.
const KING_FILE: i32 = 4;

/// One-move record of a Pawn's double step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EnPassant {
    /// The square the Pawn skipped over, which is where a capturing Pawn lands.
    pub square: Coordinates,

    /// The side permitted to capture on `square`.
    pub color: Color,
}

/// A chessboard as the human player sees it: piece placements, orientation, and en passant state.
///
/// The human player's pieces always start at the bottom of the board (rows 6 and 7),
/// so "forward" for the player is toward row 0.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Mailbox representation of the game board.
    matrix: BoardMatrix,

    /// The [`Color`] of the human player, whose pieces sit at the bottom of the board.
    player: Color,

    /// Set for exactly one move after a Pawn advances two squares.
    en_passant: Option<EnPassant>,
}

impl Position {
    /// Creates a new [`Position`] with the standard starting layout, with `player`'s pieces at the bottom.
    ///
    /// When `player` is Black, the board is rotated so that Black's King starts on column 3.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Color, Coordinates, Piece, Position};
    /// let position = Position::new(Color::Black);
    /// assert_eq!(position.piece_at(Coordinates::new(7, 3)), Some(Piece::BLACK_KING));
    /// assert_eq!(position.piece_at(Coordinates::new(0, 3)), Some(Piece::WHITE_KING));
    /// ```
    pub fn new(player: Color) -> Self {
        let mut matrix = BoardMatrix::new();

        for color in Color::iter() {
            let (back, pawns) = match color {
                Color::White => (0, 1),
                Color::Black => (LAST_INDEX, LAST_INDEX - 1),
            };

            for (file, kind) in BACK_RANK.into_iter().enumerate() {
                let file = file as i32;
                matrix.place(
                    Piece::new(color, kind),
                    Coordinates::from_file_rank(file, back, player),
                );
                matrix.place(
                    Piece::new(color, PieceKind::Pawn),
                    Coordinates::from_file_rank(file, pawns, player),
                );
            }
        }

        Self {
            matrix,
            player,
            en_passant: None,
        }
    }

    /// Creates a new [`Position`] from the provided FEN string, with `player`'s pieces at the bottom.
    ///
    /// The side to move is validated but not stored here; see [`fen_side_to_move`].
    /// Move counters are ignored.
    ///
    /// Which pieces have already moved is inferred:
    /// Pawns off their starting rank have moved, and Kings and Rooks are unmoved only if the castling
    /// field grants the matching right. Without a castling field, a King or Rook on its home square is unmoved.
    pub fn from_fen(fen: &str, player: Color) -> Result<Self> {
        let mut split = fen.split_whitespace();

        let placements = split.next().ok_or(anyhow!(
            "Invalid FEN string: FEN string must have piece placements."
        ))?;
        let matrix = parse_placements(placements, player)?;

        let side_to_move = match split.next() {
            Some(side) => Color::from_str(side).context("Invalid FEN string: bad side to move")?,
            None => Color::White,
        };

        let castling = split.next();
        if let Some(castling) = castling {
            if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
                bail!("Invalid FEN string: castling rights must be some of \"KQkq\" or \"-\". Got {castling:?}");
            }
        }

        let en_passant = match split.next().unwrap_or("-") {
            "-" => None,
            square => {
                let square = Coordinates::from_notation(square, player)?;
                let color = match square.file_rank(player).1 {
                    2 => Color::Black,
                    5 => Color::White,
                    rank => bail!(
                        "Invalid FEN string: en passant square must be on the 3rd or 6th rank. Got rank {}",
                        rank + 1
                    ),
                };
                Some(EnPassant { square, color })
            }
        };

        let mut position = Self {
            matrix,
            player,
            en_passant,
        };
        position.infer_moved_flags(castling);

        // The King of the side that just moved cannot be left en prise
        let waiting = side_to_move.opponent();
        if position.is_king_checked(waiting) {
            bail!("Invalid FEN string: {waiting} is in check but it is {side_to_move}'s turn");
        }

        Ok(position)
    }

    /// Flags every piece that cannot be on its initial square with its initial rights as having moved.
    fn infer_moved_flags(&mut self, castling: Option<&str>) {
        let grants = |right: char| castling.map_or(true, |field| field.contains(right));

        let pieces = self.matrix.iter().collect::<Vec<_>>();
        for (square, piece) in pieces {
            let (file, rank) = square.file_rank(self.player);
            let color = piece.color();
            let home = match color {
                Color::White => 0,
                Color::Black => LAST_INDEX,
            };
            let [kingside, queenside] = match color {
                Color::White => ['K', 'Q'],
                Color::Black => ['k', 'q'],
            };

            let unmoved = match piece.kind() {
                PieceKind::Pawn => rank == home + self.rank_direction(color),
                PieceKind::King => {
                    rank == home && file == KING_FILE && (grants(kingside) || grants(queenside))
                }
                PieceKind::Rook => {
                    rank == home
                        && ((file == LAST_INDEX && grants(kingside))
                            || (file == 0 && grants(queenside)))
                }
                _ => true,
            };

            if !unmoved {
                self.matrix.place(piece.moved(), square);
            }
        }
    }

    /// Direction in which `color`'s Pawns advance, measured in chess ranks (not rows).
    const fn rank_direction(&self, color: Color) -> i32 {
        match color {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Generates a FEN string from this [`Position`], given whose turn it is.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Color, Position, FEN_STARTPOS};
    /// let position = Position::new(Color::White);
    /// assert_eq!(position.to_fen(Color::White), FEN_STARTPOS);
    /// ```
    pub fn to_fen(&self, side_to_move: Color) -> String {
        let placements = (0..SQUARES_PER_LINE)
            .rev()
            .map(|rank| {
                let mut line = String::new();
                let mut empty_spaces = 0;

                for file in 0..SQUARES_PER_LINE {
                    let square = Coordinates::from_file_rank(file, rank, self.player);
                    if let Some(piece) = self.piece_at(square) {
                        if empty_spaces != 0 {
                            line += &empty_spaces.to_string();
                            empty_spaces = 0;
                        }
                        line.push(piece.char());
                    } else {
                        empty_spaces += 1;
                    }
                }

                if empty_spaces != 0 {
                    line += &empty_spaces.to_string();
                }
                line
            })
            .collect::<Vec<_>>()
            .join("/");

        let mut castling = String::with_capacity(4);
        for (color, right, rook_file) in [
            (Color::White, 'K', LAST_INDEX),
            (Color::White, 'Q', 0),
            (Color::Black, 'k', LAST_INDEX),
            (Color::Black, 'q', 0),
        ] {
            if self.has_unmoved(Piece::new(color, PieceKind::King), KING_FILE)
                && self.has_unmoved(Piece::new(color, PieceKind::Rook), rook_file)
            {
                castling.push(right);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant
            .map(|ep| ep.square.to_notation(self.player))
            .unwrap_or(String::from("-"));

        format!(
            "{placements} {} {castling} {en_passant} 0 1",
            side_to_move.char()
        )
    }

    /// Returns `true` if `piece` stands unmoved on the given file of its home rank.
    fn has_unmoved(&self, piece: Piece, file: i32) -> bool {
        let home = match piece.color() {
            Color::White => 0,
            Color::Black => LAST_INDEX,
        };
        let square = Coordinates::from_file_rank(file, home, self.player);

        self.piece_at(square) == Some(piece)
    }

    /// The [`Color`] of the human player, whose pieces start at the bottom of the board.
    #[inline]
    pub const fn player(&self) -> Color {
        self.player
    }

    /// The underlying [`BoardMatrix`].
    #[inline]
    pub const fn matrix(&self) -> &BoardMatrix {
        &self.matrix
    }

    /// Mutable access to the underlying [`BoardMatrix`].
    #[inline]
    pub fn matrix_mut(&mut self) -> &mut BoardMatrix {
        &mut self.matrix
    }

    /// The active en passant marker, if the last move was a Pawn's double step.
    #[inline]
    pub const fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    /// Overwrites the en passant marker.
    #[inline]
    pub fn set_en_passant(&mut self, en_passant: Option<EnPassant>) {
        self.en_passant = en_passant;
    }

    /// Fetches the [`Piece`] at the provided square, if there is one.
    #[inline]
    pub fn piece_at(&self, square: Coordinates) -> Option<Piece> {
        self.matrix.get(square)
    }

    /// Returns `true` if there is a piece at the given square.
    #[inline]
    pub fn has(&self, square: Coordinates) -> bool {
        self.matrix.has(square)
    }

    /// Fetches the [`Color`] of the piece at the provided square, if there is one.
    #[inline]
    pub fn color_at(&self, square: Coordinates) -> Option<Color> {
        self.matrix.color_at(square)
    }

    /// Every square holding a piece of `color`, along with that piece.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Coordinates, Piece)> + '_ {
        self.matrix.all_for(color)
    }

    /// Row increment for `color`'s advancing Pawns: `-1` for the player, `+1` for the opponent.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Color, Position};
    /// let position = Position::new(Color::Black);
    /// assert_eq!(position.forward(Color::Black), -1);
    /// assert_eq!(position.forward(Color::White), 1);
    /// ```
    #[inline]
    pub fn forward(&self, color: Color) -> i32 {
        if color == self.player {
            -1
        } else {
            1
        }
    }

    /// The row on which `color`'s Pawns promote: row `0` for the player, row `7` for the opponent.
    #[inline]
    pub fn promotion_row(&self, color: Color) -> i32 {
        if color == self.player {
            0
        } else {
            LAST_INDEX
        }
    }

    /// Returns `true` if a Pawn of `color` landing on `square` would capture en passant.
    pub fn is_en_passant_target(&self, square: Coordinates, color: Color) -> bool {
        self.en_passant
            .is_some_and(|ep| ep.square == square && ep.color == color)
            && !self.has(square)
    }

    /// Square of the King of the provided [`Color`].
    ///
    /// # Panics
    /// If `color` has no King on the board. Every position must have exactly one King per side.
    pub fn king_square(&self, color: Color) -> Coordinates {
        let Some(square) = self.matrix.king(color) else {
            panic!("No {color} king found on the board:\n{self}");
        };
        square
    }

    /// Applies the move from `from` to `to`. No enforcement of legality.
    ///
    /// Captures, en passant, castling (the King moving more than one file), the en passant marker
    /// and promotion to a Queen are all handled here.
    ///
    /// # Panics
    /// If there is no piece at `from`.
    pub fn make_move(&mut self, from: Coordinates, to: Coordinates) {
        // Remove the piece from its previous location
        let Some(mut piece) = self.matrix.take(from) else {
            panic!(
                "Failed to move from {} to {}: No piece found at {from}\n{self}",
                from.to_notation(self.player),
                to.to_notation(self.player)
            );
        };
        let color = piece.color();
        let ahead = Coordinates::new(self.forward(color), 0);

        // Regular captures are handled by overwriting `to` further down
        let mut castle_rook = None;
        if !self.has(to) {
            if piece.is_pawn() && self.is_en_passant_target(to, color) {
                // The captured Pawn isn't at `to`, it's one square behind
                self.matrix.clear(to - ahead);
            } else if piece.is_king() && (to.col - from.col).abs() > 1 {
                // Castling: the Rook is the first piece past `to`, and lands on the square the King crossed
                let step = Coordinates::new(0, (to.col - from.col).signum());
                let mut rook_square = to + step;
                while rook_square.is_on_board() && !self.has(rook_square) {
                    rook_square += step;
                }
                castle_rook = Some((rook_square, to - step));
            }
        }

        // The marker lives for exactly one move
        self.en_passant = None;

        if !piece.has_moved() {
            piece = piece.moved();

            if piece.is_pawn() && (to.row - from.row).abs() == 2 {
                self.en_passant = Some(EnPassant {
                    square: from + ahead,
                    color: color.opponent(),
                });
            }
        }

        if piece.is_pawn() && to.row == self.promotion_row(color) {
            piece = piece.promoted(PieceKind::Queen);
        }

        self.matrix.place(piece, to);

        if let Some((rook_from, rook_to)) = castle_rook {
            self.make_move(rook_from, rook_to);
        }
    }

    /// Determines which [`MoveKind`] moving the piece at `from` to `to` would be.
    ///
    /// # Panics
    /// If there is no piece at `from`.
    pub fn classify(&self, from: Coordinates, to: Coordinates) -> MoveKind {
        let Some(piece) = self.piece_at(from) else {
            panic!("Cannot classify a move from {from}: No piece found there\n{self}");
        };
        let capture = self.has(to);

        if piece.is_pawn() {
            if to.row == self.promotion_row(piece.color()) {
                return if capture {
                    MoveKind::PromoCapt
                } else {
                    MoveKind::Promote
                };
            }

            if (to.row - from.row).abs() == 2 {
                return MoveKind::PawnPushTwo;
            }

            if !capture && to.col != from.col {
                return MoveKind::EnPassantCapture;
            }
        }

        if piece.is_king() && (to.col - from.col).abs() > 1 {
            return MoveKind::Castle;
        }

        if capture {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        }
    }
}

/// Reads the side to move from a FEN string, defaulting to White if the field is absent.
///
/// # Example
/// ```
/// # use mailbox::{fen_side_to_move, Color, FEN_KIWIPETE};
/// assert_eq!(fen_side_to_move(FEN_KIWIPETE).unwrap(), Color::White);
/// assert_eq!(fen_side_to_move("8/8/8/8/8/8/8/8 b - -").unwrap(), Color::Black);
/// ```
pub fn fen_side_to_move(fen: &str) -> Result<Color> {
    let side = fen.split_whitespace().nth(1).unwrap_or("w");
    Color::from_str(side)
}

/// Parses the placement field of a FEN string, validating its shape and that each side has one King.
fn parse_placements(placements: &str, player: Color) -> Result<BoardMatrix> {
    let mut matrix = BoardMatrix::new();

    let ranks = placements.split('/').collect::<Vec<_>>();
    if ranks.len() != SQUARES_PER_LINE as usize {
        bail!(
            "Invalid FEN string: expected placements for 8 ranks. Got {}",
            ranks.len()
        );
    }

    // FEN lists the 8th rank first
    for (rank, line) in (0..SQUARES_PER_LINE).rev().zip(ranks) {
        let mut file = 0;

        for piece_char in line.chars() {
            if let Some(empty) = piece_char.to_digit(10) {
                file += empty as i32;
                continue;
            }

            let piece = Piece::from_char(piece_char).with_context(|| {
                format!("Found non-piece, non-numeric char {piece_char:?} when parsing FEN.")
            })?;
            if file > LAST_INDEX {
                bail!("Invalid FEN string: rank {} has more than 8 files", rank + 1);
            }

            matrix.place(piece, Coordinates::from_file_rank(file, rank, player));
            file += 1;
        }

        if file != SQUARES_PER_LINE {
            bail!(
                "Invalid FEN string: rank {} must cover 8 files. Got {file}",
                rank + 1
            );
        }
    }

    for color in Color::iter() {
        let kings = matrix
            .all_for(color)
            .filter(|(_, piece)| piece.is_king())
            .count();
        if kings != 1 {
            bail!("Invalid FEN string: {color} must have exactly one king. Got {kings}");
        }
    }

    Ok(matrix)
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

impl fmt::Display for Position {
    /// Shows the board as the player sees it, labelled with ranks and files.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(198);

        for row in 0..SQUARES_PER_LINE {
            let (_, rank) = Coordinates::new(row, 0).file_rank(self.player);
            board += &format!("{}| ", rank + 1);

            for col in 0..SQUARES_PER_LINE {
                let occupant = match self.piece_at(Coordinates::new(row, col)) {
                    Some(piece) => piece.char(),
                    None => '.',
                };
                board += &format!("{occupant} ");
            }

            board += "\n";
        }

        board += " +";
        board += &"--".repeat(SQUARES_PER_LINE as usize);
        board += "\n   ";
        for col in 0..SQUARES_PER_LINE {
            let (file, _) = Coordinates::new(LAST_INDEX, col).file_rank(self.player);
            board.push((b'a' + file as u8) as char);
            board.push(' ');
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let en_passant = match self.en_passant {
            Some(ep) => format!(
                "{} (for {})",
                ep.square.to_notation(self.player),
                ep.color
            ),
            None => String::from("-"),
        };

        write!(
            f,
            "{self}\n\nPlayer: {}\nEn passant: {en_passant}",
            self.player
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn startpos_matches_fen() {
        for player in Color::iter() {
            let built = Position::new(player);
            let parsed = Position::from_fen(FEN_STARTPOS, player).unwrap();
            assert_eq!(built, parsed);
            assert_eq!(built.to_fen(Color::White), FEN_STARTPOS);
        }
    }

    #[test]
    fn fen_round_trips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        for player in Color::iter() {
            let position = Position::from_fen(FEN_KIWIPETE, player).unwrap();
            assert_eq!(position.to_fen(Color::White), fen);
        }

        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 1";
        let position = Position::from_fen(fen, Color::White).unwrap();
        assert_eq!(
            position.en_passant(),
            Some(EnPassant {
                square: Coordinates::new(2, 4),
                color: Color::White
            })
        );
        assert_eq!(position.to_fen(Color::White), fen);
    }

    #[test]
    fn fen_infers_moved_pieces() {
        let position = Position::from_fen("r3k2r/8/8/8/4P3/8/8/R3K2R w Kq - 0 1", Color::White)
            .unwrap();

        let at = |name: &str| {
            position
                .piece_at(Coordinates::from_notation(name, Color::White).unwrap())
                .unwrap()
        };

        assert!(!at("e1").has_moved());
        assert!(!at("h1").has_moved());
        assert!(at("a1").has_moved());
        assert!(!at("e8").has_moved());
        assert!(!at("a8").has_moved());
        assert!(at("h8").has_moved());
        assert!(at("e4").has_moved());
    }

    #[test]
    fn fen_rejects_bad_input() {
        assert!(Position::from_fen("", Color::White).is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8 w - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/8 w - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4X3 w - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -", Color::White).is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4", Color::White).is_err());

        // The side not to move is already in check
        for player in Color::iter() {
            assert!(Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1", player).is_err());
            assert!(Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1", player).is_ok());
            assert!(Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 b - - 0 1", player).is_err());
        }
    }

    #[test]
    fn pawns_advance_toward_opponent() {
        let position = Position::new(Color::White);
        assert_eq!(position.forward(Color::White), -1);
        assert_eq!(position.forward(Color::Black), 1);
        assert_eq!(position.promotion_row(Color::White), 0);
        assert_eq!(position.promotion_row(Color::Black), LAST_INDEX);
    }

    #[test]
    #[should_panic]
    fn moving_from_empty_square_panics() {
        let mut position = Position::new(Color::White);
        position.make_move(Coordinates::new(4, 4), Coordinates::new(3, 4));
    }

    #[test]
    fn display_labels_follow_orientation() {
        let white = Position::new(Color::White).to_string();
        assert!(white.starts_with("8| r n b q k b n r"));
        assert!(white.ends_with("a b c d e f g h "));

        let black = Position::new(Color::Black).to_string();
        assert!(black.starts_with("1| R N B K Q B N R"));
        assert!(black.ends_with("h g f e d c b a "));
    }
}

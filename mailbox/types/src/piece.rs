use std::{fmt, ops::Neg, str::FromStr};

use anyhow::{bail, Context, Result};

/// Side of the board a piece belongs to.
///
/// White moves first in a standard game, so it is the default.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Both colors, White first.
    pub fn iter() -> impl Iterator<Item = Self> {
        [Self::White, Self::Black].into_iter()
    }

    /// The other side.
    ///
    /// # Example
    /// ```
    /// # use types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(-Color::Black, Color::White);
    /// ```
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Letter used for the side to move in a FEN string.
    pub const fn char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Lowercase name, for messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    /// Parses the side-to-move field of a FEN string: `w` or `b`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" | "W" => Ok(Self::White),
            "b" | "B" => Ok(Self::Black),
            _ => bail!("Expected 'w' or 'b' for a color, found {s:?}"),
        }
    }
}

/// One of the six kinds of chess piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase FEN letters, indexed by discriminant.
    const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

    /// Every kind, from Pawn to King.
    pub fn iter() -> impl Iterator<Item = Self> {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King].into_iter()
    }

    /// Decodes the three kind bits of a [`Piece`].
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Pawn,
            1 => Self::Knight,
            2 => Self::Bishop,
            3 => Self::Rook,
            4 => Self::Queen,
            _ => Self::King,
        }
    }

    /// Material value in pawns. Kings cannot be traded, so they are worth nothing.
    ///
    /// # Example
    /// ```
    /// # use types::PieceKind;
    /// assert_eq!(PieceKind::Queen.value(), 9);
    /// assert_eq!(PieceKind::King.value(), 0);
    /// ```
    pub const fn value(&self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }

    /// Parses a FEN letter of either case.
    pub fn from_char(c: char) -> Result<Self> {
        let lower = c.to_ascii_lowercase();
        Self::iter()
            .find(|kind| kind.char() == lower)
            .with_context(|| format!("{c:?} is not a piece letter"))
    }

    /// Lowercase FEN letter.
    pub const fn char(&self) -> char {
        Self::LETTERS[*self as usize]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

/// A piece on the board: its color, its kind, and whether it has moved yet.
///
/// Packed into a byte:
///
/// ```text
///     000 0 0 000
///         | |  +- kind
///         | +- color, 1 for Black
///         +- moved
/// ```
///
/// The moved flag is what gates castling and a Pawn's double step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece(u8);

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    const KIND_MASK: u8 = 0b0000_0111;
    const COLOR_SHIFT: u8 = 3;
    const MOVED_FLAG: u8 = 0b0001_0000;

    /// An unmoved piece.
    ///
    /// # Example
    /// ```
    /// # use types::{Piece, Color, PieceKind};
    /// let knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(knight.to_string(), "N");
    /// assert!(!knight.has_moved());
    /// ```
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self((color as u8) << Self::COLOR_SHIFT | kind as u8)
    }

    pub const fn color(&self) -> Color {
        if (self.0 >> Self::COLOR_SHIFT) & 1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub const fn kind(&self) -> PieceKind {
        PieceKind::from_bits(self.0 & Self::KIND_MASK)
    }

    /// Both halves of this piece's identity at once.
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color(), self.kind())
    }

    pub const fn has_moved(&self) -> bool {
        self.0 & Self::MOVED_FLAG != 0
    }

    /// The same piece, flagged as having moved.
    ///
    /// # Example
    /// ```
    /// # use types::Piece;
    /// let rook = Piece::WHITE_ROOK.moved();
    /// assert!(rook.has_moved());
    /// assert_ne!(rook, Piece::WHITE_ROOK);
    /// ```
    pub const fn moved(self) -> Self {
        Self(self.0 | Self::MOVED_FLAG)
    }

    /// Swaps the kind, keeping color and moved flag.
    ///
    /// # Example
    /// ```
    /// # use types::{Color, Piece, PieceKind};
    /// let queen = Piece::BLACK_PAWN.moved().promoted(PieceKind::Queen);
    /// assert_eq!(queen.parts(), (Color::Black, PieceKind::Queen));
    /// assert!(queen.has_moved());
    /// ```
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self(self.0 & !Self::KIND_MASK | kind as u8)
    }

    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind(), PieceKind::Pawn)
    }

    pub const fn is_rook(&self) -> bool {
        matches!(self.kind(), PieceKind::Rook)
    }

    pub const fn is_king(&self) -> bool {
        matches!(self.kind(), PieceKind::King)
    }

    /// Material value in pawns. See [`PieceKind::value`].
    pub const fn value(&self) -> i32 {
        self.kind().value()
    }

    /// Parses a FEN letter: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use types::{Piece, Color, PieceKind};
    /// let knight = Piece::from_char('n').unwrap();
    /// assert_eq!(knight.parts(), (Color::Black, PieceKind::Knight));
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Self::new(color, PieceKind::from_char(c)?))
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn char(&self) -> char {
        let c = self.kind().char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            bail!("Expected a single piece letter, found {s:?}");
        };

        Self::from_char(c)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moved = if self.has_moved() { " (moved)" } else { "" };
        write!(f, "{} {}{moved}", self.color(), self.kind())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn piece_packs_color_kind_and_flag() {
        for color in Color::iter() {
            for kind in PieceKind::iter() {
                let piece = Piece::new(color, kind);
                assert_eq!(piece.parts(), (color, kind));
                assert!(!piece.has_moved());

                let moved = piece.moved();
                assert_eq!(moved.parts(), (color, kind));
                assert!(moved.has_moved());
            }
        }
    }

    #[test]
    fn piece_letters_round_trip() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_char(c).unwrap();
            assert_eq!(piece.char(), c);
            assert_eq!(piece.to_string(), c.to_string());
        }
        assert!("x".parse::<Piece>().is_err());
        assert!("QQ".parse::<Piece>().is_err());
    }

    #[test]
    fn colors_parse_from_fen() {
        assert_eq!("w".parse::<Color>().unwrap(), Color::White);
        assert_eq!("b".parse::<Color>().unwrap(), Color::Black);
        assert!("x".parse::<Color>().is_err());
        assert_eq!(Color::Black.char(), 'b');
    }
}

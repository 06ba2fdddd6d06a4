use std::fmt;

use super::{Color, Coordinates, MAX_NUM_MOVES};

/// Every legal move of one side. No position has more than [`MAX_NUM_MOVES`].
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// What a move does besides relocating one piece.
///
/// Promotions always produce a Queen, so they carry no piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum MoveKind {
    /// One piece moves to an empty square.
    Quiet,

    /// The destination held an enemy piece, which is removed.
    Capture,

    /// An unmoved Pawn advancing two rows, leaving an en passant marker behind it.
    PawnPushTwo,

    /// A Pawn taking a double-stepped Pawn by moving onto the square it skipped.
    EnPassantCapture,

    /// The King moves two files and the Rook on that side jumps over it.
    Castle,

    /// A Pawn pushed onto its last row, becoming a Queen.
    Promote,

    /// A Pawn capturing onto the far side of the board and becoming a Queen.
    PromoCapt,
}

impl MoveKind {
    /// Returns `true` if undoing this kind of move requires more than the two squares it travels between.
    ///
    /// # Example
    /// ```
    /// # use mailbox::MoveKind;
    /// assert!(MoveKind::Castle.touches_other_squares());
    /// assert!(!MoveKind::Capture.touches_other_squares());
    /// ```
    pub const fn touches_other_squares(&self) -> bool {
        matches!(
            self,
            Self::Castle | Self::EnPassantCapture | Self::Promote | Self::PromoCapt
        )
    }
}

/// A source square, a destination square, and what kind of move it is.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Coordinates,
    to: Coordinates,
    kind: MoveKind,
}

impl Move {
    /// The kind is not checked against the board; see [`crate::Position::classify`].
    pub const fn new(from: Coordinates, to: Coordinates, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }

    /// Square the piece leaves.
    #[inline]
    pub const fn from(&self) -> Coordinates {
        self.from
    }

    /// Square the piece lands on.
    #[inline]
    pub const fn to(&self) -> Coordinates {
        self.to
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// `(from, to, kind)`.
    #[inline]
    pub const fn parts(&self) -> (Coordinates, Coordinates, MoveKind) {
        (self.from, self.to, self.kind)
    }

    /// Returns `true` if this [`Move`] leaves an en passant marker.
    pub const fn is_pawn_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::PawnPushTwo)
    }

    /// Formats this [`Move`] in coordinate notation (such as `e2e4`) for a board with `bottom` at the bottom.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Color, Coordinates, Move, MoveKind};
    /// let e2e4 = Move::new(Coordinates::new(6, 4), Coordinates::new(4, 4), MoveKind::PawnPushTwo);
    /// assert_eq!(e2e4.to_notation(Color::White), "e2e4");
    /// assert_eq!(e2e4.to_notation(Color::Black), "d7d5");
    /// ```
    pub fn to_notation(&self, bottom: Color) -> String {
        format!(
            "{}{}",
            self.from.to_notation(bottom),
            self.to.to_notation(bottom)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({:?})", self.kind)
    }
}

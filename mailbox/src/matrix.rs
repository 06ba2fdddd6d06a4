use std::{
    fmt,
    ops::{Index, IndexMut},
};

use super::{Color, Coordinates, Piece, SQUARES_PER_LINE, SQUARE_COUNT};

/// The 8x8 grid of squares, each either empty or holding exactly one [`Piece`].
///
/// This is the single source of truth for piece placement.
/// Per-color piece lists are derived from it on demand (see [`BoardMatrix::all_for`]),
/// so they can never disagree with the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardMatrix([Option<Piece>; SQUARE_COUNT]);

impl BoardMatrix {
    /// Creates a new, empty [`BoardMatrix`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use mailbox::BoardMatrix;
    /// let matrix = BoardMatrix::new();
    /// assert_eq!(matrix.population(), 0);
    /// ```
    pub const fn new() -> Self {
        Self([None; SQUARE_COUNT])
    }

    /// Fetches the [`Piece`] at the provided square, if there is one.
    #[inline]
    pub fn get(&self, square: Coordinates) -> Option<Piece> {
        self.0[square.index()]
    }

    /// Returns `true` if there is a piece at the given square.
    #[inline]
    pub fn has(&self, square: Coordinates) -> bool {
        self.get(square).is_some()
    }

    /// Fetches the [`Color`] of the piece at the provided square, if there is one.
    pub fn color_at(&self, square: Coordinates) -> Option<Color> {
        self.get(square).map(|piece| piece.color())
    }

    /// Places the provided [`Piece`] at the supplied square, overwriting whatever was there.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{BoardMatrix, Coordinates, Piece};
    /// let mut matrix = BoardMatrix::new();
    /// matrix.place(Piece::WHITE_KNIGHT, Coordinates::new(4, 2));
    /// assert_eq!(matrix.get(Coordinates::new(4, 2)), Some(Piece::WHITE_KNIGHT));
    /// ```
    #[inline]
    pub fn place(&mut self, piece: Piece, square: Coordinates) {
        self.0[square.index()] = Some(piece);
    }

    /// Clears the supplied square of any piece.
    #[inline]
    pub fn clear(&mut self, square: Coordinates) {
        self.0[square.index()] = None;
    }

    /// Takes the [`Piece`] from a given square, if there is one present.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{BoardMatrix, Coordinates, Piece};
    /// let mut matrix = BoardMatrix::new();
    /// matrix.place(Piece::BLACK_ROOK, Coordinates::new(0, 0));
    /// assert_eq!(matrix.take(Coordinates::new(0, 0)), Some(Piece::BLACK_ROOK));
    /// assert_eq!(matrix.take(Coordinates::new(0, 0)), None);
    /// ```
    #[inline]
    pub fn take(&mut self, square: Coordinates) -> Option<Piece> {
        self.0[square.index()].take()
    }

    /// Clears the entire matrix, removing all pieces.
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    /// Number of pieces on the board.
    pub fn population(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// An iterator over every occupied square and the [`Piece`] on it, row by row from the top-left corner.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinates, Piece)> + '_ {
        self.0.iter().enumerate().filter_map(|(index, cell)| {
            cell.map(|piece| (Coordinates::from_index_unchecked(index), piece))
        })
    }

    /// The derived piece list for one side: every square holding a piece of `color`.
    pub fn all_for(&self, color: Color) -> impl Iterator<Item = (Coordinates, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Square of the King of the provided [`Color`], if it is on the board.
    pub fn king(&self, color: Color) -> Option<Coordinates> {
        self.all_for(color)
            .find(|(_, piece)| piece.is_king())
            .map(|(square, _)| square)
    }
}

impl Default for BoardMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Coordinates> for BoardMatrix {
    type Output = Option<Piece>;
    fn index(&self, index: Coordinates) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl IndexMut<Coordinates> for BoardMatrix {
    fn index_mut(&mut self, index: Coordinates) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}

impl fmt::Display for BoardMatrix {
    /// Raw matrix layout, row `0` first. Empty squares print as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.chunks(SQUARES_PER_LINE as usize) {
            let line = row
                .iter()
                .map(|cell| cell.map(|piece| piece.char()).unwrap_or('.').to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for BoardMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn piece_lists_follow_the_grid() {
        let mut matrix = BoardMatrix::new();
        matrix.place(Piece::WHITE_KING, Coordinates::new(7, 4));
        matrix.place(Piece::WHITE_PAWN, Coordinates::new(6, 4));
        matrix.place(Piece::BLACK_KING, Coordinates::new(0, 4));

        assert_eq!(matrix.all_for(Color::White).count(), 2);
        assert_eq!(matrix.all_for(Color::Black).count(), 1);
        assert_eq!(matrix.king(Color::White), Some(Coordinates::new(7, 4)));

        // Overwriting a square replaces its occupant in the derived lists as well
        matrix.place(Piece::BLACK_QUEEN, Coordinates::new(6, 4));
        assert_eq!(matrix.all_for(Color::White).count(), 1);
        assert_eq!(matrix.all_for(Color::Black).count(), 2);
        assert_eq!(matrix.population(), 3);

        matrix.clear(Coordinates::new(0, 4));
        assert_eq!(matrix.king(Color::Black), None);
    }

    #[test]
    fn display_prints_rows_top_down() {
        let mut matrix = BoardMatrix::new();
        matrix.place(Piece::BLACK_ROOK, Coordinates::new(0, 0));
        matrix.place(Piece::WHITE_KING, Coordinates::new(7, 7));

        let shown = matrix.to_string();
        let lines = shown.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "r . . . . . . .");
        assert_eq!(lines[7], ". . . . . . . K");
    }
}

use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

use anyhow::{bail, Result};

use super::{Color, LAST_INDEX, SQUARES_PER_LINE, SQUARE_COUNT};

/// A `(row, col)` address on the board matrix, or a delta between two such addresses.
///
/// Row `0` is the top of the board as the human player sees it, and row `7` is the bottom.
/// Which chess rank a row corresponds to depends on the board's orientation; see [`Coordinates::from_file_rank`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Coordinates {
    pub row: i32,
    pub col: i32,
}

impl Coordinates {
    /// Creates a new [`Coordinates`] from a row and column.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns `true` if either component lies outside of `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use types::Coordinates;
    /// assert!(!Coordinates::new(0, 7).is_out_of_bounds());
    /// assert!(Coordinates::new(-1, 3).is_out_of_bounds());
    /// assert!(Coordinates::new(4, 8).is_out_of_bounds());
    /// ```
    #[inline]
    pub const fn is_out_of_bounds(&self) -> bool {
        self.row < 0 || self.col < 0 || self.row > LAST_INDEX || self.col > LAST_INDEX
    }

    /// Inverse of [`Coordinates::is_out_of_bounds`].
    #[inline]
    pub const fn is_on_board(&self) -> bool {
        !self.is_out_of_bounds()
    }

    /// Returns the index of this square into a flat 64-cell array.
    ///
    /// # Panics
    /// If these coordinates are off the board and debug assertions are enabled.
    ///
    /// # Example
    /// ```
    /// # use types::Coordinates;
    /// assert_eq!(Coordinates::new(0, 0).index(), 0);
    /// assert_eq!(Coordinates::new(7, 7).index(), 63);
    /// assert_eq!(Coordinates::new(1, 2).index(), 10);
    /// ```
    ///
    /// # Panics
    /// If `self` is off the board.
    #[inline]
    pub fn index(&self) -> usize {
        assert!(self.is_on_board(), "Coordinates {self} are off the board");
        (self.row * SQUARES_PER_LINE + self.col) as usize
    }

    /// Creates [`Coordinates`] from an index into a flat 64-cell array.
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= SQUARE_COUNT {
            bail!("Invalid index for Coordinates: must be between [0,63]. Got {index}.");
        }

        Ok(Self::from_index_unchecked(index))
    }

    /// Creates [`Coordinates`] from an index without checking that it is below 64.
    #[inline]
    pub const fn from_index_unchecked(index: usize) -> Self {
        let index = index as i32;
        Self::new(index / SQUARES_PER_LINE, index % SQUARES_PER_LINE)
    }

    /// An iterator over all 64 squares, row by row from the top-left corner.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..SQUARE_COUNT).map(Self::from_index_unchecked)
    }

    /// Translates a pixel position inside the window into the square under it.
    ///
    /// `x` runs left to right (columns) and `y` top to bottom (rows).
    /// Positions outside of the window yield out-of-bounds coordinates.
    ///
    /// # Example
    /// ```
    /// # use types::Coordinates;
    /// assert_eq!(Coordinates::from_screen(80, 10, 75), Coordinates::new(0, 1));
    /// assert_eq!(Coordinates::from_screen(599, 599, 75), Coordinates::new(7, 7));
    /// assert!(Coordinates::from_screen(-3, 10, 75).is_out_of_bounds());
    /// ```
    pub const fn from_screen(x: i32, y: i32, square_size: i32) -> Self {
        Self::new(y.div_euclid(square_size), x.div_euclid(square_size))
    }

    /// Pixel position `(x, y)` of the top-left corner of this square.
    ///
    /// # Example
    /// ```
    /// # use types::Coordinates;
    /// assert_eq!(Coordinates::new(2, 5).to_screen(75), (375, 150));
    /// ```
    pub const fn to_screen(&self, square_size: i32) -> (i32, i32) {
        (self.col * square_size, self.row * square_size)
    }

    /// Creates [`Coordinates`] from a file (`0` is the a-file) and rank (`0` is the first rank),
    /// as seen by a player whose pieces sit at the bottom of the board.
    ///
    /// When `bottom` is Black, the board is rotated by 180 degrees.
    ///
    /// # Example
    /// ```
    /// # use types::{Color, Coordinates};
    /// // e1 is at the bottom of the board when White is at the bottom
    /// assert_eq!(Coordinates::from_file_rank(4, 0, Color::White), Coordinates::new(7, 4));
    /// // ... and at the top when Black is
    /// assert_eq!(Coordinates::from_file_rank(4, 0, Color::Black), Coordinates::new(0, 3));
    /// ```
    pub const fn from_file_rank(file: i32, rank: i32, bottom: Color) -> Self {
        match bottom {
            Color::White => Self::new(LAST_INDEX - rank, file),
            Color::Black => Self::new(rank, LAST_INDEX - file),
        }
    }

    /// Inverse of [`Coordinates::from_file_rank`], yielding `(file, rank)`.
    pub const fn file_rank(&self, bottom: Color) -> (i32, i32) {
        match bottom {
            Color::White => (self.col, LAST_INDEX - self.row),
            Color::Black => (LAST_INDEX - self.col, self.row),
        }
    }

    /// Parses an algebraic square name such as `"e4"` for the given orientation.
    ///
    /// # Example
    /// ```
    /// # use types::{Color, Coordinates};
    /// let e2 = Coordinates::from_notation("e2", Color::White).unwrap();
    /// assert_eq!(e2, Coordinates::new(6, 4));
    /// assert!(Coordinates::from_notation("z9", Color::White).is_err());
    /// ```
    pub fn from_notation(notation: &str, bottom: Color) -> Result<Self> {
        let mut chars = notation.chars();

        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid square {notation:?}: must be a file and a rank, such as \"e4\"");
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {notation:?}: must be between [a,h]");
        }

        if !('1'..='8').contains(&rank) {
            bail!("Invalid rank {rank:?} in square {notation:?}: must be between [1,8]");
        }

        let file = file as i32 - 'a' as i32;
        let rank = rank as i32 - '1' as i32;

        Ok(Self::from_file_rank(file, rank, bottom))
    }

    /// Formats these coordinates as an algebraic square name for the given orientation.
    ///
    /// # Example
    /// ```
    /// # use types::{Color, Coordinates};
    /// assert_eq!(Coordinates::new(7, 4).to_notation(Color::White), "e1");
    /// assert_eq!(Coordinates::new(7, 4).to_notation(Color::Black), "d8");
    /// ```
    pub fn to_notation(&self, bottom: Color) -> String {
        let (file, rank) = self.file_rank(bottom);
        let file = (b'a' + file as u8) as char;
        let rank = (b'1' + rank as u8) as char;
        format!("{file}{rank}")
    }
}

impl Add for Coordinates {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign for Coordinates {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Coordinates {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Mul for Coordinates {
    type Output = Self;

    /// Element-wise multiplication.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.row * rhs.row, self.col * rhs.col)
    }
}

impl Mul<i32> for Coordinates {
    type Output = Self;

    /// Scales a direction by a distance.
    #[inline]
    fn mul(self, rhs: i32) -> Self::Output {
        self * Self::new(rhs, rhs)
    }
}

impl Neg for Coordinates {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.row, -self.col)
    }
}

impl From<(i32, i32)> for Coordinates {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Coordinates::new(3, 4);
        let b = Coordinates::new(1, -2);

        assert_eq!(a + b, Coordinates::new(4, 2));
        assert_eq!(a - b, Coordinates::new(2, 6));
        assert_eq!(a * b, Coordinates::new(3, -8));
        assert_eq!(b * 3, Coordinates::new(3, -6));
        assert_eq!(-b, Coordinates::new(-1, 2));
    }

    #[test]
    fn bounds_check_each_component() {
        for square in Coordinates::iter() {
            assert!(square.is_on_board());
        }

        // One component in range is not enough
        assert!(Coordinates::new(8, 0).is_out_of_bounds());
        assert!(Coordinates::new(0, -1).is_out_of_bounds());
        assert!(Coordinates::new(-1, 8).is_out_of_bounds());
    }

    #[test]
    fn index_round_trips() {
        for index in 0..SQUARE_COUNT {
            assert_eq!(Coordinates::from_index(index).unwrap().index(), index);
        }
        assert!(Coordinates::from_index(64).is_err());
    }

    #[test]
    #[should_panic(expected = "Coordinates (-1, 3) are off the board")]
    fn off_board_index_panics() {
        Coordinates::new(-1, 3).index();
    }

    #[test]
    fn notation_respects_orientation() {
        for bottom in Color::iter() {
            for square in Coordinates::iter() {
                let name = square.to_notation(bottom);
                assert_eq!(Coordinates::from_notation(&name, bottom).unwrap(), square);
            }
        }

        // a1 is always on the bottom-left from White's point of view, top-right from Black's
        assert_eq!(
            Coordinates::from_notation("a1", Color::White).unwrap(),
            Coordinates::new(7, 0)
        );
        assert_eq!(
            Coordinates::from_notation("a1", Color::Black).unwrap(),
            Coordinates::new(0, 7)
        );
    }

    #[test]
    fn screen_translation_matches_squares() {
        let size = 75;
        for square in Coordinates::iter() {
            let (x, y) = square.to_screen(size);
            assert_eq!(Coordinates::from_screen(x, y, size), square);
            assert_eq!(Coordinates::from_screen(x + size - 1, y + size - 1, size), square);
        }
        assert!(Coordinates::from_screen(600, 0, size).is_out_of_bounds());
    }
}

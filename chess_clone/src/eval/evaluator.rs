use mailbox::{attacks_for, Color, Piece, Position};

use crate::{MATERIAL_SCALE, MAX_EVAL, MIN_EVAL, MOBILITY_BONUS};

/// A struct to encapsulate the logic of evaluating a chess position.
pub struct Evaluator<'a> {
    /// Position to evaluate.
    position: &'a Position,
}

impl<'a> Evaluator<'a> {
    /// Create a new [`Evaluator`] instance to evaluate the supplied [`Position`].
    pub fn new(position: &'a Position) -> Self {
        Self { position }
    }

    /// Run the evaluator for the specified color.
    ///
    /// A positive number is good for `color`.
    /// A negative number is good for `color`'s opponent.
    ///
    /// Being mated scores [`MIN_EVAL`] and mating scores [`MAX_EVAL`]. Otherwise, `color` earns its material
    /// plus a bonus per attacked square, and loses the opponent's material. The opponent's mobility is not counted.
    pub fn eval(&self, color: Color) -> i32 {
        if self.position.is_king_mated(color) {
            return MIN_EVAL;
        }
        if self.position.is_king_mated(color.opponent()) {
            return MAX_EVAL;
        }

        let friendly = count_material(self.position, color) + mobility(self.position, color);
        let enemy = count_material(self.position, color.opponent());

        friendly - enemy
    }
}

/// Returns the material value of the provided `Piece`, in evaluation units.
pub const fn value_of(piece: Piece) -> i32 {
    piece.value() * MATERIAL_SCALE
}

/// Counts the material value of all pieces of the specified color.
///
/// The King is worth nothing, as it cannot be removed from the board.
pub fn count_material(position: &Position, color: Color) -> i32 {
    position
        .pieces(color)
        .map(|(_, piece)| value_of(piece))
        .sum()
}

/// Bonus for every square attacked by a piece of the specified color, counted once per attacker.
pub fn mobility(position: &Position, color: Color) -> i32 {
    position
        .pieces(color)
        .map(|(square, piece)| attacks_for(position, square, piece).len() as i32 * MOBILITY_BONUS)
        .sum()
}

/// Computes the difference in material on the board.
///
/// If positive, `color` has more material.
/// If negative, `color.opponent()` has more material.
/// If zero, both sides have equal material.
pub fn material_difference(position: &Position, color: Color) -> i32 {
    count_material(position, color) - count_material(position, color.opponent())
}

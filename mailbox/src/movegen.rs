use super::{
    Color, Coordinates, Move, MoveList, Piece, PieceKind, Position, BISHOP_DIRECTIONS,
    KING_OFFSETS, KNIGHT_OFFSETS, MAX_PIECE_MOVES, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};

/// An alias for an [`arrayvec::ArrayVec`] containing the destinations of a single piece.
///
/// No piece can ever have more than [`MAX_PIECE_MOVES`] destinations.
pub type MoveSet = arrayvec::ArrayVec<Coordinates, MAX_PIECE_MOVES>;

/// Computes the squares threatened by `piece` standing on `square`, ignoring whether moving there would be legal.
///
/// * Pawns threaten the two squares diagonally in front of them.
/// * Knights and Kings threaten their fixed offsets.
/// * Bishops, Rooks, and Queens threaten along rays, up to and including the first enemy piece.
///
/// Squares occupied by `piece`'s own side are never included.
pub fn attacks_for(position: &Position, square: Coordinates, piece: Piece) -> MoveSet {
    let color = piece.color();

    match piece.kind() {
        PieceKind::Pawn => pawn_attacks(position, square, color),
        PieceKind::Knight => leaper_attacks(position, square, color, &KNIGHT_OFFSETS),
        PieceKind::King => leaper_attacks(position, square, color, &KING_OFFSETS),
        PieceKind::Bishop => ray_attacks(position, square, color, &BISHOP_DIRECTIONS),
        PieceKind::Rook => ray_attacks(position, square, color, &ROOK_DIRECTIONS),
        PieceKind::Queen => ray_attacks(position, square, color, &QUEEN_DIRECTIONS),
    }
}

/// Computes every destination of `piece` on `square` before discarding those that leave its King in check.
///
/// On top of [`attacks_for`], this adds Pawn pushes, restricts Pawn diagonals to captures
/// (including en passant), and adds castling for the King.
pub fn moves_for(position: &Position, square: Coordinates, piece: Piece) -> MoveSet {
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(position, square, piece),
        PieceKind::King => {
            let mut moves = attacks_for(position, square, piece);
            castling_moves(position, square, piece, &mut moves);
            moves
        }
        _ => attacks_for(position, square, piece),
    }
}

fn pawn_attacks(position: &Position, square: Coordinates, color: Color) -> MoveSet {
    let forward = position.forward(color);

    [-1, 1]
        .into_iter()
        .map(|side| square + Coordinates::new(forward, side))
        .filter(|target| target.is_on_board() && position.color_at(*target) != Some(color))
        .collect()
}

fn leaper_attacks(
    position: &Position,
    square: Coordinates,
    color: Color,
    offsets: &[Coordinates],
) -> MoveSet {
    offsets
        .iter()
        .map(|&offset| square + offset)
        .filter(|target| target.is_on_board() && position.color_at(*target) != Some(color))
        .collect()
}

fn ray_attacks(
    position: &Position,
    square: Coordinates,
    color: Color,
    directions: &[Coordinates],
) -> MoveSet {
    let mut attacks = MoveSet::new();

    for &direction in directions {
        let mut target = square + direction;

        while target.is_on_board() {
            match position.color_at(target) {
                None => attacks.push(target),
                Some(occupant) => {
                    if occupant != color {
                        attacks.push(target);
                    }
                    break;
                }
            }
            target += direction;
        }
    }

    attacks
}

fn pawn_moves(position: &Position, square: Coordinates, pawn: Piece) -> MoveSet {
    let color = pawn.color();
    let ahead = Coordinates::new(position.forward(color), 0);
    let mut moves = MoveSet::new();

    // Pushes never capture
    let single = square + ahead;
    if single.is_on_board() && !position.has(single) {
        moves.push(single);

        let double = single + ahead;
        if !pawn.has_moved() && double.is_on_board() && !position.has(double) {
            moves.push(double);
        }
    }

    // Diagonals only when there is something to take
    for target in pawn_attacks(position, square, color) {
        if position.color_at(target) == Some(color.opponent())
            || position.is_en_passant_target(target, color)
        {
            moves.push(target);
        }
    }

    moves
}

/// Adds the squares an unmoved, unchecked King can castle to.
///
/// Looking along the King's row in each direction, the first piece found must be an unmoved Rook of the
/// same color at least three files away, and the square the King crosses must not be attacked.
/// The destination itself is verified along with the King's other moves.
fn castling_moves(position: &Position, square: Coordinates, king: Piece, moves: &mut MoveSet) {
    let color = king.color();
    if king.has_moved() || position.is_king_checked(color) {
        return;
    }

    for step in [Coordinates::new(0, -1), Coordinates::new(0, 1)] {
        let mut scan = square + step;
        while scan.is_on_board() && !position.has(scan) {
            scan += step;
        }

        if scan.is_out_of_bounds() {
            continue;
        }
        let Some(rook) = position.piece_at(scan) else {
            continue;
        };

        let can_castle = rook.is_rook()
            && rook.color() == color
            && !rook.has_moved()
            && (scan.col - square.col).abs() >= 3
            && position.is_legal_move(square, square + step);

        if can_castle {
            moves.push(square + step * 2);
        }
    }
}

impl Position {
    /// Squares threatened by the piece at `square`, if there is one.
    pub fn attacks_at(&self, square: Coordinates) -> MoveSet {
        self.piece_at(square)
            .map(|piece| attacks_for(self, square, piece))
            .unwrap_or_default()
    }

    /// Legal destinations of the piece at `square`. Empty if the square is empty.
    ///
    /// Candidates are only verified one by one when they could expose the King: for the King itself,
    /// while in check, for pinned pieces, and for en passant (which removes two pieces from one rank).
    pub fn moves_at(&self, square: Coordinates) -> MoveSet {
        let Some(piece) = self.piece_at(square) else {
            return MoveSet::new();
        };

        self.legal_moves_from(square, piece, self.is_king_checked(piece.color()))
    }

    fn legal_moves_from(&self, square: Coordinates, piece: Piece, in_check: bool) -> MoveSet {
        let color = piece.color();
        let verify_all = in_check || piece.is_king() || self.exposes_king(square, color);

        moves_for(self, square, piece)
            .into_iter()
            .filter(|&to| {
                let must_verify =
                    verify_all || (piece.is_pawn() && self.is_en_passant_target(to, color));

                !must_verify || self.is_legal_move(square, to)
            })
            .collect()
    }

    /// Every legal [`Move`] available to `color`.
    pub fn legal_moves(&self, color: Color) -> MoveList {
        let in_check = self.is_king_checked(color);
        let mut moves = MoveList::new();

        for (from, piece) in self.pieces(color) {
            for to in self.legal_moves_from(from, piece, in_check) {
                moves.push(Move::new(from, to, self.classify(from, to)));
            }
        }

        moves
    }

    /// Returns `true` if `color` has at least one legal move.
    pub fn has_legal_moves(&self, color: Color) -> bool {
        let in_check = self.is_king_checked(color);

        self.pieces(color)
            .any(|(square, piece)| !self.legal_moves_from(square, piece, in_check).is_empty())
    }

    /// Returns `true` if any piece of `attacker` threatens `square`.
    pub fn is_attacked_by(&self, square: Coordinates, attacker: Color) -> bool {
        self.pieces(attacker)
            .any(|(from, piece)| attacks_for(self, from, piece).contains(&square))
    }

    /// Returns `true` if the piece on `square` is threatened by the other side.
    ///
    /// Empty squares are never considered attacked.
    pub fn is_attacked(&self, square: Coordinates) -> bool {
        self.color_at(square)
            .is_some_and(|color| self.is_attacked_by(square, color.opponent()))
    }

    /// Returns `true` if `color`'s King is currently attacked.
    pub fn is_king_checked(&self, color: Color) -> bool {
        self.is_attacked_by(self.king_square(color), color.opponent())
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    pub fn is_king_mated(&self, color: Color) -> bool {
        self.is_king_checked(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_king_checked(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if moving the piece at `from` to `to` leaves its King safe.
    ///
    /// The move is tried on a copy of the board. For King moves, the destination must be safe;
    /// otherwise the King's current square must be.
    ///
    /// # Panics
    /// If there is no piece at `from`.
    pub fn is_legal_move(&self, from: Coordinates, to: Coordinates) -> bool {
        let mut trial = self.clone();

        let Some(piece) = trial.matrix_mut().take(from) else {
            panic!("Cannot check the legality of a move from {from}: No piece found there\n{self}");
        };
        let color = piece.color();

        if piece.is_pawn() && self.is_en_passant_target(to, color) {
            let behind = to - Coordinates::new(self.forward(color), 0);
            trial.matrix_mut().clear(behind);
        }
        trial.matrix_mut().place(piece, to);

        let king = if piece.is_king() {
            to
        } else {
            trial.king_square(color)
        };

        !trial.is_attacked_by(king, color.opponent())
    }

    /// Returns `true` if the piece at `square` is the only thing shielding its King from an attack.
    ///
    /// A King that is already in check has no pins to speak of, so this is `false` then.
    pub fn is_pinned(&self, square: Coordinates) -> bool {
        let Some(piece) = self.piece_at(square) else {
            return false;
        };
        let color = piece.color();

        !piece.is_king() && !self.is_king_checked(color) && self.exposes_king(square, color)
    }

    /// Returns `true` if `color`'s King is attacked once `square` is emptied.
    fn exposes_king(&self, square: Coordinates, color: Color) -> bool {
        let mut trial = self.clone();
        trial.matrix_mut().clear(square);
        trial.is_king_checked(color)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(name: &str) -> Coordinates {
        Coordinates::from_notation(name, Color::White).unwrap()
    }

    #[test]
    fn rays_stop_at_first_piece() {
        let position = Position::from_fen("4k3/8/8/1p6/8/8/8/R3K3 w - - 0 1", Color::White).unwrap();
        let rook = position.attacks_at(square("a1"));

        // Along the rank, the Rook stops before its own King
        assert!(rook.contains(&square("d1")));
        assert!(!rook.contains(&square("e1")));
        // Up the file, it reaches the edge
        assert!(rook.contains(&square("a8")));
        assert_eq!(rook.len(), 10);
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let position = Position::new(Color::White);
        let attacks = position.attacks_at(square("e2"));
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(&square("d3")));
        assert!(attacks.contains(&square("f3")));

        // Edge pawns only have one diagonal
        assert_eq!(position.attacks_at(square("a7")).len(), 1);
    }

    #[test]
    fn knights_skip_own_pieces() {
        let position = Position::new(Color::White);
        let attacks = position.attacks_at(square("b1"));
        assert_eq!(attacks.len(), 2);
        assert!(!attacks.contains(&square("d2")));
    }

    #[test]
    fn attacked_means_threatened_by_opponent() {
        let position = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", Color::White).unwrap();
        assert!(position.is_attacked(square("d5")));
        assert!(position.is_attacked(square("d1")));
        assert!(!position.is_attacked(square("e4")));
        assert!(position.is_attacked_by(square("e4"), Color::Black));
    }

    #[test]
    fn empty_square_has_no_moves() {
        let position = Position::new(Color::White);
        assert!(position.moves_at(square("e4")).is_empty());
        assert!(position.attacks_at(square("e4")).is_empty());
    }
}

use super::{BoardMatrix, Coordinates, EnPassant, Move, Piece, Position};

/// The squares saved by a [`Snapshot`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SavedCells {
    /// Only the source and destination of the move, with their previous contents.
    Pair([(Coordinates, Option<Piece>); 2]),

    /// The whole board, for moves that affect squares other than their source and destination.
    Full(BoardMatrix),
}

/// Everything needed to undo a single move: the cells it changes and the previous en passant marker.
///
/// Used by the search and by game history in place of cloning the whole [`Position`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    cells: SavedCells,
    en_passant: Option<EnPassant>,
}

impl Snapshot {
    /// The cells saved by this [`Snapshot`].
    pub const fn cells(&self) -> &SavedCells {
        &self.cells
    }

    /// The en passant marker at the time this [`Snapshot`] was taken.
    pub const fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }
}

impl Position {
    /// Records what `mv` is about to change, so that [`Position::restore`] can undo it.
    ///
    /// Must be taken *before* the move is made.
    ///
    /// Quiet moves, captures and double pushes only touch their two squares.
    /// Castling, en passant and promotion touch more, so the full board is saved for those.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Color, Position};
    /// let mut position = Position::new(Color::White);
    /// let before = position.clone();
    ///
    /// let mv = position.legal_moves(Color::White)[0];
    /// let snapshot = position.snapshot(mv);
    /// position.make_move(mv.from(), mv.to());
    /// assert_ne!(position, before);
    ///
    /// position.restore(snapshot);
    /// assert_eq!(position, before);
    /// ```
    pub fn snapshot(&self, mv: Move) -> Snapshot {
        let cells = if mv.kind().touches_other_squares() {
            SavedCells::Full(*self.matrix())
        } else {
            let (from, to, _) = mv.parts();
            SavedCells::Pair([(from, self.piece_at(from)), (to, self.piece_at(to))])
        };

        Snapshot {
            cells,
            en_passant: self.en_passant(),
        }
    }

    /// Undoes a move by writing back the contents recorded in `snapshot`.
    pub fn restore(&mut self, snapshot: Snapshot) {
        match snapshot.cells {
            SavedCells::Pair(cells) => {
                for (square, contents) in cells {
                    self.matrix_mut()[square] = contents;
                }
            }
            SavedCells::Full(matrix) => *self.matrix_mut() = matrix,
        }

        self.set_en_passant(snapshot.en_passant);
    }
}

#[cfg(test)]
mod test {
    use rand::seq::SliceRandom;

    use super::*;
    use crate::{Color, MoveKind, FEN_KIWIPETE};

    /// Plays random games, checking after every move that restoring its snapshot gives back the exact position.
    fn random_playouts(start: &Position, games: usize, plies: usize) {
        let mut rng = rand::thread_rng();

        for _ in 0..games {
            let mut position = start.clone();
            let mut color = Color::White;

            for _ in 0..plies {
                let moves = position.legal_moves(color);
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };

                let before = position.clone();
                let snapshot = position.snapshot(mv);
                position.make_move(mv.from(), mv.to());
                position.restore(snapshot);
                assert_eq!(position, before, "Restoring {mv:?} did not undo it");

                position.make_move(mv.from(), mv.to());
                color = color.opponent();
            }
        }
    }

    #[test]
    fn restore_undoes_random_moves() {
        for player in Color::iter() {
            random_playouts(&Position::new(player), 8, 80);
            random_playouts(&Position::from_fen(FEN_KIWIPETE, player).unwrap(), 8, 40);
        }
    }

    #[test]
    fn special_moves_save_the_whole_board() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Color::White)
            .unwrap();
        let castle = position
            .legal_moves(Color::White)
            .into_iter()
            .find(|mv| mv.kind() == MoveKind::Castle)
            .unwrap();
        assert!(matches!(position.snapshot(castle).cells(), SavedCells::Full(_)));

        let quiet = position
            .legal_moves(Color::White)
            .into_iter()
            .find(|mv| mv.kind() == MoveKind::Quiet)
            .unwrap();
        assert!(matches!(position.snapshot(quiet).cells(), SavedCells::Pair(_)));
    }

    #[test]
    fn restore_brings_back_en_passant_marker() {
        let mut position = Position::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 1",
            Color::White,
        )
        .unwrap();
        let marker = position.en_passant();
        assert!(marker.is_some());

        let mv = position.legal_moves(Color::White)[0];
        let snapshot = position.snapshot(mv);
        position.make_move(mv.from(), mv.to());
        assert!(position.en_passant().is_none() || mv.is_pawn_double_push());

        position.restore(snapshot);
        assert_eq!(position.en_passant(), marker);
    }

    /// Snapshots, makes and restores every legal move of the side to move, returning the kinds seen.
    fn restore_every_move(position: &Position, color: Color) -> Vec<MoveKind> {
        let mut kinds = Vec::new();
        for mv in position.legal_moves(color) {
            let mut played = position.clone();
            let snapshot = played.snapshot(mv);
            played.make_move(mv.from(), mv.to());
            assert_ne!(&played, position);

            played.restore(snapshot);
            assert_eq!(&played, position, "Restoring {mv:?} did not undo it");
            kinds.push(mv.kind());
        }
        kinds
    }

    #[test]
    fn restore_undoes_promotions_and_en_passant() {
        for player in Color::iter() {
            let position = Position::from_fen("n1n4k/1P6/8/8/8/8/8/K7 w - - 0 1", player).unwrap();
            let kinds = restore_every_move(&position, Color::White);
            assert!(kinds.contains(&MoveKind::Promote));
            assert_eq!(kinds.iter().filter(|&&k| k == MoveKind::PromoCapt).count(), 2);

            let position =
                Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", player).unwrap();
            let kinds = restore_every_move(&position, Color::White);
            assert!(kinds.contains(&MoveKind::EnPassantCapture));
        }
    }
}

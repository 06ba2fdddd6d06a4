use std::fmt;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use mailbox::{
    fen_side_to_move, print_perft, Color, Coordinates, Move, MoveSet, Piece, Position, Snapshot,
};

use crate::{Config, Evaluator, Searcher, SQUARE_SIZE};

/// Whether a game can continue, and if not, how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Ongoing,
    /// `loser` is in check and cannot escape it.
    Checkmate { loser: Color },
    /// The side to move is not in check but has no legal moves.
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate { loser } => {
                write!(f, "checkmate: {} wins", loser.opponent().name())
            }
            Self::Stalemate => write!(f, "stalemate: draw"),
        }
    }
}

/// A game between the human player and the engine.
///
/// Holds the [`Position`], whose turn it is, and every move made so far so they can be taken back.
/// This is what a front end talks to: it translates clicks into squares, asks which moves to highlight,
/// applies the human's moves and asks for the engine's replies.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    side_to_move: Color,
    depth: usize,
    history: Vec<(Move, Snapshot)>,
}

impl Game {
    /// Starts a game as described by `config`.
    ///
    /// Fails if the search depth is zero or the FEN string is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        if config.depth == 0 {
            bail!("Search depth must be at least 1");
        }

        let player = Color::from(config.player);
        let (position, side_to_move) = match &config.fen {
            Some(fen) => {
                let position = Position::from_fen(fen, player)
                    .with_context(|| format!("Failed to start a game from FEN {fen:?}"))?;
                (position, fen_side_to_move(fen)?)
            }
            None => (Position::new(player), Color::White),
        };

        Ok(Self {
            position,
            side_to_move,
            depth: config.depth,
            history: Vec::new(),
        })
    }

    /// The current [`Position`].
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// The human's color, whose pieces sit at the bottom of the board.
    pub const fn player(&self) -> Color {
        self.position.player()
    }

    /// The color the engine plays.
    pub const fn engine(&self) -> Color {
        self.position.player().opponent()
    }

    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Number of moves made so far.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The square under the pixel `(x, y)` of the board window, if there is one.
    pub fn square_at(&self, x: i32, y: i32) -> Option<Coordinates> {
        Some(Coordinates::from_screen(x, y, SQUARE_SIZE)).filter(Coordinates::is_on_board)
    }

    /// Returns `true` if `square` holds one of the human's pieces.
    pub fn is_from_player(&self, square: Coordinates) -> bool {
        self.position.color_at(square) == Some(self.player())
    }

    /// Legal destinations of the piece on `square`.
    ///
    /// Empty unless that piece belongs to the side to move.
    pub fn moves_at(&self, square: Coordinates) -> MoveSet {
        if self.position.color_at(square) != Some(self.side_to_move) {
            return MoveSet::new();
        }

        self.position.moves_at(square)
    }

    /// Every piece on the board, along with its square.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinates, Piece)> + '_ {
        self.position.matrix().iter()
    }

    /// Whether the side to move can still play.
    pub fn status(&self) -> GameStatus {
        let color = self.side_to_move;

        if self.position.is_king_mated(color) {
            GameStatus::Checkmate { loser: color }
        } else if self.position.is_stalemate(color) {
            GameStatus::Stalemate
        } else {
            GameStatus::Ongoing
        }
    }

    /// Static evaluation of the position for the side to move.
    pub fn eval(&self) -> i32 {
        Evaluator::new(&self.position).eval(self.side_to_move)
    }

    /// FEN string of the current position.
    pub fn to_fen(&self) -> String {
        self.position.to_fen(self.side_to_move)
    }

    /// Applies the move `from` to `to` for the side to move, without checking whether it is legal.
    ///
    /// # Panics
    /// If there is no piece at `from`.
    pub fn make_move(&mut self, from: Coordinates, to: Coordinates) -> Move {
        let mv = Move::new(from, to, self.position.classify(from, to));
        let snapshot = self.position.snapshot(mv);

        self.position.make_move(from, to);
        self.history.push((mv, snapshot));

        info!(
            "{} played {}",
            self.side_to_move,
            mv.to_notation(self.player())
        );
        self.side_to_move = self.side_to_move.opponent();

        mv
    }

    /// Applies the move `from` to `to` for the side to move, if it is one of that piece's legal moves.
    pub fn make_move_checked(&mut self, from: Coordinates, to: Coordinates) -> Result<Move> {
        let bottom = self.player();

        let Some(piece) = self.position.piece_at(from) else {
            bail!("There is no piece on {}", from.to_notation(bottom));
        };

        if piece.color() != self.side_to_move {
            bail!(
                "The {} on {} cannot move: it is {}'s turn",
                piece.kind().name(),
                from.to_notation(bottom),
                self.side_to_move.name()
            );
        }

        if !self.moves_at(from).contains(&to) {
            bail!(
                "Illegal move {}{}",
                from.to_notation(bottom),
                to.to_notation(bottom)
            );
        }

        Ok(self.make_move(from, to))
    }

    /// Searches for the engine's best move and applies it.
    ///
    /// Nothing happens if it is not the engine's turn, or if the engine has no legal moves.
    pub fn make_ai_move(&mut self) -> Option<Move> {
        let color = self.engine();
        if self.side_to_move != color {
            warn!("Cannot move for {color}: it is {}'s turn", self.side_to_move);
            return None;
        }

        let result = Searcher::new(&mut self.position).best_move_for(color, self.depth);

        let Some(mv) = result.bestmove else {
            warn!("{color} has no legal moves");
            return None;
        };

        Some(self.make_move(mv.from(), mv.to()))
    }

    /// Takes back the last move made, returning it.
    pub fn undo(&mut self) -> Option<Move> {
        let (mv, snapshot) = self.history.pop()?;

        self.position.restore(snapshot);
        self.side_to_move = self.side_to_move.opponent();

        info!("Took back {}", mv.to_notation(self.player()));
        Some(mv)
    }

    /// Prints a split perft of the current position for the side to move.
    pub fn perft(&mut self, depth: usize) -> u64 {
        print_perft::<true, true>(&mut self.position, self.side_to_move, depth)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            position: Position::new(Color::White),
            side_to_move: Color::White,
            depth: crate::DEFAULT_DEPTH,
            history: Vec::new(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Side, WINDOW_SIZE};

    fn sq(name: &str, bottom: Color) -> Coordinates {
        Coordinates::from_notation(name, bottom).unwrap()
    }

    fn config(player: Side, depth: usize, fen: Option<&str>) -> Config {
        Config {
            player,
            depth,
            fen: fen.map(String::from),
        }
    }

    #[test]
    fn rejects_bad_config() {
        assert!(Game::new(&config(Side::White, 0, None)).is_err());
        assert!(Game::new(&config(Side::White, 1, Some("not a fen"))).is_err());
        // White to move could take the Black King
        let king_en_prise = Some("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1");
        assert!(Game::new(&config(Side::Black, 1, king_en_prise)).is_err());

        let game = Game::new(&config(Side::Black, 1, None)).unwrap();
        assert_eq!(game.player(), Color::Black);
        assert_eq!(game.engine(), Color::White);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn screen_maps_to_squares() {
        let game = Game::default();
        assert_eq!(game.square_at(0, 0), Some(Coordinates::new(0, 0)));
        assert_eq!(
            game.square_at(WINDOW_SIZE - 1, WINDOW_SIZE - 1),
            Some(Coordinates::new(7, 7))
        );
        assert_eq!(game.square_at(WINDOW_SIZE, 0), None);
        assert_eq!(game.square_at(-1, 10), None);

        // Bottom-left corner is the player's a1
        let square = game.square_at(1, WINDOW_SIZE - 1).unwrap();
        assert!(game.is_from_player(square));
        assert_eq!(square.to_notation(Color::White), "a1");
    }

    #[test]
    fn only_side_to_move_has_moves() {
        let mut game = Game::default();
        assert_eq!(game.moves_at(sq("e2", Color::White)).len(), 2);
        assert!(game.moves_at(sq("e7", Color::White)).is_empty());

        game.make_move_checked(sq("e2", Color::White), sq("e4", Color::White))
            .unwrap();
        assert!(game.moves_at(sq("d2", Color::White)).is_empty());
        assert_eq!(game.moves_at(sq("e7", Color::White)).len(), 2);
    }

    #[test]
    fn checked_moves_reject_illegal_input() {
        let mut game = Game::default();
        let white = Color::White;

        assert!(game.make_move_checked(sq("e4", white), sq("e5", white)).is_err());
        assert!(game.make_move_checked(sq("e7", white), sq("e5", white)).is_err());
        assert!(game.make_move_checked(sq("e2", white), sq("e5", white)).is_err());
        assert_eq!(game.history_len(), 0);

        let mv = game
            .make_move_checked(sq("g1", white), sq("f3", white))
            .unwrap();
        assert_eq!(mv.to_notation(white), "g1f3");
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn engine_replies_and_undo_restores() {
        let mut game = Game::default();
        let start = game.position().clone();

        // Not the engine's turn yet
        assert_eq!(game.make_ai_move(), None);

        game.make_move_checked(sq("e2", Color::White), sq("e4", Color::White))
            .unwrap();
        let reply = game.make_ai_move().unwrap();
        assert_eq!(game.position().color_at(reply.to()), Some(Color::Black));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.history_len(), 2);

        assert_eq!(game.undo(), Some(reply));
        assert!(game.undo().is_some());
        assert_eq!(game.undo(), None);
        assert_eq!(game.position(), &start);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn engine_moves_first_when_player_is_black() {
        let mut game = Game::new(&config(Side::Black, 1, None)).unwrap();
        let reply = game.make_ai_move().unwrap();
        assert_eq!(game.position().color_at(reply.to()), Some(Color::White));
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn reports_game_over() {
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        let mut game = Game::new(&config(Side::White, 1, Some(fen))).unwrap();
        assert_eq!(game.status(), GameStatus::Ongoing);

        game.make_move_checked(sq("a1", Color::White), sq("a8", Color::White))
            .unwrap();
        assert_eq!(
            game.status(),
            GameStatus::Checkmate {
                loser: Color::Black
            }
        );
        assert_eq!(game.make_ai_move(), None);
        assert_eq!(game.history_len(), 1);

        let fen = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
        let game = Game::new(&config(Side::White, 1, Some(fen))).unwrap();
        assert_eq!(game.status(), GameStatus::Stalemate);
        assert_eq!(game.to_fen(), "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    }

    #[test]
    fn pieces_lists_everything() {
        let game = Game::default();
        assert_eq!(game.pieces().count(), 32);
        assert_eq!(
            game.pieces().filter(|(_, p)| p.color() == Color::Black).count(),
            16
        );
    }
}

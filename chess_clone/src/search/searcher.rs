use std::ops::Neg;

use log::debug;
use mailbox::{Color, Move, Position};

use crate::{Evaluator, MIN_EVAL};

/// Outcome of a search: the best move found, and the score of making it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found during this search.
    ///
    /// Only `None` if the searched side had no legal moves.
    pub bestmove: Option<Move>,

    /// Score for making the associated `bestmove`.
    pub score: i32,
}

impl SearchResult {
    pub fn new(bestmove: Option<Move>, score: i32) -> Self {
        Self { bestmove, score }
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            bestmove: None,
            score: MIN_EVAL,
        }
    }
}

impl Neg for SearchResult {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self {
            score: -self.score,
            ..self
        }
    }
}

/// A struct to encapsulate the logic of searching through moves for a given a chess position.
///
/// Every line is explored in place on the borrowed [`Position`], undoing each move with a snapshot,
/// so the position is unchanged once a search returns.
pub struct Searcher<'a> {
    /// Position to search on.
    position: &'a mut Position,

    /// Total number of positions reached by making a move during this search.
    nodes: u64,
}

impl<'a> Searcher<'a> {
    /// Create a new search that will search the provided position.
    pub fn new(position: &'a mut Position) -> Self {
        Self { position, nodes: 0 }
    }

    /// Number of positions reached so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches every line of `depth` plies for `color`, returning the move with the highest score.
    ///
    /// Ties keep whichever move was generated first.
    /// If `color` has no legal moves, the result has no move, and scores [`MIN_EVAL`] when mated and `0` when stalemated.
    pub fn best_move_for(&mut self, color: Color, depth: usize) -> SearchResult {
        if depth == 0 {
            return SearchResult::new(None, self.evaluate(color));
        }

        let moves = self.position.legal_moves(color);

        let mut result = SearchResult::new(moves.first().copied(), MIN_EVAL);
        if moves.is_empty() {
            result.score = self.score_no_moves(color);
        }

        for mv in moves {
            let current = -self.search_move(mv, color, depth);

            if current > result.score {
                result = SearchResult::new(Some(mv), current);
            }
        }

        debug!(
            "Searched {} nodes at depth {depth} for {color}: bestmove {:?} scored {}",
            self.nodes,
            result.bestmove.map(|mv| mv.to_notation(self.position.player())),
            result.score
        );

        result
    }

    /// Naive [negamax](https://www.chessprogramming.org/Negamax): every move is searched to the full depth.
    fn negamax(&mut self, color: Color, depth: usize) -> i32 {
        if depth == 0 {
            return self.evaluate(color);
        }

        let moves = self.position.legal_moves(color);

        // If we've no legal moves available, it's either checkmate or stalemate.
        if moves.is_empty() {
            return self.score_no_moves(color);
        }

        let mut best = MIN_EVAL;
        for mv in moves {
            let score = -self.search_move(mv, color, depth);
            best = best.max(score);
        }

        best
    }

    /// Makes `mv` for `color`, scores the result from the opponent's perspective, and undoes it.
    fn search_move(&mut self, mv: Move, color: Color, depth: usize) -> i32 {
        let snapshot = self.position.snapshot(mv);
        self.position.make_move(mv.from(), mv.to());
        self.nodes += 1;

        let score = self.negamax(color.opponent(), depth - 1);

        self.position.restore(snapshot);
        score
    }

    fn score_no_moves(&self, color: Color) -> i32 {
        if self.position.is_king_checked(color) {
            MIN_EVAL
        } else {
            0
        }
    }

    fn evaluate(&self, color: Color) -> i32 {
        Evaluator::new(self.position).eval(color)
    }
}

/// Tunable constants and the command-line configuration.
pub mod config;
/// A game between the player and the engine: turns, history, and the queries a front end needs.
pub mod game;
/// The terminal front end.
pub mod shell;

pub mod search {
    pub mod searcher;
    pub use searcher::*;
}

pub mod eval {
    pub mod evaluator;
    pub use evaluator::*;
}

pub mod prelude {
    pub use crate::config::*;
    pub use crate::eval::*;
    pub use crate::game::*;
    pub use crate::search::*;
    pub use crate::shell::*;
}

pub use prelude::*;

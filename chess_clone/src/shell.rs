use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use log::warn;
use mailbox::{Color, Coordinates};

use crate::{Config, Game, GameStatus};

/// A command entered into the [`Shell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the available commands.
    Help,
    /// Print the board.
    Show,
    /// Print the FEN string of the current position.
    Fen,
    /// List every piece on the board.
    Pieces,
    /// List the legal moves of the piece on a square, or of the side to move.
    Moves(Option<Coordinates>),
    /// Play a move, after which the engine replies.
    Move { from: Coordinates, to: Coordinates },
    /// Have the engine move now.
    Go,
    /// Take back the last move(s), until it is the player's turn again.
    Undo,
    /// Print the static evaluation for the side to move.
    Eval,
    /// Print a split perft of the given depth.
    Perft(usize),
    /// Print whether the game is over.
    Status,
    /// Leave the shell.
    Exit,
}

/// Parses an input string and yields a [`Command`], if possible.
///
/// Square names are read as seen by `bottom`, the color at the bottom of the board.
pub fn parse_command(input: &str, bottom: Color) -> Result<Command> {
    let (cmd, rest) = input.trim().split_once(' ').unwrap_or((input.trim(), ""));

    match cmd {
        "help" => Ok(Command::Help),
        "show" | "d" => Ok(Command::Show),
        "fen" => Ok(Command::Fen),
        "pieces" => Ok(Command::Pieces),
        "moves" => parse_moves_command(rest, bottom),
        "move" => parse_move_command(rest, bottom),
        "go" => Ok(Command::Go),
        "undo" => Ok(Command::Undo),
        "eval" => Ok(Command::Eval),
        "perft" => parse_perft_command(rest),
        "status" => Ok(Command::Status),
        "quit" | "exit" => Ok(Command::Exit),
        _ => bail!("Unknown command {cmd:?}. Type \"help\" for a list of commands"),
    }
}

/// Parses the `moves` command
fn parse_moves_command(rest: &str, bottom: Color) -> Result<Command> {
    let mut args = rest.split_ascii_whitespace();

    let square = match args.next() {
        Some(arg) => Some(Coordinates::from_notation(arg, bottom)?),
        None => None,
    };

    if args.next().is_some() {
        bail!("usage: moves [square]");
    }

    Ok(Command::Moves(square))
}

/// Parses the `move` command, accepting either `e2e4` or `e2 e4`
fn parse_move_command(rest: &str, bottom: Color) -> Result<Command> {
    let squares = rest.split_ascii_whitespace().collect::<String>();

    if squares.len() != 4 || !squares.is_ascii() {
        bail!("usage: move <from><to>, such as \"move e2e4\"");
    }

    let from = Coordinates::from_notation(&squares[..2], bottom)?;
    let to = Coordinates::from_notation(&squares[2..], bottom)?;

    Ok(Command::Move { from, to })
}

/// Parses the `perft` command
fn parse_perft_command(rest: &str) -> Result<Command> {
    let mut args = rest.split_ascii_whitespace();

    let Some(depth) = args.next() else {
        bail!("usage: perft <depth>");
    };

    let Ok(depth) = depth.parse() else {
        bail!("usage: perft <depth>");
    };

    Ok(Command::Perft(depth))
}

/// A terminal front end: reads commands from `stdin` and plays a [`Game`] against the engine.
#[derive(Debug, Clone)]
pub struct Shell {
    game: Game,
}

impl Shell {
    /// Sets up a game as described by `config`.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            game: Game::new(&config)?,
        })
    }

    /// The game being played.
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Main entrypoint of the shell.
    ///
    /// Loops until `quit` is entered or `stdin` is closed.
    pub fn run(&mut self) -> Result<()> {
        // Print some metadata about the program
        let name = env!("CARGO_PKG_NAME");
        let version = env!("CARGO_PKG_VERSION");
        let authors = env!("CARGO_PKG_AUTHORS").replace(':', ", "); // Split multiple authors by comma-space
        println!("{name} {version} by {authors}");
        println!(
            "You play {}. Type \"help\" for a list of commands.\n",
            self.game.player().name()
        );

        // The engine may have the first move
        self.reply();
        self.show();

        let mut buffer = String::with_capacity(256);
        loop {
            print!("> ");
            io::stdout().flush().context("Failed to flush stdout")?;

            // Clear the buffer, read input, and trim the trailing newline
            buffer.clear();
            let bytes = io::stdin()
                .read_line(&mut buffer)
                .context("Failed to read line from stdin")?;

            // For ctrl + d
            if 0 == bytes {
                warn!("Received input of 0 bytes; quitting");
                return Ok(());
            }

            let input = buffer.trim();
            if input.is_empty() {
                continue;
            }

            let command = match parse_command(input, self.game.player()) {
                Ok(command) => command,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };

            if command == Command::Exit {
                return Ok(());
            }

            if let Err(err) = self.execute(command) {
                eprintln!("{err}");
            }
        }
    }

    /// Executes a single [`Command`] on the game.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => self.help(),
            Command::Show => self.show(),
            Command::Fen => println!("{}", self.game.to_fen()),
            Command::Pieces => self.pieces(),
            Command::Moves(square) => self.moves(square),
            Command::Move { from, to } => {
                if self.game.side_to_move() != self.game.player() {
                    bail!("It is not your turn. Type \"go\" to let the engine move");
                }
                self.game.make_move_checked(from, to)?;
                self.reply();
                self.show();
            }
            Command::Go => {
                if self.game.make_ai_move().is_none() {
                    bail!("The engine has no move to make");
                }
                self.show();
            }
            Command::Undo => self.undo(),
            Command::Eval => println!("{}", self.game.eval()),
            Command::Perft(depth) => {
                self.game.perft(depth);
            }
            Command::Status => println!("{}", self.game.status()),
            Command::Exit => {}
        }

        Ok(())
    }

    /// Lets the engine play if it is its turn and the game is not over.
    fn reply(&mut self) {
        let engine_to_move = self.game.side_to_move() == self.game.engine();
        if !engine_to_move || self.game.status() != GameStatus::Ongoing {
            return;
        }

        if let Some(mv) = self.game.make_ai_move() {
            println!("Engine plays {}", mv.to_notation(self.game.player()));
        }
    }

    /// Executes the `help` command, displaying a list of available commands.
    fn help(&self) {
        println!("available commands:");
        println!("  help                 show this message");
        println!("  show                 print the board");
        println!("  fen                  print the FEN of the position");
        println!("  pieces               list every piece on the board");
        println!("  moves [square]       list legal moves, optionally for one square");
        println!("  move <from><to>      play a move, such as \"move e2e4\"");
        println!("  go                   let the engine move now");
        println!("  undo                 take back your last move");
        println!("  eval                 evaluate the position for the side to move");
        println!("  perft <depth>        count leaf nodes to the given depth");
        println!("  status               show whether the game is over");
        println!("  quit                 leave");
    }

    /// Executes the `show` command, printing the board and whose turn it is.
    fn show(&self) {
        println!("{}", self.game);
        match self.game.status() {
            GameStatus::Ongoing => println!("{} to move", self.game.side_to_move().name()),
            status => println!("{status}"),
        }
    }

    /// Executes the `pieces` command.
    fn pieces(&self) {
        let bottom = self.game.player();
        for (square, piece) in self.game.pieces() {
            println!(
                "{} {} on {}",
                piece.color().name(),
                piece.kind().name(),
                square.to_notation(bottom)
            );
        }
    }

    /// Executes the `moves` command.
    fn moves(&self, square: Option<Coordinates>) {
        let bottom = self.game.player();

        let mut moves = match square {
            Some(from) => self
                .game
                .moves_at(from)
                .into_iter()
                .map(|to| to.to_notation(bottom))
                .collect::<Vec<_>>(),
            None => self
                .game
                .position()
                .legal_moves(self.game.side_to_move())
                .into_iter()
                .map(|mv| mv.to_notation(bottom))
                .collect::<Vec<_>>(),
        };
        moves.sort();

        println!("{}", moves.join(" "));
    }

    /// Executes the `undo` command, un-making moves until it is the player's turn again.
    fn undo(&mut self) {
        if self.game.undo().is_none() {
            println!("Nothing to undo");
            return;
        }

        while self.game.side_to_move() != self.game.player() {
            if self.game.undo().is_none() {
                // The engine had the first move; let it play again
                self.reply();
                break;
            }
        }
        self.show();
    }
}

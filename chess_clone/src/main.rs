use chess_clone::{Config, Shell};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();

    Shell::new(config)?.run()
}

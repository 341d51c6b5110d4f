use clap::Parser;
use flex2tasty::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

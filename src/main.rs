use clap::Parser;
use tradediary::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

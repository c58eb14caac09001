use clap::Parser;
use panictrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

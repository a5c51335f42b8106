use clap::Parser;
use twoday::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    twoday::logging::init(cli.verbose);
    run(cli)
}

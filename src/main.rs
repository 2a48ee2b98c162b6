use clap::Parser;
use goldsignal::cli::{run, Cli};
use goldsignal::logging::init_logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

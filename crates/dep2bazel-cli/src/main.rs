use clap::Parser;
use dep2bazel_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Log to the state dir when possible; a read-only home still gets stderr.
    if let Err(err) = logging::init_logging(cli.verbose) {
        logging::init_logging_stderr(cli.verbose);
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = cli.run() {
        eprintln!("dep2bazel error: {:#}", err);
        std::process::exit(1);
    }
}

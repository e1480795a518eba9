use clap::Parser;
use trackq_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    if cli.log_stderr {
        logging::init_logging_stderr();
    } else if let Err(err) = logging::init_logging() {
        eprintln!("trackq: file logging unavailable ({err:#}); logging to stderr");
        logging::init_logging_stderr();
    }

    if let Err(err) = cli.run().await {
        eprintln!("trackq error: {:#}", err);
        std::process::exit(1);
    }
}

//! sodscan - Segregation-of-Duties conflict analysis from the command line
//!
//! This CLI enables auditors to:
//! - Detect users holding both halves of a conflicting code pair through one role
//! - Detect roles whose combined grants contain a conflicting pair
//! - Validate rule book and access exports before an analysis
//! - Export dated CSV or JSON violation reports

use clap::Parser;

use sodscan_cli::{cli, logging, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.global.log_config()) {
        e.print();
        std::process::exit(e.exit_code());
    }

    match cli::run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::debug!(error = %e, exit_code = e.exit_code(), "Command failed");
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

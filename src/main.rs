//! Entry point for the `i18n-sync` command.

use std::process::ExitCode;

use clap::Parser;
use json_i18n_sync::cli::{
    self,
    Cli,
};
use json_i18n_sync::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to open log file: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

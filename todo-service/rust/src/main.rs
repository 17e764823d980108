use std::process::ExitCode;

use tokio::sync::watch;
use todo_service::{run, Logger};
use tracing::{error, Level};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenv::dotenv();
    let logger = Logger::from_env(std::io::stdout, Level::INFO);

    if let Err(err) = dotenv {
        if !err.not_found() {
            logger.in_scope(|| error!(%err, "could not load .env file"));
        }
    }

    // Kept alive until `run` returns, only interrupts stop the service.
    let (_cancel, cancelled) = watch::channel(false);

    if let Err(err) = run(cancelled, logger.clone(), |key| std::env::var(key).ok()).await {
        let err = format!("{err:#}");
        eprintln!("{err}");
        logger.in_scope(|| error!(%err, "error in top level"));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

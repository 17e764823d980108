use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use tokio::{
    sync::{oneshot, watch},
    task::JoinError,
    time::timeout,
};
use tracing::{debug, error, info, instrument::WithSubscriber};

use crate::{
    infra::{
        config::Config,
        db,
        os::shutdown_signal,
        telemetry::{Logger, TracedExecutor},
    },
    routes,
};

/// How long in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the service until `cancelled` fires or the process is interrupted.
///
/// Configuration is read through `lookup_env`: `PORT` and `DATABASE_URL` are
/// required, `HOST` defaults to `127.0.0.1`. Startup failures are returned
/// before anything listens. Once serving, shutdown always ends in `Ok(())`,
/// including when in-flight requests miss the drain deadline; that case is
/// logged instead.
///
/// Everything the service logs, including per-connection work, goes to
/// `logger`.
pub async fn run<F>(cancelled: watch::Receiver<bool>, logger: Logger, lookup_env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    logger.scope(start(cancelled, lookup_env, SHUTDOWN_TIMEOUT)).await
}

async fn start<F>(cancelled: watch::Receiver<bool>, lookup_env: F, shutdown_timeout: Duration) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    debug!("looking up env variables");
    let config = Config::from_lookup(lookup_env)?;
    debug!(%config, "loaded config");

    let db = db::init(config.database_url()).await?;
    info!("initialized db");

    let router = routes::router(&db);
    info!("initialized router");

    let server = axum::Server::try_bind(&config.address())
        .with_context(|| format!("error binding {}", config.address()))?
        .executor(TracedExecutor::current())
        .serve(router.into_make_service());

    info!(addr = %server.local_addr(), "listening on");

    let (close_tx, close_rx) = oneshot::channel::<()>();
    let server = server.with_graceful_shutdown(async move {
        let _ = close_rx.await;
    });

    serve(server, cancelled, close_tx, shutdown_timeout).await;

    info!("server stopped");
    Ok(())
}

/// Drives the accept task and the shutdown task and returns once both are done.
async fn serve<S>(
    server: S,
    cancelled: watch::Receiver<bool>,
    close: oneshot::Sender<()>,
    shutdown_timeout: Duration,
) where
    S: Future<Output = hyper::Result<()>> + Send + 'static,
{
    let (drained_tx, drained_rx) = oneshot::channel::<()>();
    let (abandon_tx, abandon_rx) = oneshot::channel::<()>();

    let accept = tokio::spawn(
        async move {
            tokio::select! {
                result = server => {
                    if let Err(err) = result {
                        error!(%err, "error listening and serving");
                    }
                }
                Ok(()) = abandon_rx => {
                    info!("abandoning in-flight connections");
                }
            }

            let _ = drained_tx.send(());
        }
        .with_current_subscriber(),
    );

    let shutdown = tokio::spawn(
        async move {
            shutdown_signal(cancelled).await;

            info!("shutting down http server");
            let _ = close.send(());

            // The deadline starts now, independent of whatever cancelled us.
            match timeout(shutdown_timeout, drained_rx).await {
                Ok(_) => info!("http server drained"),
                Err(_) => {
                    error!(
                        timeout = ?shutdown_timeout,
                        "error shutting down http server: in-flight requests did not finish in time"
                    );
                    let _ = abandon_tx.send(());
                }
            }
        }
        .with_current_subscriber(),
    );

    let (accept, shutdown) = tokio::join!(accept, shutdown);
    log_join("accept", accept);
    log_join("shutdown", shutdown);
}

fn log_join(task: &'static str, result: Result<(), JoinError>) {
    if let Err(err) = result {
        error!(task, %err, "server task failed");
    }
}

use tokio::{signal, sync::watch};
use tracing::{error, info};

/// Completes on ctrl-c or when `cancelled` flips to `true`.
/// A dropped sender counts as cancellation.
pub(crate) async fn shutdown_signal(mut cancelled: watch::Receiver<bool>) {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(%err, "failed to listen for interrupt signal");
            std::future::pending::<()>().await;
        }
    };

    let cancellation = async {
        let _ = cancelled.wait_for(|cancelled| *cancelled).await;
    };

    tokio::select! {
        _ = interrupt => info!("received interrupt signal"),
        _ = cancellation => info!("shutdown requested"),
    }
}

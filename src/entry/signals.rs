use tracing::info;

use volley::shutdown::ShutdownSender;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Triggers `shutdown_tx` on Ctrl+C or SIGTERM. The task ends as soon as
/// shutdown is triggered by anyone.
pub(super) fn setup_signal_shutdown_handler(
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                tracing::warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = shutdown_rx.wait() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received; stopping run.");
                    shutdown_tx.trigger();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    info!("SIGTERM received; stopping run.");
                    shutdown_tx.trigger();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = shutdown_rx.wait() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received; stopping run.");
                    shutdown_tx.trigger();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use volley::shutdown::shutdown_channel;

    #[test]
    fn handler_exits_once_shutdown_is_triggered() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(async {
            let (shutdown_tx, _shutdown_rx) = shutdown_channel();
            let handle = setup_signal_shutdown_handler(&shutdown_tx);
            shutdown_tx.trigger();

            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .map_err(|err| format!("Timed out waiting for signal handler: {}", err))?
                .map_err(|err| format!("Signal handler join error: {}", err))
        })
    }
}

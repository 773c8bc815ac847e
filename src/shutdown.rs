//! Run-wide cancellation signal.
//!
//! One sender fans out to every virtual user. Triggering is idempotent and
//! sticky: receivers created after the trigger observe it immediately.
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct ShutdownReceiver {
    rx: watch::Receiver<bool>,
}

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownReceiver { rx })
}

impl ShutdownSender {
    /// Signals shutdown. Safe to call any number of times.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ShutdownReceiver {
        ShutdownReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownReceiver {
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    ///
    /// Also resolves when every sender is gone, since nothing could ever
    /// trigger it afterwards.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            tracing::debug!("Shutdown sender dropped; treating as shutdown.");
        }
    }
}

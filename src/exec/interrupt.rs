// src/exec/interrupt.rs

use tokio::sync::watch;
use tracing::warn;

use crate::errors::Result;

/// Process-wide record of whether the user has pressed Ctrl-C.
///
/// The listener is installed once, before the first line runs, and the flag
/// stays set afterwards. A SIGINT that lands between two lines is therefore
/// still seen when the next line is about to start.
#[derive(Debug, Clone)]
pub struct InterruptFlag {
    rx: watch::Receiver<bool>,
}

impl InterruptFlag {
    /// Install the SIGINT listener. Must be called inside a tokio runtime.
    pub fn listen() -> Result<Self> {
        let (tx, rx) = watch::channel(false);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            // Registered here rather than in the task so no signal can slip
            // past before the task is first polled.
            let mut sigint = signal(SignalKind::interrupt())?;
            tokio::spawn(async move {
                if sigint.recv().await.is_some() {
                    warn!("received SIGINT");
                    let _ = tx.send(true);
                }
            });
        }

        #[cfg(not(unix))]
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("received Ctrl-C");
                    let _ = tx.send(true);
                }
                Err(err) => warn!(error = %err, "failed to listen for Ctrl-C"),
            }
        });

        Ok(Self { rx })
    }

    /// Flag driven by the returned sender instead of a signal.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_set(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the flag is set; pends forever if the listener is gone.
    pub async fn triggered(&mut self) {
        let closed = self.rx.wait_for(|set| *set).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

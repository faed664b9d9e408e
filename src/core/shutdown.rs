//! Signal-driven shutdown for the scanner loop
//!
//! The first SIGINT/SIGTERM/SIGHUP/SIGQUIT broadcasts a shutdown so the loop
//! can abort its in-flight request and restore the terminal. A second signal
//! exits immediately with status 130.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        (Self { shutdown_tx }, shutdown_rx)
    }

    /// Run `future_fn` with signal handlers installed, handing it the
    /// shutdown receiver.
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();
        install_signal_handlers(coordinator.shutdown_tx.clone());
        future_fn(shutdown_rx).await
    }
}

fn record_signal(tx: &broadcast::Sender<()>, signal_count: &AtomicUsize) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    let _ = tx.send(());
    if prev >= 1 {
        log::warn!("Second interrupt received; exiting");
        std::process::exit(130);
    }
}

fn install_signal_handlers(shutdown_tx: broadcast::Sender<()>) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        // Restore default SIGPIPE so `teamscan | head` ends quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let counter = signal_count.clone();
            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        record_signal(&tx, &counter);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                record_signal(&shutdown_tx, &signal_count);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_first_signal_broadcasts_shutdown() {
        let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
        let signal_count = AtomicUsize::new(0);

        record_signal(&coordinator.shutdown_tx, &signal_count);

        assert_eq!(signal_count.load(Ordering::Acquire), 1);
        assert!(timeout(Duration::from_millis(100), shutdown_rx.recv())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_guard_returns_inner_result() {
        let result = ShutdownCoordinator::guard(|mut shutdown_rx| async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(20)) => Ok::<u32, &str>(7),
                _ = shutdown_rx.recv() => Err("shut down"),
            }
        })
        .await;

        assert_eq!(result, Ok(7));
    }
}

//! Cancellation: signal delivery and the cancellable sleep used at every
//! suspension point of a run.
//!
//! A single [`CancellationToken`] is created by the caller and handed to the
//! run controller. SIGINT/SIGTERM cancel it; sleeps and in-flight fetches
//! observe it and unwind to the lock-releasing cleanup.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleep for `duration` unless `cancel` fires first.
/// Returns `true` if the full duration elapsed, `false` if cancelled.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Spawns a task that cancels `cancel` on ctrl-c or SIGTERM.
///
/// On unix the handlers are installed before this returns, so a signal that
/// lands before the task is first polled is still observed.
pub fn spawn_signal_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    #[cfg(unix)]
    let signals = unix::ShutdownSignals::install();

    tokio::spawn(async move {
        #[cfg(unix)]
        let received = signals.recv();

        #[cfg(not(unix))]
        let received = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = received => {},
            _ = cancel.cancelled() => return,
        }

        tracing::warn!("shutdown signal received, stopping after cleanup");
        cancel.cancel();
    })
}

#[cfg(unix)]
mod unix {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    pub(super) struct ShutdownSignals {
        interrupt: Option<Signal>,
        terminate: Option<Signal>,
    }

    fn install_one(kind: SignalKind, name: &str) -> Option<Signal> {
        match signal(kind) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("{} handler unavailable: {}", name, e);
                None
            }
        }
    }

    async fn wait(sig: Option<Signal>) {
        match sig {
            Some(mut s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    impl ShutdownSignals {
        pub(super) fn install() -> Self {
            Self {
                interrupt: install_one(SignalKind::interrupt(), "SIGINT"),
                terminate: install_one(SignalKind::terminate(), "SIGTERM"),
            }
        }

        /// Resolves on the first SIGINT or SIGTERM.
        pub(super) async fn recv(self) {
            tokio::select! {
                _ = wait(self.interrupt) => {},
                _ = wait(self.terminate) => {},
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_runs_to_completion_without_cancel() {
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();
        assert!(sleep_or_cancel(Duration::from_secs(120), &token).await);
        assert!(start.elapsed() >= Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_sleep() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            child.cancel();
        });
        let start = tokio::time::Instant::now();
        assert!(!sleep_or_cancel(Duration::from_secs(300), &token).await);
        assert!(start.elapsed() < Duration::from_secs(300));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_before_first_poll_cancels() {
        let token = CancellationToken::new();
        let handle = spawn_signal_listener(token.clone());
        // Current-thread runtime: the listener task has not run yet.
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
        tokio::time::timeout(Duration::from_secs(10), token.cancelled())
            .await
            .expect("token cancelled by SIGTERM");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!sleep_or_cancel(Duration::from_secs(3600), &token).await);
    }
}

//! Background polling loop.
//!
//! A cancellable periodic task with an explicit stop signal. The tick body
//! is intentionally minimal; the loop exists to carry the start/stop
//! lifecycle exposed on the control surface.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::lifecycle::shutdown::Shutdown;

struct ActiveLoop {
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

/// Start/stop handle for the background polling loop.
pub struct Poller {
    tick: Duration,
    active: Mutex<Option<ActiveLoop>>,
}

impl Poller {
    /// Create a poller with the given tick interval.
    pub fn new(tick: Duration) -> Self {
        Self { tick, active: Mutex::new(None) }
    }

    /// Start the loop. Returns false if it is already running.
    pub fn start(&self) -> bool {
        let mut active = self.active.lock().expect("poller lock poisoned");
        if active.as_ref().is_some_and(|a| !a.handle.is_finished()) {
            return false;
        }

        let shutdown = Shutdown::new();
        let mut stop = shutdown.subscribe();
        let tick = self.tick;

        let handle = tokio::spawn(async move {
            tracing::info!(interval_secs = tick.as_secs(), "Polling loop started");
            let mut ticker = interval(tick);
            // The first tick fires immediately; consume it so the loop idles
            // a full interval before the first poll.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tracing::debug!("Polling loop tick");
                    }
                    _ = stop.recv() => {
                        tracing::info!("Polling loop stopped");
                        break;
                    }
                }
            }
        });

        *active = Some(ActiveLoop { shutdown, handle });
        true
    }

    /// Signal the loop to stop. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let mut active = self.active.lock().expect("poller lock poisoned");
        match active.take() {
            Some(a) => {
                a.shutdown.trigger();
                true
            }
            None => false,
        }
    }

    /// Whether the loop is currently running.
    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .expect("poller lock poisoned")
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(a) = active.take() {
                a.shutdown.trigger();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let poller = Poller::new(Duration::from_secs(60));

        assert!(!poller.is_running());
        assert!(poller.start());
        assert!(poller.is_running());

        // Second start is rejected while running.
        assert!(!poller.start());

        assert!(poller.stop());
        // Second stop is a no-op.
        assert!(!poller.stop());
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let poller = Poller::new(Duration::from_secs(60));
        assert!(poller.start());
        assert!(poller.stop());
        assert!(poller.start());
        assert!(poller.stop());
    }
}

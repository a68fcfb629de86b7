//! Refresh ticks for periodically re-fetched views

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

/// Refresher worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Time between automatic ticks
    pub interval: Duration,

    /// Delay before the first automatic tick
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            initial_delay: Duration::from_secs(5),
        }
    }
}

/// Source of monotonically increasing refresh ticks
///
/// Subscribers see the latest tick only; ticks that arrive faster than a
/// subscriber reads them collapse into one.
#[derive(Debug)]
pub struct Refresher {
    tick: watch::Sender<u64>,
}

impl Default for Refresher {
    fn default() -> Self {
        Self::new()
    }
}

impl Refresher {
    pub fn new() -> Self {
        let (tick, _) = watch::channel(0);
        Self { tick }
    }

    /// Request a refresh; returns the new tick
    pub fn refresh(&self) -> u64 {
        self.tick.send_modify(|tick| *tick += 1);
        self.current()
    }

    pub fn current(&self) -> u64 {
        *self.tick.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tick.subscribe()
    }
}

/// Tick the refresher on a fixed interval until shutdown
pub async fn run<S, F>(
    options: &Options,
    refresher: &Refresher,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Refresher worker starting...");

    tokio::select! {
        _ = &mut shutdown_signal => {
            info!("Refresher worker shutting down...");
            return;
        }
        _ = sleep_fn(options.initial_delay) => {}
    }

    loop {
        let tick = refresher.refresh();
        debug!("Refresh tick {}", tick);

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Refresher worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}

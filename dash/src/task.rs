//! Cancellable background tasks and stream subscriptions

use std::future::Future;

use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::errors::DashError;

/// Handle to a spawned task
///
/// `cancel()` (or dropping the handle) stops the task at its next suspension
/// point and drops its future, which releases any connection it holds.
pub struct TaskHandle<T> {
    cancel: CancellationToken,
    join: JoinHandle<Option<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => None,
                output = future => Some(output),
            }
        });
        Self { cancel, join }
    }
}

impl<T> TaskHandle<T> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task; `None` when it was cancelled before finishing
    pub async fn join(mut self) -> Option<T> {
        match (&mut self.join).await {
            Ok(output) => output,
            Err(e) => {
                error!("Task failed: {}", e);
                None
            }
        }
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Drive `stream` in the background, handing every item to `on_next`
///
/// The task ends with `Ok(())` when the stream completes and with the first
/// error otherwise. Cancelling the handle unsubscribes and drops the stream.
pub fn subscribe<S, T, F>(stream: S, mut on_next: F) -> TaskHandle<Result<(), DashError>>
where
    S: Stream<Item = Result<T, DashError>> + Send + 'static,
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    TaskHandle::spawn(async move {
        let mut stream = std::pin::pin!(stream);
        while let Some(item) = stream.next().await {
            on_next(item?);
        }
        debug!("Subscription completed");
        Ok(())
    })
}

//! Cancellable background fetch tasks.
//!
//! Each screen's data load is modelled as a `FetchTask` tied to the screen's
//! visible lifetime: the fetch runs on the runtime and delivers its result
//! over a channel, and dropping the task (screen unmount) aborts the
//! in-flight request so its result is never observed afterwards.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::ApiError;

/// Channel capacity; each task delivers exactly one result.
const RESULT_CHANNEL_SIZE: usize = 1;

pub struct FetchTask<T> {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<Result<T, ApiError>>,
}

impl<T: Send + 'static> FetchTask<T> {
    /// Spawn a fetch future on the runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(RESULT_CHANNEL_SIZE);
        let handle = tokio::spawn(async move {
            let result = future.await;
            // Receiver may already be gone if the screen unmounted
            let _ = tx.send(result).await;
        });
        Self { handle, rx }
    }

    /// Poll for a completed result without blocking.
    /// Returns `None` while the fetch is still in flight.
    pub fn try_result(&mut self) -> Option<Result<T, ApiError>> {
        self.rx.try_recv().ok()
    }

    /// Await the result. `None` means the task was aborted before it
    /// delivered anything.
    pub async fn result(mut self) -> Option<Result<T, ApiError>> {
        self.rx.recv().await
    }

    /// Explicitly cancel the in-flight fetch.
    pub fn abort(&self) {
        debug!("Aborting in-flight fetch task");
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Drop for FetchTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

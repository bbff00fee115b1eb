/// Deferred holds at most one scheduled continuation. Scheduling a new one or dropping the
/// holder aborts whatever was still waiting.
use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct Deferred {
    handle: Option<JoinHandle<()>>,
}

impl Deferred {
    pub fn new() -> Deferred {
        Deferred::default()
    }

    /// `schedule` runs `task` on the tokio runtime once `delay` has elapsed, replacing
    /// (and aborting) any continuation that is still pending.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// `cancel` aborts the pending continuation, if any. Returns true if one was aborted
    /// before it finished.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}

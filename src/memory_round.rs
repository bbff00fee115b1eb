/// MemoryRound drives a memory `Board` for a host that must stay responsive: after the
/// second tile of an attempt is opened, the comparison is applied by a deferred task once
/// the flip delay has passed, and the host is told about it through a callback.
use std::{
    future::Future,
    sync::{Arc, Weak},
    time::Duration,
};

use log::*;
use tokio::sync::Mutex;

use crate::{
    deferred::Deferred,
    error::GameError,
    memory::{Board, Flip, Resolution},
};

/// Default pause between the second flip and its resolution.
pub const FLIP_DELAY: Duration = Duration::from_millis(900);

struct Inner {
    board: Board,
    pending: Deferred,
    // Bumped on every restart so a continuation scheduled for an earlier board is dropped.
    generation: u64,
}

/// MemoryRound is cheap to clone; clones share the same board.
#[derive(Clone)]
pub struct MemoryRound {
    inner: Arc<Mutex<Inner>>,
    delay: Duration,
}

impl MemoryRound {
    pub fn new(board: Board, delay: Duration) -> MemoryRound {
        MemoryRound {
            inner: Arc::new(Mutex::new(Inner {
                board,
                pending: Deferred::new(),
                generation: 0,
            })),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// `board` returns a snapshot of the current board.
    pub async fn board(&self) -> Board {
        self.inner.lock().await.board.clone()
    }

    pub async fn is_resolving(&self) -> bool {
        self.inner.lock().await.pending.is_pending()
    }

    /// `open` flips the tile at `position`. When it is the second tile of an attempt, the
    /// resolution is scheduled and `on_resolved` is called with its result and the board
    /// after it has been applied. `on_resolved` runs on its own task, so a restart or a
    /// later attempt only cancels resolutions that have not been applied yet.
    pub async fn open<F, Fut>(
        &self,
        position: usize,
        on_resolved: F,
    ) -> Result<(Flip, Board), GameError>
    where
        F: FnOnce(Resolution, Board) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.inner.lock().await;
        let flip = inner.board.open(position)?;

        if flip == Flip::Pending {
            let generation = inner.generation;
            let shared = Arc::downgrade(&self.inner);
            inner
                .pending
                .schedule(self.delay, resolve_later(shared, generation, on_resolved));
        }

        Ok((flip, inner.board.clone()))
    }

    /// `restart` swaps in a fresh board and cancels any resolution still pending against
    /// the old one.
    pub async fn restart(&self, board: Board) {
        let mut inner = self.inner.lock().await;
        if inner.pending.cancel() {
            debug!("cancelled pending memory resolution on restart");
        }
        inner.generation += 1;
        inner.board = board;
    }

    /// `stop` cancels any pending resolution and keeps the board as it is.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.pending.cancel();
        inner.generation += 1;
    }
}

async fn resolve_later<F, Fut>(shared: Weak<Mutex<Inner>>, generation: u64, on_resolved: F)
where
    F: FnOnce(Resolution, Board) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let (resolution, board) = {
        let mut inner = shared.lock().await;
        if inner.generation != generation {
            debug!("skipping stale memory resolution");
            return;
        }
        match inner.board.resolve() {
            Some(resolution) => (resolution, inner.board.clone()),
            None => return,
        }
    };
    drop(shared);

    // The outcome is applied; its delivery must outlive the next attempt's timer.
    tokio::spawn(on_resolved(resolution, board));
}

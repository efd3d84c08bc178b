//! Collective rendezvous and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};

/// A reusable all-workers rendezvous.
///
/// `wait` blocks until every participant has called it for the current
/// round, then releases all of them. Exactly one caller per round gets
/// `true` back (the leader), which is how one-per-phase bookkeeping is
/// done without another lock.
pub trait Rendezvous {
    fn wait(&self) -> bool;
}

impl Rendezvous for Barrier {
    fn wait(&self) -> bool {
        Barrier::wait(self).is_leader()
    }
}

impl<R: Rendezvous + ?Sized> Rendezvous for &R {
    fn wait(&self) -> bool {
        (**self).wait()
    }
}

/// Shared flag asking a run to stop after the current phase.
///
/// Cloning hands out another handle to the same flag, so the caller keeps
/// one and passes one to [`crate::run_with`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

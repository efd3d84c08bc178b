//! Barrier-synchronized phase loop.
//!
//! Every worker runs the same state machine:
//!
//! ```text
//!   Compute(k) -> ComputeBarrier(k) -> CopyBack(k) -> CopyBarrier(k) -+
//!       ^                                                              |
//!       +------------------- k + 1 < iterations ----------------------+
//!                                                                      |
//!                                  Done <---- otherwise / cancelled ---+
//! ```
//!
//! The first barrier keeps a fast worker from copying a C tile that is
//! still being written. The second keeps it from reading A for phase
//! `k + 1` while a slow worker is still copying phase `k` into it.
//!
//! A worker that never reaches a barrier (it panicked, or was handed an
//! out-of-range tile) leaves the others blocked forever. There is no
//! recovery from that.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::{trace, warn};

use super::barrier::{CancelToken, Rendezvous};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Compute(usize),
    ComputeBarrier(usize),
    CopyBack(usize),
    CopyBarrier(usize),
    Done,
}

impl PhaseState {
    pub const START: PhaseState = PhaseState::Compute(0);

    /// Transition taken after the current state's work is finished.
    pub fn next(self, iterations: usize) -> PhaseState {
        match self {
            PhaseState::Compute(k) => PhaseState::ComputeBarrier(k),
            PhaseState::ComputeBarrier(k) => PhaseState::CopyBack(k),
            PhaseState::CopyBack(k) => PhaseState::CopyBarrier(k),
            PhaseState::CopyBarrier(k) if k + 1 < iterations => PhaseState::Compute(k + 1),
            PhaseState::CopyBarrier(_) | PhaseState::Done => PhaseState::Done,
        }
    }
}

/// Per-worker work for one phase.
pub trait PhaseWork {
    /// Fill this worker's tile of C from the current A and B.
    fn compute(&mut self, phase: usize);

    /// Copy this worker's share of C back into A.
    fn copy_back(&mut self, phase: usize);
}

/// Shared by every worker of a run; each calls [`PhaseController::drive`]
/// with its own [`PhaseWork`].
pub struct PhaseController<R> {
    rendezvous: R,
    iterations: usize,
    cancel: CancelToken,
    halt: AtomicBool,
    completed: AtomicUsize,
}

impl<R: Rendezvous> PhaseController<R> {
    pub fn new(rendezvous: R, iterations: usize, cancel: CancelToken) -> Self {
        Self {
            rendezvous,
            iterations,
            cancel,
            halt: AtomicBool::new(false),
            completed: AtomicUsize::new(0),
        }
    }

    /// Runs the phase loop for one worker. Returns the number of phases
    /// this worker finished, which is the same for every worker.
    ///
    /// The cancel token is sampled once per phase by the leader of the
    /// first barrier and published before the second barrier, so all
    /// workers see the same decision after it and leave together. A
    /// cancelled run still finishes the copy-back of the phase it was in.
    /// The final phase ignores the token, so a run that did every phase is
    /// never reported as halted.
    pub fn drive<W: PhaseWork>(&self, work: &mut W) -> usize {
        let mut state = PhaseState::START;
        let mut finished = 0;

        loop {
            state = match state {
                PhaseState::Compute(k) => {
                    work.compute(k);
                    state.next(self.iterations)
                }
                PhaseState::ComputeBarrier(k) => {
                    let last = k + 1 == self.iterations;
                    if self.rendezvous.wait() && !last && self.cancel.is_cancelled() {
                        self.halt.store(true, Ordering::Release);
                    }
                    state.next(self.iterations)
                }
                PhaseState::CopyBack(k) => {
                    work.copy_back(k);
                    state.next(self.iterations)
                }
                PhaseState::CopyBarrier(k) => {
                    let leader = self.rendezvous.wait();
                    finished = k + 1;
                    if leader {
                        self.completed.store(finished, Ordering::Release);
                        trace!(phase = k, "phase complete");
                    }
                    if self.halt.load(Ordering::Acquire) {
                        if leader {
                            warn!(phase = k, "run cancelled");
                        }
                        PhaseState::Done
                    } else {
                        state.next(self.iterations)
                    }
                }
                PhaseState::Done => break,
            };
        }

        finished
    }

    /// Phases completed by the run so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Whether the run stopped early on a cancel request.
    pub fn halted(&self) -> bool {
        self.halt.load(Ordering::Acquire)
    }
}

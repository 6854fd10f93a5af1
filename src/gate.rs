//! Sharpness gating for frame streams
//!
//! A `FrameGate` sits between a capture source and a downstream consumer:
//! frames go in, only frames whose Laplacian response clears the evaluator's
//! threshold come out. Evaluation runs on a pool of worker threads fed by a
//! bounded channel, so a slow consumer or a frame burst degrades by dropping
//! frames instead of growing memory without bound.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::sharpness::{SharpnessEvaluator, SharpnessResult};
use crate::types::LumaFrame;

/// Maximum frames queued ahead of the workers before `submit` starts
/// shedding. At 30 fps this is about two seconds of video.
pub const DEFAULT_MAX_PENDING_FRAMES: usize = 64;

/// Default number of evaluation workers.
pub const DEFAULT_WORKERS: usize = 2;

/// A frame that cleared the gate, paired with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatedFrame {
    pub frame: LumaFrame,
    pub result: SharpnessResult,
}

/// Monotonic gate counters. Shared between workers and callers.
#[derive(Debug, Default)]
pub struct GateStats {
    submitted: AtomicU64,
    passed: AtomicU64,
    rejected: AtomicU64,
    dropped: AtomicU64,
}

impl GateStats {
    pub fn snapshot(&self) -> GateStatsSnapshot {
        GateStatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the gate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStatsSnapshot {
    /// Frames accepted by `submit`
    pub submitted: u64,
    /// Frames that cleared the threshold and were forwarded
    pub passed: u64,
    /// Frames evaluated and discarded
    pub rejected: u64,
    /// Frames shed because a queue was full
    pub dropped: u64,
}

/// Worker-pool frame gate.
pub struct FrameGate {
    input: Option<Sender<LumaFrame>>,
    output: Receiver<GatedFrame>,
    workers: Vec<JoinHandle<()>>,
    is_running: Arc<AtomicBool>,
    stats: Arc<GateStats>,
}

impl FrameGate {
    /// Gate with default worker count and queue depth.
    pub fn new(evaluator: SharpnessEvaluator) -> Self {
        Self::with_capacity(evaluator, DEFAULT_WORKERS, DEFAULT_MAX_PENDING_FRAMES)
    }

    /// Gate with explicit worker count and input queue depth.
    ///
    /// `workers` and `max_pending` are clamped to at least 1.
    pub fn with_capacity(
        evaluator: SharpnessEvaluator,
        workers: usize,
        max_pending: usize,
    ) -> Self {
        let workers = workers.max(1);
        let max_pending = max_pending.max(1);

        let (input_tx, input_rx) = crossbeam_channel::bounded::<LumaFrame>(max_pending);
        let (output_tx, output_rx) = crossbeam_channel::bounded::<GatedFrame>(max_pending);
        let is_running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(GateStats::default());

        log::info!(
            "Starting frame gate: {} workers, threshold {}, queue depth {}",
            workers,
            evaluator.threshold(),
            max_pending
        );

        let handles = (0..workers)
            .map(|worker_id| {
                let input = input_rx.clone();
                let output = output_tx.clone();
                let stats = stats.clone();
                std::thread::Builder::new()
                    .name(format!("sharpgate-worker-{}", worker_id))
                    .spawn(move || worker_loop(worker_id, evaluator, input, output, stats))
                    .expect("failed to spawn gate worker")
            })
            .collect();

        Self {
            input: Some(input_tx),
            output: output_rx,
            workers: handles,
            is_running,
            stats,
        }
    }

    /// Submit a frame for evaluation without blocking.
    ///
    /// Returns false if the gate is stopped or the input queue is full; a
    /// full queue counts the frame as dropped.
    pub fn submit(&self, frame: LumaFrame) -> bool {
        if !self.is_running.load(Ordering::Relaxed) {
            return false;
        }
        let sender = match &self.input {
            Some(s) => s,
            None => return false,
        };
        match sender.try_send(frame) {
            Ok(()) => {
                self.stats.submitted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(frame)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("Gate input queue full, dropping frame {}", frame.id);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Take the next passed frame if one is ready.
    pub fn try_next(&self) -> Option<GatedFrame> {
        self.output.try_recv().ok()
    }

    /// Wait up to `timeout` for the next passed frame.
    pub fn next_timeout(&self, timeout: Duration) -> Option<GatedFrame> {
        match self.output.recv_timeout(timeout) {
            Ok(frame) => Some(frame),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn stats(&self) -> GateStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Stop accepting frames, drain the queue, and join the workers.
    /// Idempotent.
    pub fn stop(&mut self) {
        if !self.is_running.swap(false, Ordering::Relaxed) {
            return;
        }
        // Closing the input channel lets each worker drain and exit.
        self.input.take();
        for handle in self.workers.drain(..) {
            if let Err(e) = handle.join() {
                log::error!("Gate worker panicked: {:?}", e);
            }
        }
        let stats = self.stats.snapshot();
        log::info!(
            "Frame gate stopped: {} submitted, {} passed, {} rejected, {} dropped",
            stats.submitted,
            stats.passed,
            stats.rejected,
            stats.dropped
        );
    }
}

impl Drop for FrameGate {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    worker_id: usize,
    evaluator: SharpnessEvaluator,
    input: Receiver<LumaFrame>,
    output: Sender<GatedFrame>,
    stats: Arc<GateStats>,
) {
    log::debug!("Gate worker {} started", worker_id);

    // Runs until the input side is closed; pending frames are drained first.
    while let Ok(frame) = input.recv() {
        let result = evaluator.evaluate(&frame.buffer.as_plane());

        if result.passed {
            stats.passed.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "Frame {} passed: std_dev {:.2} ({:?})",
                frame.id,
                result.std_dev,
                result.level
            );
            match output.try_send(GatedFrame { frame, result }) {
                Ok(()) => {}
                Err(TrySendError::Full(gated)) => {
                    stats.dropped.fetch_add(1, Ordering::Relaxed);
                    log::warn!(
                        "Gate output queue full, dropping passed frame {}",
                        gated.frame.id
                    );
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        } else {
            stats.rejected.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "Frame {} rejected: std_dev {:.2} <= threshold {:.2}",
                frame.id,
                result.std_dev,
                evaluator.threshold()
            );
        }
    }

    log::debug!("Gate worker {} exiting", worker_id);
}

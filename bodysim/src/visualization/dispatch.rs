//! Hand snapshots to a rendering worker pool
//!
//! The physics thread calls `submit` with an owned snapshot and carries on.
//! Each task renders its snapshot on a rayon worker and reports back over a
//! channel. At most `max_in_flight` tasks are outstanding: `submit` blocks on
//! the completion channel once that many are queued or running. `finish`
//! blocks until every submitted task has reported.
//!
//! Completion order is whatever the pool produces; frame files are keyed by
//! step index so order does not matter downstream.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use super::renderer::FrameRenderer;
use crate::error::{Error, Result};
use crate::simulation::states::Snapshot;

/// Outcome of one render task
#[derive(Debug)]
struct FrameOutcome {
    frame: usize,
    result: Result<PathBuf>,
}

/// Totals for the frames handled by a dispatcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub submitted: usize,
    pub rendered: usize,
    pub failed: Vec<usize>, // frame indices that could not be rendered
}

pub struct RenderDispatcher {
    pool: ThreadPool,
    renderer: Arc<dyn FrameRenderer>,
    done_tx: Sender<FrameOutcome>,
    done_rx: Receiver<FrameOutcome>,
    in_flight: usize,
    max_in_flight: usize,
    report: RenderReport,
}

/// Worker count matching the available hardware parallelism
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl RenderDispatcher {
    /// Pool of `workers` threads (hardware parallelism when `None`) with at most
    /// `max_in_flight` outstanding tasks (four per worker when `None`)
    pub fn new(
        renderer: Arc<dyn FrameRenderer>,
        workers: Option<usize>,
        max_in_flight: Option<usize>,
    ) -> Result<Self> {
        let workers = workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(Error::config("render workers must be > 0"));
        }
        let max_in_flight = max_in_flight.unwrap_or(workers * 4);
        if max_in_flight == 0 {
            return Err(Error::config("max_in_flight must be > 0"));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("render-{i}"))
            .build()?;
        let (done_tx, done_rx) = unbounded();

        Ok(Self {
            pool,
            renderer,
            done_tx,
            done_rx,
            in_flight: 0,
            max_in_flight,
            report: RenderReport::default(),
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Queue `snapshot` for rendering, waiting for a free slot first
    pub fn submit(&mut self, snapshot: Snapshot) {
        while self.in_flight >= self.max_in_flight {
            if !self.reap_one() {
                break;
            }
        }

        let renderer = Arc::clone(&self.renderer);
        let tx = self.done_tx.clone();
        let frame = snapshot.frame;
        self.pool.spawn(move || {
            // A panicking renderer still reports, so `finish` never waits on it
            let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&snapshot)))
                .unwrap_or_else(|_| {
                    Err(Error::Render {
                        frame,
                        message: "renderer panicked".into(),
                    })
                });
            // The dispatcher holds a receiver until every task has reported
            let _ = tx.send(FrameOutcome { frame, result });
        });

        self.in_flight += 1;
        self.report.submitted += 1;
    }

    /// Block until every submitted frame has been rendered or has failed
    pub fn finish(mut self) -> RenderReport {
        while self.in_flight > 0 {
            if !self.reap_one() {
                break;
            }
        }
        self.report
    }

    /// Wait for one task to report. Returns `false` if the channel is closed.
    fn reap_one(&mut self) -> bool {
        match self.done_rx.recv() {
            Ok(outcome) => {
                self.in_flight -= 1;
                self.record(outcome);
                true
            }
            Err(_) => {
                warn!(in_flight = self.in_flight, "render channel closed with tasks outstanding");
                self.in_flight = 0;
                false
            }
        }
    }

    fn record(&mut self, outcome: FrameOutcome) {
        match outcome.result {
            Ok(path) => {
                debug!(frame = outcome.frame, path = %path.display(), "frame rendered");
                self.report.rendered += 1;
            }
            Err(e) => {
                warn!(frame = outcome.frame, error = %e, "frame render failed");
                self.report.failed.push(outcome.frame);
            }
        }
    }
}

//! Coalesced render requests.
//!
//! A single pending slot holds the most recent request. A newer request
//! replaces the slot and cancels the one it displaced, so only the latest
//! request ever starts. A render that has already started runs to completion;
//! its output carries a generation number so the caller can discard it if a
//! newer request has been issued since.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::filters::Filter;
use crate::image::Raster;
use crate::pipeline::{render, render_with_rng};
use crate::transform::params::EditParameters;

/// Shared flag marking a request as superseded or abandoned.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Everything needed to run one render, owned so it can cross threads.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub source: Arc<Raster>,
    pub params: EditParameters,
    pub filter: Arc<Filter>,
    /// Fixed grain seed; `None` draws from thread-local randomness.
    pub seed: Option<u64>,
}

impl RenderJob {
    pub fn run(&self) -> Raster {
        match self.seed {
            Some(seed) => render_with_rng(
                &self.source,
                &self.params,
                &self.filter,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => render(&self.source, &self.params, &self.filter),
        }
    }
}

/// Handle returned for each request.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub generation: u64,
    pub raster: Raster,
}

#[derive(Debug)]
struct PendingRender {
    generation: u64,
    job: RenderJob,
    token: CancellationToken,
}

impl PendingRender {
    fn execute(self) -> Option<RenderOutput> {
        if self.token.is_cancelled() {
            trace!(generation = self.generation, "skipping cancelled render");
            return None;
        }
        let started = Instant::now();
        let raster = self.job.run();
        debug!(
            generation = self.generation,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "render finished"
        );
        Some(RenderOutput {
            generation: self.generation,
            raster,
        })
    }
}

/// Single-slot pending-request register.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    slot: Mutex<Option<PendingRender>>,
    ready: Condvar,
    generation: AtomicU64,
    shutdown: AtomicBool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `job`, replacing and cancelling any request not yet started.
    pub fn request(&self, job: RenderJob) -> RenderTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let token = CancellationToken::new();
        let pending = PendingRender {
            generation,
            job,
            token: token.clone(),
        };

        let mut slot = self.slot.lock();
        if let Some(old) = slot.replace(pending) {
            old.token.cancel();
            trace!(superseded = old.generation, generation, "render request replaced");
        }
        drop(slot);
        self.ready.notify_one();

        RenderTicket { generation, token }
    }

    /// Run the pending request on the calling thread, if any survives.
    pub fn run_pending(&self) -> Option<RenderOutput> {
        let pending = self.slot.lock().take()?;
        pending.execute()
    }

    /// True if `generation` is the most recently requested one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Cancel the pending request and wake any waiting worker so it can exit.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(old) = self.slot.lock().take() {
            old.token.cancel();
        }
        self.ready.notify_all();
    }

    /// Block until a request is pending or the scheduler shuts down.
    fn wait_pending(&self) -> Option<PendingRender> {
        let mut slot = self.slot.lock();
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }
            if let Some(pending) = slot.take() {
                return Some(pending);
            }
            self.ready.wait(&mut slot);
        }
    }
}

/// Background thread draining a [`RenderScheduler`].
pub struct RenderWorker {
    scheduler: Arc<RenderScheduler>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Start the worker. `deliver` receives every completed render, stale or not.
    pub fn spawn<F>(scheduler: Arc<RenderScheduler>, mut deliver: F) -> std::io::Result<Self>
    where
        F: FnMut(RenderOutput) + Send + 'static,
    {
        let shared = Arc::clone(&scheduler);
        let handle = thread::Builder::new()
            .name("abai-render".into())
            .spawn(move || {
                while let Some(pending) = shared.wait_pending() {
                    if let Some(output) = pending.execute() {
                        deliver(output);
                    }
                }
                debug!("render worker stopped");
            })?;
        Ok(Self {
            scheduler,
            handle: Some(handle),
        })
    }

    pub fn scheduler(&self) -> &Arc<RenderScheduler> {
        &self.scheduler
    }

    /// Stop the worker and wait for any in-flight render to finish.
    pub fn join(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.scheduler.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn job(exposure: f32) -> RenderJob {
        RenderJob {
            source: Arc::new(Raster::filled(4, 4, [50, 50, 50, 255])),
            params: EditParameters {
                exposure,
                ..EditParameters::neutral()
            },
            filter: Arc::new(Filter::identity()),
            seed: Some(1),
        }
    }

    #[test]
    fn test_latest_request_wins() {
        let scheduler = RenderScheduler::new();
        let first = scheduler.request(job(0.0));
        let second = scheduler.request(job(100.0));

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(scheduler.is_current(second.generation));

        let output = scheduler.run_pending().unwrap();
        assert_eq!(output.generation, second.generation);
        assert_eq!(output.raster.pixels[0], [100, 100, 100, 255]);
        assert!(scheduler.run_pending().is_none());
    }

    #[test]
    fn test_cancelled_request_never_starts() {
        let scheduler = RenderScheduler::new();
        let ticket = scheduler.request(job(0.0));
        ticket.token.cancel();
        assert!(scheduler.run_pending().is_none());
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_worker_delivers_output() {
        let scheduler = Arc::new(RenderScheduler::new());
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(Arc::clone(&scheduler), move |out| {
            let _ = tx.send(out);
        })
        .unwrap();

        let ticket = scheduler.request(job(100.0));
        let output = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(output.generation, ticket.generation);
        assert!(scheduler.is_current(output.generation));
        assert_eq!(output.raster.pixels[0], [100, 100, 100, 255]);

        worker.join();
    }
}

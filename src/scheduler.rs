// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns one render request into a set of horizontal bands and runs
//! them on a pool of worker threads.
//!
//! The output buffer is carved into one exclusive slice per band with
//! `split_at_mut` before any thread starts, so no two workers can ever
//! touch the same pixel and no locking is needed around the buffer.
//! The bands travel to the workers over an unbounded crossbeam
//! channel, followed by one `Job::Shutdown` per worker.  The pool is
//! scoped to the request: every worker has been joined by the time
//! `produce` hands the buffer to the caller.

use crossbeam::channel::{self, Receiver};
use log::{debug, info, trace, warn};
use std::mem;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::errors::FractalError;
use crate::newton::NewtonRaphson;
use crate::planes::Viewport;

/// How a request is spread over threads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Worker threads per request.
    pub workers: usize,
    /// Horizontal bands the image is cut into.
    pub tracks: usize,
}

impl SchedulerConfig {
    /// Both counts must be positive.
    pub fn new(workers: usize, tracks: usize) -> Result<Self, FractalError> {
        if workers == 0 {
            return Err(FractalError::NonPositiveCount("worker"));
        }
        if tracks == 0 {
            return Err(FractalError::NonPositiveCount("track"));
        }
        Ok(SchedulerConfig { workers, tracks })
    }
}

impl Default for SchedulerConfig {
    /// One worker per CPU, four bands per worker.
    fn default() -> Self {
        let cpus = num_cpus::get();
        SchedulerConfig {
            workers: cpus,
            tracks: 4 * cpus,
        }
    }
}

/// Splits `height` rows into `min(tracks, height)` contiguous bands
/// of equal height; the last band also takes whatever rows the
/// division leaves over.
pub fn partition(height: usize, tracks: usize) -> Vec<Range<usize>> {
    let bands = tracks.min(height);
    if bands == 0 {
        return vec![];
    }
    let size = height / bands;
    (0..bands)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == bands { height } else { start + size };
            start..end
        })
        .collect()
}

// A run of rows and the part of the output buffer that holds them.
// `pixels` has exactly `rows.len() * width` slots.
#[derive(Debug)]
struct Band<'a> {
    rows: Range<usize>,
    pixels: &'a mut [u16],
}

/// What travels down the queue to a worker.
#[derive(Debug)]
enum Job<'a> {
    /// Render these rows.
    Band(Band<'a>),
    /// Leave the work loop.  Each worker receives exactly one.
    Shutdown,
}

/// Cuts `buffer` into one band per row range.  The ranges must be
/// contiguous from row 0, as `partition` produces them.
fn carve<'a>(buffer: &'a mut [u16], width: usize, ranges: &[Range<usize>]) -> Vec<Band<'a>> {
    let mut rest = buffer;
    ranges
        .iter()
        .map(|rows| {
            let (pixels, tail) = mem::take(&mut rest).split_at_mut(rows.len() * width);
            rest = tail;
            Band {
                rows: rows.clone(),
                pixels,
            }
        })
        .collect()
}

fn work(
    id: usize,
    newton: &NewtonRaphson,
    viewport: &Viewport,
    jobs: Receiver<Job>,
    cancel: &AtomicBool,
) {
    let mut rendered = 0;
    loop {
        match jobs.recv() {
            Ok(Job::Band(band)) => {
                let rows = band.rows.clone();
                let done = newton.render_rows(viewport, band.rows, band.pixels, cancel);
                if done < rows.len() {
                    debug!("worker {}: band {:?} stopped after {} rows", id, rows, done);
                } else {
                    trace!("worker {}: band {:?} done", id, rows);
                }
                rendered += 1;
            }
            // A closed channel only happens if the producer went away;
            // treat it like the pill.
            Ok(Job::Shutdown) | Err(_) => break,
        }
    }
    debug!("worker {}: shutting down after {} bands", id, rendered);
}

/// Something that can fill a pixel buffer for a viewport.  This is the
/// boundary a viewer talks to.
pub trait FractalProducer {
    /// Renders `viewport` and, once every pixel that is going to be
    /// written has been, calls `on_result(buffer, num_colors,
    /// request_id)` exactly once.  Returns only after that.  Setting
    /// `cancel` makes the render stop early; the callback still fires,
    /// with a partially written buffer.
    fn produce<F>(
        &self,
        viewport: &Viewport,
        request_id: u64,
        cancel: &AtomicBool,
        on_result: F,
    ) -> Result<(), FractalError>
    where
        F: FnOnce(Vec<u16>, usize, u64);
}

/// Renders with a fresh pool of `workers` threads per request.
#[derive(Clone, Debug)]
pub struct ParallelProducer {
    newton: NewtonRaphson,
    config: SchedulerConfig,
}

impl ParallelProducer {
    /// Both arguments are already validated by their constructors.
    pub fn new(newton: NewtonRaphson, config: SchedulerConfig) -> Self {
        ParallelProducer { newton, config }
    }

    /// The iteration every worker runs.
    pub fn newton(&self) -> &NewtonRaphson {
        &self.newton
    }

    /// The thread and band counts.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl FractalProducer for ParallelProducer {
    fn produce<F>(
        &self,
        viewport: &Viewport,
        request_id: u64,
        cancel: &AtomicBool,
        on_result: F,
    ) -> Result<(), FractalError>
    where
        F: FnOnce(Vec<u16>, usize, u64),
    {
        let started = Instant::now();
        let ranges = partition(viewport.height, self.config.tracks);
        let workers = self.config.workers;
        info!(
            "request {}: {}x{} in {} bands on {} workers",
            request_id,
            viewport.width,
            viewport.height,
            ranges.len(),
            workers
        );
        trace!("request {}: bands {:?}", request_id, ranges);

        let mut buffer = vec![0 as u16; viewport.len()];
        let bands = carve(&mut buffer, viewport.width, &ranges);
        let newton = &self.newton;

        crossbeam::scope(|scope| {
            let (sender, receiver) = channel::unbounded();
            for band in bands {
                // The receiver is still alive here, so this cannot fail.
                let _ = sender.send(Job::Band(band));
            }
            for id in 0..workers {
                let jobs = receiver.clone();
                scope.spawn(move |_| work(id, newton, viewport, jobs, cancel));
            }
            drop(receiver);
            for _ in 0..workers {
                if sender.send(Job::Shutdown).is_err() {
                    warn!("request {}: every worker is already gone", request_id);
                    break;
                }
            }
        })
        .map_err(|_| FractalError::WorkerPanicked)?;

        if cancel.load(Ordering::SeqCst) {
            warn!("request {}: cancelled, buffer may be incomplete", request_id);
        }
        info!(
            "request {}: finished in {:.1?}",
            request_id,
            started.elapsed()
        );
        on_result(buffer, self.newton.num_colors(), request_id);
        Ok(())
    }
}

//! Batched, bounded-concurrency execution
//!
//! ```text
//! items ─► [batch 0] ─► [batch 1] ─► ... (strictly sequential)
//!             │
//!             └─ up to `concurrency` items in flight (rayon pool)
//! ```
//!
//! Batches are handed to the caller in order, so progress is monotonic and
//! reproducible for a fixed batch size. Cancellation is polled before every
//! item: items already running finish, nothing new is started, and the run
//! reports itself as incomplete.

use crate::config::AggregationConfig;
use crate::errors::{GraphError, Result};
use crate::shared::cancellation::CancellationToken;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Progress reported at a batch boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub percentage: f64,
}

impl Progress {
    fn new(processed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            100.0
        } else {
            processed as f64 * 100.0 / total as f64
        };
        Self {
            processed,
            total,
            percentage,
        }
    }
}

/// Optional hooks for one aggregation run
#[derive(Default)]
pub struct AggregateOptions<'a> {
    pub cancel: Option<CancellationToken>,
    /// Invoked once per finished batch, never with `processed > total`
    pub progress: Option<Box<dyn FnMut(Progress) + 'a>>,
}

impl<'a> AggregateOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn on_progress(mut self, callback: impl FnMut(Progress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BatchOutcome {
    pub processed: usize,
    pub batches: usize,
    pub complete: bool,
    pub elapsed: Duration,
}

/// Run `work` over `items` batch by batch, handing each batch's results
/// (in input order) to `on_batch`.
///
/// The first `work` error aborts the run; later batches are not started.
pub(crate) fn run_batches<T, R, W, C>(
    items: &[T],
    config: &AggregationConfig,
    options: &mut AggregateOptions<'_>,
    work: W,
    mut on_batch: C,
) -> Result<BatchOutcome>
where
    T: Sync,
    R: Send,
    W: Fn(&T) -> Result<R> + Sync,
    C: FnMut(Vec<R>),
{
    config.validate()?;

    let start = Instant::now();
    let total = items.len();
    let concurrency = config.effective_concurrency();
    let threshold = config.slow_document_threshold;

    tracing::info!(
        "Aggregation started: {} items, batch_size={}, concurrency={}",
        total,
        config.batch_size,
        concurrency
    );

    let executor = Executor::new(concurrency)?;
    let mut processed = 0usize;
    let mut batches = 0usize;
    let mut complete = true;

    for (batch_idx, batch) in items.chunks(config.batch_size).enumerate() {
        if options.is_cancelled() {
            complete = false;
            break;
        }

        let offset = batch_idx * config.batch_size;
        let cancel = options.cancel.clone();

        let timed = |(i, item): (usize, &T)| -> Result<Option<R>> {
            if cancel.as_ref().map_or(false, CancellationToken::is_cancelled) {
                return Ok(None);
            }
            let started = Instant::now();
            let result = work(item)?;
            let took = started.elapsed();
            if took > threshold {
                tracing::warn!(
                    "Slow item {} took {}ms (threshold {}ms)",
                    offset + i,
                    took.as_millis(),
                    threshold.as_millis()
                );
            }
            Ok(Some(result))
        };

        let results = executor.run(batch, timed)?;
        let attempted = results.len();
        let done: Vec<R> = results.into_iter().flatten().collect();

        processed += done.len();
        batches += 1;
        if done.len() < attempted {
            complete = false;
        }

        tracing::debug!(
            "Batch {} finished: {}/{} items ({} total)",
            batch_idx,
            done.len(),
            attempted,
            processed
        );

        on_batch(done);
        if let Some(progress) = options.progress.as_mut() {
            progress(Progress::new(processed, total));
        }

        if !complete {
            break;
        }
    }

    let elapsed = start.elapsed();
    if complete {
        tracing::info!(
            "Aggregation complete: {} items in {} batches, {}ms",
            processed,
            batches,
            elapsed.as_millis()
        );
    } else {
        tracing::warn!(
            "Aggregation cancelled after {}/{} items ({} batches)",
            processed,
            total,
            batches
        );
    }

    Ok(BatchOutcome {
        processed,
        batches,
        complete,
        elapsed,
    })
}

/// Runs one batch; owns the worker pool for the duration of a run
struct Executor {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl Executor {
    #[cfg(feature = "parallel")]
    fn new(concurrency: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("textgraph-worker-{}", i))
            .build()
            .map_err(|e| GraphError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    #[cfg(not(feature = "parallel"))]
    fn new(_concurrency: usize) -> Result<Self> {
        Ok(Self {})
    }

    #[cfg(feature = "parallel")]
    fn run<'t, T, R, F>(&self, batch: &'t [T], f: F) -> Result<Vec<Option<R>>>
    where
        T: Sync,
        R: Send,
        F: Fn((usize, &'t T)) -> Result<Option<R>> + Sync + Send,
    {
        self.pool
            .install(|| batch.par_iter().enumerate().map(f).collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn run<'t, T, R, F>(&self, batch: &'t [T], f: F) -> Result<Vec<Option<R>>>
    where
        T: Sync,
        R: Send,
        F: Fn((usize, &'t T)) -> Result<Option<R>> + Sync + Send,
    {
        batch.iter().enumerate().map(f).collect()
    }
}

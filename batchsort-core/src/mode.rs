//! Sort mode selection and timed dispatch.
//!
//! A [`SortPlan`] picks one of the sorters and measures the wall-clock time of
//! the whole dispatch + join, never individual units.

use std::{fmt, num::NonZeroUsize, str::FromStr, time::Duration, time::Instant};

use crate::{
    batch::{Sequence, SortedBatch},
    channel::sort_via_channel,
    concurrent::{sort_concurrently, sort_concurrently_bounded},
    error::ParseVariantError,
    sequential::sort_sequentially,
    SortError,
};

/// Which sorter handles a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// One pass on the calling thread; output order matches input order.
    Sequential,
    /// One unit of work per sequence; output order is unspecified.
    Concurrent,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Concurrent => f.write_str("concurrent"),
        }
    }
}

impl FromStr for SortMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(ParseVariantError {
                kind: "sort mode",
                value: other.to_owned(),
                expected: "sequential, concurrent",
            }),
        }
    }
}

/// How concurrent units hand their results back to the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Append to a shared collection under a mutex.
    #[default]
    Mutex,
    /// Send to a collector over a channel.
    Channel,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mutex => f.write_str("mutex"),
            Self::Channel => f.write_str("channel"),
        }
    }
}

impl FromStr for Aggregation {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mutex" => Ok(Self::Mutex),
            "channel" => Ok(Self::Channel),
            other => Err(ParseVariantError {
                kind: "aggregation",
                value: other.to_owned(),
                expected: "mutex, channel",
            }),
        }
    }
}

/// A fully resolved choice of sorter for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct SortPlan {
    /// Sequential or concurrent execution.
    pub mode: SortMode,
    /// Aggregation discipline for concurrent mode. Ignored when sequential.
    pub aggregation: Aggregation,
    /// Pool size for concurrent mode. `None` spawns one thread per sequence.
    /// Only honoured by [`Aggregation::Mutex`].
    pub max_concurrency: Option<NonZeroUsize>,
}

impl SortPlan {
    /// Plan for the sequential sorter.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            mode: SortMode::Sequential,
            aggregation: Aggregation::default(),
            max_concurrency: None,
        }
    }

    /// Plan for the unbounded, mutex-aggregated concurrent sorter.
    #[must_use]
    pub fn concurrent() -> Self {
        Self {
            mode: SortMode::Concurrent,
            aggregation: Aggregation::default(),
            max_concurrency: None,
        }
    }

    /// Replace the aggregation discipline.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Cap the number of concurrent threads.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Sort `batch` according to this plan and time the whole run.
    ///
    /// # Errors
    /// Propagates [`SortError`] from the concurrent sorters. The sequential
    /// sorter never fails.
    pub fn run(&self, batch: &[Sequence]) -> Result<SortOutcome, SortError> {
        let start = Instant::now();
        let sorted = match (self.mode, self.aggregation, self.max_concurrency) {
            (SortMode::Sequential, _, _) => sort_sequentially(batch),
            (SortMode::Concurrent, Aggregation::Mutex, None) => sort_concurrently(batch)?,
            (SortMode::Concurrent, Aggregation::Mutex, Some(limit)) => {
                sort_concurrently_bounded(batch, limit)?
            }
            (SortMode::Concurrent, Aggregation::Channel, _) => sort_via_channel(batch)?,
        };
        let elapsed = start.elapsed();

        tracing::debug!(
            mode = %self.mode,
            sequences = batch.len(),
            elapsed_ns = elapsed.as_nanos(),
            "batch sorted"
        );
        Ok(SortOutcome { sorted, elapsed })
    }
}

/// Sorted output plus the wall-clock time spent producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SortOutcome {
    /// One sorted copy of every input sequence.
    pub sorted: SortedBatch,
    /// Time from dispatch until every unit finished.
    pub elapsed: Duration,
}

impl SortOutcome {
    /// Elapsed time in whole nanoseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX)
    }
}

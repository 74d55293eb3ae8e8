//! Concurrent sorter: fan-out one unit of work per sequence, fan-in through a
//! single mutex-guarded collection.
//!
//! Each unit copies its sequence, sorts the copy, then appends it to the
//! shared output under the lock. The orchestrator joins every unit before the
//! collection is read. Results land in completion order, so callers must not
//! assume output `i` corresponds to input `i`.

use std::{
    io,
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::{Mutex, OnceLock},
    thread::{self, Scope, ScopedJoinHandle},
};

use crate::{
    batch::{sorted_copy, Sequence, SortedBatch},
    SortError,
};

type UnitHandle<'scope> = ScopedJoinHandle<'scope, Result<(), SortError>>;

/// Prepares the OS thread for the unit at `index`.
pub(crate) type UnitBuilder = fn(usize) -> io::Result<thread::Builder>;

pub(crate) fn unit_builder(index: usize) -> io::Result<thread::Builder> {
    Ok(thread::Builder::new().name(format!("batchsort-unit-{index}")))
}

/// Sort every sequence in `batch` on its own thread.
///
/// Fan-out is unbounded: a batch of `n` sequences spawns `n` threads. Use
/// [`sort_concurrently_bounded`] when the batch size is not under control.
///
/// # Errors
/// Returns [`SortError::SpawnFailed`] if the OS refuses a thread, or
/// [`SortError::WorkerPanicked`] / [`SortError::LockPoisoned`] if a unit dies.
/// Every unit that was spawned is joined before any error is returned.
pub fn sort_concurrently(batch: &[Sequence]) -> Result<SortedBatch, SortError> {
    fan_out(batch, sorted_copy, unit_builder)
}

/// Sort `batch` on a rayon pool of at most `limit` threads.
///
/// Still one unit of work per sequence, but units queue on the pool instead
/// of each getting an OS thread. The pool lives for this call only.
/// Aggregation and ordering semantics match [`sort_concurrently`].
///
/// # Errors
/// Returns [`SortError::SpawnFailed`] if the pool cannot be built, otherwise
/// the same errors as [`sort_concurrently`].
pub fn sort_concurrently_bounded(
    batch: &[Sequence],
    limit: NonZeroUsize,
) -> Result<SortedBatch, SortError> {
    bounded_fan_out(batch, limit, sorted_copy)
}

fn fan_out<F>(
    batch: &[Sequence],
    unit: F,
    builder: UnitBuilder,
) -> Result<SortedBatch, SortError>
where
    F: Fn(&[i64]) -> Sequence + Sync,
{
    let results = Mutex::new(SortedBatch::with_capacity(batch.len()));
    let (results, unit) = (&results, &unit);

    tracing::trace!(units = batch.len(), "dispatching sort units");
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(batch.len());
        let mut spawn_err = None;
        for (index, seq) in batch.iter().enumerate() {
            match spawn_unit(scope, index, builder, move || {
                let sorted = unit(seq.as_slice());
                append(results, sorted)
            }) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_err = Some(e);
                    break;
                }
            }
        }
        let joined = join_all(handles);
        spawn_err.map_or(joined, Err)
    })?;

    collect(results)
}

fn bounded_fan_out<F>(
    batch: &[Sequence],
    limit: NonZeroUsize,
    unit: F,
) -> Result<SortedBatch, SortError>
where
    F: Fn(&[i64]) -> Sequence + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(limit.get())
        .thread_name(|i| format!("batchsort-pool-{i}"))
        .build()
        .map_err(|e| SortError::SpawnFailed { index: 0, reason: e.to_string() })?;

    let results = Mutex::new(SortedBatch::with_capacity(batch.len()));
    let failure = OnceLock::new();
    let (results, failure, unit) = (&results, &failure, &unit);

    tracing::trace!(
        units = batch.len(),
        threads = limit.get(),
        "dispatching sort units to pool"
    );
    // `scope` returns only after every spawned unit has finished.
    pool.scope(|s| {
        for (index, seq) in batch.iter().enumerate() {
            s.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| unit(seq.as_slice())))
                    .map_err(|_| SortError::WorkerPanicked { index })
                    .and_then(|sorted| append(results, sorted));
                if let Err(e) = outcome {
                    let _ = failure.set(e);
                }
            });
        }
    });

    if let Some(e) = failure.get() {
        return Err(e.clone());
    }
    collect(results)
}

fn spawn_unit<'scope, 'env, F>(
    scope: &'scope Scope<'scope, 'env>,
    index: usize,
    builder: UnitBuilder,
    body: F,
) -> Result<UnitHandle<'scope>, SortError>
where
    F: FnOnce() -> Result<(), SortError> + Send + 'scope,
{
    builder(index)
        .and_then(|b| b.spawn_scoped(scope, body))
        .map_err(|e| SortError::SpawnFailed { index, reason: e.to_string() })
}

/// The critical section: the guard lives only for the push.
fn append(results: &Mutex<SortedBatch>, sorted: Sequence) -> Result<(), SortError> {
    results.lock().map_err(|_| SortError::LockPoisoned)?.push(sorted);
    Ok(())
}

/// Join every handle, even after a failure, and report the first error.
fn join_all(handles: Vec<UnitHandle<'_>>) -> Result<(), SortError> {
    let mut first_err = None;
    for (index, handle) in handles.into_iter().enumerate() {
        let outcome = handle
            .join()
            .unwrap_or(Err(SortError::WorkerPanicked { index }));
        if let Err(e) = outcome {
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

fn collect(results: &Mutex<SortedBatch>) -> Result<SortedBatch, SortError> {
    let mut guard = results.lock().map_err(|_| SortError::LockPoisoned)?;
    let collected = std::mem::take(&mut *guard);
    tracing::trace!(collected = collected.len(), "sort units collected");
    Ok(collected)
}

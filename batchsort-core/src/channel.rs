//! Message-passing variant of the concurrent sorter.
//!
//! Units own their result outright and send it to a single collector, so no
//! shared mutable collection exists. The collector expects exactly one message
//! per input sequence.

use std::{sync::mpsc, thread};

use crate::{
    batch::{sorted_copy, Sequence, SortedBatch},
    concurrent::{unit_builder, UnitBuilder},
    SortError,
};

/// Sort every sequence in `batch` on its own thread, collecting results over
/// a channel.
///
/// Output order is the order in which results arrive.
///
/// # Errors
/// Returns [`SortError::SpawnFailed`] if the OS refuses a thread, or
/// [`SortError::WorkerPanicked`] if a unit dies before sending its result.
/// Every spawned unit is joined before returning.
pub fn sort_via_channel(batch: &[Sequence]) -> Result<SortedBatch, SortError> {
    collect_via_channel(batch, sorted_copy, unit_builder)
}

fn collect_via_channel<F>(
    batch: &[Sequence],
    unit: F,
    builder: UnitBuilder,
) -> Result<SortedBatch, SortError>
where
    F: Fn(&[i64]) -> Sequence + Sync,
{
    let unit = &unit;
    let expected = batch.len();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<Sequence>();
        let mut handles = Vec::with_capacity(expected);
        let mut failure = None;
        for (index, seq) in batch.iter().enumerate() {
            let tx = tx.clone();
            let spawned = builder(index).and_then(|b| {
                b.spawn_scoped(scope, move || {
                    // The receiver outlives every unit, so this cannot fail.
                    let _ = tx.send(unit(seq.as_slice()));
                })
            });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    failure = Some(SortError::SpawnFailed { index, reason: e.to_string() });
                    break;
                }
            }
        }
        // Only unit-held senders remain, so the receiver drains once every unit is gone.
        drop(tx);

        let sorted: SortedBatch = rx.iter().take(expected).collect();
        for (index, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                failure.get_or_insert(SortError::WorkerPanicked { index });
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }
        debug_assert_eq!(sorted.len(), expected, "every joined unit sends exactly once");
        tracing::trace!(collected = sorted.len(), "sort results received");
        Ok(sorted)
    })
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::batch::same_sequences;

    #[test]
    fn channel_example_is_permutation_of_sorted_inputs() {
        let batch = vec![vec![3, 1, 2], vec![5, 4]];
        let sorted = match sort_via_channel(&batch) {
            Ok(s) => s,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(same_sequences(&batch, &sorted), "got {sorted:?}");
    }

    #[test]
    fn channel_empty_batch_returns_empty() {
        assert_eq!(sort_via_channel(&[]), Ok(vec![]));
    }

    #[test]
    fn channel_duplicate_sequences_each_delivered() {
        let batch = vec![vec![2, 1], vec![2, 1], vec![-1, -1, 0, 2]];
        let sorted = match sort_via_channel(&batch) {
            Ok(s) => s,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(same_sequences(&batch, &sorted), "got {sorted:?}");
    }

    #[test]
    fn channel_reports_unit_that_never_sent() {
        let batch = vec![vec![1], vec![2], vec![3]];
        let result = collect_via_channel(
            &batch,
            |seq| {
                assert_ne!(seq, [3_i64], "unit for [3] fails");
                seq.to_vec()
            },
            unit_builder,
        );
        assert_eq!(result, Err(SortError::WorkerPanicked { index: 2 }));
    }

    #[test]
    fn channel_refused_spawn_drains_started_units() {
        let batch = vec![vec![5, 4], vec![3], vec![2, 1]];
        let finished = AtomicUsize::new(0);
        let result = collect_via_channel(
            &batch,
            |seq| {
                finished.fetch_add(1, Ordering::SeqCst);
                sorted_copy(seq)
            },
            |index| {
                if index == 0 {
                    unit_builder(index)
                } else {
                    Err(io::Error::other("thread limit reached"))
                }
            },
        );
        assert!(
            matches!(result, Err(SortError::SpawnFailed { index: 1, .. })),
            "got {result:?}"
        );
        assert_eq!(finished.load(Ordering::SeqCst), 1, "started unit must be joined first");
    }
}

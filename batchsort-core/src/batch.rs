//! Batch data model shared by every sorter.
//!
//! A batch is created at request start and dropped once the response is
//! emitted. Nothing here outlives a single request.

/// A single integer sequence as received from the caller.
pub type Sequence = Vec<i64>;

/// Ordered input batch. Sorters borrow it and never mutate it.
pub type SequenceBatch = Vec<Sequence>;

/// Output batch. Every element is non-decreasing.
///
/// Only the sequential sorter guarantees that element `i` corresponds to
/// input `i`; concurrent sorters emit in completion order.
pub type SortedBatch = Vec<Sequence>;

/// Return an ascending copy of `seq`, leaving `seq` untouched.
#[must_use]
pub fn sorted_copy(seq: &[i64]) -> Sequence {
    let mut copy = seq.to_vec();
    copy.sort_unstable();
    copy
}

/// Return `true` if `seq` is non-decreasing.
#[must_use]
pub fn is_sorted(seq: &[i64]) -> bool {
    seq.windows(2).all(|w| w[0] <= w[1])
}

/// Return `true` if `output` holds exactly one sorted copy of every sequence
/// in `input`, in any order.
///
/// Compares the batches as multisets of sequences, so duplicate input
/// sequences must appear the same number of times in the output.
///
/// # Complexity
/// O(n log n) in the total number of integers plus sequences.
#[must_use]
pub fn same_sequences(input: &[Sequence], output: &[Sequence]) -> bool {
    if input.len() != output.len() || !output.iter().all(|s| is_sorted(s)) {
        return false;
    }
    let mut expected: Vec<Sequence> = input.iter().map(|s| sorted_copy(s)).collect();
    let mut actual = output.to_vec();
    expected.sort_unstable();
    actual.sort_unstable();
    expected == actual
}

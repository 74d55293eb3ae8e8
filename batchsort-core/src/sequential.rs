//! Sequential sorter: one pass over the batch on the calling thread.

use crate::batch::{sorted_copy, Sequence, SortedBatch};

/// Sort every sequence in `batch`, preserving input order.
///
/// Output element `i` is the ascending copy of `batch[i]`. The input is never
/// mutated.
///
/// # Complexity
/// O(Σ kᵢ log kᵢ) where kᵢ is the length of sequence `i`.
#[must_use]
pub fn sort_sequentially(batch: &[Sequence]) -> SortedBatch {
    batch.iter().map(|seq| sorted_copy(seq)).collect()
}

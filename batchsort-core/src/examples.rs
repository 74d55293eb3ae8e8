//! Canonical example batches with their expected sequential output.
//!
//! Shared by unit tests, integration tests and the gateway tests.

use crate::batch::{Sequence, SortedBatch};

/// A named input batch and the exact output the sequential sorter produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleBatch {
    /// Short identifier used in assertion messages.
    pub name: &'static str,
    /// Input as the transport layer would decode it.
    pub input: Vec<Sequence>,
    /// Sequential output; concurrent output is any permutation of this.
    pub expected: SortedBatch,
}

/// Returns the example batches covering the documented edge cases.
#[must_use]
pub fn example_batches() -> Vec<ExampleBatch> {
    vec![
        ExampleBatch { name: "empty-batch", input: vec![], expected: vec![] },
        ExampleBatch {
            name: "two-sequences",
            input: vec![vec![3, 1, 2], vec![5, 4]],
            expected: vec![vec![1, 2, 3], vec![4, 5]],
        },
        ExampleBatch {
            name: "empty-and-singleton",
            input: vec![vec![], vec![7]],
            expected: vec![vec![], vec![7]],
        },
        ExampleBatch {
            name: "duplicates-and-negatives",
            input: vec![vec![-1, -1, 0, 2]],
            expected: vec![vec![-1, -1, 0, 2]],
        },
        ExampleBatch {
            name: "reversed-with-extremes",
            input: vec![vec![i64::MAX, 10, 0, -10, i64::MIN], vec![0, 0, 0]],
            expected: vec![vec![i64::MIN, -10, 0, 10, i64::MAX], vec![0, 0, 0]],
        },
    ]
}

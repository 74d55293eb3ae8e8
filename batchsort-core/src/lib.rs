//! Sorting core for the batchsort service.
//!
//! Sorts a batch of integer sequences either sequentially, preserving input
//! order, or concurrently with one unit of work per sequence and no ordering
//! guarantee. The transport layer decodes requests, picks a [`SortPlan`] and
//! reports [`SortOutcome::elapsed_ns`] alongside the sorted batch.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod batch;
pub mod channel;
pub mod concurrent;
pub mod error;
pub mod examples;
pub mod mode;
pub mod sequential;

pub use batch::{is_sorted, same_sequences, sorted_copy, Sequence, SequenceBatch, SortedBatch};
pub use channel::sort_via_channel;
pub use concurrent::{sort_concurrently, sort_concurrently_bounded};
pub use error::{ParseVariantError, SortError};
pub use mode::{Aggregation, SortMode, SortOutcome, SortPlan};
pub use sequential::sort_sequentially;

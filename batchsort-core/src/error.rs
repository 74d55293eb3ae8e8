/// Errors produced by the `batchsort-core` crate.
///
/// Sorting integers cannot fail; these only arise when a unit of work cannot
/// be started or dies before delivering its result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SortError {
    /// The OS refused to start the unit of work at `index`, or the bounded
    /// pool could not be built (`index` 0).
    #[error("failed to spawn sort worker {index}: {reason}")]
    SpawnFailed { index: usize, reason: String },

    /// The unit of work for the sequence at `index` did not complete.
    #[error("sort worker {index} panicked")]
    WorkerPanicked { index: usize },

    /// The shared output collection was poisoned by a panicking unit.
    #[error("shared output collection lock poisoned")]
    LockPoisoned,
}

/// A mode or aggregation name did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'; expected one of: {expected}")]
pub struct ParseVariantError {
    /// What was being parsed, e.g. `"sort mode"`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated accepted values.
    pub expected: &'static str,
}

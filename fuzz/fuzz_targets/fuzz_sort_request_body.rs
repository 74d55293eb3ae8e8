//! Fuzz target: JSON deserialization of `SortRequest` followed by sorting.
//!
//! Arbitrary bytes must never panic the decoder, and any batch that decodes
//! must come back from both sorters as a sorted permutation.

#![no_main]

use batchsort_core::{same_sequences, sort_concurrently_bounded, sort_sequentially};
use batchsort_gateway::routes::SortRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode errors are expected; panics are not.
    let Ok(request) = SortRequest::from_slice(data) else {
        return;
    };
    let batch = request.into_batch();

    let sequential = sort_sequentially(&batch);
    assert!(same_sequences(&batch, &sequential));

    let concurrent = sort_concurrently_bounded(&batch, std::num::NonZeroUsize::MIN)
        .unwrap_or_else(|e| panic!("bounded sort failed: {e}"));
    assert!(same_sequences(&batch, &concurrent));
});

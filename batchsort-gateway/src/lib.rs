//! HTTP gateway for the batchsort sorting core.
//!
//! Exposes `/process-single` and `/process-concurrent`, each decoding a batch
//! of integer sequences, sorting it with the matching core plan, and returning
//! the sorted batch with the time spent sorting in nanoseconds.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod routes;

//! Simulation drivers.
//!
//! Provides memory-reference trace parsing and replay against a cache system.

pub mod trace;

pub use trace::{TraceOp, TraceOutcome, parse_trace, replay};

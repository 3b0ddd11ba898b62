//! Event-driven orchestration of the match-result pipeline.

pub mod observer;

pub use observer::{NetworkObserver, PipelineOutcome};

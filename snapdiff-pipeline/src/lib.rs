//! # snapdiff-pipeline
//!
//! Stateful sequencing of the snapdiff stages: version resolution, snapshot
//! regeneration, commit-and-detect, diff rendering, and notification
//! batching. Call [`run`] for a full pipeline run.

pub mod error;
pub mod git;
pub mod pipeline;
pub mod snapshot;
pub mod tracker;

pub use error::PipelineError;
pub use pipeline::{run, RunOptions, RunReport};

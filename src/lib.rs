//! Library exports for screengif.
//!
//! The binary is a thin wrapper around [`pipeline::run`]; the stages are public so they can
//! be driven and tested with substitute samplers and clipboards.

pub mod capture;
pub mod config;
pub mod encode;
pub mod output;
pub mod pipeline;

pub use config::{Config, RunSettings};
pub use pipeline::{PipelineDependencies, PipelineError, RunOutcome};

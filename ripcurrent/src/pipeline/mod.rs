//! Pipeline composition and execution.
//!
//! This module provides:
//! - Fragments and their shapes
//! - The connect operator
//! - Realized jobs with synchronous and threaded engines

mod connect;
mod fragment;
mod job;
mod threaded;

#[cfg(test)]
mod integration_tests;

pub use fragment::{node_fragment, Closed, Disposition, Fragment, FragmentShape, Sink, Source, Via};
pub use job::{Job, RunSummary};

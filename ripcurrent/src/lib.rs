//! # RipCurrent
//!
//! Typed, linear dataflow pipelines.
//!
//! A pipeline is a chain of nodes. Each node declares the set of payload
//! types it accepts and the set it emits; connecting two fragments only
//! compiles when the left output set equals the right input set.
//!
//! - **Nodes**: user types with contracts, constructors that may emit, and one
//!   reaction per input type
//! - **Fragments**: one-shot chain segments built with `rc!` and `|`
//! - **Leak detection**: dropping an unused fragment is reported through a
//!   replaceable process-wide handler
//! - **Execution**: synchronous depth-first delivery, or one task per node
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ripcurrent::prelude::*;
//! use ripcurrent::testing::{Collect, Collected, Multiply, Numbers};
//!
//! let result = Collected::<i32>::new();
//! let pipeline = rc!(Numbers(1, 2, 3)) | rc!(Multiply(10)) | rc!(Collect(result.clone()));
//! assert_eq!(pipeline.describe(), "Numbers(1, 2, 3) | Multiply(10) | Collect(result.clone())");
//!
//! pipeline.sync()?;
//! assert_eq!(result.joined(","), "10,20,30");
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

// Lets derive output (`::ripcurrent::...`) resolve inside this crate.
extern crate self as ripcurrent;

pub mod config;
pub mod core;
pub mod errors;
pub mod handler;
pub mod node;
pub mod observability;
pub mod pipeline;
pub mod testing;

pub use crate::config::{ExecutionMode, JobConfig, LogConfig};
pub use crate::core::{Contains, Contract, Message, Payload, PayloadType, SameSet, Subset, TypeContract};
pub use crate::errors::{ErrorInfo, RipCurrentError};
pub use crate::handler::ErrorHandler;
pub use crate::node::{Construct, Emitter, Node, NodeInstance, NodeResult, Reacts};
pub use crate::pipeline::{Closed, Fragment, Job, RunSummary, Sink, Source, Via};
pub use ripcurrent_macros::{contract, Node, Payload};

/// Declares a single-node fragment: `rc!(Multiply(10))`.
///
/// The node type comes first, followed by its constructor arguments. The
/// arguments are evaluated now and stored as a tuple; the literal argument
/// text is kept for [`Fragment::describe`]. The node itself is constructed
/// only when the fragment runs, once per run.
#[macro_export]
macro_rules! rc {
    ($($node:ident)::+ ( $($arg:expr),* $(,)? )) => {
        $crate::pipeline::node_fragment::<$($node)::+, _>(
            {
                let parts: &[&str] = &[$(stringify!($arg)),*];
                parts.join(", ")
            },
            ($($arg,)*),
        )
    };
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExecutionMode, JobConfig, LogConfig};
    pub use crate::core::{Contract, Payload, TypeContract};
    pub use crate::errors::RipCurrentError;
    pub use crate::handler::ErrorHandler;
    pub use crate::node::{Construct, Emitter, Node, NodeResult, Reacts};
    pub use crate::pipeline::{Closed, Fragment, FragmentShape, Job, RunSummary, Sink, Source, Via};
    pub use crate::rc;
    pub use ripcurrent_macros::{contract, Node, Payload};
}

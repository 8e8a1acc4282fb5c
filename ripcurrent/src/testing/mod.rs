//! Testing utilities for ripcurrent pipelines.
//!
//! This module provides:
//! - Small reference nodes (`Numbers`, `Multiply`, `Collect`, ...)
//! - A shared collector for sink output
//! - Leak-report capture and assertions

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_single_leak, first_two_lines, LeakCapture};
pub use fixtures::Collected;
pub use mocks::{Accumulate, Collect, Decorate, Greeting, Integer, Multiply, Numbers, Render, Text};

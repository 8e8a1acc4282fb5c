//! Core domain model types for ripcurrent.
//!
//! This module contains the fundamental types used throughout the engine:
//! - Payload identifiers
//! - Type contracts, both type-level and runtime
//! - The message envelope passed between nodes

mod contract;
mod message;
mod payload;

pub use contract::{position, Contains, Contract, SameSet, Subset, TypeContract};
pub use message::Message;
pub use payload::{Payload, PayloadType};

//! Typed emission handle given to node constructors and reactions.

use crate::core::{Contains, Contract, Message, Payload};
use std::marker::PhantomData;

/// Collects the values a node emits during one constructor or reaction call.
///
/// `C` is the node's output contract. `emit` only compiles for payload types
/// that belong to `C`, so a sink (empty output contract) cannot emit at all.
pub struct Emitter<'a, C> {
    queue: &'a mut Vec<Message>,
    _contract: PhantomData<fn() -> C>,
}

impl<'a, C: Contract> Emitter<'a, C> {
    pub(crate) fn new(queue: &'a mut Vec<Message>) -> Self {
        Self {
            queue,
            _contract: PhantomData,
        }
    }

    /// Emits a value for one of the declared output types.
    pub fn emit<T, I>(&mut self, value: T)
    where
        T: Payload,
        C: Contains<T, I>,
    {
        self.queue.push(Message::new(value));
    }

    /// Number of values queued so far by this call.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<C> std::fmt::Debug for Emitter<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("pending", &self.queue.len())
            .finish()
    }
}

//! Type-erased message envelope used during hand-off between nodes.

use super::{Payload, PayloadType};
use std::any::Any;
use std::fmt;

/// A payload value in transit between two adjacent nodes.
pub struct Message {
    payload_type: PayloadType,
    value: Box<dyn Any + Send>,
}

impl Message {
    /// Wraps a payload value.
    pub fn new<T: Payload>(value: T) -> Self {
        Self {
            payload_type: PayloadType::of::<T>(),
            value: Box::new(value),
        }
    }

    /// Returns the type of the carried payload.
    #[must_use]
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// Returns true if the message carries a `T`.
    #[must_use]
    pub fn is<T: Payload>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Unwraps the payload, handing the message back if it carries another type.
    pub fn downcast<T: Payload>(self) -> Result<T, Self> {
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                payload_type: self.payload_type,
                value,
            }),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("payload_type", &self.payload_type)
            .finish_non_exhaustive()
    }
}

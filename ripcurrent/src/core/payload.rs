//! Payload types: the messages that flow between nodes.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A message kind that can travel along a pipeline.
///
/// Payloads are plain records with no special behavior. The only thing the
/// engine needs from them is a short, stable name for diagnostics, which
/// `#[derive(Payload)]` fills in from the type name (or from
/// `#[payload(name = "...")]`).
pub trait Payload: Send + 'static {
    /// Name used when rendering contracts.
    const NAME: &'static str;
}

/// Runtime identifier of a payload type.
#[derive(Clone, Copy)]
pub struct PayloadType {
    name: &'static str,
    id: TypeId,
}

impl PayloadType {
    /// Returns the identifier for `T`.
    #[must_use]
    pub fn of<T: Payload>() -> Self {
        Self {
            name: T::NAME,
            id: TypeId::of::<T>(),
        }
    }

    /// Returns the diagnostic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the underlying type id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl Hash for PayloadType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for PayloadType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PayloadType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PayloadType").field(&self.name).finish()
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    impl Payload for Alpha {
        const NAME: &'static str = "Alpha";
    }

    struct Beta;
    impl Payload for Beta {
        const NAME: &'static str = "Beta";
    }

    #[test]
    fn test_payload_type_identity() {
        assert_eq!(PayloadType::of::<Alpha>(), PayloadType::of::<Alpha>());
        assert_ne!(PayloadType::of::<Alpha>(), PayloadType::of::<Beta>());
    }

    #[test]
    fn test_payload_type_orders_by_name() {
        assert!(PayloadType::of::<Alpha>() < PayloadType::of::<Beta>());
        assert_eq!(PayloadType::of::<Beta>().to_string(), "Beta");
    }
}

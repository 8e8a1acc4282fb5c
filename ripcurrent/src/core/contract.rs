//! Type contracts: the set of payload types flowing across a boundary.
//!
//! A contract exists in two forms. At the type level it is a tuple of payload
//! types (`()`, `(A,)`, `(A, B)`, ...) that the `contract!` macro and
//! `#[derive(Node)]` always spell in canonical order, so two set-equal
//! contracts are the same Rust type and `connect` type-checks by plain type
//! equality. At runtime it is a [`TypeContract`], used for diagnostics and
//! compared by set equality.

use super::{Payload, PayloadType};
use std::fmt;

/// Type-level contract, implemented for tuples of up to six payload types.
pub trait Contract: Send + 'static {
    /// Payload types in declaration order (duplicates allowed).
    fn payload_types() -> Vec<PayloadType>;

    /// Builds the runtime contract.
    fn contract() -> TypeContract {
        TypeContract::from_types(Self::payload_types())
    }
}

/// Proof that the contract contains payload type `T`.
///
/// `Index` is a position marker inferred by the compiler; callers never name
/// it. An `emit` of a type outside the contract has no matching impl and
/// fails to compile.
pub trait Contains<T, Index> {}

/// Position markers used by [`Contains`].
pub mod position {
    /// First position.
    #[derive(Debug)]
    pub enum At0 {}
    /// Second position.
    #[derive(Debug)]
    pub enum At1 {}
    /// Third position.
    #[derive(Debug)]
    pub enum At2 {}
    /// Fourth position.
    #[derive(Debug)]
    pub enum At3 {}
    /// Fifth position.
    #[derive(Debug)]
    pub enum At4 {}
    /// Sixth position.
    #[derive(Debug)]
    pub enum At5 {}
}

use position::{At0, At1, At2, At3, At4, At5};

impl Contract for () {
    fn payload_types() -> Vec<PayloadType> {
        Vec::new()
    }
}

macro_rules! impl_contract {
    ($($member:ident),+) => {
        impl<$($member: Payload),+> Contract for ($($member,)+) {
            fn payload_types() -> Vec<PayloadType> {
                vec![$(PayloadType::of::<$member>()),+]
            }
        }
    };
}

macro_rules! impl_contains {
    ($at:ident => $target:ident; $($member:ident),+) => {
        impl<$($member),+> Contains<$target, $at> for ($($member,)+) {}
    };
}

impl_contract!(A);
impl_contract!(A, B);
impl_contract!(A, B, C);
impl_contract!(A, B, C, D);
impl_contract!(A, B, C, D, E);
impl_contract!(A, B, C, D, E, F);

impl_contains!(At0 => A; A);

impl_contains!(At0 => A; A, B);
impl_contains!(At1 => B; A, B);

impl_contains!(At0 => A; A, B, C);
impl_contains!(At1 => B; A, B, C);
impl_contains!(At2 => C; A, B, C);

impl_contains!(At0 => A; A, B, C, D);
impl_contains!(At1 => B; A, B, C, D);
impl_contains!(At2 => C; A, B, C, D);
impl_contains!(At3 => D; A, B, C, D);

impl_contains!(At0 => A; A, B, C, D, E);
impl_contains!(At1 => B; A, B, C, D, E);
impl_contains!(At2 => C; A, B, C, D, E);
impl_contains!(At3 => D; A, B, C, D, E);
impl_contains!(At4 => E; A, B, C, D, E);

impl_contains!(At0 => A; A, B, C, D, E, F);
impl_contains!(At1 => B; A, B, C, D, E, F);
impl_contains!(At2 => C; A, B, C, D, E, F);
impl_contains!(At3 => D; A, B, C, D, E, F);
impl_contains!(At4 => E; A, B, C, D, E, F);
impl_contains!(At5 => F; A, B, C, D, E, F);

/// Proof that every member of `Self` belongs to `Of`.
///
/// `Indices` is a tuple of [`position`] markers, one per member, inferred by
/// the compiler.
pub trait Subset<Of, Indices> {}

/// Proof that `Self` and `Other` hold the same payload types, in any order.
///
/// Unlike plain type equality this holds for tuples that list the same types
/// differently, e.g. `(Text, Integer)` and `(Integer, Text)`.
pub trait SameSet<Other, Proof> {}

impl<A, B, P, Q> SameSet<B, (P, Q)> for A
where
    A: Subset<B, P>,
    B: Subset<A, Q>,
{
}

impl<Of> Subset<Of, ()> for () {}

macro_rules! impl_subset {
    ($(($member:ident, $index:ident)),+) => {
        impl<Of, $($member, $index),+> Subset<Of, ($($index,)+)> for ($($member,)+)
        where
            $(Of: Contains<$member, $index>,)+
        {
        }
    };
}

impl_subset!((A, IA));
impl_subset!((A, IA), (B, IB));
impl_subset!((A, IA), (B, IB), (C, IC));
impl_subset!((A, IA), (B, IB), (C, IC), (D, ID));
impl_subset!((A, IA), (B, IB), (C, IC), (D, ID), (E, IE));
impl_subset!((A, IA), (B, IB), (C, IC), (D, ID), (E, IE), (F, IF));

/// Runtime set of payload types.
///
/// Elements are unique and kept sorted by name, so equality is set equality
/// regardless of declaration order or repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeContract {
    types: Vec<PayloadType>,
}

impl TypeContract {
    /// The terminal "nothing flows here" contract.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a contract, normalizing order and collapsing duplicates.
    #[must_use]
    pub fn from_types(types: impl IntoIterator<Item = PayloadType>) -> Self {
        let mut types: Vec<PayloadType> = types.into_iter().collect();
        types.sort();
        types.dedup();
        Self { types }
    }

    /// Returns true for the terminal contract.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Number of distinct payload types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if `payload_type` belongs to the contract.
    #[must_use]
    pub fn contains(&self, payload_type: PayloadType) -> bool {
        self.types.binary_search(&payload_type).is_ok()
    }

    /// Iterates the payload types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &PayloadType> {
        self.types.iter()
    }

    /// Payload names in name order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.types.iter().map(PayloadType::name).collect()
    }
}

/// Renders as `{ Integer, String }`, or `{}` when empty.
impl fmt::Display for TypeContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.types.is_empty() {
            return f.write_str("{}");
        }
        write!(f, "{{ {} }}", self.names().join(", "))
    }
}

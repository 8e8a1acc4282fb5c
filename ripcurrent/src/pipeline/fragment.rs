//! Pipeline fragments: composable, one-shot pipeline segments.

use crate::core::{Contract, TypeContract};
use crate::handler::{leak_report, ErrorHandler};
use crate::node::{Construct, NodeInstance};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// What has happened to a fragment so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Neither run, dismissed, nor inspected. Dropping it is a leak.
    Pending,
    /// Lent to a borrowing connect as a building block.
    Composed,
    /// Rendered with `describe`.
    Described,
    /// Realized or dismissed.
    Consumed,
}

/// Open/closed shape of a fragment, derived from its contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentShape {
    /// Empty input, non-empty output.
    Source,
    /// Non-empty input, empty output.
    Sink,
    /// Both sides open.
    Via,
    /// Both sides closed: ready to run.
    Closed,
}

impl fmt::Display for FragmentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Sink => write!(f, "sink"),
            Self::Via => write!(f, "via"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// An ordered chain of node instances with typed open ends.
///
/// `In` and `Out` are the type-level contracts of the first node's input and
/// the last node's output. Fragments are linear resources: run them
/// (`realize`/`sync`), discard them with `dismiss`, or compose them into a
/// larger fragment. Dropping a fragment that is still pending reports a leak
/// through the [`ErrorHandler`].
///
/// Discarding a fragment expression is caught at compile time:
///
/// ```compile_fail
/// #![deny(unused_must_use)]
/// use ripcurrent::rc;
/// use ripcurrent::testing::{Collect, Numbers};
///
/// rc!(Numbers(1)) | rc!(Collect());
/// ```
#[must_use = "fragments must be run with `sync()`/`realize()` or discarded with `dismiss()`"]
pub struct Fragment<In: Contract, Out: Contract> {
    nodes: Vec<NodeInstance>,
    input: TypeContract,
    output: TypeContract,
    disposition: Cell<Disposition>,
    _contracts: PhantomData<fn() -> (In, Out)>,
}

/// A fragment with no input side.
pub type Source<Out> = Fragment<(), Out>;
/// A fragment with no output side.
pub type Sink<In> = Fragment<In, ()>;
/// A fragment open on both sides.
pub type Via<In, Out> = Fragment<In, Out>;
/// A fully wired, runnable fragment.
pub type Closed = Fragment<(), ()>;

/// Wraps a single node definition into a fragment.
///
/// Used by the `rc!` macro; the node is not constructed until the fragment
/// runs.
pub fn node_fragment<N, A>(args_text: impl Into<String>, args: A) -> Fragment<N::Input, N::Output>
where
    N: Construct<A>,
    A: Clone + Send + Sync + 'static,
{
    Fragment::from_nodes(vec![NodeInstance::new::<N, A>(args_text, args)])
}

impl<In: Contract, Out: Contract> Fragment<In, Out> {
    pub(crate) fn from_nodes(nodes: Vec<NodeInstance>) -> Self {
        let input = In::contract();
        let output = Out::contract();
        debug_assert_eq!(nodes.first().map(NodeInstance::input_contract), Some(&input));
        debug_assert_eq!(nodes.last().map(NodeInstance::output_contract), Some(&output));

        Self {
            nodes,
            input,
            output,
            disposition: Cell::new(Disposition::Pending),
            _contracts: PhantomData,
        }
    }

    /// Renders the chain as `Name(args)` tokens joined by `" | "`.
    ///
    /// An open input side renders as a leading `"... | "`, an open output
    /// side as a trailing `" | ..."`. Describing a fragment counts as using
    /// it: it will not be reported as leaked.
    pub fn describe(&self) -> String {
        self.mark(Disposition::Described);
        self.render(false)
    }

    /// Like [`describe`](Self::describe), with the contract of each open side
    /// rendered next to it, e.g. `"... | { Integer } => Multiply() => { Integer } | ..."`.
    pub fn describe_with_types(&self) -> String {
        self.mark(Disposition::Described);
        self.render(true)
    }

    /// Discards the fragment on purpose, without running anything.
    pub fn dismiss(mut self) {
        debug!(fragment = %self.render(false), "Dismissing fragment");
        self.nodes.clear();
        self.disposition.set(Disposition::Consumed);
    }

    /// Names of the node definitions, in execution order.
    #[must_use]
    pub fn node_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(NodeInstance::name).collect()
    }

    /// The node instances, in execution order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    /// Number of nodes in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true once the nodes have been handed off.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Effective input contract.
    #[must_use]
    pub fn input_contract(&self) -> &TypeContract {
        &self.input
    }

    /// Effective output contract.
    #[must_use]
    pub fn output_contract(&self) -> &TypeContract {
        &self.output
    }

    /// Open/closed shape.
    #[must_use]
    pub fn shape(&self) -> FragmentShape {
        match (self.input.is_empty(), self.output.is_empty()) {
            (true, true) => FragmentShape::Closed,
            (true, false) => FragmentShape::Source,
            (false, true) => FragmentShape::Sink,
            (false, false) => FragmentShape::Via,
        }
    }

    /// Current disposition.
    #[must_use]
    pub fn disposition(&self) -> Disposition {
        self.disposition.get()
    }

    /// Moves the nodes out, leaving an empty fragment that drops silently.
    pub(crate) fn take_nodes(&mut self) -> Vec<NodeInstance> {
        self.disposition.set(Disposition::Consumed);
        std::mem::take(&mut self.nodes)
    }

    /// Copies the blueprints for a borrowing connect.
    ///
    /// # Panics
    ///
    /// Panics if the fragment has already been realized or dismissed.
    pub(crate) fn lend(&self) -> Vec<NodeInstance> {
        if self.disposition.get() == Disposition::Consumed || self.nodes.is_empty() {
            let err = crate::errors::RipCurrentError::ConsumedFragmentReused {
                description: self.render(false),
            };
            panic!("{err}");
        }
        self.mark(Disposition::Composed);
        self.nodes.clone()
    }

    pub(crate) fn render(&self, with_types: bool) -> String {
        let body = self
            .nodes
            .iter()
            .map(NodeInstance::token)
            .collect::<Vec<_>>()
            .join(" | ");

        let mut rendered = String::new();
        if !self.input.is_empty() {
            rendered.push_str("... | ");
            if with_types {
                rendered.push_str(&format!("{} => ", self.input));
            }
        }
        rendered.push_str(&body);
        if !self.output.is_empty() {
            if with_types {
                rendered.push_str(&format!(" => {}", self.output));
            }
            rendered.push_str(" | ...");
        }
        rendered
    }

    fn mark(&self, disposition: Disposition) {
        if self.disposition.get() == Disposition::Pending {
            self.disposition.set(disposition);
        }
    }
}

impl<In: Contract, Out: Contract> Drop for Fragment<In, Out> {
    fn drop(&mut self) {
        if !self.nodes.is_empty() && self.disposition.get() == Disposition::Pending {
            let report = leak_report(&self.render(false), &self.render(true));
            ErrorHandler::global().report(&report);
        }
    }
}

impl<In: Contract, Out: Contract> fmt::Debug for Fragment<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("chain", &self.render(true))
            .field("disposition", &self.disposition.get())
            .finish()
    }
}

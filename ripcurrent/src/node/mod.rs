//! Node definitions.
//!
//! A node is a user type with a declared input contract, a declared output
//! contract, one or more constructors that may emit, and one reaction per
//! input type that may emit further values. Nodes are usually declared with
//! the derive macro:
//!
//! ```rust,ignore
//! #[derive(Clone, Payload)]
//! struct Integer(i32);
//!
//! #[derive(Node)]
//! #[node(input(Integer), output(Integer))]
//! struct Multiply {
//!     k: i32,
//! }
//!
//! impl Construct<(i32,)> for Multiply {
//!     fn construct((k,): (i32,), _out: &mut Emitter<'_, Self::Output>) -> Self {
//!         Self { k }
//!     }
//! }
//!
//! impl Reacts<Integer> for Multiply {
//!     fn react(&mut self, x: Integer, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
//!         out.emit(Integer(x.0 * self.k));
//!         Ok(())
//!     }
//! }
//! ```

mod emitter;
mod instance;

pub use emitter::Emitter;
pub use instance::NodeInstance;
pub(crate) use instance::LiveNode;

use crate::core::{Contract, Message, Payload};

/// Result of a node constructor or reaction body.
pub type NodeResult = anyhow::Result<()>;

/// A processing node with fixed input and output contracts.
///
/// Implemented by `#[derive(Node)]`; hand-written impls should spell
/// contracts with `contract![...]` so they come out in the same canonical
/// order as macro-declared nodes.
///
/// The canonical order sorts payloads by the name they are written with. A
/// payload imported under an alias (`use Text as Label`) sorts by the alias,
/// so two set-equal contracts may end up as differently ordered tuples. `|`
/// rejects those; [`Fragment::connect`](crate::pipeline::Fragment::connect)
/// compares them as sets and accepts them.
pub trait Node: Send + 'static {
    /// Payload types this node reacts to.
    type Input: Contract;
    /// Payload types this node may emit.
    type Output: Contract;

    /// Name used in pipeline descriptions.
    const NAME: &'static str;

    /// Routes a message to the matching [`Reacts`] impl.
    ///
    /// Returns the message back if no reaction accepts its type.
    fn dispatch(
        &mut self,
        message: Message,
        out: &mut Emitter<'_, Self::Output>,
    ) -> Result<NodeResult, Message>;
}

/// Reaction to one input payload type.
pub trait Reacts<T: Payload>: Node {
    /// Handles one value, optionally emitting downstream.
    fn react(&mut self, value: T, out: &mut Emitter<'_, Self::Output>) -> NodeResult;
}

/// A constructor taking its arguments as a tuple.
///
/// A node may implement several `Construct` impls, one per argument list.
/// Construction happens when a job runs, never when a fragment is declared,
/// and the constructor may emit values right away.
pub trait Construct<Args>: Node + Sized {
    /// Builds the node's runtime state.
    fn construct(args: Args, out: &mut Emitter<'_, Self::Output>) -> Self;
}

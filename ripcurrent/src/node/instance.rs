//! Node blueprints and their type-erased runtime form.

use super::{Construct, Emitter, Node, NodeResult};
use crate::core::{Contract, Message, TypeContract};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A constructed node, as seen by the execution engine.
pub(crate) trait LiveNode: Send {
    /// Name of the node definition.
    fn name(&self) -> &'static str;

    /// Feeds one message through the node, queuing its emissions.
    fn accept(&mut self, message: Message, queue: &mut Vec<Message>) -> Result<NodeResult, Message>;
}

struct Live<N>(N);

impl<N: Node> LiveNode for Live<N> {
    fn name(&self) -> &'static str {
        N::NAME
    }

    fn accept(&mut self, message: Message, queue: &mut Vec<Message>) -> Result<NodeResult, Message> {
        let mut out = Emitter::<N::Output>::new(queue);
        self.0.dispatch(message, &mut out)
    }
}

type Factory = dyn Fn(&mut Vec<Message>) -> Box<dyn LiveNode> + Send + Sync;

/// One node of a fragment: a node definition plus the arguments it will be
/// constructed with.
///
/// An instance is a blueprint. Every realization calls the constructor again,
/// so clones of an instance never share runtime state.
#[derive(Clone)]
pub struct NodeInstance {
    name: &'static str,
    args: String,
    input: TypeContract,
    output: TypeContract,
    factory: Arc<Factory>,
}

impl NodeInstance {
    /// Captures a node definition with its constructor arguments.
    ///
    /// `args_text` is the literal argument source, used only for
    /// descriptions. `args` is cloned for every instantiation.
    pub fn new<N, A>(args_text: impl Into<String>, args: A) -> Self
    where
        N: Construct<A>,
        A: Clone + Send + Sync + 'static,
    {
        let factory = move |queue: &mut Vec<Message>| -> Box<dyn LiveNode> {
            let mut out = Emitter::<N::Output>::new(queue);
            Box::new(Live(N::construct(args.clone(), &mut out)))
        };

        Self {
            name: N::NAME,
            args: args_text.into(),
            input: N::Input::contract(),
            output: N::Output::contract(),
            factory: Arc::new(factory),
        }
    }

    /// Name of the node definition.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Literal constructor arguments.
    #[must_use]
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Declared input contract.
    #[must_use]
    pub fn input_contract(&self) -> &TypeContract {
        &self.input
    }

    /// Declared output contract.
    #[must_use]
    pub fn output_contract(&self) -> &TypeContract {
        &self.output
    }

    /// Renders as `Name(args)`.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{}({})", self.name, self.args)
    }

    /// Runs the constructor, queuing anything it emits.
    pub(crate) fn instantiate(&self, queue: &mut Vec<Message>) -> Box<dyn LiveNode> {
        debug!(node = self.name, args = %self.args, "Constructing node");
        (self.factory)(queue)
    }
}

impl fmt::Debug for NodeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeInstance")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

//! The connect operator.
//!
//! `Fragment<I, M> | Fragment<M, O>` only type-checks when the left output
//! contract and the right input contract are the same canonical tuple, i.e.
//! the same set of payload types. [`Fragment::connect`] also accepts
//! contracts that list the same types in a different order. The result owns
//! the left nodes followed by
//! the right nodes, so any grouping of a chain flattens to the same sequence.

use super::Fragment;
use crate::core::{Contract, SameSet};
use crate::node::NodeInstance;
use std::ops::BitOr;

fn joined<I, O>(mut left: Vec<NodeInstance>, right: Vec<NodeInstance>) -> Fragment<I, O>
where
    I: Contract,
    O: Contract,
{
    debug_assert_eq!(
        left.last().map(NodeInstance::output_contract),
        right.first().map(NodeInstance::input_contract)
    );
    left.extend(right);
    Fragment::from_nodes(left)
}

impl<I: Contract, M: Contract> Fragment<I, M> {
    /// Connects `self` to `rhs`, consuming both.
    ///
    /// Accepts any `rhs` whose input contract holds the same payload types as
    /// `self`'s output, however the two tuples are ordered. `self | rhs` needs
    /// the contracts to be the same tuple type, which the node macros
    /// guarantee unless a payload is spelled under two different names (e.g.
    /// through a `use ... as` alias).
    pub fn connect<N, O, P>(mut self, mut rhs: Fragment<N, O>) -> Fragment<I, O>
    where
        N: Contract,
        O: Contract,
        M: SameSet<N, P>,
    {
        joined(self.take_nodes(), rhs.take_nodes())
    }
}

impl<I: Contract, M: Contract, O: Contract> BitOr<Fragment<M, O>> for Fragment<I, M> {
    type Output = Fragment<I, O>;

    fn bitor(mut self, mut rhs: Fragment<M, O>) -> Self::Output {
        joined(self.take_nodes(), rhs.take_nodes())
    }
}

/// Connects two fragments as building blocks, leaving both reusable.
impl<I: Contract, M: Contract, O: Contract> BitOr<&Fragment<M, O>> for &Fragment<I, M> {
    type Output = Fragment<I, O>;

    fn bitor(self, rhs: &Fragment<M, O>) -> Self::Output {
        joined(self.lend(), rhs.lend())
    }
}

impl<I: Contract, M: Contract, O: Contract> BitOr<Fragment<M, O>> for &Fragment<I, M> {
    type Output = Fragment<I, O>;

    fn bitor(self, mut rhs: Fragment<M, O>) -> Self::Output {
        joined(self.lend(), rhs.take_nodes())
    }
}

impl<I: Contract, M: Contract, O: Contract> BitOr<&Fragment<M, O>> for Fragment<I, M> {
    type Output = Fragment<I, O>;

    fn bitor(mut self, rhs: &Fragment<M, O>) -> Self::Output {
        joined(self.take_nodes(), rhs.lend())
    }
}

#[cfg(test)]
mod tests {
    use crate::rc;
    use crate::core::TypeContract;
    use crate::pipeline::{Disposition, Fragment, FragmentShape, Source};
    use crate::testing::{Collect, Collected, Greeting, Integer, LeakCapture, Multiply, Numbers, Render, Text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connect_describes_chain() {
        assert_eq!((rc!(Numbers()) | rc!(Collect())).describe(), "Numbers() | Collect()");
        assert_eq!(
            (rc!(Numbers()) | rc!(Multiply()) | rc!(Multiply()) | rc!(Multiply()) | rc!(Collect())).describe(),
            "Numbers() | Multiply() | Multiply() | Multiply() | Collect()"
        );
        assert_eq!((rc!(Numbers()) | rc!(Multiply())).describe(), "Numbers() | Multiply() | ...");
        assert_eq!((rc!(Multiply()) | rc!(Collect())).describe(), "... | Multiply() | Collect()");
        assert_eq!(
            (rc!(Multiply()) | rc!(Multiply()) | rc!(Multiply())).describe(),
            "... | Multiply() | Multiply() | Multiply() | ..."
        );

        let blah = 5;
        assert_eq!(
            (rc!(Numbers(1)) | rc!(Multiply(2)) | rc!(Multiply(3 + 4)) | rc!(Multiply(blah)) | rc!(Collect()))
                .describe(),
            "Numbers(1) | Multiply(2) | Multiply(3 + 4) | Multiply(blah) | Collect()"
        );
    }

    #[test]
    fn test_grouping_flattens_identically() {
        let a = rc!(Numbers(1));
        let b = rc!(Multiply(2));
        let c = rc!(Multiply(3));
        let d = rc!(Collect());

        let chains = [
            ((&a | &b) | &c) | &d,
            &a | (&b | (&c | &d)),
            (&a | (&b | &c)) | &d,
            (&a | &b) | (&c | &d),
        ];
        for chain in chains {
            assert_eq!(chain.node_names(), vec!["Numbers", "Multiply", "Multiply", "Collect"]);
            assert_eq!(chain.describe(), "Numbers(1) | Multiply(2) | Multiply(3) | Collect()");
            assert_eq!(chain.shape(), FragmentShape::Closed);
            chain.dismiss();
        }
    }

    #[test]
    fn test_borrowed_operands_stay_usable() {
        let result = Collected::<i32>::new();
        let numbers = rc!(Numbers(1));
        let multiply = rc!(Multiply(2));
        let collect = rc!(Collect(result.clone()));

        let chain = &numbers | &multiply | &multiply | &collect;
        assert_eq!(chain.len(), 4);
        assert_eq!(multiply.disposition(), Disposition::Composed);
        assert_eq!(multiply.len(), 1);
        chain.dismiss();

        let again = (&numbers | &multiply) | (&multiply | &collect);
        assert_eq!(again.len(), 4);
        again.dismiss();
    }

    #[test]
    fn test_moving_connect_empties_operands() {
        let capture = LeakCapture::install();
        let chain = rc!(Numbers(1)) | rc!(Multiply(2));
        assert_eq!(chain.len(), 2);
        drop(chain);
        assert_eq!(capture.count(), 1);
        assert_eq!(
            capture.last_two_lines().as_deref(),
            Some("pipeline fragment leaked\nNumbers(1) | Multiply(2) | ...")
        );
    }

    #[test]
    fn test_connect_method_matches_operator() {
        let source: Source<(Integer,)> = rc!(Numbers(7)).connect(rc!(Multiply(3)));
        assert_eq!(source.describe(), "Numbers(7) | Multiply(3) | ...");
    }

    #[test]
    fn test_connect_method_accepts_reordered_contract() {
        let result = Collected::<String>::new();
        let shuffled: Source<(Text, Integer)> = Fragment::from_nodes(rc!(Greeting()).take_nodes());
        let pipeline = shuffled.connect(rc!(Render(result.clone())));
        assert_eq!(pipeline.input_contract(), &TypeContract::empty());
        pipeline.sync().unwrap();
        assert_eq!(result.joined(","), "'Answer',42");
    }

    #[test]
    #[should_panic(expected = "reused after being consumed")]
    fn test_lending_an_emptied_fragment_panics() {
        let collect = rc!(Collect());
        let _ = collect.describe();
        let mut numbers = rc!(Numbers(1));
        let _ = numbers.take_nodes();
        let _ = &numbers | &collect;
    }
}

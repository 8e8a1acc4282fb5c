//! Small nodes used by tests, doc examples, and benchmarks.

use super::Collected;
use crate::{Construct, Emitter, Node, NodeResult, Payload, Reacts};
use anyhow::Context;

/// An integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Payload)]
pub struct Integer(pub i32);

/// A text payload.
#[derive(Debug, Clone, PartialEq, Eq, Payload)]
pub struct Text(pub String);

/// Source emitting its constructor arguments as [`Integer`]s.
#[derive(Debug, Node)]
#[node(output(Integer))]
pub struct Numbers;

impl Construct<()> for Numbers {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self
    }
}

impl Construct<(i32,)> for Numbers {
    fn construct((a,): (i32,), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Integer(a));
        Self
    }
}

impl Construct<(i32, i32)> for Numbers {
    fn construct((a, b): (i32, i32), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Integer(a));
        out.emit(Integer(b));
        Self
    }
}

impl Construct<(i32, i32, i32)> for Numbers {
    fn construct((a, b, c): (i32, i32, i32), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Integer(a));
        out.emit(Integer(b));
        out.emit(Integer(c));
        Self
    }
}

impl Construct<(Vec<i32>,)> for Numbers {
    fn construct((values,): (Vec<i32>,), out: &mut Emitter<'_, Self::Output>) -> Self {
        for value in values {
            out.emit(Integer(value));
        }
        Self
    }
}

/// Multiplies every [`Integer`] by a constant (1 by default).
#[derive(Debug, Node)]
#[node(input(Integer), output(Integer))]
pub struct Multiply {
    k: i32,
}

impl Construct<()> for Multiply {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { k: 1 }
    }
}

impl Construct<(i32,)> for Multiply {
    fn construct((k,): (i32,), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { k }
    }
}

impl Reacts<Integer> for Multiply {
    fn react(&mut self, value: Integer, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        out.emit(Integer(value.0 * self.k));
        Ok(())
    }
}

/// Emits the running total of the [`Integer`]s seen so far.
#[derive(Debug, Node)]
#[node(input(Integer), output(Integer))]
pub struct Accumulate {
    total: i32,
}

impl Construct<()> for Accumulate {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { total: 0 }
    }
}

impl Reacts<Integer> for Accumulate {
    fn react(&mut self, value: Integer, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        self.total = self
            .total
            .checked_add(value.0)
            .context("running total overflowed")?;
        out.emit(Integer(self.total));
        Ok(())
    }
}

/// Sink pushing every [`Integer`] into a [`Collected`].
///
/// Built without a destination it fails on the first value.
#[derive(Debug, Node)]
#[node(input(Integer))]
pub struct Collect {
    into: Option<Collected<i32>>,
}

impl Construct<()> for Collect {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { into: None }
    }
}

impl Construct<(Collected<i32>,)> for Collect {
    fn construct((into,): (Collected<i32>,), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { into: Some(into) }
    }
}

impl Reacts<Integer> for Collect {
    fn react(&mut self, value: Integer, _out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        let into = self
            .into
            .as_ref()
            .with_context(|| format!("no destination for Integer({})", value.0))?;
        into.push(value.0);
        Ok(())
    }
}

/// Source emitting `Text("Answer")` then `Integer(42)`.
#[derive(Debug, Node)]
#[node(output(Text, Integer))]
pub struct Greeting;

impl Construct<()> for Greeting {
    fn construct((): (), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Text("Answer".to_string()));
        out.emit(Integer(42));
        Self
    }
}

/// Decorates both payload kinds: integers get repeated, text gets quoted
/// between `Yo?` and `Yo!`.
#[derive(Debug, Node)]
#[node(input(Integer, Text), output(Integer, Text))]
pub struct Decorate;

impl Construct<()> for Decorate {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self
    }
}

impl Reacts<Integer> for Decorate {
    fn react(&mut self, value: Integer, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        let repeated = value
            .0
            .checked_mul(1_001_001)
            .context("decorated integer overflowed")?;
        out.emit(Integer(repeated));
        Ok(())
    }
}

impl Reacts<Text> for Decorate {
    fn react(&mut self, value: Text, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        out.emit(Text(format!("Yo? {} Yo!", value.0)));
        Ok(())
    }
}

/// Sink rendering both payload kinds into a [`Collected`] of strings:
/// integers as digits, text in single quotes.
#[derive(Debug, Node)]
#[node(input(Text, Integer))]
pub struct Render {
    into: Collected<String>,
}

impl Construct<(Collected<String>,)> for Render {
    fn construct((into,): (Collected<String>,), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self { into }
    }
}

impl Reacts<Integer> for Render {
    fn react(&mut self, value: Integer, _out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        self.into.push(value.0.to_string());
        Ok(())
    }
}

impl Reacts<Text> for Render {
    fn react(&mut self, value: Text, _out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        self.into.push(format!("'{}'", value.0));
        Ok(())
    }
}

//! Cross-module tests: declaration, composition, leak reporting and both
//! execution engines together.

use crate::config::{ExecutionMode, JobConfig};
use crate::core::Message;
use crate::pipeline::{Fragment, FragmentShape};
use crate::testing::{
    assert_single_leak, Accumulate, Collect, Collected, Decorate, Greeting, Integer, LeakCapture, Multiply,
    Numbers, Render, Text,
};
use crate::testing::Text as Label;
use crate::{contract, rc, Construct, Emitter, Node, NodeResult, Reacts};
use pretty_assertions::assert_eq;

/// Source whose output contract lists `Integer` first.
#[derive(Debug, Node)]
#[node(name = "Pair", output(Integer, Text))]
struct PairSource;

impl Construct<()> for PairSource {
    fn construct((): (), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Integer(7));
        out.emit(Text("seven".to_string()));
        Self
    }
}

/// Source naming `Text` through an alias, so its contract tuple sorts as
/// `(Text, Integer)`.
#[derive(Debug, Node)]
#[node(output(Label, Integer))]
struct LabelSource;

impl Construct<()> for LabelSource {
    fn construct((): (), out: &mut Emitter<'_, Self::Output>) -> Self {
        out.emit(Label("label".to_string()));
        out.emit(Integer(3));
        Self
    }
}

/// Hand-written node, without the derive.
struct Negate;

impl Node for Negate {
    type Input = contract![Integer];
    type Output = contract![Integer];

    const NAME: &'static str = "Negate";

    fn dispatch(&mut self, message: Message, out: &mut Emitter<'_, Self::Output>) -> Result<NodeResult, Message> {
        let value = message.downcast::<Integer>()?;
        out.emit(Integer(-value.0));
        Ok(Ok(()))
    }
}

impl Construct<()> for Negate {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self
    }
}

/// Rejects negative values.
#[derive(Debug, Node)]
#[node(input(Integer), output(Integer))]
struct NonNegative;

impl Construct<()> for NonNegative {
    fn construct((): (), _out: &mut Emitter<'_, Self::Output>) -> Self {
        Self
    }
}

impl Reacts<Integer> for NonNegative {
    fn react(&mut self, value: Integer, out: &mut Emitter<'_, Self::Output>) -> NodeResult {
        anyhow::ensure!(value.0 >= 0, "negative value {}", value.0);
        out.emit(value);
        Ok(())
    }
}

#[test]
fn test_connect_is_associative() {
    let outputs: Vec<Collected<i32>> = (0..3).map(|_| Collected::new()).collect();
    let a = rc!(Numbers(1, 2));
    let b = rc!(Multiply(2));
    let c = rc!(Accumulate());
    let sinks: Vec<_> = outputs.iter().map(|out| rc!(Collect(out.clone()))).collect();

    let chains = [
        ((&a | &b) | &c) | &sinks[0],
        &a | (&b | (&c | &sinks[1])),
        (&a | (&b | &c)) | &sinks[2],
    ];
    for chain in chains {
        assert_eq!(chain.node_names(), vec!["Numbers", "Multiply", "Accumulate", "Collect"]);
        chain.sync().unwrap();
    }

    let rendered: Vec<String> = outputs.iter().map(|out| out.joined(",")).collect();
    assert_eq!(rendered, vec!["2,6", "2,6", "2,6"]);
}

#[test]
fn test_reused_via_builds_independent_instances() {
    let result = Collected::<i32>::new();
    let a = rc!(Numbers(1));
    let b = rc!(Multiply(2));
    let c = rc!(Collect(result.clone()));

    (&a | &b | &b | &c).sync().unwrap();
    assert_eq!(result.joined(","), "4");
    result.clear();

    ((&a | &b) | (&b | &c)).sync().unwrap();
    assert_eq!(result.joined(","), "4");
}

#[test]
fn test_shared_blueprint_across_pipelines() {
    let first = Collected::<i32>::new();
    let second = Collected::<i32>::new();

    let foo1 = rc!(Numbers(1));
    let foo2 = rc!(Numbers(2));
    let bar = rc!(Multiply(10));
    let baz1 = rc!(Collect(first.clone()));
    let baz2 = rc!(Collect(second.clone()));

    let one = &foo1 | &bar | &baz1;
    let two = &foo2 | &bar | &baz2;
    assert_eq!(one.describe(), "Numbers(1) | Multiply(10) | Collect(first.clone())");
    assert_eq!(two.describe(), "Numbers(2) | Multiply(10) | Collect(second.clone())");

    two.sync().unwrap();
    one.sync().unwrap();
    assert_eq!(first.joined(","), "10");
    assert_eq!(second.joined(","), "20");
}

#[test]
fn test_stateful_node_restarts_per_run() {
    let result = Collected::<i32>::new();
    let numbers = rc!(Numbers(vec![5, 5, 5]));
    let total = rc!(Accumulate());
    let collect = rc!(Collect(result.clone()));

    let first = (&numbers | &total | &collect).realize();
    let second = (&numbers | &total | &collect).realize();
    first.run().unwrap();
    second.run().unwrap();
    assert_eq!(result.joined(","), "5,10,15,5,10,15");
}

#[test]
fn test_contracts_compare_as_sets() {
    let result = Collected::<String>::new();
    let render = rc!(Render(result.clone()));
    assert_eq!(render.describe_with_types(), "... | { Integer, Text } => Render(result.clone())");

    let pipeline = rc!(PairSource()) | render;
    assert_eq!(pipeline.shape(), FragmentShape::Closed);
    pipeline.sync().unwrap();
    assert_eq!(result.joined(","), "7,'seven'");

    let spelled: contract![Text, Integer, Text] = (Integer(1), Text("one".to_string()));
    assert_eq!(spelled.0, Integer(1));
}

#[test]
fn test_aliased_payload_connects_as_set() {
    let result = Collected::<String>::new();
    let source = rc!(LabelSource());
    assert_eq!(source.describe_with_types(), "LabelSource() => { Integer, Text } | ...");

    let pipeline = source.connect(rc!(Render(result.clone())));
    assert_eq!(pipeline.shape(), FragmentShape::Closed);
    pipeline.sync().unwrap();
    assert_eq!(result.joined(","), "'label',3");
}

#[test]
fn test_multi_type_flow() {
    let answer = Collected::<String>::new();
    let greeting = rc!(Greeting());
    assert_eq!(greeting.describe_with_types(), "Greeting() => { Integer, Text } | ...");
    (greeting | rc!(Render(answer.clone()))).sync().unwrap();
    assert_eq!(answer.joined(","), "'Answer',42");

    let decorated = Collected::<String>::new();
    (rc!(Greeting()) | rc!(Decorate()) | rc!(Render(decorated.clone())))
        .sync()
        .unwrap();
    assert_eq!(decorated.joined(","), "'Yo? Answer Yo!',42042042");
}

#[test]
fn test_hand_written_node_connects_with_derived_nodes() {
    let result = Collected::<i32>::new();
    let pipeline: Fragment<(), ()> = rc!(Numbers(1, 2)) | rc!(Negate()) | rc!(Collect(result.clone()));
    assert_eq!(pipeline.describe(), "Numbers(1, 2) | Negate() | Collect(result.clone())");
    pipeline.sync().unwrap();
    assert_eq!(result.joined(","), "-1,-2");
}

#[test]
fn test_node_error_aborts_run() {
    let result = Collected::<i32>::new();
    let err = (rc!(Numbers(3, 4)) | rc!(Negate()) | rc!(NonNegative()) | rc!(Collect(result.clone())))
        .sync()
        .unwrap_err();

    assert_eq!(err.code(), "RC-001-NODE");
    assert_eq!(err.to_string(), "Node 'NonNegative' failed: negative value -3");
    assert!(result.is_empty());
}

#[test]
fn test_leaks_report_exactly_once() {
    let capture = LeakCapture::install();
    {
        let numbers = rc!(Numbers(1));
        let _chain = numbers | rc!(Multiply(2)) | rc!(Multiply(3));
    }
    assert_single_leak(&capture, "Numbers(1) | Multiply(2) | Multiply(3) | ...");

    let report = capture.last().unwrap_or_default();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[2], "Numbers(1) | Multiply(2) | Multiply(3) => { Integer } | ...");
}

#[test]
fn test_leaked_sink_and_closed_chain() {
    let capture = LeakCapture::install();
    drop(rc!(Collect()));
    assert_single_leak(&capture, "... | Collect()");

    drop(rc!(Numbers()) | rc!(Collect()));
    assert_eq!(capture.count(), 2);
    assert_eq!(capture.last_two_lines().as_deref(), Some("pipeline fragment leaked\nNumbers() | Collect()"));
}

#[test]
fn test_used_fragments_never_leak() {
    let capture = LeakCapture::install();
    let result = Collected::<i32>::new();
    {
        let numbers = rc!(Numbers(1));
        let collect = rc!(Collect(result.clone()));
        (&numbers | &collect).sync().unwrap();
        let described = rc!(Multiply(2));
        let _ = described.describe();
        rc!(Multiply(3)).dismiss();
        let _job = (rc!(Numbers(9)) | rc!(Collect())).realize();
    }
    assert_eq!(capture.count(), 0);
    assert_eq!(result.joined(","), "1");
}

#[tokio::test]
async fn test_threaded_and_sync_agree() {
    let sync_out = Collected::<String>::new();
    let threaded_out = Collected::<String>::new();

    (rc!(Greeting()) | rc!(Decorate()) | rc!(Render(sync_out.clone())))
        .realize()
        .run_with_config(&JobConfig::default())
        .await
        .unwrap();

    let config = JobConfig::default()
        .with_mode(ExecutionMode::Threaded)
        .with_channel_capacity(1);
    (rc!(Greeting()) | rc!(Decorate()) | rc!(Render(threaded_out.clone())))
        .realize()
        .run_with_config(&config)
        .await
        .unwrap();

    assert_eq!(sync_out.snapshot(), threaded_out.snapshot());
    assert_eq!(threaded_out.joined(","), "'Yo? Answer Yo!',42042042");
}

#[tokio::test]
async fn test_threaded_failure_matches_sync() {
    let sync_err = (rc!(Numbers(3)) | rc!(Negate()) | rc!(NonNegative()) | rc!(Collect()))
        .sync()
        .unwrap_err();
    let threaded_err = (rc!(Numbers(3)) | rc!(Negate()) | rc!(NonNegative()) | rc!(Collect()))
        .realize()
        .run_threaded(8)
        .await
        .unwrap_err();
    assert_eq!(sync_err.to_string(), threaded_err.to_string());
}

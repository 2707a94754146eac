//! Compiled signal graph and its control-side handles.
//!
//! [`SignalGraph::build`] instantiates every node of a [`ChainSpec`] through the
//! registry, sorts them so each node runs after its inputs, and hands back the
//! [`GraphControls`] the control thread keeps. The graph itself moves to the
//! render thread behind a [`SharedGraph`].

use crate::chain::ChainSpec;
use crate::control::{ParamControl, PlaybackTarget};
use crate::node::AudioNode;
use crate::registry::NodeRegistry;
use crate::tap::{NodeTap, TapWriter};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Graph shared between the control thread and the render callback.
pub type SharedGraph = Arc<Mutex<SignalGraph>>;

struct Slot {
    id: String,
    node: Box<dyn AudioNode>,
    /// Slot index feeding each input port, `None` reads silence.
    sources: Vec<Option<usize>>,
    taps: Vec<TapWriter>,
}

/// Nodes in evaluation order plus per-frame scratch space.
pub struct SignalGraph {
    slots: Vec<Slot>,
    values: Vec<f32>,
    scratch: Vec<f32>,
    output: usize,
    sample_rate: f64,
}

/// Everything the control thread may touch once the graph is running.
pub struct GraphControls {
    controls: HashMap<String, HashMap<&'static str, Arc<ParamControl>>>,
    playback: Option<Arc<dyn PlaybackTarget>>,
    taps: Vec<NodeTap>,
}

impl GraphControls {
    pub fn control(&self, node: &str, name: &str) -> Result<Arc<ParamControl>> {
        let node_controls = self
            .controls
            .get(node)
            .ok_or_else(|| Error::UnknownNode(node.to_string()))?;

        node_controls
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownControl {
                node: node.to_string(),
                control: name.to_string(),
            })
    }

    /// Control names of `node`, sorted.
    pub fn control_names(&self, node: &str) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .controls
            .get(node)
            .map(|c| c.keys().copied().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn playback(&self) -> Option<Arc<dyn PlaybackTarget>> {
        self.playback.clone()
    }

    pub fn take_taps(&mut self) -> Vec<NodeTap> {
        std::mem::take(&mut self.taps)
    }
}

impl SignalGraph {
    /// Any node failing to construct fails the whole build.
    pub fn build(
        chain: &ChainSpec,
        registry: &NodeRegistry,
        sample_rate: f64,
    ) -> Result<(Self, GraphControls)> {
        let order = chain.evaluation_order()?;

        // Declaration index -> position in evaluation order
        let mut position = vec![0usize; chain.nodes.len()];
        for (pos, &idx) in order.iter().enumerate() {
            position[idx] = pos;
        }

        let mut controls = HashMap::new();
        let mut playback = None;
        let mut slots = Vec::with_capacity(order.len());

        for &idx in &order {
            let spec = &chain.nodes[idx];
            let mut node = registry.create(&spec.kind, &spec.params)?;
            node.set_sample_rate(sample_rate);
            node.reset();

            controls.insert(spec.id.clone(), node.controls().into_iter().collect());

            if chain.source.as_deref() == Some(spec.id.as_str()) {
                playback = Some(node.playback().ok_or_else(|| {
                    Error::InvalidChain(format!(
                        "source '{}' ({}) does not accept transport commands",
                        spec.id, spec.kind
                    ))
                })?);
            }

            debug!(node = %spec.id, kind = %spec.kind, inputs = node.inputs(), "node created");

            slots.push(Slot {
                id: spec.id.clone(),
                sources: vec![None; node.inputs()],
                node,
                taps: Vec::new(),
            });
        }

        for c in &chain.connections {
            let from = position[chain.index_of(&c.from).ok_or_else(|| Error::UnknownNode(c.from.clone()))?];
            let to = position[chain.index_of(&c.to).ok_or_else(|| Error::UnknownNode(c.to.clone()))?];
            let slot = &mut slots[to];

            let inputs = slot.sources.len();
            let port = slot.sources.get_mut(c.port).ok_or_else(|| {
                Error::InvalidChain(format!(
                    "'{}' has {inputs} input(s), cannot connect port {}",
                    c.to, c.port
                ))
            })?;
            *port = Some(from);
        }

        for slot in &slots {
            for (port, source) in slot.sources.iter().enumerate() {
                if source.is_none() {
                    warn!(node = %slot.id, port, "input port not connected, reading silence");
                }
            }
        }

        let mut taps = Vec::with_capacity(chain.taps.len());
        for tap in &chain.taps {
            let idx = chain.index_of(&tap.node).ok_or_else(|| Error::UnknownNode(tap.node.clone()))?;
            let (writer, reader) = NodeTap::pair(tap.node.clone(), tap.history);
            slots[position[idx]].taps.push(writer);
            taps.push(reader);
        }

        let output = chain
            .index_of(&chain.output)
            .map(|idx| position[idx])
            .ok_or_else(|| Error::UnknownNode(chain.output.clone()))?;

        let max_inputs = slots.iter().map(|s| s.sources.len()).max().unwrap_or(0);

        let graph = Self {
            values: vec![0.0; slots.len()],
            scratch: vec![0.0; max_inputs],
            slots,
            output,
            sample_rate,
        };

        Ok((
            graph,
            GraphControls {
                controls,
                playback,
                taps,
            },
        ))
    }

    pub fn into_shared(self) -> SharedGraph {
        Arc::new(Mutex::new(self))
    }

    /// Run every node once and return the output node's sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let output = self.output;
        let Self {
            slots,
            values,
            scratch,
            ..
        } = self;

        for i in 0..slots.len() {
            let slot = &mut slots[i];
            let inputs = slot.sources.len();

            for (port, source) in slot.sources.iter().enumerate() {
                scratch[port] = source.map_or(0.0, |s| values[s]);
            }

            let out = slot.node.tick(&scratch[..inputs]);
            values[i] = out;

            for tap in &mut slot.taps {
                tap.push(out);
            }
        }

        values[output]
    }

    /// Fill an interleaved stereo buffer (`output.len() / 2` frames).
    pub fn process(&mut self, output: &mut [f32]) {
        for frame in output.chunks_exact_mut(2) {
            let sample = self.tick();
            frame[0] = sample;
            frame[1] = sample;
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        for slot in &mut self.slots {
            slot.node.set_sample_rate(sample_rate);
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.node.reset();
        }
        self.values.fill(0.0);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node ids in evaluation order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SampleBuffer;
    use crate::control::RampedParam;
    use crate::lockfree::AtomicFlag;
    use crate::params;

    struct Constant {
        value: RampedParam,
    }

    impl AudioNode for Constant {
        fn kind(&self) -> &'static str {
            "constant"
        }
        fn inputs(&self) -> usize {
            0
        }
        fn set_sample_rate(&mut self, sample_rate: f64) {
            self.value.set_sample_rate(sample_rate);
        }
        fn reset(&mut self) {
            self.value.reset();
        }
        fn tick(&mut self, _input: &[f32]) -> f32 {
            self.value.next_sample()
        }
        fn controls(&self) -> Vec<(&'static str, Arc<ParamControl>)> {
            vec![("value", self.value.control())]
        }
    }

    struct Sum(usize);

    impl AudioNode for Sum {
        fn kind(&self) -> &'static str {
            "sum"
        }
        fn inputs(&self) -> usize {
            self.0
        }
        fn set_sample_rate(&mut self, _sample_rate: f64) {}
        fn reset(&mut self) {}
        fn tick(&mut self, input: &[f32]) -> f32 {
            input.iter().sum()
        }
    }

    struct Gate {
        open: Arc<GateTarget>,
    }

    #[derive(Default)]
    struct GateTarget {
        playing: AtomicFlag,
    }

    impl PlaybackTarget for GateTarget {
        fn schedule(&self, _buffer: Arc<SampleBuffer>, _looping: bool) {}
        fn play(&self) {
            self.playing.set(true);
        }
        fn pause(&self) {
            self.playing.set(false);
        }
        fn stop(&self) {
            self.playing.set(false);
        }
        fn is_playing(&self) -> bool {
            self.playing.get()
        }
    }

    impl AudioNode for Gate {
        fn kind(&self) -> &'static str {
            "gate"
        }
        fn inputs(&self) -> usize {
            0
        }
        fn set_sample_rate(&mut self, _sample_rate: f64) {}
        fn reset(&mut self) {}
        fn tick(&mut self, _input: &[f32]) -> f32 {
            if self.open.is_playing() {
                1.0
            } else {
                0.0
            }
        }
        fn playback(&self) -> Option<Arc<dyn PlaybackTarget>> {
            Some(self.open.clone())
        }
    }

    fn registry() -> NodeRegistry {
        let registry = NodeRegistry::new();
        registry.register("constant", |p| {
            let value = crate::registry::get_param_or(p, "value", 0.0, |v| v.as_f32())?;
            Ok(Box::new(Constant {
                value: RampedParam::new(value, 44100.0),
            }))
        });
        registry.register("sum", |p| {
            let inputs = crate::registry::get_param_or(p, "inputs", 2, |v| v.as_i64())?;
            Ok(Box::new(Sum(inputs as usize)))
        });
        registry.register("gate", |_| {
            Ok(Box::new(Gate {
                open: Arc::new(GateTarget::default()),
            }))
        });
        registry
    }

    fn chain() -> ChainSpec {
        // Declared out of order on purpose
        ChainSpec::new("sum")
            .node("sum", "sum", params! { "inputs" => 2 })
            .node("a", "constant", params! { "value" => 0.25 })
            .node("b", "constant", params! { "value" => 0.5 })
            .connect("a", "sum", 0)
            .connect("b", "sum", 1)
            .output("sum")
    }

    #[test]
    fn test_build_and_tick() {
        let (mut graph, _controls) = SignalGraph::build(&chain(), &registry(), 44100.0).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node_ids().last(), Some(&"sum"));
        assert_eq!(graph.tick(), 0.75);
    }

    #[test]
    fn test_process_duplicates_to_stereo() {
        let (mut graph, _controls) = SignalGraph::build(&chain(), &registry(), 44100.0).unwrap();
        let mut out = vec![0.0; 8];
        graph.process(&mut out);
        assert!(out.iter().all(|&s| s == 0.75));
    }

    #[test]
    fn test_controls_reach_nodes() {
        let (mut graph, controls) = SignalGraph::build(&chain(), &registry(), 44100.0).unwrap();
        controls.control("a", "value").unwrap().set_immediate(1.0);
        assert_eq!(graph.tick(), 1.5);

        assert!(matches!(
            controls.control("a", "gain"),
            Err(Error::UnknownControl { .. })
        ));
        assert!(matches!(
            controls.control("nope", "value"),
            Err(Error::UnknownNode(_))
        ));
        assert_eq!(controls.control_names("b"), vec!["value"]);
    }

    #[test]
    fn test_unconnected_port_reads_silence() {
        let chain = ChainSpec::new("half")
            .node("a", "constant", params! { "value" => 0.25 })
            .node("sum", "sum", params! { "inputs" => 2 })
            .connect("a", "sum", 1)
            .output("sum");
        let (mut graph, _) = SignalGraph::build(&chain, &registry(), 44100.0).unwrap();
        assert_eq!(graph.tick(), 0.25);
    }

    #[test]
    fn test_port_out_of_range_is_fatal() {
        let chain = chain()
            .node("c", "constant", params! {})
            .connect("c", "sum", 2);
        assert!(matches!(
            SignalGraph::build(&chain, &registry(), 44100.0),
            Err(Error::InvalidChain(_))
        ));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let chain = ChainSpec::new("bad").node("x", "reverb", params! {}).output("x");
        assert!(matches!(
            SignalGraph::build(&chain, &registry(), 44100.0),
            Err(Error::NodeRegistry(_))
        ));
    }

    #[test]
    fn test_construction_error_is_fatal() {
        let chain = ChainSpec::new("bad")
            .node("x", "constant", params! { "value" => "loud" })
            .output("x");
        assert!(SignalGraph::build(&chain, &registry(), 44100.0).is_err());
    }

    #[test]
    fn test_source_must_accept_transport() {
        let ok = ChainSpec::new("gate").node("g", "gate", params! {}).output("g").source("g");
        let (mut graph, controls) = SignalGraph::build(&ok, &registry(), 44100.0).unwrap();
        assert_eq!(graph.tick(), 0.0);
        controls.playback().unwrap().play();
        assert_eq!(graph.tick(), 1.0);

        let bad = chain().source("a");
        assert!(matches!(
            SignalGraph::build(&bad, &registry(), 44100.0),
            Err(Error::InvalidChain(_))
        ));
    }

    #[test]
    fn test_taps_receive_node_output() {
        let chain = chain().tap("a", 16);
        let (mut graph, mut controls) = SignalGraph::build(&chain, &registry(), 44100.0).unwrap();
        let mut taps = controls.take_taps();
        assert_eq!(taps.len(), 1);

        taps[0].start();
        for _ in 0..4 {
            graph.tick();
        }
        taps[0].poll();
        assert_eq!(taps[0].history(), vec![0.25; 4]);
    }
}

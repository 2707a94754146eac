//! Declarative signal chain description.
//!
//! A chain lists node kinds, how their outputs feed each other's input ports,
//! which node is the graph output, which node accepts transport commands, and
//! which parameters drive which node controls. Swapping the chain swaps the demo
//! without code changes; chains can also be read from JSON.
//!
//! # Example
//!
//! ```
//! use conductor_core::{params, ChainSpec, ParameterRange, ParameterSpec, RampSource};
//!
//! let chain = ChainSpec::new("tremolo")
//!     .node("player", "player", params! {})
//!     .node("fader", "fader", params! { "gain" => 1.0 })
//!     .connect("player", "fader", 0)
//!     .output("fader")
//!     .source("player")
//!     .bind(
//!         ParameterSpec::new("gain", ParameterRange::new(0.0, 1.0, 1.0))
//!             .ramp(RampSource::Fixed(0.05)),
//!         "fader",
//!         "gain",
//!     );
//!
//! assert_eq!(chain.evaluation_order().unwrap(), vec![0, 1]);
//! ```

use crate::parameter::ParameterSpec;
use crate::registry::NodeParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Default rolling history of an output tap, in samples.
pub const DEFAULT_TAP_HISTORY: usize = 128;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub params: NodeParams,
}

/// `from`'s output feeds input `port` of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub port: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRef {
    pub node: String,
    pub control: String,
}

/// A parameter and, optionally, the node control it drives.
///
/// Unbound parameters (such as a ramp duration slider) live only in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub parameter: ParameterSpec,
    #[serde(default)]
    pub target: Option<ControlRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapSpec {
    pub node: String,
    #[serde(default = "default_tap_history")]
    pub history: usize,
}

fn default_tap_history() -> usize {
    DEFAULT_TAP_HISTORY
}

fn default_autoplay() -> bool {
    true
}

/// Ordered node list plus wiring. Fixed once a graph is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub name: String,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    pub output: String,
    /// Node receiving transport commands.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterBinding>,
    #[serde(default)]
    pub taps: Vec<TapSpec>,
    /// Start playing as soon as the engine runs.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

impl ChainSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
            output: String::new(),
            source: None,
            parameters: Vec::new(),
            taps: Vec::new(),
            autoplay: true,
        }
    }

    pub fn node(mut self, id: impl Into<String>, kind: impl Into<String>, params: NodeParams) -> Self {
        self.nodes.push(NodeSpec {
            id: id.into(),
            kind: kind.into(),
            params,
        });
        self
    }

    pub fn connect(mut self, from: impl Into<String>, to: impl Into<String>, port: usize) -> Self {
        self.connections.push(Connection {
            from: from.into(),
            to: to.into(),
            port,
        });
        self
    }

    pub fn output(mut self, id: impl Into<String>) -> Self {
        self.output = id.into();
        self
    }

    pub fn source(mut self, id: impl Into<String>) -> Self {
        self.source = Some(id.into());
        self
    }

    /// Parameter that drives `node`'s `control`.
    pub fn bind(
        mut self,
        parameter: ParameterSpec,
        node: impl Into<String>,
        control: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterBinding {
            parameter,
            target: Some(ControlRef {
                node: node.into(),
                control: control.into(),
            }),
        });
        self
    }

    /// Parameter with no node behind it.
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(ParameterBinding {
            parameter,
            target: None,
        });
        self
    }

    pub fn tap(mut self, node: impl Into<String>, history: usize) -> Self {
        self.taps.push(TapSpec {
            node: node.into(),
            history,
        });
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidChain(format!("invalid JSON: {e}")))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Structural validation. Port ranges are checked once nodes exist.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::InvalidChain(format!("chain '{}' has no nodes", self.name)));
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::InvalidChain(format!("duplicate node id '{}'", node.id)));
            }
        }

        let known = |id: &str| -> Result<()> {
            if seen.contains(id) {
                Ok(())
            } else {
                Err(Error::UnknownNode(id.to_string()))
            }
        };

        known(&self.output)?;
        if let Some(source) = &self.source {
            known(source)?;
        }

        let mut ports = HashSet::new();
        for c in &self.connections {
            known(&c.from)?;
            known(&c.to)?;
            if !ports.insert((c.to.as_str(), c.port)) {
                return Err(Error::InvalidChain(format!(
                    "input {} of '{}' is connected more than once",
                    c.port, c.to
                )));
            }
        }

        for binding in &self.parameters {
            if let Some(target) = &binding.target {
                known(&target.node)?;
            }
        }

        for tap in &self.taps {
            known(&tap.node)?;
            if tap.history == 0 {
                return Err(Error::InvalidChain(format!(
                    "tap on '{}' has zero history",
                    tap.node
                )));
            }
        }

        Ok(())
    }

    /// Node indices in an order where every node comes after its inputs.
    pub fn evaluation_order(&self) -> Result<Vec<usize>> {
        self.validate()?;

        let index: HashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; self.nodes.len()];
        let mut downstream = vec![Vec::new(); self.nodes.len()];
        for c in &self.connections {
            let (from, to) = (index[c.from.as_str()], index[c.to.as_str()]);
            in_degree[to] += 1;
            downstream[from].push(to);
        }

        // Kahn's algorithm, seeded in declaration order for a stable result
        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(i) = ready.pop_front() {
            order.push(i);
            for &next in &downstream[i] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(Error::InvalidChain(format!(
                "chain '{}' contains a cycle",
                self.name
            )));
        }

        Ok(order)
    }
}

//! Node registry for building nodes from string identifiers.
//!
//! A [`ChainSpec`](crate::ChainSpec) names node kinds as strings; the registry maps
//! each kind to a constructor. Node crates register their kinds at startup, so the
//! core never depends on a concrete node implementation.

use crate::node::AudioNode;
use crate::NodeRegistryError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Create a `NodeParams` map with key-value pairs.
///
/// # Example
/// ```
/// use conductor_core::params;
///
/// let params = params! {
///     "frequency" => 440.0,
///     "inputs" => 2,
/// };
/// assert_eq!(params["frequency"].as_f32(), Some(440.0));
/// ```
#[macro_export]
macro_rules! params {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::NodeParams::new();
        $(
            map.insert($key.to_string(), $value.into());
        )*
        map
    }};
}

/// Function that constructs a node from parameters
pub type NodeConstructor =
    Arc<dyn Fn(&NodeParams) -> Result<Box<dyn AudioNode>, NodeRegistryError> + Send + Sync>;

/// Node construction parameters (simple key-value map)
pub type NodeParams = HashMap<String, NodeParamValue>;

/// Parameter value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl NodeParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|f| f as f32)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for NodeParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for NodeParamValue {
    fn from(f: f32) -> Self {
        Self::Float(f as f64)
    }
}

impl From<i64> for NodeParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for NodeParamValue {
    fn from(i: i32) -> Self {
        Self::Int(i as i64)
    }
}

impl From<usize> for NodeParamValue {
    fn from(i: usize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<bool> for NodeParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for NodeParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for NodeParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Registry of node constructors. Clones share the same table.
pub struct NodeRegistry {
    constructors: Arc<RwLock<HashMap<String, NodeConstructor>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            constructors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a node constructor, replacing any previous one of the same name.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&NodeParams) -> Result<Box<dyn AudioNode>, NodeRegistryError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .write()
            .insert(name.into(), Arc::new(constructor));
    }

    pub fn create(
        &self,
        name: &str,
        params: &NodeParams,
    ) -> Result<Box<dyn AudioNode>, NodeRegistryError> {
        // Clone the constructor out so user code never runs under the lock
        let constructor = self
            .constructors
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| NodeRegistryError::UnknownNodeType(name.to_string()))?;

        constructor(params)
    }

    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.constructors.read().keys().cloned().collect();
        types.sort();
        types
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.constructors.write().remove(name).is_some()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for NodeRegistry {
    fn clone(&self) -> Self {
        Self {
            constructors: Arc::clone(&self.constructors),
        }
    }
}

/// Get a required parameter.
pub fn get_param<T>(
    params: &NodeParams,
    name: &str,
    convert: impl FnOnce(&NodeParamValue) -> Option<T>,
) -> Result<T, NodeRegistryError> {
    params
        .get(name)
        .ok_or_else(|| NodeRegistryError::MissingParameter(name.to_string()))
        .and_then(|v| {
            convert(v).ok_or_else(|| {
                NodeRegistryError::InvalidParameter(name.to_string(), format!("{v:?}"))
            })
        })
}

/// Get an optional parameter with a default. A present value of the wrong type
/// is an error rather than silently replaced by the default.
pub fn get_param_or<T>(
    params: &NodeParams,
    name: &str,
    default: T,
    convert: impl FnOnce(&NodeParamValue) -> Option<T>,
) -> Result<T, NodeRegistryError> {
    match params.get(name) {
        None => Ok(default),
        Some(v) => convert(v).ok_or_else(|| {
            NodeRegistryError::InvalidParameter(name.to_string(), format!("{v:?}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silence;

    impl AudioNode for Silence {
        fn kind(&self) -> &'static str {
            "silence"
        }
        fn inputs(&self) -> usize {
            0
        }
        fn set_sample_rate(&mut self, _sample_rate: f64) {}
        fn reset(&mut self) {}
        fn tick(&mut self, _input: &[f32]) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_param_conversion() {
        let val = NodeParamValue::Float(440.5);
        assert_eq!(val.as_f64(), Some(440.5));
        assert_eq!(val.as_f32(), Some(440.5_f32));
        assert_eq!(val.as_i64(), None);

        let val = NodeParamValue::Int(42);
        assert_eq!(val.as_i64(), Some(42));
        assert_eq!(val.as_f64(), Some(42.0));

        assert_eq!(NodeParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(NodeParamValue::from("loop").as_str(), Some("loop"));
    }

    #[test]
    fn test_params_json_untagged() {
        let params: NodeParams =
            serde_json::from_str(r#"{ "frequency": 440.0, "inputs": 2, "looping": true }"#)
                .unwrap();
        assert_eq!(params["frequency"], NodeParamValue::Float(440.0));
        assert_eq!(params["inputs"], NodeParamValue::Int(2));
        assert_eq!(params["looping"], NodeParamValue::Bool(true));
    }

    #[test]
    fn test_registry_basic() {
        let registry = NodeRegistry::new();
        registry.register("silence", |_| Ok(Box::new(Silence)));

        assert!(registry.has_type("silence"));
        let node = registry.create("silence", &NodeParams::new()).unwrap();
        assert_eq!(node.kind(), "silence");

        assert!(matches!(
            registry.create("reverb", &NodeParams::new()),
            Err(NodeRegistryError::UnknownNodeType(_))
        ));

        assert!(registry.unregister("silence"));
        assert!(!registry.has_type("silence"));
    }

    #[test]
    fn test_clones_share_table() {
        let registry = NodeRegistry::new();
        let clone = registry.clone();
        clone.register("silence", |_| Ok(Box::new(Silence)));
        assert_eq!(registry.list_types(), vec!["silence".to_string()]);
    }

    #[test]
    fn test_get_param_helpers() {
        let params = params! { "gain" => 0.5, "name" => "fader" };

        assert_eq!(get_param(&params, "gain", |v| v.as_f32()).unwrap(), 0.5);
        assert!(matches!(
            get_param(&params, "missing", |v| v.as_f32()),
            Err(NodeRegistryError::MissingParameter(_))
        ));
        assert_eq!(
            get_param_or(&params, "missing", 1.0, |v| v.as_f32()).unwrap(),
            1.0
        );
        assert!(matches!(
            get_param_or(&params, "name", 1.0, |v| v.as_f32()),
            Err(NodeRegistryError::InvalidParameter(..))
        ));
    }
}

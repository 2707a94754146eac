//! Parameter store with a single synchronous observer.
//!
//! The store is the only place parameter values live on the control side. Every
//! assignment is clamped into the declared range before it is stored, and the
//! observer (normally the adapter's ramp forwarder) hears about it on the calling
//! thread before `set` returns.

use crate::parameter::{ParameterSpec, RampSource};
use crate::{Error, Result};
use std::collections::HashMap;

/// A parameter declaration together with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub spec: ParameterSpec,
    value: f32,
}

impl Parameter {
    fn new(spec: ParameterSpec) -> Self {
        let value = spec.range.default;
        Self { spec, value }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Notification delivered to the observer after a value was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChange {
    pub name: String,
    pub previous: f32,
    /// The stored (clamped) value.
    pub value: f32,
    /// The value the caller asked for.
    pub requested: f32,
    pub clamped: bool,
    /// Ramp duration resolved from the parameter's [`RampSource`].
    pub ramp_seconds: f32,
}

/// Receives every stored change.
pub trait ParameterObserver: Send {
    fn parameter_changed(&mut self, change: &ParameterChange);
}

impl<F> ParameterObserver for F
where
    F: FnMut(&ParameterChange) + Send,
{
    fn parameter_changed(&mut self, change: &ParameterChange) {
        self(change)
    }
}

/// Named, bounded parameter values.
///
/// Out-of-range assignments are clamped, never rejected. NaN is the one value that
/// cannot be clamped meaningfully and is refused.
pub struct ParameterStore {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
    observer: Option<Box<dyn ParameterObserver>>,
}

impl ParameterStore {
    pub fn new(specs: impl IntoIterator<Item = ParameterSpec>) -> Result<Self> {
        let mut params = Vec::new();
        let mut index = HashMap::new();

        for spec in specs {
            if !spec.range.is_valid() {
                return Err(Error::InvalidParameterSpec(format!(
                    "'{}' has invalid range {:?}",
                    spec.name, spec.range
                )));
            }
            if let RampSource::Fixed(seconds) = spec.ramp {
                if !(seconds >= 0.0 && seconds.is_finite()) {
                    return Err(Error::InvalidParameterSpec(format!(
                        "'{}' has invalid ramp duration {seconds}",
                        spec.name
                    )));
                }
            }
            if index.insert(spec.name.clone(), params.len()).is_some() {
                return Err(Error::InvalidParameterSpec(format!(
                    "duplicate parameter '{}'",
                    spec.name
                )));
            }
            params.push(Parameter::new(spec));
        }

        for param in &params {
            if let RampSource::FromParameter(source) = &param.spec.ramp {
                if !index.contains_key(source) {
                    return Err(Error::InvalidParameterSpec(format!(
                        "'{}' takes its ramp from unknown parameter '{source}'",
                        param.spec.name
                    )));
                }
            }
        }

        Ok(Self {
            params,
            index,
            observer: None,
        })
    }

    /// Install the observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn ParameterObserver>) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Clamp, store and notify.
    pub fn set(&mut self, name: &str, value: f32) -> Result<ParameterChange> {
        let idx = self.position(name)?;

        if value.is_nan() {
            return Err(Error::InvalidValue {
                name: name.to_string(),
                value,
            });
        }

        let param = &mut self.params[idx];
        let stored = param.spec.range.clamp(value);
        let previous = param.value;
        param.value = stored;

        let change = ParameterChange {
            name: param.spec.name.clone(),
            previous,
            value: stored,
            requested: value,
            clamped: stored != value,
            ramp_seconds: self.ramp_seconds_at(idx),
        };

        if let Some(observer) = self.observer.as_mut() {
            observer.parameter_changed(&change);
        }

        Ok(change)
    }

    pub fn get(&self, name: &str) -> Result<f32> {
        Ok(self.params[self.position(name)?].value)
    }

    pub fn parameter(&self, name: &str) -> Result<&Parameter> {
        Ok(&self.params[self.position(name)?])
    }

    pub fn spec(&self, name: &str) -> Result<&ParameterSpec> {
        self.parameter(name).map(|p| &p.spec)
    }

    /// Ramp duration the next change of `name` would use.
    pub fn ramp_seconds(&self, name: &str) -> Result<f32> {
        Ok(self.ramp_seconds_at(self.position(name)?))
    }

    /// Restore every parameter to its default, notifying for each.
    pub fn reset_all(&mut self) -> Result<()> {
        let defaults: Vec<(String, f32)> = self
            .params
            .iter()
            .map(|p| (p.spec.name.clone(), p.spec.range.default))
            .collect();

        for (name, default) in defaults {
            self.set(&name, default)?;
        }
        Ok(())
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    fn ramp_seconds_at(&self, idx: usize) -> f32 {
        match &self.params[idx].spec.ramp {
            RampSource::Immediate => 0.0,
            RampSource::Fixed(seconds) => *seconds,
            RampSource::FromParameter(source) => self
                .index
                .get(source)
                .map(|&i| self.params[i].value.max(0.0))
                .unwrap_or(0.0),
        }
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

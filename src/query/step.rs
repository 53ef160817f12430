//! Steps: the unit of selection applied at one tree level.
//!
//! A `Step` is one of exactly four tests. Matching is a pure function of the
//! element and the step; the only way it can fail is a predicate reporting
//! an error.
//!
//! # Example
//!
//! ```
//! use xmlquill::document::node::{Element, XmlNode};
//! use xmlquill::query::Step;
//!
//! let rate = XmlNode::new("rate").with_attribute("price", "234.00");
//!
//! let step = Step::name("rate").and(Step::predicate("cheap", |n: &XmlNode| {
//!     n.attribute("price")
//!         .and_then(|p| p.parse::<f64>().ok())
//!         .map_or(false, |p| p < 300.0)
//! }));
//! assert!(step.matches(&rate).unwrap());
//! ```

use super::error::SelectError;
use crate::document::node::{Element, XmlNode};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type PredicateFn<N> = dyn Fn(&N) -> anyhow::Result<bool> + Send + Sync;

/// A caller-supplied test over a single element.
///
/// The callable is opaque to the engine. Predicates must not rely on shared
/// mutable state if the same path is evaluated from several threads.
pub struct Predicate<N = XmlNode> {
    label: String,
    func: Arc<PredicateFn<N>>,
}

impl<N> Predicate<N> {
    /// Wraps an infallible test.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        Self::fallible(label, move |node: &N| Ok(func(node)))
    }

    /// Wraps a test that may fail, e.g. while parsing an attribute value.
    pub fn fallible<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&N) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// The name used for this predicate in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Invokes the predicate.
    pub fn call(&self, node: &N) -> anyhow::Result<bool> {
        (self.func)(node)
    }
}

impl<N> Clone for Predicate<N> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<N> fmt::Debug for Predicate<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

/// Two predicates are equal only if they share the same callable.
impl<N> PartialEq for Predicate<N> {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// One unit of selection criteria.
pub enum Step<N = XmlNode> {
    /// Matches elements whose name equals the given name.
    Name(String),
    /// Matches elements carrying every listed attribute with exactly the
    /// listed value. Extra attributes on the element are ignored; an empty
    /// map matches every element.
    Attributes(IndexMap<String, String>),
    /// Matches elements for which the predicate returns `true`.
    Predicate(Predicate<N>),
    /// Matches elements that satisfy every sub-step. Empty matches all.
    Conjunction(Vec<Step<N>>),
}

impl<N> Step<N> {
    /// Name test.
    pub fn name(name: impl Into<String>) -> Self {
        Step::Name(name.into())
    }

    /// Attribute test on a single key.
    pub fn attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut expected = IndexMap::new();
        expected.insert(key.into(), value.into());
        Step::Attributes(expected)
    }

    /// Attribute test on several keys. A repeated key keeps its last value.
    pub fn attributes<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Step::Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Predicate test from an infallible closure.
    pub fn predicate<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        Step::Predicate(Predicate::new(label, func))
    }

    /// Predicate test from a closure that may fail.
    pub fn try_predicate<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&N) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Step::Predicate(Predicate::fallible(label, func))
    }

    /// Conjunction of sub-steps.
    ///
    /// An empty conjunction matches every element, which is rarely what a
    /// caller means, so one is logged as a warning.
    pub fn conjunction(steps: Vec<Step<N>>) -> Self {
        if steps.is_empty() {
            warn!("empty conjunction step matches every element");
        }
        Step::Conjunction(steps)
    }

    /// Combines this step with another into a conjunction.
    ///
    /// Chaining `and` on a conjunction appends to it rather than nesting.
    pub fn and(self, other: Step<N>) -> Self {
        match self {
            Step::Conjunction(mut steps) => {
                steps.push(other);
                Step::Conjunction(steps)
            }
            step => Step::Conjunction(vec![step, other]),
        }
    }
}

impl<N: Element> Step<N> {
    /// Tests `node` against this step.
    ///
    /// # Errors
    ///
    /// Returns `SelectError::PredicateFailure` if a predicate (possibly
    /// nested inside a conjunction) fails.
    pub fn matches(&self, node: &N) -> Result<bool, SelectError> {
        match self {
            Step::Name(name) => Ok(node.name() == name),
            Step::Attributes(expected) => Ok(expected
                .iter()
                .all(|(key, value)| node.attribute(key) == Some(value.as_str()))),
            Step::Predicate(predicate) => {
                predicate
                    .call(node)
                    .map_err(|source| SelectError::PredicateFailure {
                        predicate: predicate.label().to_string(),
                        element: summary(node),
                        source,
                    })
            }
            Step::Conjunction(steps) => {
                for step in steps {
                    if !step.matches(node)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

/// Tests `node` against `step`. Equivalent to `step.matches(node)`.
pub fn matches<N: Element>(node: &N, step: &Step<N>) -> Result<bool, SelectError> {
    step.matches(node)
}

fn summary<N: Element>(node: &N) -> String {
    let mut out = node.name().to_string();
    for (key, value) in node.attributes() {
        out.push_str(&format!(" {}=\"{}\"", key, value));
    }
    out
}

impl<N> Clone for Step<N> {
    fn clone(&self) -> Self {
        match self {
            Step::Name(name) => Step::Name(name.clone()),
            Step::Attributes(expected) => Step::Attributes(expected.clone()),
            Step::Predicate(predicate) => Step::Predicate(predicate.clone()),
            Step::Conjunction(steps) => Step::Conjunction(steps.clone()),
        }
    }
}

impl<N> fmt::Debug for Step<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Step::Attributes(expected) => f.debug_tuple("Attributes").field(expected).finish(),
            Step::Predicate(predicate) => f.debug_tuple("Predicate").field(&predicate.label).finish(),
            Step::Conjunction(steps) => f.debug_tuple("Conjunction").field(steps).finish(),
        }
    }
}

impl<N> PartialEq for Step<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Step::Name(a), Step::Name(b)) => a == b,
            (Step::Attributes(a), Step::Attributes(b)) => a == b,
            (Step::Predicate(a), Step::Predicate(b)) => a == b,
            (Step::Conjunction(a), Step::Conjunction(b)) => a == b,
            _ => false,
        }
    }
}

/// Renders a step in query syntax, e.g. `room[@type='single'][?cheap]`.
impl<N> fmt::Display for Step<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Name(name) => write!(f, "{}", name),
            Step::Attributes(expected) => {
                write!(f, "[")?;
                for (i, (key, value)) in expected.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "@{}='{}'", key, value.replace('\\', "\\\\").replace('\'', "\\'"))?;
                }
                write!(f, "]")
            }
            Step::Predicate(predicate) => write!(f, "[?{}]", predicate.label),
            Step::Conjunction(steps) if steps.is_empty() => write!(f, "[]"),
            Step::Conjunction(steps) => steps.iter().try_for_each(|step| write!(f, "{}", step)),
        }
    }
}

//! Paths: ordered sequences of steps, one per tree level.

use super::error::SelectError;
use super::selector;
use super::step::Step;
use crate::document::node::{Element, XmlNode};
use std::fmt;

/// A complete selection path, outermost step first.
///
/// A path is built once and can be evaluated any number of times against
/// any number of trees. An empty path can be constructed, but selecting
/// with one fails with `SelectError::MalformedPath`.
pub struct Path<N = XmlNode> {
    /// Steps that make up the path.
    pub steps: Vec<Step<N>>,
}

impl<N> Path<N> {
    /// Creates a new path with the given steps.
    pub fn new(steps: Vec<Step<N>>) -> Self {
        Self { steps }
    }

    /// Starts building a path step by step.
    pub fn builder() -> PathBuilder<N> {
        PathBuilder { steps: Vec::new() }
    }

    /// Number of steps (tree levels) in the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<N: Element> Path<N> {
    /// Selects the elements below `node` matched by this path.
    pub fn select<'a>(&self, node: &'a N) -> Result<Vec<&'a N>, SelectError> {
        selector::select(node, self)
    }
}

impl<N> Clone for Path<N> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<N> fmt::Debug for Path<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path").field("steps", &self.steps).finish()
    }
}

impl<N> PartialEq for Path<N> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

/// Renders the path in query syntax, e.g. `room[@type='single']/rate`.
impl<N> fmt::Display for Path<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl<N> From<Vec<Step<N>>> for Path<N> {
    fn from(steps: Vec<Step<N>>) -> Self {
        Self::new(steps)
    }
}

/// Incremental construction of a `Path`.
///
/// # Example
///
/// ```
/// use xmlquill::query::{Path, Step};
///
/// let path: Path = Path::builder()
///     .step(Step::name("room").and(Step::attribute("type", "single")))
///     .name("rate")
///     .build()
///     .unwrap();
/// assert_eq!(path.to_string(), "room[@type='single']/rate");
/// ```
pub struct PathBuilder<N = XmlNode> {
    steps: Vec<Step<N>>,
}

impl<N> PathBuilder<N> {
    /// Appends an arbitrary step.
    pub fn step(mut self, step: Step<N>) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends a name test.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.step(Step::name(name))
    }

    /// Appends an attribute test.
    pub fn attributes<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.step(Step::attributes(pairs))
    }

    /// Appends a predicate test.
    pub fn predicate<F>(self, label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.step(Step::predicate(label, func))
    }

    /// Finishes the path.
    ///
    /// # Errors
    ///
    /// Returns `SelectError::MalformedPath` if no step was added.
    pub fn build(self) -> Result<Path<N>, SelectError> {
        if self.steps.is_empty() {
            return Err(SelectError::MalformedPath);
        }
        Ok(Path::new(self.steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_empty_path() {
        let result = Path::<XmlNode>::builder().build();
        assert!(matches!(result, Err(SelectError::MalformedPath)));
    }

    #[test]
    fn test_builder_collects_steps_in_order() {
        let path: Path = Path::builder()
            .name("results")
            .attributes([("type", "single")])
            .predicate("always", |_: &XmlNode| true)
            .build()
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.steps[0], Step::name("results"));
        assert_eq!(path.steps[1], Step::attribute("type", "single"));
        assert!(matches!(path.steps[2], Step::Predicate(_)));
    }

    #[test]
    fn test_display() {
        let path: Path = Path::new(vec![
            Step::name("room").and(Step::attribute("type", "2 queen")),
            Step::name("rate"),
        ]);
        assert_eq!(path.to_string(), "room[@type='2 queen']/rate");
    }
}

//! Error types for query parsing and selection.

use std::fmt;

/// Errors that can occur while selecting elements.
#[derive(Debug)]
pub enum SelectError {
    /// A path with no steps was passed to `select`.
    MalformedPath,
    /// A predicate step returned an error. Selection stops at the first
    /// failure and no partial results are returned.
    PredicateFailure {
        /// Label of the failing predicate.
        predicate: String,
        /// Start tag summary of the element being tested.
        element: String,
        /// The error raised by the predicate.
        source: anyhow::Error,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::MalformedPath => write!(f, "Path must contain at least one step"),
            SelectError::PredicateFailure {
                predicate,
                element,
                source,
            } => write!(
                f,
                "Predicate '{}' failed on <{}>: {}",
                predicate, element, source
            ),
        }
    }
}

impl std::error::Error for SelectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectError::MalformedPath => None,
            SelectError::PredicateFailure { source, .. } => Some(&**source),
        }
    }
}

/// Errors that can occur while compiling a query string into a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    /// Unexpected token at a specific position.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    InvalidSyntax { message: String },
    /// A `?name` test referenced a predicate that was never registered.
    UnknownPredicate { name: String },
    /// The same attribute was constrained twice within one step.
    DuplicateAttribute { name: String },
}

impl fmt::Display for QueryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParseError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}, expected {}",
                found, position, expected
            ),
            QueryParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            QueryParseError::InvalidSyntax { message } => {
                write!(f, "Invalid query syntax: {}", message)
            }
            QueryParseError::UnknownPredicate { name } => {
                write!(f, "Unknown predicate '?{}'", name)
            }
            QueryParseError::DuplicateAttribute { name } => {
                write!(f, "Attribute '@{}' is constrained more than once in one step", name)
            }
        }
    }
}

impl std::error::Error for QueryParseError {}

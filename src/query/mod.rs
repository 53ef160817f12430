//! Step-based element selection.
//!
//! A query is a `Path`: an ordered list of `Step`s, one per tree level.
//! Each step is a name test, an attribute test, an opaque predicate, or a
//! conjunction of other steps. Paths are usually built in code; `Parser`
//! compiles a compact textual form for command-line use.
//!
//! # Example
//!
//! ```
//! use xmlquill::document::node::{Element, XmlNode};
//! use xmlquill::query::{select, Path, Step};
//!
//! let results = XmlNode::new("results")
//!     .with_child(
//!         XmlNode::new("room")
//!             .with_attribute("type", "single")
//!             .with_child(XmlNode::new("rate").with_attribute("price", "234.00")),
//!     )
//!     .with_child(
//!         XmlNode::new("room")
//!             .with_attribute("type", "2 queen")
//!             .with_child(XmlNode::new("rate").with_attribute("price", "350.00")),
//!     );
//!
//! let path = Path::new(vec![
//!     Step::name("room").and(Step::attribute("type", "single")),
//!     Step::name("rate"),
//! ]);
//! let rates = select(&results, &path).unwrap();
//! assert_eq!(rates.len(), 1);
//! assert_eq!(rates[0].attribute("price"), Some("234.00"));
//! ```

pub mod error;
pub mod parser;
pub mod path;
pub mod selector;
pub mod step;

pub use error::{QueryParseError, SelectError};
pub use parser::{Parser, PredicateRegistry};
pub use path::{Path, PathBuilder};
pub use selector::{select, select_with_paths};
pub use step::{matches, Predicate, Step};

//! XML document model and quick-xml adapter.

pub mod node;
pub mod parser;
pub mod tree;

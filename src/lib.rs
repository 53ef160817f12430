//! XMLQuill - select elements from XML documents with a small step-based
//! path language.
//!
//! The selection engine lives in [`query`]; [`document`] holds the element
//! tree it runs over and the quick-xml adapter that builds one.

pub mod config;
pub mod document;
pub mod file;
pub mod query;

//! File input for XML documents.
//!
//! This module provides functionality to load XML files from disk or stdin,
//! including gzip-compressed input.

pub mod loader;

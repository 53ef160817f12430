//! XML file loading functionality.
//!
//! This module provides functions to load XML documents from files or stdin,
//! parsing them into `XmlTree` structures that can be queried by xmlquill.
//! Gzip-compressed input is decompressed transparently.

use crate::document::parser::parse_xml;
use crate::document::tree::XmlTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads and parses an XML file from the filesystem.
///
/// Files with a `.gz` extension are decompressed before parsing.
///
/// # Arguments
///
/// * `path` - The path to the XML file to load
/// * `trim_text` - Trim text content and drop whitespace-only text
///
/// # Examples
///
/// ```no_run
/// use xmlquill::file::loader::load_xml_file;
///
/// let tree = load_xml_file("rooms.xml", true).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist
/// - The file cannot be read (permissions, etc.)
/// - The file is not valid gzip although named `.gz`
/// - The file contents are not well-formed XML
pub fn load_xml_file<P: AsRef<Path>>(path: P, trim_text: bool) -> Result<XmlTree> {
    let path_ref = path.as_ref();

    // Check if file is gzipped
    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))?
    };
    debug!(path = %path_ref.display(), bytes = content.len(), gzipped = is_gzipped, "loaded file");

    parse_xml(&content, trim_text)
        .with_context(|| format!("Failed to parse XML in {}", path_ref.display()))
}

/// Loads and parses XML from standard input.
///
/// Gzip input is detected by its magic bytes (`0x1f 0x8b`).
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input is not valid UTF-8 (after decompression)
/// - The input is not well-formed XML
pub fn load_xml_from_stdin(trim_text: bool) -> Result<XmlTree> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    load_xml_from_bytes(&buffer, trim_text).context("Failed to parse XML from stdin")
}

/// Parses XML from raw bytes, decompressing gzip data first.
pub fn load_xml_from_bytes(bytes: &[u8], trim_text: bool) -> Result<XmlTree> {
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Input is not valid UTF-8")?
    };
    debug!(bytes = content.len(), "loaded input");

    parse_xml(&content, trim_text)
}

/// Reads and decompresses a gzipped file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The file is not valid gzip format (corrupted)
/// - The decompressed content is not valid UTF-8
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

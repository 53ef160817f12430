use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use xmlquill::config::Config;
use xmlquill::document::node::{Element, XmlNode};
use xmlquill::file::loader::{load_xml_file, load_xml_from_stdin};
use xmlquill::query::{select_with_paths, Path};

/// XMLQuill - Select elements from XML documents
#[derive(Parser)]
#[command(name = "xmlquill")]
#[command(version)]
#[command(about = "Select elements from XML documents with a step-based path query", long_about = None)]
struct Cli {
    /// Query, e.g. "room[@type='single']/rate"
    query: String,

    /// XML file to read (omit to read from stdin; .gz files are decompressed)
    file: Option<PathBuf>,

    /// Print only the number of matches
    #[arg(short, long)]
    count: bool,

    /// Config file to use instead of ~/.config/xmlquill/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log selection details to stderr
    #[arg(short, long)]
    trace: bool,
}

fn init_logging(config: &Config, trace: bool) {
    if trace {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_span_events(FmtSpan::ACTIVE)
            .with_env_filter(EnvFilter::new("debug"))
            .finish()
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .finish()
            .init();
    }
}

/// Renders an element-index location as `/results/room[0]/rate[1]`.
fn describe_location(root: &XmlNode, location: &[usize]) -> String {
    let mut out = format!("/{}", root.name());
    let mut current = root;
    for &idx in location {
        match current.child_elements().nth(idx) {
            Some(child) => {
                out.push_str(&format!("/{}[{}]", child.name(), idx));
                current = child;
            }
            None => break,
        }
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    init_logging(&config, cli.trace);

    let path: Path = xmlquill::query::Parser::parse(&cli.query)
        .with_context(|| format!("Invalid query '{}'", cli.query))?;
    info!(%path, "compiled query");

    let tree = match &cli.file {
        Some(file) => load_xml_file(file, config.trim_text)?,
        None => load_xml_from_stdin(config.trim_text)?,
    };

    let matches = select_with_paths(tree.root(), &path).context("Selection failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.count {
        writeln!(out, "{}", matches.len())?;
    } else {
        for (location, node) in &matches {
            writeln!(
                out,
                "{}\t{}",
                describe_location(tree.root(), location),
                node.describe(config.show_attributes)
            )?;
        }
    }

    Ok(())
}

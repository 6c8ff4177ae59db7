//! bulk-count: fold an element input file into a bulk set and print the counts

use anyhow::Context;
use clap::Parser;
use samyama_structure::graph::{Element, Label};
use samyama_structure::{BulkSet, DetachedElement, ElementInputFormat, InputConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bulk-count", version, about = "Count element occurrences in an element input file")]
struct Cli {
    /// Element input file (one JSON payload per line, optionally gzip compressed)
    input: PathBuf,

    /// Count labels instead of elements
    #[arg(long)]
    by_label: bool,

    /// YAML input format configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the split size in bytes
    #[arg(long)]
    split_size: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => InputConfig::from_yaml_file(path)
            .with_context(|| format!("loading input config {:?}", path))?,
        None => InputConfig::default(),
    };
    if let Some(split_size) = cli.split_size {
        config.split_size = split_size;
    }

    let format = ElementInputFormat::new(config)?;
    let elements = format
        .read_all(&cli.input)
        .with_context(|| format!("reading {:?}", cli.input))?;

    if cli.by_label {
        let labels: BulkSet<Label> = elements.iter().map(|e| e.label().clone()).collect();
        report(&labels, |label| label.to_string());
    } else {
        let counts: BulkSet<DetachedElement> = elements.into_iter().collect();
        report(&counts, |element| element.to_string());
    }
    Ok(())
}

fn report<T, F>(set: &BulkSet<T>, name: F)
where
    F: Fn(&T) -> String,
{
    for (value, bulk) in set.iter_bulk() {
        println!("{}\t{}", name(value), bulk);
    }
    info!("size={} unique_size={}", set.size(), set.unique_size());
    println!("total\t{}", set.size());
    println!("distinct\t{}", set.unique_size());
}

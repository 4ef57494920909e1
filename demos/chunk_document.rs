//! Chunk a document read from a file or stdin.
//!
//! ```sh
//! cargo run --example chunk_document -- report.txt 200 20
//! RUST_LOG=quire=debug cargo run --example chunk_document -- - < report.txt
//! ```
//!
//! Arguments: `[path or -] [chunk_size_tokens] [chunk_overlap_tokens]`. With no
//! arguments a small built-in report is chunked.

use std::io::Read;

use quire::{ChunkerConfig, DocumentChunker, MergePolicy};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "\
ACME Corp Quarterly Report
1

1. OVERVIEW
Revenue grew in every region this quarter. Costs held flat.
The board approved the new plan.

ACME Corp Quarterly Report
2

2. OUTLOOK
Growth should continue next quarter. Hiring will resume in spring.
Revenue grew in every region this quarter. Costs held flat.

ACME Corp Quarterly Report
3
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = match args.first().map(String::as_str) {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let size = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(40);
    let overlap = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(5);

    let config = ChunkerConfig::default()
        .with_chunk_size(size)
        .with_overlap(overlap)
        .with_min_section_tokens(5)
        .with_merge_policy(MergePolicy::Headings);
    let chunker = DocumentChunker::try_new(config)?;

    println!("=== Normalized ===\n{}\n", chunker.normalize(&text));
    println!("=== Chunks ===");
    for chunk in chunker.chunk_document(&text) {
        println!(
            "[{}] section {} bytes {:?} ({} tokens)\n  {}",
            chunk.index,
            chunk.section,
            chunk.span(),
            chunk.tokens,
            chunk.text.replace('\n', "\n  ")
        );
    }

    Ok(())
}

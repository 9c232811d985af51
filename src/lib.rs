//! Extract critical-marked rules from a stylesheet into separate output
//! files.
//!
//! Rules are marked in the stylesheet itself: an `@critical { ... }` block
//! includes its nested rules, a `critical-selector` declaration marks its
//! enclosing rule, and a `critical-filename` declaration names the output
//! file the marked rule (and everything nesting under its selector) is
//! grouped into. After emission the markers, and with `preserve = false`
//! the marked rules themselves, are cleaned out of the original tree.

use rayon::prelude::*;
use tracing::instrument;

pub mod aggregator;
pub mod arena;
pub mod cleaner;
pub mod cli;
pub mod collector;
pub mod config;
pub mod display;
pub mod emitter;
pub mod errors;
pub mod exitcode;
pub mod marker;
pub mod matcher;
pub mod parser;
pub mod serializer;
pub mod util;

pub use arena::{DetachedNode, NodeKind, StyleArena};
pub use config::{CriticalConfig, RawConfig};
pub use errors::{CriticalError, CriticalResult};

/// Run the full pipeline against a parsed tree: aggregate every output
/// group, emit them as independent parallel units, then clean the tree.
///
/// Emission is joined before cleanup; a failed write fails the run (writes
/// already completed stay on disk) and skips the cleanup mutation, leaving
/// the tree as aggregation saw it.
#[instrument(level = "debug", skip(arena, config))]
pub fn build_critical(arena: &mut StyleArena, config: &CriticalConfig) -> CriticalResult<()> {
    let groups = aggregator::aggregate(arena, &config.output_dest);

    let results: Vec<CriticalResult<()>> = groups
        .par_iter()
        .map(|(dest, nodes)| {
            emitter::emit(
                nodes,
                &config.output_path.join(dest),
                config.minify,
                config.dry_run,
            )
        })
        .collect();
    for result in results {
        result?;
    }

    cleaner::clean(arena, config.preserve);
    Ok(())
}

/// Convenience wrapper for string input: parse, run the pipeline, return
/// the cleaned stylesheet text.
pub fn extract_to_string(css: &str, config: &CriticalConfig) -> CriticalResult<String> {
    let mut arena = parser::parse_stylesheet(css)?;
    build_critical(&mut arena, config)?;
    Ok(serializer::to_css(&arena))
}

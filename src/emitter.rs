//! Output emission
//!
//! Serializes one group's rule collection into a standalone stylesheet and
//! either writes it to its destination or logs it (dry run). Groups are
//! independent: a failed write never rolls back a completed one.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::arena::{DetachedNode, StyleArena};
use crate::cli::output;
use crate::errors::{CriticalError, CriticalResult};
use crate::serializer;

/// Emit one output group. Exactly one effect occurs: a file write (parent
/// directories created as needed) or a dry-run log line.
#[instrument(level = "debug", skip(group), fields(rules = group.len()))]
pub fn emit(
    group: &[DetachedNode],
    destination: &Path,
    minify: bool,
    dry_run: bool,
) -> CriticalResult<()> {
    let mut out = StyleArena::new();
    let root = out.root();
    for node in group {
        out.append_detached(root, node);
    }
    let css = if minify {
        serializer::to_css_min(&out)
    } else {
        serializer::to_css(&out)
    };

    if dry_run {
        output::dry_run(destination, &css);
        return Ok(());
    }

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CriticalError::WriteFailed {
                path: destination.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(destination, &css).map_err(|source| CriticalError::WriteFailed {
        path: destination.to_path_buf(),
        source,
    })?;
    debug!(path = %destination.display(), bytes = css.len(), "wrote critical output");
    Ok(())
}

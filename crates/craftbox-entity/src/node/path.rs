//! Materialized-path arithmetic.
//!
//! The single implementation of path string handling used by the move
//! validator, the path maintainer, and the tree facade. Paths carry no
//! leading separator: a root-level node's path is its name.

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;

/// The designated path separator. Never permitted inside a node name.
pub const SEPARATOR: char = '/';

/// Derive a node's path from its parent's path (None for root level) and
/// its own name.
pub fn join(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => format!("{parent}{SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

/// The parent portion of a path, or None for a root-level path.
pub fn parent_of(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// The final segment of a path.
pub fn leaf_of(path: &str) -> &str {
    path.rfind(SEPARATOR)
        .map(|idx| &path[idx + 1..])
        .unwrap_or(path)
}

/// Whether `candidate` lies strictly inside the subtree rooted at
/// `ancestor_path`. Prefix matching is anchored at a segment boundary, so
/// `Builds-old/x` is not a descendant of `Builds`.
pub fn is_descendant_path(candidate: &str, ancestor_path: &str) -> bool {
    candidate.len() > ancestor_path.len() + 1
        && candidate.starts_with(ancestor_path)
        && candidate.as_bytes()[ancestor_path.len()] == SEPARATOR as u8
}

/// Rewrite `path` by substituting `old_prefix` with `new_prefix`.
///
/// Returns None when the path does not carry the old prefix (already
/// rewritten, or outside the subtree); the caller skips such nodes, which
/// is what makes re-running a propagation idempotent.
pub fn replace_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        return Some(new_prefix.to_string());
    }
    if is_descendant_path(path, old_prefix) {
        return Some(format!("{new_prefix}{}", &path[old_prefix.len()..]));
    }
    None
}

/// Validate a node name: non-empty after trimming, and free of the
/// separator.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(AppError::validation(format!(
            "Name cannot contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}

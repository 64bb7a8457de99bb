//! Structural validation for move and rename operations.
//!
//! All checks here are pure and run strictly before any record is mutated,
//! so a rejection leaves no partial state behind.

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_entity::node::{Node, path};

/// Decide whether moving `subject` under `destination` (None = the owner's
/// root) is structurally legal.
///
/// Rejects moving a node into itself, into its own subtree (checked via
/// the materialized-path prefix, which is equivalent to walking the parent
/// chain as long as the path invariant holds), into a non-folder or
/// foreign-owner destination, and the no-op move to the current parent.
pub fn validate_move(subject: &Node, destination: Option<&Node>) -> AppResult<()> {
    if let Some(dest) = destination {
        if dest.id == subject.id {
            return Err(AppError::invalid_move("Cannot move a node into itself"));
        }
        if dest.owner_id != subject.owner_id {
            return Err(AppError::invalid_move(
                "Destination belongs to a different owner",
            ));
        }
        if !dest.is_folder() {
            return Err(AppError::invalid_move("Destination is not a folder"));
        }
        if subject.is_folder() && path::is_descendant_path(&dest.path, &subject.path) {
            return Err(AppError::invalid_move(
                "Cannot move a folder into one of its descendants",
            ));
        }
    }

    let destination_id = destination.map(|dest| dest.id);
    if destination_id == subject.parent_id {
        return Err(AppError::invalid_move("Node is already in this location"));
    }

    Ok(())
}

/// Decide whether renaming `subject` to `new_name` is legal: the name must
/// be non-empty, free of the path separator, and actually different.
pub fn validate_rename(subject: &Node, new_name: &str) -> AppResult<()> {
    path::validate_name(new_name)?;
    if new_name == subject.name {
        return Err(AppError::validation("Name is unchanged"));
    }
    Ok(())
}

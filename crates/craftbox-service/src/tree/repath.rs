//! Descendant path propagation after a rename or move.

use std::sync::Arc;

use tracing::{debug, warn};

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::path;

use craftbox_database::NodeRepository;

/// Rewrites descendant materialized paths to match a subject node whose own
/// path has already been persisted.
///
/// This is the most failure-sensitive routine in the engine: every child
/// update is a separate remote write, and an interruption leaves the tree
/// mixed (some descendants repathed, some not) until a retry completes the
/// same propagation. Each node's rewrite is idempotent, so retrying with
/// the same `(old, new)` pair converges.
#[derive(Debug, Clone)]
pub struct PathMaintainer {
    repo: Arc<dyn NodeRepository>,
}

impl PathMaintainer {
    /// Creates a new path maintainer.
    pub fn new(repo: Arc<dyn NodeRepository>) -> Self {
        Self { repo }
    }

    /// Propagate a prefix substitution through the subtree rooted at
    /// `subject_id`, whose own record already carries `new_path`.
    ///
    /// Returns the number of descendant records updated. On any child
    /// failure the remaining siblings are still attempted and the routine
    /// reports `PartialFailure` naming every node not updated; a failed
    /// folder's unvisited subtree is covered by that folder's id, since
    /// retrying the same substitution reaches it again.
    pub async fn repath(
        &self,
        owner_id: OwnerId,
        subject_id: NodeId,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<u64> {
        let mut updated = 0u64;
        let mut remaining: Vec<NodeId> = Vec::new();
        let mut stack: Vec<NodeId> = vec![subject_id];

        while let Some(folder_id) = stack.pop() {
            let children = match self.repo.list_children(owner_id, Some(folder_id)).await {
                Ok(children) => children,
                Err(err) => {
                    warn!(
                        %owner_id,
                        folder_id = %folder_id,
                        error = %err,
                        "Failed to list children during repath"
                    );
                    remaining.push(folder_id);
                    continue;
                }
            };

            for mut child in children {
                // Descend into folders regardless of whether this child
                // still needs rewriting: an earlier interrupted run may
                // have updated the child but not its descendants.
                let rewritten = path::replace_prefix(&child.path, old_path, new_path);

                if let Some(new_child_path) = rewritten {
                    child.path = new_child_path;
                    match self.repo.update(&child).await {
                        Ok(_) => updated += 1,
                        Err(err) => {
                            warn!(
                                %owner_id,
                                node_id = %child.id,
                                path = %child.path,
                                error = %err,
                                "Failed to repath node"
                            );
                            remaining.push(child.id);
                            continue;
                        }
                    }
                }

                if child.is_folder() {
                    stack.push(child.id);
                }
            }
        }

        if !remaining.is_empty() {
            return Err(AppError::partial_failure(
                format!(
                    "Repathed {updated} nodes; {} left with stale paths",
                    remaining.len()
                ),
                remaining,
            ));
        }

        debug!(%owner_id, subject_id = %subject_id, updated, old_path, new_path, "Repath complete");
        Ok(updated)
    }
}

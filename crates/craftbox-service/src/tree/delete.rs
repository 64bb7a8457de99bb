//! Cascading subtree deletion.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use craftbox_core::result::AppResult;
use craftbox_core::traits::content::ContentStore;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::Node;

use craftbox_database::NodeRepository;

/// Result of a cascading delete.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Nodes whose records were removed, leaves first.
    pub deleted: Vec<NodeId>,
    /// Nodes still present: records that failed to delete, folders whose
    /// children could not be listed, and ancestors blocked by either.
    pub remaining: Vec<NodeId>,
    /// The subject's former parent, for callers whose current view was
    /// inside the deleted subtree and must navigate out.
    pub parent_id: Option<NodeId>,
}

impl DeleteOutcome {
    /// Whether the whole subtree was removed.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Removes a node and, for folders, its entire descendant subtree,
/// deepest records first.
///
/// File payloads are removed from the content store before their metadata
/// records; a payload that cannot be removed is logged and orphaned rather
/// than blocking the metadata delete. A folder record is only deleted once
/// every one of its children is gone, so an interrupted run never leaves a
/// child pointing at a missing parent.
#[derive(Debug, Clone)]
pub struct CascadingDeleter {
    repo: Arc<dyn NodeRepository>,
    content: Arc<dyn ContentStore>,
}

impl CascadingDeleter {
    /// Creates a new cascading deleter.
    pub fn new(repo: Arc<dyn NodeRepository>, content: Arc<dyn ContentStore>) -> Self {
        Self { repo, content }
    }

    /// Delete `subject` and every node below it. Failures are collected,
    /// not propagated: siblings of a failed node are still attempted, and
    /// the outcome names exactly which nodes remain so a retry can be
    /// scoped to them.
    pub async fn delete_subtree(
        &self,
        owner_id: OwnerId,
        subject: &Node,
    ) -> AppResult<DeleteOutcome> {
        // Phase 1: expand the subtree in discovery order. Folders whose
        // children cannot be listed are marked undeletable up front, since
        // removing them could strand unknown descendants.
        let mut ordered: Vec<Node> = Vec::new();
        let mut unlisted: HashSet<NodeId> = HashSet::new();
        let mut stack: Vec<Node> = vec![subject.clone()];

        while let Some(node) = stack.pop() {
            if node.is_folder() {
                match self.repo.list_children(owner_id, Some(node.id)).await {
                    Ok(children) => stack.extend(children),
                    Err(err) => {
                        warn!(
                            %owner_id,
                            folder_id = %node.id,
                            error = %err,
                            "Failed to list children during delete"
                        );
                        unlisted.insert(node.id);
                    }
                }
            }
            ordered.push(node);
        }

        // Phase 2: remove records in reverse discovery order, so every
        // child is handled before its parent.
        let mut deleted: Vec<NodeId> = Vec::new();
        let mut remaining: Vec<NodeId> = Vec::new();
        let mut blocked: HashSet<NodeId> = HashSet::new();

        for node in ordered.iter().rev() {
            let undeletable = unlisted.contains(&node.id) || blocked.contains(&node.id);
            if undeletable {
                remaining.push(node.id);
                if let Some(parent_id) = node.parent_id {
                    blocked.insert(parent_id);
                }
                continue;
            }

            if let Some(content_ref) = node.content_ref.as_deref() {
                if let Err(err) = self.content.delete(content_ref).await {
                    warn!(
                        %owner_id,
                        node_id = %node.id,
                        content_ref,
                        error = %err,
                        "Failed to remove payload; leaving orphaned blob"
                    );
                }
            }

            match self.repo.delete(owner_id, node.id).await {
                Ok(_) => deleted.push(node.id),
                Err(err) => {
                    warn!(
                        %owner_id,
                        node_id = %node.id,
                        path = %node.path,
                        error = %err,
                        "Failed to delete node record"
                    );
                    remaining.push(node.id);
                    if let Some(parent_id) = node.parent_id {
                        blocked.insert(parent_id);
                    }
                }
            }
        }

        debug!(
            %owner_id,
            subject_id = %subject.id,
            deleted = deleted.len(),
            remaining = remaining.len(),
            "Subtree delete finished"
        );

        Ok(DeleteOutcome {
            deleted,
            remaining,
            parent_id: subject.parent_id,
        })
    }
}

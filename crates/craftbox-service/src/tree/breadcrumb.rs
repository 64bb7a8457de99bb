//! Ancestor chain resolution for breadcrumb display.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use craftbox_core::result::AppResult;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::Node;

use craftbox_database::NodeRepository;

/// Reconstructs the ancestor chain of a node by walking parent references
/// up to the root.
///
/// Strictly read-only; safe to call concurrently with structural
/// mutations, accepting that it may observe a mid-update tree.
#[derive(Debug, Clone)]
pub struct BreadcrumbResolver {
    repo: Arc<dyn NodeRepository>,
}

impl BreadcrumbResolver {
    /// Creates a new breadcrumb resolver.
    pub fn new(repo: Arc<dyn NodeRepository>) -> Self {
        Self { repo }
    }

    /// Return the chain of nodes from the root-most ancestor down to
    /// `leaf`, one record fetch per ancestor.
    ///
    /// A dangling or foreign parent reference ends the walk and yields the
    /// partial chain gathered so far; callers degrade to a shorter
    /// breadcrumb instead of an error.
    pub async fn resolve(&self, owner_id: OwnerId, leaf: &Node) -> AppResult<Vec<Node>> {
        let mut chain: Vec<Node> = vec![leaf.clone()];
        let mut visited: HashSet<NodeId> = HashSet::from([leaf.id]);
        let mut next_parent = leaf.parent_id;

        while let Some(parent_id) = next_parent {
            if !visited.insert(parent_id) {
                warn!(%owner_id, node_id = %leaf.id, %parent_id, "Parent cycle detected");
                break;
            }

            match self.repo.find_by_id(owner_id, parent_id).await? {
                Some(parent) => {
                    next_parent = parent.parent_id;
                    chain.push(parent);
                }
                None => {
                    warn!(%owner_id, node_id = %leaf.id, %parent_id, "Broken ancestor link");
                    break;
                }
            }
        }

        chain.reverse();
        Ok(chain)
    }
}

//! In-memory node repository for tests and embedded use.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::{CreateNode, Node};

use crate::repositories::NodeRepository;

/// In-memory `NodeRepository` with the same owner-scoping and path-conflict
/// semantics as the PostgreSQL implementation.
#[derive(Debug, Default)]
pub struct MemoryNodeRepository {
    nodes: DashMap<NodeId, Node>,
}

impl MemoryNodeRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored, across all owners.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn path_taken(&self, owner_id: OwnerId, path: &str, exclude: Option<NodeId>) -> bool {
        self.nodes.iter().any(|entry| {
            entry.owner_id == owner_id && entry.path == path && Some(entry.id) != exclude
        })
    }
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    async fn insert(&self, record: &CreateNode) -> AppResult<Node> {
        if self.path_taken(record.owner_id, &record.path, None) {
            return Err(AppError::conflict(format!(
                "A node at path '{}' already exists",
                record.path
            )));
        }

        let now = Utc::now();
        let node = Node {
            id: NodeId::new(),
            owner_id: record.owner_id,
            kind: record.kind,
            name: record.name.clone(),
            parent_id: record.parent_id,
            path: record.path.clone(),
            size_bytes: record.size_bytes,
            mime_type: record.mime_type.clone(),
            content_ref: record.content_ref.clone(),
            created_at: now,
            updated_at: now,
        };
        self.nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn find_by_id(&self, owner_id: OwnerId, id: NodeId) -> AppResult<Option<Node>> {
        Ok(self
            .nodes
            .get(&id)
            .filter(|node| node.owner_id == owner_id)
            .map(|node| node.value().clone()))
    }

    async fn list_children(
        &self,
        owner_id: OwnerId,
        parent_id: Option<NodeId>,
    ) -> AppResult<Vec<Node>> {
        let mut children: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| node.owner_id == owner_id && node.parent_id == parent_id)
            .map(|node| node.value().clone())
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn update(&self, node: &Node) -> AppResult<Node> {
        if self.path_taken(node.owner_id, &node.path, Some(node.id)) {
            return Err(AppError::conflict(format!(
                "A node at path '{}' already exists",
                node.path
            )));
        }

        let mut entry = self
            .nodes
            .get_mut(&node.id)
            .filter(|stored| stored.owner_id == node.owner_id)
            .ok_or_else(|| AppError::not_found(format!("Node {} not found", node.id)))?;

        entry.name = node.name.clone();
        entry.parent_id = node.parent_id;
        entry.path = node.path.clone();
        entry.updated_at = Utc::now();
        Ok(entry.value().clone())
    }

    async fn delete(&self, owner_id: OwnerId, id: NodeId) -> AppResult<bool> {
        let owned = self
            .nodes
            .get(&id)
            .map(|node| node.owner_id == owner_id)
            .unwrap_or(false);
        if !owned {
            return Ok(false);
        }
        Ok(self.nodes.remove(&id).is_some())
    }

    async fn list_all(&self, owner_id: OwnerId) -> AppResult<Vec<Node>> {
        let mut nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| node.owner_id == owner_id)
            .map(|node| node.value().clone())
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(nodes)
    }
}

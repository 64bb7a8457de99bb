//! Node entity model.
//!
//! A node is one record in the flat store, representing either a file or a
//! folder. Hierarchy is expressed twice: through the `parent_id` pointer
//! (the source of truth for structure) and the denormalized materialized
//! `path` (an eagerly maintained cache used for prefix-based subtree
//! checks).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use craftbox_core::types::{NodeId, OwnerId};

/// Whether a node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "node_kind", rename_all = "lowercase")]
pub enum NodeKind {
    /// A file with binary content in the content store.
    File,
    /// A folder; may be the `parent_id` target of other nodes.
    Folder,
}

/// A node in the owner's file hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Node {
    /// Unique node identifier. Immutable.
    pub id: NodeId,
    /// The owning account. Immutable; every query is scoped by it.
    pub owner_id: OwnerId,
    /// File or folder. Immutable after creation.
    pub kind: NodeKind,
    /// Display name; the final path segment.
    pub name: String,
    /// Parent folder ID (None for root-level nodes).
    pub parent_id: Option<NodeId>,
    /// Full materialized path (e.g., `Builds/v1/notes.txt`), ancestor names
    /// and the node's own name joined by `/`, without a leading separator.
    pub path: String,
    /// Payload size in bytes. Always 0 for folders.
    pub size_bytes: i64,
    /// MIME type of the payload (files only).
    pub mime_type: Option<String>,
    /// Opaque reference to the payload in the content store (files only).
    /// Stable across renames and moves.
    pub content_ref: Option<String>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Check if this is a root-level node (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new node record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    /// The owning account.
    pub owner_id: OwnerId,
    /// File or folder.
    pub kind: NodeKind,
    /// Node name.
    pub name: String,
    /// Parent folder (None for root-level).
    pub parent_id: Option<NodeId>,
    /// Full materialized path.
    pub path: String,
    /// Payload size in bytes (0 for folders).
    pub size_bytes: i64,
    /// MIME type (files only).
    pub mime_type: Option<String>,
    /// Content store reference (files only).
    pub content_ref: Option<String>,
}

impl CreateNode {
    /// Build the record for a new folder.
    pub fn folder(owner_id: OwnerId, parent_id: Option<NodeId>, name: String, path: String) -> Self {
        Self {
            owner_id,
            kind: NodeKind::Folder,
            name,
            parent_id,
            path,
            size_bytes: 0,
            mime_type: None,
            content_ref: None,
        }
    }

    /// Build the record for a file whose payload is already durably stored.
    pub fn file(
        owner_id: OwnerId,
        parent_id: Option<NodeId>,
        name: String,
        path: String,
        size_bytes: i64,
        mime_type: Option<String>,
        content_ref: String,
    ) -> Self {
        Self {
            owner_id,
            kind: NodeKind::File,
            name,
            parent_id,
            path,
            size_bytes,
            mime_type,
            content_ref: Some(content_ref),
        }
    }
}

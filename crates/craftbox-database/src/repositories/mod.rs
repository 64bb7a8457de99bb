//! Node repository contract and implementations.

pub mod node;

use async_trait::async_trait;

use craftbox_core::result::AppResult;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::{CreateNode, Node};

pub use node::PgNodeRepository;

/// Per-record access to the flat node store.
///
/// Every call is one remote operation scoped to a single owner; there are
/// no multi-record transactions. Recursive structural edits are composed
/// from these calls by the service layer and must stay correct when any
/// individual call fails partway through a sequence.
#[async_trait]
pub trait NodeRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new node record and return it with its assigned id and
    /// timestamps. A sibling path collision yields a `Conflict` error.
    async fn insert(&self, record: &CreateNode) -> AppResult<Node>;

    /// Find a node by id. Returns None for missing and foreign-owner ids
    /// alike.
    async fn find_by_id(&self, owner_id: OwnerId, id: NodeId) -> AppResult<Option<Node>>;

    /// List the direct children of a folder, or the owner's root-level
    /// nodes when `parent_id` is None. Ordered by name.
    async fn list_children(
        &self,
        owner_id: OwnerId,
        parent_id: Option<NodeId>,
    ) -> AppResult<Vec<Node>>;

    /// Persist a node's mutable fields (`name`, `parent_id`, `path`) and
    /// bump `updated_at`. Returns the stored record, or `NotFound` if the
    /// node no longer exists.
    async fn update(&self, node: &Node) -> AppResult<Node>;

    /// Delete a node record. Returns `true` if a record was removed.
    async fn delete(&self, owner_id: OwnerId, id: NodeId) -> AppResult<bool>;

    /// List every node belonging to an owner, independent of structure.
    async fn list_all(&self, owner_id: OwnerId) -> AppResult<Vec<Node>>;
}

//! PostgreSQL node repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use craftbox_core::error::{AppError, ErrorKind};
use craftbox_core::result::AppResult;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::{CreateNode, Node};

use super::NodeRepository;

/// Repository for node records backed by PostgreSQL.
///
/// One SQL statement per call; subtree traversal is composed from
/// `list_children` by the service layer rather than pushed into the
/// database.
#[derive(Debug, Clone)]
pub struct PgNodeRepository {
    pool: PgPool,
}

impl PgNodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeRepository for PgNodeRepository {
    async fn insert(&self, record: &CreateNode) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "INSERT INTO nodes (owner_id, kind, name, parent_id, path, size_bytes, mime_type, content_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(record.owner_id)
        .bind(record.kind)
        .bind(&record.name)
        .bind(record.parent_id)
        .bind(&record.path)
        .bind(record.size_bytes)
        .bind(&record.mime_type)
        .bind(&record.content_ref)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("nodes_owner_id_path_key") =>
            {
                AppError::conflict(format!("A node at path '{}' already exists", record.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert node", e),
        })
    }

    async fn find_by_id(&self, owner_id: OwnerId, id: NodeId) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    async fn list_children(
        &self,
        owner_id: OwnerId,
        parent_id: Option<NodeId>,
    ) -> AppResult<Vec<Node>> {
        let query = match parent_id {
            Some(parent) => sqlx::query_as::<_, Node>(
                "SELECT * FROM nodes WHERE owner_id = $1 AND parent_id = $2 ORDER BY name ASC",
            )
            .bind(owner_id)
            .bind(parent),
            None => sqlx::query_as::<_, Node>(
                "SELECT * FROM nodes WHERE owner_id = $1 AND parent_id IS NULL ORDER BY name ASC",
            )
            .bind(owner_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn update(&self, node: &Node) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "UPDATE nodes SET name = $3, parent_id = $4, path = $5, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(node.owner_id)
        .bind(node.id)
        .bind(&node.name)
        .bind(node.parent_id)
        .bind(&node.path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("nodes_owner_id_path_key") =>
            {
                AppError::conflict(format!("A node at path '{}' already exists", node.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update node", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Node {} not found", node.id)))
    }

    async fn delete(&self, owner_id: OwnerId, id: NodeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM nodes WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete node", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self, owner_id: OwnerId) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE owner_id = $1 ORDER BY path ASC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list nodes", e))
    }
}

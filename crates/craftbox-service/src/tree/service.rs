//! The tree facade: the single mutation entry point for the node
//! hierarchy.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_core::traits::content::ContentStore;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_entity::node::{CreateNode, Node, path};
use craftbox_entity::quota::{QuotaStatus, StoragePlan};

use craftbox_database::NodeRepository;

use crate::context::RequestContext;
use crate::quota::QuotaAggregator;
use crate::tree::breadcrumb::BreadcrumbResolver;
use crate::tree::delete::{CascadingDeleter, DeleteOutcome};
use crate::tree::listing::{ListOptions, sort_nodes};
use crate::tree::repath::PathMaintainer;
use crate::tree::validator;

/// Request to register a file whose payload is already durably stored.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterFileRequest {
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<NodeId>,
    /// File name.
    pub name: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// MIME type reported by the uploader.
    pub mime_type: Option<String>,
    /// Content store reference of the stored payload.
    pub content_ref: String,
}

/// Orchestrates structural operations on the node tree.
///
/// Validation runs before any record is touched; the direct record update
/// strictly precedes descendant propagation; and every operation that
/// changes stored bytes refreshes the owner's usage counter before
/// returning. Callers must re-fetch listings after any mutation rather
/// than patching cached state, and must re-fetch the affected subtree
/// after any reported partial failure.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Node record store.
    repo: Arc<dyn NodeRepository>,
    /// Binary content store.
    content: Arc<dyn ContentStore>,
    /// Descendant path propagation.
    maintainer: PathMaintainer,
    /// Subtree removal.
    deleter: CascadingDeleter,
    /// Ancestor chain resolution.
    resolver: BreadcrumbResolver,
    /// Ground-truth usage computation.
    quota: QuotaAggregator,
    /// Cached per-owner usage for display; never authoritative.
    usage_cache: Arc<DashMap<OwnerId, i64>>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(repo: Arc<dyn NodeRepository>, content: Arc<dyn ContentStore>) -> Self {
        Self {
            maintainer: PathMaintainer::new(Arc::clone(&repo)),
            deleter: CascadingDeleter::new(Arc::clone(&repo), Arc::clone(&content)),
            resolver: BreadcrumbResolver::new(Arc::clone(&repo)),
            quota: QuotaAggregator::new(Arc::clone(&repo)),
            usage_cache: Arc::new(DashMap::new()),
            repo,
            content,
        }
    }

    /// Gets a node by ID.
    pub async fn get_node(&self, ctx: &RequestContext, node_id: NodeId) -> AppResult<Node> {
        self.repo
            .find_by_id(ctx.owner_id, node_id)
            .await?
            .ok_or_else(|| AppError::not_found("Node not found"))
    }

    /// Lists the contents of a folder (None = the owner's root), folders
    /// first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        parent_id: Option<NodeId>,
        options: ListOptions,
    ) -> AppResult<Vec<Node>> {
        self.resolve_parent(ctx, parent_id).await?;
        let mut nodes = self.repo.list_children(ctx.owner_id, parent_id).await?;
        sort_nodes(&mut nodes, options);
        Ok(nodes)
    }

    /// Case-insensitive substring search over the owner's node names.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<Vec<Node>> {
        let needle = query.to_lowercase();
        let mut nodes: Vec<Node> = self
            .repo
            .list_all(ctx.owner_id)
            .await?
            .into_iter()
            .filter(|node| node.name.to_lowercase().contains(&needle))
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(nodes)
    }

    /// Creates a new folder under `parent_id` (None = root).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        parent_id: Option<NodeId>,
        name: &str,
    ) -> AppResult<Node> {
        path::validate_name(name)?;
        let parent = self.resolve_parent(ctx, parent_id).await?;
        self.ensure_no_sibling(ctx, parent_id, name).await?;

        let node_path = path::join(parent.as_ref().map(|p| p.path.as_str()), name);
        let folder = self
            .repo
            .insert(&CreateNode::folder(
                ctx.owner_id,
                parent_id,
                name.to_string(),
                node_path,
            ))
            .await?;

        info!(
            owner_id = %ctx.owner_id,
            node_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Registers a file node for a payload the upload flow has already
    /// durably stored in the content store.
    pub async fn register_file(
        &self,
        ctx: &RequestContext,
        req: RegisterFileRequest,
    ) -> AppResult<Node> {
        path::validate_name(&req.name)?;
        if req.size_bytes < 0 {
            return Err(AppError::validation("Size cannot be negative"));
        }
        if !self.content.exists(&req.content_ref).await? {
            return Err(AppError::validation(format!(
                "No stored payload at '{}'",
                req.content_ref
            )));
        }

        let parent = self.resolve_parent(ctx, req.parent_id).await?;
        self.ensure_no_sibling(ctx, req.parent_id, &req.name).await?;

        let node_path = path::join(parent.as_ref().map(|p| p.path.as_str()), &req.name);
        let file = self
            .repo
            .insert(&CreateNode::file(
                ctx.owner_id,
                req.parent_id,
                req.name,
                node_path,
                req.size_bytes,
                req.mime_type,
                req.content_ref,
            ))
            .await?;

        self.refresh_usage(ctx.owner_id).await;

        info!(
            owner_id = %ctx.owner_id,
            node_id = %file.id,
            path = %file.path,
            size_bytes = file.size_bytes,
            "File registered"
        );

        Ok(file)
    }

    /// Renames a node. Folder renames propagate the new path through the
    /// whole subtree before the operation is considered complete.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        new_name: &str,
    ) -> AppResult<Node> {
        let mut node = self.get_node(ctx, node_id).await?;
        validator::validate_rename(&node, new_name)?;
        self.ensure_no_sibling(ctx, node.parent_id, new_name).await?;

        let old_path = node.path.clone();
        node.name = new_name.to_string();
        node.path = path::join(path::parent_of(&old_path), new_name);

        let node = self.repo.update(&node).await?;

        if node.is_folder() {
            self.maintainer
                .repath(ctx.owner_id, node.id, &old_path, &node.path)
                .await?;
        }

        info!(
            owner_id = %ctx.owner_id,
            node_id = %node_id,
            old_path = %old_path,
            new_path = %node.path,
            "Node renamed"
        );

        Ok(node)
    }

    /// Moves a node under a new parent folder (None = root). Folder moves
    /// propagate the new path through the whole subtree before the
    /// operation is considered complete.
    pub async fn move_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        destination_id: Option<NodeId>,
    ) -> AppResult<Node> {
        let mut node = self.get_node(ctx, node_id).await?;

        let destination = match destination_id {
            Some(id) => Some(
                self.repo
                    .find_by_id(ctx.owner_id, id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Destination folder not found"))?,
            ),
            None => None,
        };

        validator::validate_move(&node, destination.as_ref())?;
        self.ensure_no_sibling(ctx, destination_id, &node.name)
            .await?;

        let old_path = node.path.clone();
        node.parent_id = destination_id;
        node.path = path::join(destination.as_ref().map(|d| d.path.as_str()), &node.name);

        let node = self.repo.update(&node).await?;

        if node.is_folder() {
            self.maintainer
                .repath(ctx.owner_id, node.id, &old_path, &node.path)
                .await?;
        }

        info!(
            owner_id = %ctx.owner_id,
            node_id = %node_id,
            old_path = %old_path,
            new_path = %node.path,
            "Node moved"
        );

        Ok(node)
    }

    /// Deletes a node; folders are removed together with their entire
    /// subtree, deepest records first.
    ///
    /// On partial completion the error names every node still present, and
    /// retrying the delete on those ids converges. The outcome's
    /// `parent_id` lets a caller whose view was inside the subtree
    /// navigate to the former parent.
    pub async fn delete(&self, ctx: &RequestContext, node_id: NodeId) -> AppResult<DeleteOutcome> {
        let node = self.get_node(ctx, node_id).await?;
        let outcome = self.deleter.delete_subtree(ctx.owner_id, &node).await?;

        // Bytes changed even when the subtree only partially went away.
        self.refresh_usage(ctx.owner_id).await;

        if !outcome.is_complete() {
            return Err(AppError::partial_failure(
                format!(
                    "Deleted {} nodes; {} still present",
                    outcome.deleted.len(),
                    outcome.remaining.len()
                ),
                outcome.remaining,
            ));
        }

        info!(
            owner_id = %ctx.owner_id,
            node_id = %node_id,
            path = %node.path,
            deleted = outcome.deleted.len(),
            "Node deleted"
        );

        Ok(outcome)
    }

    /// The chain of nodes from the root-most ancestor down to `node_id`.
    pub async fn breadcrumbs(&self, ctx: &RequestContext, node_id: NodeId) -> AppResult<Vec<Node>> {
        let node = self.get_node(ctx, node_id).await?;
        self.resolver.resolve(ctx.owner_id, &node).await
    }

    /// Recompute the owner's total consumed storage and refresh the cached
    /// counter.
    pub async fn usage(&self, ctx: &RequestContext) -> AppResult<i64> {
        let used = self.quota.usage(ctx.owner_id).await?;
        self.usage_cache.insert(ctx.owner_id, used);
        Ok(used)
    }

    /// Last computed usage for display, falling back to a recomputation
    /// when no refresh has happened yet.
    pub async fn cached_usage(&self, ctx: &RequestContext) -> AppResult<i64> {
        if let Some(used) = self.usage_cache.get(&ctx.owner_id) {
            return Ok(*used);
        }
        self.usage(ctx).await
    }

    /// Current usage evaluated against a storage plan.
    pub async fn quota_status(
        &self,
        ctx: &RequestContext,
        plan: StoragePlan,
    ) -> AppResult<QuotaStatus> {
        let status = self.quota.status(ctx.owner_id, plan).await?;
        self.usage_cache.insert(ctx.owner_id, status.used_bytes);
        Ok(status)
    }

    /// Resolve an optional parent id to its folder node, verifying it
    /// exists and can hold children.
    async fn resolve_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Option<NodeId>,
    ) -> AppResult<Option<Node>> {
        let Some(id) = parent_id else {
            return Ok(None);
        };
        let parent = self
            .repo
            .find_by_id(ctx.owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        if !parent.is_folder() {
            return Err(AppError::validation("Parent is not a folder"));
        }
        Ok(Some(parent))
    }

    /// Reject a sibling name collision up front; the record store's unique
    /// path constraint backs this check.
    async fn ensure_no_sibling(
        &self,
        ctx: &RequestContext,
        parent_id: Option<NodeId>,
        name: &str,
    ) -> AppResult<()> {
        let siblings = self.repo.list_children(ctx.owner_id, parent_id).await?;
        if siblings.iter().any(|sibling| sibling.name == name) {
            return Err(AppError::conflict(format!(
                "A node named '{name}' already exists here"
            )));
        }
        Ok(())
    }

    /// Best-effort refresh of the cached usage counter after a
    /// byte-changing operation. The ground truth stays recomputable; a
    /// failed refresh only leaves the display value stale.
    async fn refresh_usage(&self, owner_id: OwnerId) {
        match self.quota.usage(owner_id).await {
            Ok(used) => {
                self.usage_cache.insert(owner_id, used);
            }
            Err(err) => {
                warn!(%owner_id, error = %err, "Failed to refresh usage counter");
            }
        }
    }
}

//! Shared test helpers for engine integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_core::traits::content::ContentStore;
use craftbox_core::types::{NodeId, OwnerId};
use craftbox_database::{MemoryNodeRepository, NodeRepository};
use craftbox_entity::node::{CreateNode, Node};
use craftbox_service::{RegisterFileRequest, RequestContext, TreeService};
use craftbox_storage::MemoryContentStore;

/// Wired-up engine over in-memory backends.
pub struct TestApp {
    /// The facade under test.
    pub service: TreeService,
    /// Record store handle for direct assertions.
    pub repo: Arc<dyn NodeRepository>,
    /// Content store handle for direct assertions.
    pub content: Arc<MemoryContentStore>,
    /// A request context for the test owner.
    pub ctx: RequestContext,
}

impl TestApp {
    /// Build an engine over plain in-memory backends.
    pub fn new() -> Self {
        let repo: Arc<dyn NodeRepository> = Arc::new(MemoryNodeRepository::new());
        Self::with_repo(repo)
    }

    /// Build an engine over a caller-provided repository (e.g. a flaky
    /// wrapper).
    pub fn with_repo(repo: Arc<dyn NodeRepository>) -> Self {
        let content = Arc::new(MemoryContentStore::new());
        let service = TreeService::new(
            Arc::clone(&repo),
            Arc::clone(&content) as Arc<dyn ContentStore>,
        );
        Self {
            service,
            repo,
            content,
            ctx: RequestContext::new(OwnerId::new()),
        }
    }

    /// Create a folder through the facade.
    pub async fn folder(&self, parent: Option<NodeId>, name: &str) -> Node {
        self.service
            .create_folder(&self.ctx, parent, name)
            .await
            .expect("create folder")
    }

    /// Store a payload and register the file node with `size` as its
    /// declared byte length (quota tracks the declared size; the stored
    /// payload is kept small).
    pub async fn file(&self, parent: Option<NodeId>, name: &str, size: i64) -> Node {
        let content_ref = format!("{}/{}", self.ctx.owner_id, name);
        let payload_len = size.clamp(0, 4096) as usize;
        self.content
            .put(&content_ref, Bytes::from(vec![0u8; payload_len]))
            .await
            .expect("store payload");

        self.service
            .register_file(
                &self.ctx,
                RegisterFileRequest {
                    parent_id: parent,
                    name: name.to_string(),
                    size_bytes: size,
                    mime_type: Some("text/plain".to_string()),
                    content_ref,
                },
            )
            .await
            .expect("register file")
    }

    /// Every node record the test owner still has, ordered by path.
    pub async fn all_nodes(&self) -> Vec<Node> {
        self.repo.list_all(self.ctx.owner_id).await.expect("list all")
    }

    /// Fetch one node's current record.
    pub async fn node(&self, id: NodeId) -> Node {
        self.repo
            .find_by_id(self.ctx.owner_id, id)
            .await
            .expect("find node")
            .expect("node exists")
    }
}

/// Repository wrapper that fails specific operations on specific nodes,
/// simulating a remote record store dying partway through a propagation.
#[derive(Debug)]
pub struct FlakyNodeRepository {
    inner: MemoryNodeRepository,
    /// Node ids whose `update` calls fail.
    pub fail_updates: DashSet<NodeId>,
    /// Node ids whose `delete` calls fail.
    pub fail_deletes: DashSet<NodeId>,
    /// Folder ids whose `list_children` calls fail.
    pub fail_listings: DashSet<NodeId>,
}

impl FlakyNodeRepository {
    pub fn new() -> Self {
        Self {
            inner: MemoryNodeRepository::new(),
            fail_updates: DashSet::new(),
            fail_deletes: DashSet::new(),
            fail_listings: DashSet::new(),
        }
    }

    fn backend_down(what: &str) -> AppError {
        AppError::database(format!("Simulated backend failure: {what}"))
    }
}

#[async_trait]
impl NodeRepository for FlakyNodeRepository {
    async fn insert(&self, record: &CreateNode) -> AppResult<Node> {
        self.inner.insert(record).await
    }

    async fn find_by_id(&self, owner_id: OwnerId, id: NodeId) -> AppResult<Option<Node>> {
        self.inner.find_by_id(owner_id, id).await
    }

    async fn list_children(
        &self,
        owner_id: OwnerId,
        parent_id: Option<NodeId>,
    ) -> AppResult<Vec<Node>> {
        if let Some(parent) = parent_id {
            if self.fail_listings.contains(&parent) {
                return Err(Self::backend_down("list_children"));
            }
        }
        self.inner.list_children(owner_id, parent_id).await
    }

    async fn update(&self, node: &Node) -> AppResult<Node> {
        if self.fail_updates.contains(&node.id) {
            return Err(Self::backend_down("update"));
        }
        self.inner.update(node).await
    }

    async fn delete(&self, owner_id: OwnerId, id: NodeId) -> AppResult<bool> {
        if self.fail_deletes.contains(&id) {
            return Err(Self::backend_down("delete"));
        }
        self.inner.delete(owner_id, id).await
    }

    async fn list_all(&self, owner_id: OwnerId) -> AppResult<Vec<Node>> {
        self.inner.list_all(owner_id).await
    }
}

/// A TestApp over a flaky repository, plus the wrapper for injecting
/// failures.
pub fn flaky_app() -> (TestApp, Arc<FlakyNodeRepository>) {
    let flaky = Arc::new(FlakyNodeRepository::new());
    let app = TestApp::with_repo(Arc::clone(&flaky) as Arc<dyn NodeRepository>);
    (app, flaky)
}

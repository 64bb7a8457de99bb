//! Owner storage usage aggregation.

use std::sync::Arc;

use craftbox_core::result::AppResult;
use craftbox_core::types::OwnerId;
use craftbox_entity::quota::{QuotaStatus, StoragePlan};

use craftbox_database::NodeRepository;

/// Computes an owner's total consumed storage from the node records.
///
/// Usage is defined as the sum of `size_bytes` over the owner's file
/// nodes, independent of folder structure. This full recomputation is the
/// ground truth; any cached counter is a display optimization layered on
/// top of it.
#[derive(Debug, Clone)]
pub struct QuotaAggregator {
    repo: Arc<dyn NodeRepository>,
}

impl QuotaAggregator {
    /// Creates a new quota aggregator.
    pub fn new(repo: Arc<dyn NodeRepository>) -> Self {
        Self { repo }
    }

    /// Total bytes consumed by the owner's files.
    pub async fn usage(&self, owner_id: OwnerId) -> AppResult<i64> {
        let nodes = self.repo.list_all(owner_id).await?;
        Ok(nodes
            .iter()
            .filter(|node| node.is_file())
            .map(|node| node.size_bytes)
            .sum())
    }

    /// Current usage evaluated against a storage plan.
    pub async fn status(&self, owner_id: OwnerId, plan: StoragePlan) -> AppResult<QuotaStatus> {
        let used = self.usage(owner_id).await?;
        Ok(QuotaStatus::new(used, plan))
    }
}

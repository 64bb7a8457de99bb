//! Storage plan and quota value objects.

use serde::{Deserialize, Serialize};

const KIB: i64 = 1024;
const GIB: i64 = KIB * KIB * KIB;
const TIB: i64 = GIB * KIB;

/// The percentage of quota consumed at which callers should surface an
/// upgrade prompt.
pub const UPGRADE_PROMPT_THRESHOLD: f64 = 80.0;

/// A storage plan tier and its byte allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePlan {
    /// 1 GiB.
    Free,
    /// 100 GiB.
    Plus,
    /// 1 TiB.
    Pro,
    /// 10 TiB.
    Max,
}

impl StoragePlan {
    /// The plan's storage allowance in bytes.
    pub fn limit_bytes(&self) -> i64 {
        match self {
            Self::Free => GIB,
            Self::Plus => 100 * GIB,
            Self::Pro => TIB,
            Self::Max => 10 * TIB,
        }
    }

    /// The next tier up, if any.
    pub fn next(&self) -> Option<StoragePlan> {
        match self {
            Self::Free => Some(Self::Plus),
            Self::Plus => Some(Self::Pro),
            Self::Pro => Some(Self::Max),
            Self::Max => None,
        }
    }
}

impl Default for StoragePlan {
    fn default() -> Self {
        Self::Free
    }
}

/// Quota information for an owner, evaluated against a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Currently used bytes.
    pub used_bytes: i64,
    /// Plan allowance in bytes.
    pub limit_bytes: i64,
    /// Usage percentage (0.0 - 100.0).
    pub percent_used: f64,
}

impl QuotaStatus {
    /// Create a quota status from used bytes and a plan.
    pub fn new(used_bytes: i64, plan: StoragePlan) -> Self {
        let limit_bytes = plan.limit_bytes();
        let percent_used = if limit_bytes == 0 {
            0.0
        } else {
            ((used_bytes as f64 / limit_bytes as f64) * 100.0).min(100.0)
        };

        Self {
            used_bytes,
            limit_bytes,
            percent_used,
        }
    }

    /// Check if the quota is exceeded.
    pub fn is_exceeded(&self) -> bool {
        self.used_bytes >= self.limit_bytes
    }

    /// Check if adding the given number of bytes would exceed the quota.
    pub fn would_exceed(&self, additional_bytes: i64) -> bool {
        (self.used_bytes + additional_bytes) > self.limit_bytes
    }

    /// Whether callers should surface an upgrade prompt.
    pub fn should_prompt_upgrade(&self) -> bool {
        self.percent_used > UPGRADE_PROMPT_THRESHOLD
    }
}

/// Format a byte count for display (e.g., `1.5 GB`).
pub fn format_bytes(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB as f64 && unit < UNITS.len() - 1 {
        value /= KIB as f64;
        unit += 1;
    }

    format!("{} {}", (value * 10.0).round() / 10.0, UNITS[unit])
}

//! # craftbox-storage
//!
//! Content store implementations for CraftBox. Payloads are addressed by
//! opaque refs whose lifecycle is independent of the node metadata that
//! points at them.

pub mod providers;

pub use providers::local::LocalContentStore;
pub use providers::memory::MemoryContentStore;

//! # craftbox-database
//!
//! Record store access for CraftBox: the [`NodeRepository`] contract the
//! hierarchy engine is written against, its PostgreSQL implementation, an
//! in-memory implementation for tests and embedded use, and connection
//! pool management.
//!
//! The backing store offers per-record operations only. There are no
//! multi-record transactions and no recursive queries anywhere in this
//! crate; recursive structural edits are driven record-by-record from the
//! service layer.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryNodeRepository;
pub use repositories::NodeRepository;

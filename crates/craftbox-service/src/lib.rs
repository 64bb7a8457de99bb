//! # craftbox-service
//!
//! The hierarchy-consistency engine for CraftBox. The [`TreeService`]
//! facade is the single mutation entry point for the folder/file tree; it
//! validates structural edits before touching any record, then drives the
//! recursive propagation (path maintenance, cascading delete) record by
//! record against a backing store that offers no multi-record
//! transactions.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod quota;
pub mod tree;

pub use context::RequestContext;
pub use quota::QuotaAggregator;
pub use tree::breadcrumb::BreadcrumbResolver;
pub use tree::delete::{CascadingDeleter, DeleteOutcome};
pub use tree::listing::{ListOptions, SortField, SortOrder};
pub use tree::repath::PathMaintainer;
pub use tree::service::{RegisterFileRequest, TreeService};

//! Node domain entities and materialized-path helpers.

pub mod model;
pub mod path;

pub use model::{CreateNode, Node, NodeKind};

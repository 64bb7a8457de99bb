//! Listing order for folder contents.

use serde::{Deserialize, Serialize};

use craftbox_entity::node::Node;

/// Field to order a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Node name.
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Payload size.
    Size,
}

/// Listing sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Options controlling listing order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListOptions {
    /// Sort field.
    pub sort: SortField,
    /// Sort direction.
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Sort a listing in place. Folders always come before files; within each
/// group the configured field and direction apply.
pub fn sort_nodes(nodes: &mut [Node], options: ListOptions) {
    nodes.sort_by(|a, b| {
        let group = b.is_folder().cmp(&a.is_folder());
        if group != std::cmp::Ordering::Equal {
            return group;
        }

        let by_field = match options.sort {
            SortField::Name => a.name.cmp(&b.name),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Size => a.size_bytes.cmp(&b.size_bytes),
        };

        match options.order {
            SortOrder::Asc => by_field,
            SortOrder::Desc => by_field.reverse(),
        }
    });
}

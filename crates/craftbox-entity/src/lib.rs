//! # craftbox-entity
//!
//! Domain entity models for CraftBox. Every struct in this crate represents
//! a record-store row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, `Deserialize`, and database entities additionally
//! derive `sqlx::FromRow`.

pub mod node;
pub mod quota;

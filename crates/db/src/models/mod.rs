//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the entity is writable over HTTP

pub mod content_link;
pub mod page;
pub mod page_meta;
pub mod revision;
pub mod search;
pub mod user;

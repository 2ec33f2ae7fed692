//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! a pool or any executor; writes that belong to a request take the
//! request's connection or [`crate::Scope`] so they share its transaction.

pub mod content_link_repo;
pub mod page_meta_repo;
pub mod page_repo;
pub mod revision_repo;
pub mod search_repo;
pub mod user_repo;

pub use content_link_repo::ContentLinkRepo;
pub use page_meta_repo::PageMetaRepo;
pub use page_repo::PageRepo;
pub use revision_repo::RevisionRepo;
pub use search_repo::SearchRepo;
pub use user_repo::UserRepo;

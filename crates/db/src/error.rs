use folio_core::error::CoreError;
use folio_core::types::RefId;

/// Failure reported by a [`crate::SearchIndex`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("Search index store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Search index rejected the change: {0}")]
    Rejected(String),
}

/// Error of a multi-statement page operation.
///
/// Any variant means the enclosing [`crate::Scope`] must not be committed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    SearchIndex(#[from] SearchIndexError),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: RefId },

    /// A domain rule refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

//! The search index collaborator of the page operations.
//!
//! [`crate::repositories::PageRepo`] notifies a [`SearchIndex`] of every
//! change it makes to a page. Notifications receive the request's
//! [`Scope`], so an implementation backed by the same database joins the
//! request transaction and a failure rolls the page change back.

use std::future::Future;

use folio_core::types::RefId;

use crate::error::SearchIndexError;
use crate::models::page::Page;
use crate::repositories::SearchRepo;
use crate::scope::Scope;

/// Receives page change notifications, keyed by the scope's organization.
///
/// Every operation must be idempotent under retry.
pub trait SearchIndex: Send + Sync {
    fn add(
        &self,
        scope: &mut Scope,
        page: &Page,
    ) -> impl Future<Output = Result<(), SearchIndexError>> + Send;

    fn update(
        &self,
        scope: &mut Scope,
        page: &Page,
    ) -> impl Future<Output = Result<(), SearchIndexError>> + Send;

    fn update_sequence(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
        sequence: f64,
    ) -> impl Future<Output = Result<(), SearchIndexError>> + Send;

    fn update_level(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
        level: i32,
    ) -> impl Future<Output = Result<(), SearchIndexError>> + Send;

    fn delete(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
    ) -> impl Future<Output = Result<(), SearchIndexError>> + Send;
}

/// PostgreSQL full-text index stored in `search_entries`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgSearchIndex;

impl SearchIndex for PgSearchIndex {
    async fn add(&self, scope: &mut Scope, page: &Page) -> Result<(), SearchIndexError> {
        let org_id = scope.org_id();
        SearchRepo::upsert_entry(scope.conn(), org_id, page).await?;
        Ok(())
    }

    async fn update(&self, scope: &mut Scope, page: &Page) -> Result<(), SearchIndexError> {
        let org_id = scope.org_id();
        SearchRepo::upsert_entry(scope.conn(), org_id, page).await?;
        Ok(())
    }

    async fn update_sequence(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
        sequence: f64,
    ) -> Result<(), SearchIndexError> {
        let org_id = scope.org_id();
        SearchRepo::update_sequence(scope.conn(), org_id, document_id, page_id, sequence).await?;
        Ok(())
    }

    async fn update_level(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
        level: i32,
    ) -> Result<(), SearchIndexError> {
        let org_id = scope.org_id();
        SearchRepo::update_level(scope.conn(), org_id, document_id, page_id, level).await?;
        Ok(())
    }

    async fn delete(
        &self,
        scope: &mut Scope,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<(), SearchIndexError> {
        let org_id = scope.org_id();
        SearchRepo::delete_entry(scope.conn(), org_id, document_id, page_id).await?;
        Ok(())
    }
}

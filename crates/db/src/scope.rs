//! Request-scoped unit of work.

use folio_core::types::{RefId, RequestContext};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// The organization, the acting user and the open transaction of one
/// request.
///
/// Every mutating repository call takes a `&mut Scope`, so all statements of
/// a request share one transaction. Dropping a scope without calling
/// [`Scope::commit`] rolls the transaction back.
pub struct Scope {
    ctx: RequestContext,
    tx: Transaction<'static, Postgres>,
}

impl Scope {
    /// Open a transaction on behalf of `ctx`.
    pub async fn begin(pool: &PgPool, ctx: RequestContext) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self { ctx, tx })
    }

    pub fn context(&self) -> RequestContext {
        self.ctx
    }

    pub fn org_id(&self) -> RefId {
        self.ctx.org_id
    }

    pub fn user_id(&self) -> RefId {
        self.ctx.user_id
    }

    /// The transaction's connection, for use as a sqlx executor.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

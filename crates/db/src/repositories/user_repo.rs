//! Repository for the `users` table.

use folio_core::types::RefId;
use folio_core::users::initials;
use sqlx::PgExecutor;

use crate::models::user::{UpsertAccount, User};

/// Column list for users queries.
const COLUMNS: &str =
    "id, ref_id, org_id, email, first_name, last_name, initials, created_at, updated_at";

/// Provides account operations.
pub struct UserRepo;

impl UserRepo {
    /// Sync the caller's account within an organization.
    ///
    /// An account already held by `user_id` is refreshed, email included.
    /// Otherwise the account for `(org_id, email)` is created, or its
    /// profile refreshed if another reference id already owns it; that
    /// account keeps its reference id. A single statement, so concurrent
    /// first logins cannot create duplicates.
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        user_id: RefId,
        input: &UpsertAccount,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "WITH refreshed AS (
                UPDATE users SET
                    email = $3,
                    first_name = $4,
                    last_name = $5,
                    initials = $6,
                    updated_at = NOW()
                WHERE org_id = $2 AND ref_id = $1
                RETURNING {COLUMNS}
             ),
             inserted AS (
                INSERT INTO users (ref_id, org_id, email, first_name, last_name, initials)
                SELECT $1::uuid, $2::uuid, $3::text, $4::text, $5::text, $6::text
                WHERE NOT EXISTS (SELECT 1 FROM refreshed)
                ON CONFLICT (org_id, email) DO UPDATE SET
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name,
                    initials = EXCLUDED.initials,
                    updated_at = NOW()
                RETURNING {COLUMNS}
             )
             SELECT {COLUMNS} FROM refreshed
             UNION ALL
             SELECT {COLUMNS} FROM inserted"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(org_id)
            .bind(input.email.trim().to_lowercase())
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(initials(&input.first_name, &input.last_name))
            .fetch_one(executor)
            .await
    }

    /// Find an account by its reference id within an organization.
    pub async fn find_by_ref_id<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        user_id: RefId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE org_id = $1 AND ref_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(org_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }
}

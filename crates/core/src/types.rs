use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Public reference id of any org-scoped entity (page, revision, link, user,
/// organization, document).
pub type RefId = uuid::Uuid;

/// Generate a fresh, time-ordered reference id.
pub fn new_ref_id() -> RefId {
    uuid::Uuid::now_v7()
}

/// The authenticated caller every operation runs on behalf of.
///
/// Supplied by the HTTP layer from the bearer token; never read from global
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub org_id: RefId,
    pub user_id: RefId,
}

impl RequestContext {
    pub fn new(org_id: RefId, user_id: RefId) -> Self {
        Self { org_id, user_id }
    }
}

//! Role names carried in access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Whether a role may change pages, metadata or revisions.
pub fn can_edit(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_and_editors_edit() {
        assert!(can_edit(ROLE_ADMIN));
        assert!(can_edit(ROLE_EDITOR));
        assert!(!can_edit(ROLE_VIEWER));
        assert!(!can_edit("Editor"));
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// The closed set of permission tokens granted through roles.
///
/// Tokens are stored by their string code; the set never grows at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewHome,
    ViewCategories,
    ViewSubscriberCategories,
    ViewPaidCategories,
    CreateArticles,
    /// Edit articles that sit in the revision/edited part of the workflow.
    EditArticles,
    /// Edit articles still owned by their author as drafts.
    EditDraftArticles,
    /// Approve articles for publication in moderated categories.
    ModerateArticles,
    PostComments,
    ReadComments,
    RateArticles,
    ManageRoles,
    ManageCategories,
}

/// An authenticated user with their full capability set already resolved.
///
/// Built once at the start of a request: the permission union across the
/// user's roles and the administrator membership are computed up front so
/// the transition rules evaluate as pure predicates without touching
/// storage again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    permissions: BTreeSet<Permission>,
    is_admin: bool,
}

// implementations

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::ViewHome,
        Permission::ViewCategories,
        Permission::ViewSubscriberCategories,
        Permission::ViewPaidCategories,
        Permission::CreateArticles,
        Permission::EditArticles,
        Permission::EditDraftArticles,
        Permission::ModerateArticles,
        Permission::PostComments,
        Permission::ReadComments,
        Permission::RateArticles,
        Permission::ManageRoles,
        Permission::ManageCategories,
    ];

    /// Stable string code used as the storage representation.
    pub fn code(&self) -> &'static str {
        match self {
            Permission::ViewHome => "view_home",
            Permission::ViewCategories => "view_categories",
            Permission::ViewSubscriberCategories => "view_subscriber_categories",
            Permission::ViewPaidCategories => "view_paid_categories",
            Permission::CreateArticles => "create_articles",
            Permission::EditArticles => "edit_articles",
            Permission::EditDraftArticles => "edit_draft_articles",
            Permission::ModerateArticles => "moderate_articles",
            Permission::PostComments => "post_comments",
            Permission::ReadComments => "read_comments",
            Permission::RateArticles => "rate_articles",
            Permission::ManageRoles => "manage_roles",
            Permission::ManageCategories => "manage_categories",
        }
    }

    pub fn from_code(code: &str) -> Option<Permission> {
        Permission::ALL.iter().copied().find(|p| p.code() == code)
    }
}

impl Actor {
    pub fn new(
        user_id: UserId,
        permissions: impl IntoIterator<Item = Permission>,
        is_admin: bool,
    ) -> Self {
        Self {
            user_id,
            permissions: permissions.into_iter().collect(),
            is_admin,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        self.permissions.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_codes_round_trip() {
        for permission in Permission::ALL {
            assert_eq!(Permission::from_code(permission.code()), Some(permission));
        }
        assert_eq!(Permission::from_code("unknown_token"), None);
    }

    #[test]
    fn actor_union_is_queried_not_storage() {
        let actor = Actor::new(
            UserId(7),
            [Permission::CreateArticles, Permission::EditDraftArticles],
            false,
        );

        assert!(actor.has(Permission::CreateArticles));
        assert!(!actor.has(Permission::ModerateArticles));
        assert!(!actor.is_admin());
    }
}

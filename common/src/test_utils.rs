use crate::domain::category::CategoryId;
use crate::domain::{Actor, Category, CategoryKind, CategoryName, Permission, UserId};

/// Builders for the fixtures the transition rules consume.
///
/// Public so that other crates can reuse them for their own tests.

pub fn make_actor(user_id: i64, permissions: &[Permission]) -> Actor {
    Actor::new(UserId(user_id), permissions.iter().copied(), false)
}

pub fn make_admin(user_id: i64) -> Actor {
    Actor::new(UserId(user_id), Permission::ALL, true)
}

pub fn make_category(id: i64, kind: CategoryKind, is_moderated: bool) -> Category {
    Category {
        id: CategoryId(id),
        name: CategoryName::try_new(format!("category-{}", id)).unwrap(),
        description: String::new(),
        kind,
        active: true,
        is_moderated,
    }
}

/// Free, unmoderated category: the self-publish path.
pub fn make_open_category(id: i64) -> Category {
    make_category(id, CategoryKind::Free, false)
}

/// Moderated category: publication requires a moderator or administrator.
pub fn make_moderated_category(id: i64) -> Category {
    make_category(id, CategoryKind::Subscription, true)
}

use pressroom_common::database::Database;
use pressroom_common::{
    ADMINISTRATOR_ROLE, PERMISSIONS_TABLE, Permission, ROLE_PERMISSIONS_TABLE, ROLES_TABLE,
};

/// A built-in role and the permission set it ends up with.
struct RoleSeed {
    name: &'static str,
    description: &'static str,
    permissions: &'static [Permission],
}

const AUTHOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewHome,
    Permission::ViewCategories,
    Permission::CreateArticles,
    Permission::EditDraftArticles,
    Permission::ReadComments,
    Permission::PostComments,
    Permission::RateArticles,
];

const EDITOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewHome,
    Permission::ViewCategories,
    Permission::EditArticles,
    Permission::ReadComments,
];

const PUBLISHER_PERMISSIONS: &[Permission] = &[
    Permission::ViewHome,
    Permission::ViewCategories,
    Permission::ModerateArticles,
    Permission::ReadComments,
];

const SUBSCRIBER_PERMISSIONS: &[Permission] = &[
    Permission::ViewHome,
    Permission::ViewCategories,
    Permission::ViewSubscriberCategories,
    Permission::ReadComments,
    Permission::PostComments,
    Permission::RateArticles,
];

const FINANCIAL_PERMISSIONS: &[Permission] = &[Permission::ViewPaidCategories];

fn builtin_roles() -> Vec<RoleSeed> {
    vec![
        RoleSeed {
            name: ADMINISTRATOR_ROLE,
            description: "Full access to every part of the system",
            permissions: &Permission::ALL,
        },
        RoleSeed {
            name: "author",
            description: "Writes articles and hands drafts over for revision",
            permissions: AUTHOR_PERMISSIONS,
        },
        RoleSeed {
            name: "editor",
            description: "Reworks articles under revision",
            permissions: EDITOR_PERMISSIONS,
        },
        RoleSeed {
            name: "publisher",
            description: "Approves edited articles for publication",
            permissions: PUBLISHER_PERMISSIONS,
        },
        RoleSeed {
            name: "subscriber",
            description: "Reads subscription categories",
            permissions: SUBSCRIBER_PERMISSIONS,
        },
        RoleSeed {
            name: "financial",
            description: "Reviews everything the site has sold",
            permissions: FINANCIAL_PERMISSIONS,
        },
    ]
}

fn permission_description(permission: Permission) -> &'static str {
    match permission {
        Permission::ViewHome => "View the home page",
        Permission::ViewCategories => "List the categories available in the system",
        Permission::ViewSubscriberCategories => "View subscriber-only categories",
        Permission::ViewPaidCategories => "View everything sold through the site",
        Permission::CreateArticles => "Create new articles",
        Permission::EditArticles => "Edit articles under revision",
        Permission::EditDraftArticles => "Edit own draft articles",
        Permission::ModerateArticles => "Approve articles for publication",
        Permission::PostComments => "Post comments on articles",
        Permission::ReadComments => "Read article comments",
        Permission::RateArticles => "Like or dislike articles",
        Permission::ManageRoles => "Manage user roles",
        Permission::ManageCategories => "Manage article categories",
    }
}

/// Idempotent catalogue seed: permissions, the built-in roles and their
/// grants. Conflicting rows are left as they are.
pub async fn apply(database: &Database) -> Result<(), anyhow::Error> {
    let schema = database.database_schema();
    let mut statements = Vec::new();

    for permission in Permission::ALL {
        statements.push(format!(
            "INSERT INTO \"{schema}\".\"{PERMISSIONS_TABLE}\" (code, description) \
             VALUES ('{}', '{}') ON CONFLICT (code) DO NOTHING",
            permission.code(),
            permission_description(permission),
        ));
    }

    for role in builtin_roles() {
        statements.push(format!(
            "INSERT INTO \"{schema}\".\"{ROLES_TABLE}\" (name, description) \
             VALUES ('{}', '{}') ON CONFLICT (name) DO NOTHING",
            role.name, role.description,
        ));

        let codes = role
            .permissions
            .iter()
            .map(|p| format!("'{}'", p.code()))
            .collect::<Vec<_>>()
            .join(", ");

        statements.push(format!(
            "INSERT INTO \"{schema}\".\"{ROLE_PERMISSIONS_TABLE}\" (role_id, permission_id) \
             SELECT r.id, p.id FROM \"{schema}\".\"{ROLES_TABLE}\" r \
             JOIN \"{schema}\".\"{PERMISSIONS_TABLE}\" p ON p.code IN ({codes}) \
             WHERE r.name = '{}' ON CONFLICT DO NOTHING",
            role.name,
        ));
    }

    database.execute_in_transaction(statements, "SEED CATALOGUE").await
}

mod domain;
mod infrastructure;

// Table names shared by the service adapters and the migration

pub const USERS_TABLE: &'static str = "users";
pub const ROLES_TABLE: &'static str = "roles";
pub const PERMISSIONS_TABLE: &'static str = "permissions";
pub const USER_ROLES_TABLE: &'static str = "user_roles";
pub const ROLE_PERMISSIONS_TABLE: &'static str = "role_permissions";

pub const CATEGORIES_TABLE: &'static str = "categories";
pub const ARTICLES_TABLE: &'static str = "articles";
pub const SCHEDULED_PUBLICATIONS_TABLE: &'static str = "scheduled_publications";

/// Members of this role pass every transition gate regardless of the
/// individual permissions attached to their other roles.
pub const ADMINISTRATOR_ROLE: &'static str = "administrator";

// expose domain module

pub use domain::*;

// expose database module

pub use infrastructure::database;

pub mod test_utils;

use std::collections::HashSet;

use pressroom_common::{
    ARTICLES_TABLE, CATEGORIES_TABLE, PERMISSIONS_TABLE, ROLE_PERMISSIONS_TABLE, ROLES_TABLE,
    SCHEDULED_PUBLICATIONS_TABLE, USER_ROLES_TABLE, USERS_TABLE,
};

/// Lists the tables already present in the target schema.
pub trait Tables: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<HashSet<String>, anyhow::Error>>;
}

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    BigSerial,
    BigInt,
    Text,
    Boolean,
    TimestampTZ,
}

/// Represents foreign key constraint in the database table
pub struct ForeignKeyConstraint {
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// Represents an index in the database table. `predicate` makes it a
/// partial index.
pub struct Index {
    pub table_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub predicate: Option<String>,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::BigSerial => "BIGSERIAL",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::TimestampTZ => "TIMESTAMPTZ",
        }
    }
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        foreign_keys: Vec<ForeignKeyConstraint>,
        indexes: Vec<Index>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            foreign_keys,
            indexes,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(
        name: T,
        column_type: ColumnType,
        not_null: bool,
        unique: bool,
        default_value: Option<T>,
    ) -> Self {
        let primary_key = false;
        Self {
            name: name.into(),
            column_type,
            not_null,
            unique,
            primary_key,
            default_value: default_value.map(T::into),
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            unique: false,
            primary_key: true,
            default_value: None,
        }
    }
}

impl ForeignKeyConstraint {
    pub fn new<T: Into<String>>(
        table_name: T,
        column_name: T,
        referenced_table_name: T,
        referenced_column_name: T,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            referenced_table_name: referenced_table_name.into(),
            referenced_column_name: referenced_column_name.into(),
        }
    }
}

impl Index {
    pub fn new<T: Into<String>>(table_name: T, columns: Vec<T>, unique: bool) -> Self {
        Self {
            table_name: table_name.into(),
            columns: columns.into_iter().map(T::into).collect(),
            unique,
            predicate: None,
        }
    }

}

/// The fixed content-management schema.
pub fn cms_schema() -> Vec<Table> {
    vec![
        users_table(),
        roles_table(),
        permissions_table(),
        user_roles_table(),
        role_permissions_table(),
        categories_table(),
        articles_table(),
        scheduled_publications_table(),
    ]
}

fn users_table() -> Table {
    Table::new(
        USERS_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("username", ColumnType::Text, true, true, None),
            Column::new("email", ColumnType::Text, true, true, None),
            Column::new("phone", ColumnType::Text, false, false, None),
            Column::new("created_at", ColumnType::TimestampTZ, true, false, Some("now()")),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn roles_table() -> Table {
    Table::new(
        ROLES_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("name", ColumnType::Text, true, true, None),
            Column::new("description", ColumnType::Text, true, false, None),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn permissions_table() -> Table {
    Table::new(
        PERMISSIONS_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("code", ColumnType::Text, true, true, None),
            Column::new("description", ColumnType::Text, true, false, None),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn user_roles_table() -> Table {
    Table::new(
        USER_ROLES_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("user_id", ColumnType::BigInt, true, false, None),
            Column::new("role_id", ColumnType::BigInt, true, false, None),
        ],
        vec![
            ForeignKeyConstraint::new(USER_ROLES_TABLE, "user_id", USERS_TABLE, "id"),
            ForeignKeyConstraint::new(USER_ROLES_TABLE, "role_id", ROLES_TABLE, "id"),
        ],
        vec![Index::new(USER_ROLES_TABLE, vec!["user_id", "role_id"], true)],
    )
}

fn role_permissions_table() -> Table {
    Table::new(
        ROLE_PERMISSIONS_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("role_id", ColumnType::BigInt, true, false, None),
            Column::new("permission_id", ColumnType::BigInt, true, false, None),
        ],
        vec![
            ForeignKeyConstraint::new(ROLE_PERMISSIONS_TABLE, "role_id", ROLES_TABLE, "id"),
            ForeignKeyConstraint::new(
                ROLE_PERMISSIONS_TABLE,
                "permission_id",
                PERMISSIONS_TABLE,
                "id",
            ),
        ],
        vec![Index::new(
            ROLE_PERMISSIONS_TABLE,
            vec!["role_id", "permission_id"],
            true,
        )],
    )
}

fn categories_table() -> Table {
    Table::new(
        CATEGORIES_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("name", ColumnType::Text, true, false, None),
            Column::new("description", ColumnType::Text, true, false, None),
            Column::new("kind", ColumnType::Text, true, false, Some("'free'")),
            Column::new("active", ColumnType::Boolean, true, false, Some("TRUE")),
            Column::new("is_moderated", ColumnType::Boolean, true, false, Some("FALSE")),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn articles_table() -> Table {
    Table::new(
        ARTICLES_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("title", ColumnType::Text, true, false, None),
            Column::new("description", ColumnType::Text, true, false, None),
            Column::new("author_id", ColumnType::BigInt, true, false, None),
            Column::new("category_id", ColumnType::BigInt, true, false, None),
            Column::new("state", ColumnType::Text, true, false, Some("'draft'")),
            Column::new("published_at", ColumnType::TimestampTZ, false, false, None),
            Column::new("views_number", ColumnType::BigInt, true, false, Some("0")),
            Column::new("shares_number", ColumnType::BigInt, true, false, Some("0")),
            Column::new("likes_number", ColumnType::BigInt, true, false, Some("0")),
            Column::new("dislikes_number", ColumnType::BigInt, true, false, Some("0")),
            Column::new("created_at", ColumnType::TimestampTZ, true, false, Some("now()")),
            Column::new("updated_at", ColumnType::TimestampTZ, true, false, Some("now()")),
        ],
        vec![
            ForeignKeyConstraint::new(ARTICLES_TABLE, "author_id", USERS_TABLE, "id"),
            ForeignKeyConstraint::new(ARTICLES_TABLE, "category_id", CATEGORIES_TABLE, "id"),
        ],
        vec![
            Index::new(ARTICLES_TABLE, vec!["state"], false),
            Index::new(ARTICLES_TABLE, vec!["category_id"], false),
            Index::new(ARTICLES_TABLE, vec!["author_id"], false),
        ],
    )
}

fn scheduled_publications_table() -> Table {
    let mut one_pending_per_article = Index::new(
        SCHEDULED_PUBLICATIONS_TABLE,
        vec!["article_id"],
        true,
    );
    // At most one unconsumed schedule may survive per article; the
    // consumed ones stay behind as an audit trail.
    one_pending_per_article.predicate = Some("NOT published".to_string());

    Table::new(
        SCHEDULED_PUBLICATIONS_TABLE,
        vec![
            Column::primary_key("id", ColumnType::BigSerial),
            Column::new("article_id", ColumnType::BigInt, true, false, None),
            Column::new("publish_at", ColumnType::TimestampTZ, true, false, None),
            Column::new("published", ColumnType::Boolean, true, false, Some("FALSE")),
        ],
        vec![ForeignKeyConstraint::new(
            SCHEDULED_PUBLICATIONS_TABLE,
            "article_id",
            ARTICLES_TABLE,
            "id",
        )],
        vec![
            one_pending_per_article,
            Index::new(SCHEDULED_PUBLICATIONS_TABLE, vec!["published", "publish_at"], false),
        ],
    )
}

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// How readers gain access to the articles of a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Readable by anyone, including guests.
    Free,
    /// Requires an active subscription to the category.
    Subscription,
    /// Sold as a one-off purchase.
    Pay,
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct CategoryName(String);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A grouping of articles. Read-only input to the transition rules: the
/// `is_moderated` flag decides whether publication requires a moderator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: String,
    pub kind: CategoryKind,
    /// Inactive categories are hidden from readers; transitions ignore it.
    pub active: bool,
    pub is_moderated: bool,
}

// implementations

impl CategoryKind {
    pub fn code(&self) -> &'static str {
        match self {
            CategoryKind::Free => "free",
            CategoryKind::Subscription => "subscription",
            CategoryKind::Pay => "pay",
        }
    }

    pub fn from_code(code: &str) -> Option<CategoryKind> {
        match code {
            "free" => Some(CategoryKind::Free),
            "subscription" => Some(CategoryKind::Subscription),
            "pay" => Some(CategoryKind::Pay),
            _ => None,
        }
    }
}

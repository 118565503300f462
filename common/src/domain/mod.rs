use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

pub mod access;
pub mod category;

pub use access::{Actor, Permission};
pub use category::{Category, CategoryKind, CategoryName};

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

static VALID_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must be valid")
});

/// Mailbox the author notifications are delivered to.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, regex = VALID_EMAIL_REGEX),
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
pub struct EmailAddress(String);

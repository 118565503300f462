use serde::{Deserialize, Serialize};

/// Lifecycle position of an article. No other states exist.
///
/// The workflow runs Draft → Revision → Edited → Published; Inactive is a
/// side state reachable from anywhere and has no outbound transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleState {
    /// Being written, still owned by its author.
    Draft,
    /// Handed over for editorial review.
    Revision,
    /// Reviewed and ready for the publication gate.
    Edited,
    Published,
    /// Withdrawn. Terminal.
    Inactive,
}

impl ArticleState {
    pub const ALL: [ArticleState; 5] = [
        ArticleState::Draft,
        ArticleState::Revision,
        ArticleState::Edited,
        ArticleState::Published,
        ArticleState::Inactive,
    ];

    /// Stable string code used as the storage representation and in URLs.
    pub fn code(&self) -> &'static str {
        match self {
            ArticleState::Draft => "draft",
            ArticleState::Revision => "revision",
            ArticleState::Edited => "edited",
            ArticleState::Published => "published",
            ArticleState::Inactive => "inactive",
        }
    }

    pub fn from_code(code: &str) -> Option<ArticleState> {
        ArticleState::ALL.iter().copied().find(|s| s.code() == code)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ArticleState::Inactive)
    }
}

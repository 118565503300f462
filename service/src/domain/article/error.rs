use crate::domain::article::state::ArticleState;
use crate::domain::repository::RepositoryError;

/// Why the transition rules rejected a request. Both outcomes are
/// terminal: retrying without a role or state change cannot succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The actor lacks the permission/role/ownership combination the
    /// matching rule requires.
    Forbidden,
    /// No rule reaches the requested state from the current one.
    InvalidTransition {
        from: ArticleState,
        to: ArticleState,
    },
}

/// Failure of a `change_state` request.
#[derive(Debug)]
pub enum StateChangeError {
    ArticleNotFound,
    Rejected(TransitionError),
    Storage(RepositoryError),
}

/// Failure of a schedule registration.
#[derive(Debug)]
pub enum ScheduleError {
    ArticleNotFound,
    /// The actor would not be allowed to publish this article.
    Forbidden,
    /// A competing schedule request for the same article won the race.
    Conflict,
    Storage(RepositoryError),
}

impl From<TransitionError> for StateChangeError {
    fn from(value: TransitionError) -> Self {
        Self::Rejected(value)
    }
}

impl From<RepositoryError> for StateChangeError {
    fn from(value: RepositoryError) -> Self {
        Self::Storage(value)
    }
}

impl From<RepositoryError> for ScheduleError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::UniqueViolation(_) => Self::Conflict,
            other => Self::Storage(other),
        }
    }
}

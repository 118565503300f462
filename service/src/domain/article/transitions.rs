use pressroom_common::{Actor, Permission};

use crate::domain::article::Article;
use crate::domain::article::error::TransitionError;
use crate::domain::article::state::ArticleState;
use crate::domain::notification::NotificationRequest;

/// The decided effect of a legal transition. Pure data: the caller
/// performs the persistence write and the notification send.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub new_state: ArticleState,
    /// Stamp `published_at` with the current time in the same write as
    /// the state change. Only set on the first arrival in Published.
    pub stamp_published_at: bool,
    pub notification: Option<NotificationRequest>,
}

/// Evaluate the full transition table for an interactive actor.
///
/// Reachability is checked before the actor: a target no rule reaches
/// from the current state is `InvalidTransition`, a reachable target the
/// actor does not qualify for is `Forbidden`. The article is untouched
/// either way.
pub fn evaluate(
    article: &Article,
    target: ArticleState,
    actor: &Actor,
) -> Result<TransitionOutcome, TransitionError> {
    if !reachable(article, target) {
        return Err(TransitionError::InvalidTransition {
            from: article.state,
            to: target,
        });
    }

    if !permitted(article, target, actor) {
        return Err(TransitionError::Forbidden);
    }

    Ok(outcome(article, target))
}

/// The sweep path: authorization happened when the schedule was
/// registered, so only state legality is enforced here.
pub fn evaluate_trusted_publish(article: &Article) -> Result<TransitionOutcome, TransitionError> {
    if !reachable(article, ArticleState::Published) {
        return Err(TransitionError::InvalidTransition {
            from: article.state,
            to: ArticleState::Published,
        });
    }

    Ok(outcome(article, ArticleState::Published))
}

/// Whether the actor could take this article through the Published gate,
/// ignoring where the article currently sits in the workflow. This is
/// the precondition checked when a deferred publication is registered.
pub fn may_eventually_publish(article: &Article, actor: &Actor) -> bool {
    if actor.is_admin() || actor.has(Permission::ModerateArticles) {
        return true;
    }

    // Self-publishing is only open outside moderated categories.
    !article.category.is_moderated && article.is_authored_by(actor)
}

/// Can any actor at all move the article from its current state to
/// `target`? Inactive has no outbound rule, so nothing leaves it.
fn reachable(article: &Article, target: ArticleState) -> bool {
    use ArticleState::*;

    if article.state.is_terminal() {
        return false;
    }

    match target {
        Revision => matches!(article.state, Draft | Edited),
        Edited => article.state == Revision,
        Published => {
            if article.category.is_moderated {
                article.state == Edited
            } else {
                matches!(article.state, Draft | Revision | Edited)
            }
        }
        // Administrators may re-draft or deactivate from any live state.
        Draft | Inactive => true,
    }
}

fn permitted(article: &Article, target: ArticleState, actor: &Actor) -> bool {
    use ArticleState::*;

    if actor.is_admin() {
        return true;
    }

    let author = article.is_authored_by(actor);

    match target {
        Revision => {
            (author && article.state == Draft)
                || ((actor.has(Permission::EditArticles)
                    || actor.has(Permission::ModerateArticles))
                    && article.state == Edited)
        }
        Edited => actor.has(Permission::EditArticles),
        Published => {
            if article.category.is_moderated {
                actor.has(Permission::ModerateArticles)
            } else {
                author || actor.has(Permission::ModerateArticles)
            }
        }
        Draft => actor.has(Permission::EditArticles) && article.state == Revision,
        Inactive => author,
    }
}

fn outcome(article: &Article, target: ArticleState) -> TransitionOutcome {
    let stamp_published_at =
        target == ArticleState::Published && article.published_at.is_none();

    // No-op moves (admin re-issuing the current state) skip the mail.
    let notification = (article.state != target)
        .then(|| NotificationRequest::state_changed(article, article.state, target));

    TransitionOutcome {
        new_state: target,
        stamp_published_at,
        notification,
    }
}

use pressroom_common::EmailAddress;

use crate::domain::article::Article;
use crate::domain::article::state::ArticleState;

/// An email the author should receive about their article. Built by the
/// transition rules, delivered by an adapter; delivery failure never
/// affects the transition itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRequest {
    pub to: EmailAddress,
    pub subject: String,
    pub html_body: String,
}

impl NotificationRequest {
    /// Summarize an old-state → new-state move for the article's author.
    pub fn state_changed(article: &Article, from: ArticleState, to: ArticleState) -> Self {
        let subject = format!("Your article \"{}\" moved to {}", article.title, to.code());
        let html_body = format!(
            "<p>Hello,</p>\
             <p>The article <strong>{}</strong> changed state: \
             <em>{}</em> &rarr; <em>{}</em>.</p>",
            article.title,
            from.code(),
            to.code(),
        );

        Self {
            to: article.author_email.clone(),
            subject,
            html_body,
        }
    }
}

/// Outbound mail port. Fire-and-forget from the state machine's point of
/// view: the caller logs a failure and moves on.
pub trait Notifier: Clone + Send + Sync + 'static {
    fn send(
        &self,
        request: NotificationRequest,
    ) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}

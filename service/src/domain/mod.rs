pub mod article;
pub mod clock;
pub mod notification;
pub mod publication;
pub mod repository;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::clock::Clock;
use crate::domain::notification::Notifier;
use crate::domain::publication::PublicationService;
use crate::domain::repository::{AccessResolver, ArticleRepository, ScheduleRepository};
use crate::domain::scheduler::SchedulerService;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type Articles: ArticleRepository;
    type Schedules: ScheduleRepository;
    type Access: AccessResolver;
    type Mailer: Notifier;
    type Time: Clock;

    fn publications(&self) -> &PublicationService<Self::Articles, Self::Mailer, Self::Time>;
    fn scheduler(
        &self,
    ) -> &SchedulerService<Self::Articles, Self::Schedules, Self::Mailer, Self::Time>;
    fn access(&self) -> &Self::Access;
}

use pressroom_common::database::Database;

use crate::domain::AppState;
use crate::domain::clock::SystemClock;
use crate::domain::publication::PublicationService;
use crate::domain::scheduler::SchedulerService;
use crate::infrastructure::notification::RestMailer;
use crate::infrastructure::persistence::{
    PostgresAccessRepository, PostgresArticleRepository, PostgresScheduleRepository,
};
use crate::infrastructure::settings::Settings;

pub mod http;
pub mod notification;
pub mod persistence;
pub mod settings;
pub mod worker;

#[derive(Clone)]
pub struct AppStateImpl {
    publications: PublicationService<PostgresArticleRepository, RestMailer, SystemClock>,
    scheduler: SchedulerService<
        PostgresArticleRepository,
        PostgresScheduleRepository,
        RestMailer,
        SystemClock,
    >,
    access: PostgresAccessRepository,
}

impl AppStateImpl {
    pub fn new(database: &'static Database, settings: &Settings) -> Self {
        let articles = PostgresArticleRepository::new(database);
        let schedules = PostgresScheduleRepository::new(database);
        let access = PostgresAccessRepository::new(database);
        let mailer = RestMailer::new(&settings.mailer);

        let publications = PublicationService::new(articles, mailer, SystemClock);
        let scheduler = SchedulerService::new(schedules, publications.clone());

        Self {
            publications,
            scheduler,
            access,
        }
    }
}

impl AppState for AppStateImpl {
    type Articles = PostgresArticleRepository;
    type Schedules = PostgresScheduleRepository;
    type Access = PostgresAccessRepository;
    type Mailer = RestMailer;
    type Time = SystemClock;

    fn publications(&self) -> &PublicationService<Self::Articles, Self::Mailer, Self::Time> {
        &self.publications
    }

    fn scheduler(
        &self,
    ) -> &SchedulerService<Self::Articles, Self::Schedules, Self::Mailer, Self::Time> {
        &self.scheduler
    }

    fn access(&self) -> &Self::Access {
        &self.access
    }
}

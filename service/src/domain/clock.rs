use chrono::{DateTime, Utc};

/// Time source for the publication stamp and the sweep's due predicate.
/// Injected so both can run against a fixed clock in tests.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

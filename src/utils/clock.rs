use chrono::{Local, NaiveDate, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    /// Current wall-clock time in the local timezone.
    fn now(&self) -> NaiveDateTime;
}

/// Local calendar day according to `clock`. Callers that need "today" more than once in an
/// operation should call this once and pass the date around.
pub fn today(clock: &dyn Clock) -> NaiveDate {
    clock.now().date()
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that never moves. Used to evaluate statistics as of another day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
